//! Cache-backed loading and mutation of the book catalog.
//!
//! `Catalog` is the context threaded through every handler: it owns the
//! remote store and the cache snapshot, and drives a `CatalogView`.
//!
//! Each handler is split into phases so a front end can run the network
//! step on a background task and apply the result on its own task:
//!
//! | Handler  | Local phase     | Network phase | Apply phase                              |
//! |----------|-----------------|---------------|------------------------------------------|
//! | load     | `open_cache`    | `fetch`       | `reconcile`                              |
//! | create   | `validate`      | `submit`      | `create_failed` or `finish_create_reload` |
//! | delete   | (confirmation)  | `remove`      | `finish_delete`                          |
//!
//! `load`, `create` and `delete` run all phases in sequence on the calling
//! task, for front ends that can await the network inline (`--list`).

pub mod loader;
pub mod mutations;
pub mod view;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use crate::api::BookStore;
use crate::cache::BookCache;

pub use loader::{lists_differ, LoadOutcome};
pub use view::CatalogView;

pub struct Catalog<S: BookStore> {
    store: Arc<S>,
    cache: BookCache,
}

impl<S: BookStore> Catalog<S> {
    pub fn new(store: S, cache: BookCache) -> Self {
        Self {
            store: Arc::new(store),
            cache,
        }
    }

    pub fn cache(&self) -> &BookCache {
        &self.cache
    }
}

// Manual impl: cloning shares the store, it doesn't require S: Clone
impl<S: BookStore> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
        }
    }
}
