//! Local caching module for instant initial render.
//!
//! This module provides a directory-backed key/value `CacheStore` and the
//! `BookCache` that keeps the last known book list under one fixed key.
//! The snapshot survives restarts and has no expiry; it is overwritten
//! whenever reconciliation decides the remote list changed, filtered on
//! delete, and discarded when it no longer parses.

pub mod manager;
pub mod store;

pub use manager::{format_age, BookCache, BOOKS_KEY};
pub use store::CacheStore;
