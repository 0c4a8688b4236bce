//! Core library for bookshelf.
//!
//! Everything a front end needs to show a remote book catalog that renders
//! instantly from a local snapshot and stays eventually consistent with the
//! remote store:
//!
//! - `api`: REST client for `GET/POST /books` and `DELETE /books/{id}`
//! - `cache`: persistent key/value cache holding the last known list
//! - `catalog`: loader, reconciliation and create/delete handlers
//! - `models`: `Book`, `NewBook`, `BookForm`

pub mod api;
pub mod cache;
pub mod catalog;
pub mod models;

pub use api::{ApiClient, ApiError, BookStore};
pub use cache::{BookCache, CacheStore};
pub use catalog::{lists_differ, Catalog, CatalogView, LoadOutcome};
pub use models::{Book, BookForm, NewBook, ValidationError};
