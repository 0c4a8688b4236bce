//! REST client module for the remote book catalog.
//!
//! This module provides the `ApiClient` for the three catalog endpoints
//! (`GET /books`, `POST /books`, `DELETE /books/{id}`) and the `BookStore`
//! trait the loader and mutation handlers are written against.

pub mod client;
pub mod error;

pub use client::{ApiClient, BookStore};
pub use error::ApiError;
