//! Data models for catalog entities.
//!
//! - `Book`: a record as stored by the remote catalog
//! - `NewBook`: the payload submitted when creating a record
//! - `BookForm`: raw text from the create form, validated into a `NewBook`

pub mod book;

pub use book::{Book, BookForm, NewBook, ValidationError, DEFAULT_GENRE};
