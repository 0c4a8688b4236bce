//! In-memory remote store and recording view shared by the catalog tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tempfile::TempDir;

use crate::api::{ApiError, BookStore};
use crate::cache::{BookCache, CacheStore};
use crate::models::{Book, NewBook};

use super::{Catalog, CatalogView};

pub fn book(id: &str, title: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: "Author".to_string(),
        year: 2000,
        genre: "Unknown".to_string(),
    }
}

pub fn catalog(store: FakeStore, cached: Option<&[Book]>) -> (TempDir, Catalog<FakeStore>) {
    let dir = tempfile::tempdir().unwrap();
    let cache = BookCache::new(CacheStore::new(dir.path().to_path_buf()).unwrap());
    if let Some(books) = cached {
        cache.save(books);
    }
    (dir, Catalog::new(store, cache))
}

#[derive(Default)]
pub struct FakeStore {
    books: Mutex<Vec<Book>>,
    failure: Mutex<Option<(u16, String)>>,
    next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_books(books: Vec<Book>) -> Self {
        let store = Self::default();
        store.next_id.store(100, Ordering::SeqCst);
        *store.books.lock().unwrap() = books;
        store
    }

    /// Make every subsequent call fail with a remote error.
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn books(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match &*self.failure.lock().unwrap() {
            Some((status, message)) => Err(ApiError::Remote {
                status: StatusCode::from_u16(*status).unwrap(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookStore for FakeStore {
    async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.books())
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let created = Book {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            genre: book.genre.clone(),
        };
        self.books.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_book(&self, id: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.books.lock().unwrap().retain(|b| b.id != id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub books: Vec<Book>,
    pub render_count: usize,
    pub loading_history: Vec<bool>,
    pub error: Option<String>,
    pub empty_shown: bool,
    pub notifications: Vec<String>,
    pub form_cleared: bool,
}

impl CatalogView for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.loading_history.push(loading);
    }

    fn render_books(&mut self, books: &[Book]) {
        self.books = books.to_vec();
        self.render_count += 1;
        self.error = None;
        self.empty_shown = books.is_empty();
    }

    fn render_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn remove_book(&mut self, id: &str) -> bool {
        self.books.retain(|b| b.id != id);
        self.books.is_empty()
    }

    fn render_empty(&mut self) {
        self.empty_shown = true;
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn clear_form(&mut self) {
        self.form_cleared = true;
    }
}
