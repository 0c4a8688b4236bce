use tracing::{info, warn};

use crate::api::{ApiError, BookStore};
use crate::models::{Book, BookForm, NewBook};

use super::{Catalog, CatalogView, LoadOutcome};

impl<S: BookStore> Catalog<S> {
    /// Validate the create form. Failures are reported through the view and
    /// nothing is sent.
    pub fn validate<V: CatalogView + ?Sized>(&self, view: &mut V, form: &BookForm) -> Option<NewBook> {
        match form.validate() {
            Ok(book) => Some(book),
            Err(e) => {
                info!(error = %e, "Create blocked by validation");
                view.notify(&e.to_string());
                None
            }
        }
    }

    pub async fn submit(&self, book: &NewBook) -> Result<Book, ApiError> {
        self.store.create_book(book).await
    }

    pub fn create_failed<V: CatalogView + ?Sized>(&self, view: &mut V, error: &ApiError) {
        warn!(error = %error, "Failed to create book");
        view.notify(&format!("Failed to add book: {}", error));
    }

    /// Apply the reload that follows a successful create. The form is
    /// cleared only once that reload has settled.
    pub fn finish_create_reload<V: CatalogView + ?Sized>(
        &self,
        view: &mut V,
        cached: Option<&[Book]>,
        result: Result<Vec<Book>, ApiError>,
    ) -> LoadOutcome {
        let outcome = self.reconcile(view, cached, result);
        view.clear_form();
        outcome
    }

    /// On success resynchronize from the remote store, then clear the form.
    /// Returns whether the create succeeded.
    pub async fn finish_create<V: CatalogView + ?Sized>(
        &self,
        view: &mut V,
        result: Result<Book, ApiError>,
    ) -> bool {
        match result {
            Ok(book) => {
                info!(id = %book.id, title = %book.title, "Book created");
                let cached = self.open_cache(view);
                let fresh = self.fetch().await;
                self.finish_create_reload(view, cached.as_deref(), fresh);
                true
            }
            Err(e) => {
                self.create_failed(view, &e);
                false
            }
        }
    }

    /// Validate, submit and resynchronize.
    pub async fn create<V: CatalogView + ?Sized>(&self, view: &mut V, form: &BookForm) -> bool {
        let Some(book) = self.validate(view, form) else {
            return false;
        };
        let result = self.submit(&book).await;
        self.finish_create(view, result).await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.store.delete_book(id).await
    }

    /// Apply a settled delete: drop just that record from the display and
    /// the cache, showing the empty state if nothing is left.
    pub fn finish_delete<V: CatalogView + ?Sized>(
        &self,
        view: &mut V,
        id: &str,
        result: Result<(), ApiError>,
    ) -> bool {
        match result {
            Ok(()) => {
                info!(id, "Book deleted");
                let now_empty = view.remove_book(id);
                self.cache.remove_book(id);
                if now_empty {
                    view.render_empty();
                }
                true
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to delete book");
                view.notify(&format!("Failed to delete book: {}", e));
                false
            }
        }
    }

    /// Delete a record that the user has already confirmed.
    pub async fn delete<V: CatalogView + ?Sized>(&self, view: &mut V, id: &str) -> bool {
        let result = self.remove(id).await;
        self.finish_delete(view, id, result)
    }
}
