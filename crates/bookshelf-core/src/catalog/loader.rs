use tracing::{debug, info, warn};

use crate::api::{ApiError, BookStore};
use crate::models::Book;

use super::{Catalog, CatalogView};

/// What reconciliation did with a settled fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh list matched the cached one; display and cache untouched.
    Unchanged,
    /// Display and cache replaced with the fresh list.
    Refreshed,
    /// Fetch failed; the cache-derived display stays up.
    Stale,
    /// Fetch failed with nothing cached; an error is displayed.
    Failed,
}

/// Shallow change check: lengths differ, or some position holds a
/// different id. Reordering that keeps ids in place and field edits under
/// an unchanged id are not detected.
pub fn lists_differ(cached: &[Book], fresh: &[Book]) -> bool {
    cached.len() != fresh.len() || cached.iter().zip(fresh).any(|(c, f)| c.id != f.id)
}

impl<S: BookStore> Catalog<S> {
    /// Render the cached snapshot if there is a valid one; otherwise show
    /// the loading indicator over an empty list. Returns what was rendered.
    pub fn open_cache<V: CatalogView + ?Sized>(&self, view: &mut V) -> Option<Vec<Book>> {
        match self.cache.load() {
            Some(books) => {
                debug!(count = books.len(), "Rendering cached books");
                view.render_books(&books);
                view.set_loading(false);
                Some(books)
            }
            None => {
                view.set_loading(true);
                view.render_books(&[]);
                None
            }
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Book>, ApiError> {
        self.store.list_books().await
    }

    /// Apply a settled fetch against whatever `open_cache` rendered.
    pub fn reconcile<V: CatalogView + ?Sized>(
        &self,
        view: &mut V,
        cached: Option<&[Book]>,
        result: Result<Vec<Book>, ApiError>,
    ) -> LoadOutcome {
        let outcome = match (result, cached) {
            (Ok(fresh), Some(cached)) if !lists_differ(cached, &fresh) => {
                debug!(count = fresh.len(), "Remote list unchanged");
                LoadOutcome::Unchanged
            }
            (Ok(fresh), _) => {
                info!(count = fresh.len(), "Remote list changed, refreshing display and cache");
                view.render_books(&fresh);
                self.cache.save(&fresh);
                LoadOutcome::Refreshed
            }
            (Err(e), Some(_)) => {
                warn!(error = %e, "Failed to fetch books, keeping cached list");
                LoadOutcome::Stale
            }
            (Err(e), None) => {
                warn!(error = %e, "Failed to fetch books with no cache available");
                view.render_error(&format!("Failed to load books: {}", e));
                LoadOutcome::Failed
            }
        };
        view.set_loading(false);
        outcome
    }

    /// The full loader sequence: cached render, fetch, reconcile.
    pub async fn load<V: CatalogView + ?Sized>(&self, view: &mut V) -> LoadOutcome {
        info!("Loading books");
        let cached = self.open_cache(view);
        let result = self.fetch().await;
        self.reconcile(view, cached.as_deref(), result)
    }
}
