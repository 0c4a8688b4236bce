use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::Book;

use super::CacheStore;

/// Fixed key the book list snapshot is stored under.
pub const BOOKS_KEY: &str = "books";

/// The cached book list snapshot.
///
/// Every failure here is logged and swallowed: a broken cache degrades to
/// "no cache", it never stops the catalog from loading.
#[derive(Debug, Clone)]
pub struct BookCache {
    store: CacheStore,
}

impl BookCache {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    /// Read the snapshot. A value that fails to parse is discarded.
    pub fn load(&self) -> Option<Vec<Book>> {
        let raw = match self.store.get(BOOKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read book cache");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Book>>(&raw) {
            Ok(books) => {
                debug!(count = books.len(), "Loaded book cache");
                Some(books)
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupt book cache");
                self.clear();
                None
            }
        }
    }

    /// Overwrite the snapshot with `books`.
    pub fn save(&self, books: &[Book]) {
        let contents = match serde_json::to_string(books) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to serialize book cache");
                return;
            }
        };
        if let Err(e) = self.store.set(BOOKS_KEY, &contents) {
            warn!(error = %e, "Failed to write book cache");
        }
    }

    /// Drop the record with `id` from the snapshot, leaving every other
    /// record in place. No-op when there is no valid snapshot.
    pub fn remove_book(&self, id: &str) {
        let Some(mut books) = self.load() else {
            debug!(id, "No book cache to update on delete");
            return;
        };
        books.retain(|b| b.id != id);
        self.save(&books);
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(BOOKS_KEY) {
            warn!(error = %e, "Failed to clear book cache");
        }
    }

    /// Human-readable age of the snapshot, e.g. "5m ago".
    pub fn age_display(&self) -> Option<String> {
        let modified: DateTime<Utc> = self.store.modified(BOOKS_KEY)?.into();
        Some(format_age((Utc::now() - modified).num_minutes()))
    }
}

/// Format an age in minutes for the status bar.
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}
