//! Application state management for Bookshelf.
//!
//! This module contains the `App` struct that owns the catalog context, the
//! terminal-side presentation state, and the channel that background
//! network tasks report back through.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use bookshelf_core::{
    ApiClient, ApiError, Book, BookCache, BookForm, CacheStore, Catalog, CatalogView, LoadOutcome,
};

use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for any create form field.
const MAX_FIELD_LENGTH: usize = 100;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    AddingBook,
    ConfirmingDelete,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Create form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Author,
    Year,
    Genre,
    Submit,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Author => "Author",
            FormField::Year => "Year",
            FormField::Genre => "Genre",
            FormField::Submit => "Add",
        }
    }

    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Author,
            FormField::Author => FormField::Year,
            FormField::Year => FormField::Genre,
            FormField::Genre => FormField::Submit,
            FormField::Submit => FormField::Title,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Submit,
            FormField::Author => FormField::Title,
            FormField::Year => FormField::Author,
            FormField::Genre => FormField::Year,
            FormField::Submit => FormField::Genre,
        }
    }
}

// ============================================================================
// Presentation State
// ============================================================================

/// Terminal-side attachment points the catalog handlers drive.
#[derive(Debug, Default)]
pub struct BookListView {
    pub books: Vec<Book>,
    pub selection: usize,
    pub loading: bool,
    /// Rendered in place of the list when set.
    pub error: Option<String>,
    /// Blocking notification; dismissed by any key.
    pub notification: Option<String>,
    pub form: BookForm,
}

impl BookListView {
    pub fn selected(&self) -> Option<&Book> {
        self.books.get(self.selection)
    }

    pub fn select_next(&mut self, step: usize) {
        let max_index = self.books.len().saturating_sub(1);
        self.selection = self.selection.saturating_add(step).min(max_index);
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.books.len().saturating_sub(1));
    }

    pub fn form_field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.form.title),
            FormField::Author => Some(&mut self.form.author),
            FormField::Year => Some(&mut self.form.year),
            FormField::Genre => Some(&mut self.form.genre),
            FormField::Submit => None,
        }
    }
}

impl CatalogView for BookListView {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn render_books(&mut self, books: &[Book]) {
        self.books = books.to_vec();
        self.error = None;
        self.clamp_selection();
    }

    fn render_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn remove_book(&mut self, id: &str) -> bool {
        self.books.retain(|b| b.id != id);
        self.clamp_selection();
        self.books.is_empty()
    }

    fn render_empty(&mut self) {
        // An empty list with no error renders the empty-state message
        self.error = None;
    }

    fn notify(&mut self, message: &str) {
        self.notification = Some(message.to_string());
    }

    fn clear_form(&mut self) {
        self.form.clear();
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned network tasks. Display and cache are
/// only touched when these are processed on the UI task.
enum TaskResult {
    /// `GET /books` settled for the given load generation
    Fetched(u64, Result<Vec<Book>, ApiError>),
    /// `POST /books` settled
    Created(Result<Book, ApiError>),
    /// `DELETE /books/{id}` settled
    Deleted(String, Result<(), ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub catalog: Catalog<ApiClient>,
    pub view: BookListView,

    // UI State
    pub state: AppState,
    pub form_focus: FormField,
    pub submitting: bool,
    /// Record awaiting delete confirmation
    pub pending_delete: Option<Book>,

    /// Snapshot the last loader run rendered from cache, for reconciliation
    cached_snapshot: Option<Vec<Book>>,
    /// Bumped by every `start_load`; tags fetch results
    load_generation: u64,
    /// Generation of the reload that follows a successful create
    create_reload: Option<u64>,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status bar
    pub status_message: Option<String>,
    pub cache_age: Option<String>,
}

impl App {
    /// Create a new application instance from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let api_url = config.api_url();
        let cache_dir = config.cache_dir();
        debug!(%api_url, ?cache_dir, "App configured");

        let api = ApiClient::new(&api_url)?;
        let cache = BookCache::new(CacheStore::new(cache_dir)?);
        Ok(Self::with_catalog(Catalog::new(api, cache)))
    }

    pub fn with_catalog(catalog: Catalog<ApiClient>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let cache_age = catalog.cache().age_display();

        Self {
            catalog,
            view: BookListView::default(),

            state: AppState::Normal,
            form_focus: FormField::Title,
            submitting: false,
            pending_delete: None,

            cached_snapshot: None,
            load_generation: 0,
            create_reload: None,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
            cache_age,
        }
    }

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    // =========================================================================
    // Loader
    // =========================================================================

    /// Render from cache, then fetch the remote list in the background.
    pub fn start_load(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        info!(generation, "Starting book load");
        self.cached_snapshot = self.catalog.open_cache(&mut self.view);
        self.status_message = Some("Refreshing...".to_string());

        let catalog = self.catalog.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch().await;
            Self::send_result(&tx, TaskResult::Fetched(generation, result)).await;
        });
    }

    // =========================================================================
    // Create
    // =========================================================================

    pub fn start_adding(&mut self) {
        self.state = AppState::AddingBook;
        self.form_focus = FormField::Title;
    }

    /// Validate the form and submit it in the background.
    pub fn submit_form(&mut self) {
        if self.submitting {
            return;
        }
        let form = self.view.form.clone();
        let Some(new_book) = self.catalog.validate(&mut self.view, &form) else {
            return;
        };

        self.submitting = true;
        self.status_message = Some(format!("Adding \"{}\"...", new_book.title));

        let catalog = self.catalog.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = catalog.submit(&new_book).await;
            Self::send_result(&tx, TaskResult::Created(result)).await;
        });
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting the selected record.
    pub fn request_delete(&mut self) {
        if let Some(book) = self.view.selected().cloned() {
            self.pending_delete = Some(book);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(book) = self.pending_delete.take() else {
            return;
        };
        self.status_message = Some(format!("Deleting \"{}\"...", book.title));

        let catalog = self.catalog.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = catalog.remove(&book.id).await;
            Self::send_result(&tx, TaskResult::Deleted(book.id, result)).await;
        });
    }

    // =========================================================================
    // Task Results
    // =========================================================================

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Fetched(generation, result) => {
                let cached = self.cached_snapshot.as_deref();
                let outcome = if self.create_reload == Some(generation) {
                    self.create_reload = None;
                    self.catalog
                        .finish_create_reload(&mut self.view, cached, result)
                } else {
                    self.catalog.reconcile(&mut self.view, cached, result)
                };
                debug!(generation, ?outcome, "Load settled");
                self.status_message = match outcome {
                    LoadOutcome::Stale => Some("Offline - showing cached books".to_string()),
                    _ => None,
                };
            }
            TaskResult::Created(Ok(book)) => {
                info!(id = %book.id, "Book created, resynchronizing");
                self.submitting = false;
                if self.state == AppState::AddingBook {
                    self.state = AppState::Normal;
                }
                self.start_load();
                self.create_reload = Some(self.load_generation);
            }
            TaskResult::Created(Err(e)) => {
                self.submitting = false;
                self.status_message = None;
                self.catalog.create_failed(&mut self.view, &e);
            }
            TaskResult::Deleted(id, result) => {
                self.catalog.finish_delete(&mut self.view, &id, result);
                self.status_message = None;
            }
        }
        self.cache_age = self.catalog.cache().age_display();
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a form field character should be accepted
pub fn can_add_field_char(field: FormField, current_len: usize, c: char) -> bool {
    let allowed = match field {
        FormField::Year => c.is_ascii_digit() || c == '-',
        FormField::Submit => false,
        _ => is_valid_input_char(c),
    };
    allowed && current_len < MAX_FIELD_LENGTH
}

// ============================================================================
// Tests
// ============================================================================
