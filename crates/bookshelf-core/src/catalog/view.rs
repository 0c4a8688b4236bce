use crate::models::Book;

/// The presentation context every handler is given.
///
/// Implementations own the attachment points (results list, loading
/// indicator, form, notifications); handlers only toggle and fill them.
pub trait CatalogView {
    fn set_loading(&mut self, loading: bool);

    /// Replace the displayed list. An empty slice shows the empty state.
    fn render_books(&mut self, books: &[Book]);

    /// Show `message` in place of the list.
    fn render_error(&mut self, message: &str);

    /// Remove one record from the display without re-rendering the rest.
    /// Returns true when the display is left empty.
    fn remove_book(&mut self, id: &str) -> bool;

    fn render_empty(&mut self);

    /// Blocking, user-facing notification.
    fn notify(&mut self, message: &str);

    fn clear_form(&mut self);
}
