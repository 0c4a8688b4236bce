//! Non-interactive loader run for `bookshelf --list`.

use bookshelf_core::{ApiClient, Book, Catalog, CatalogView};

/// Collects what the loader renders so it can be printed once it settles.
#[derive(Debug, Default)]
pub struct PrintView {
    books: Vec<Book>,
    error: Option<String>,
    notifications: Vec<String>,
}

impl PrintView {
    /// Final text for stdout.
    pub fn output(&self) -> String {
        if let Some(ref error) = self.error {
            return error.clone();
        }
        if self.books.is_empty() {
            return "No books in the catalog.".to_string();
        }
        self.books
            .iter()
            .map(|b| format!("{}\t{}", b.id, b.display_line()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl CatalogView for PrintView {
    fn set_loading(&mut self, _loading: bool) {}

    fn render_books(&mut self, books: &[Book]) {
        self.books = books.to_vec();
        self.error = None;
    }

    fn render_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn remove_book(&mut self, id: &str) -> bool {
        self.books.retain(|b| b.id != id);
        self.books.is_empty()
    }

    fn render_empty(&mut self) {
        self.error = None;
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn clear_form(&mut self) {}
}

/// Run the loader once and print the reconciled list.
pub async fn list(catalog: &Catalog<ApiClient>) {
    let mut view = PrintView::default();
    catalog.load(&mut view).await;
    for message in &view.notifications {
        eprintln!("{}", message);
    }
    println!("{}", view.output());
}
