use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, FormField};
use crate::utils::truncate_string;

use super::styles;

/// Width of the text area of a form input.
const FORM_INPUT_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Book list
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_book_list(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::AddingBook => render_form_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }

    // Notifications sit above everything else until dismissed
    if let Some(ref message) = app.view.notification {
        render_notification_overlay(frame, message);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Bookshelf";
    let loading = if app.view.loading { "  Loading..." } else { "" };
    let help_hint = "[?] Help";

    let used = title.len() + loading.len() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(loading, styles::highlight_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_book_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Books ({}) ", app.view.books.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    if let Some(ref error) = app.view.error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if app.view.books.is_empty() {
        let message = if app.view.loading {
            " Loading books..."
        } else {
            " No books in the catalog. Press [a] to add one."
        };
        let paragraph =
            Paragraph::new(Line::from(Span::styled(message, styles::muted_style()))).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let max_width = (area.width as usize).saturating_sub(4);
    let items: Vec<ListItem> = app
        .view
        .books
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let style = if i == app.view.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(truncate_string(&book.display_line(), max_width)))
                .style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.view.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[a]dd | [d]elete | [u]pdate | [q]uit";

    let left_text = match (&app.status_message, &app.cache_age) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(age)) => format!(" Updated {} ", age),
        (None, None) => " Not cached ".to_string(),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn overlay_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(" Bookshelf", styles::title_style())),
        Line::from(Span::styled(
            format!(" version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("↑/↓ j/k", "Move selection"),
        key("PgUp/PgDn", "Scroll a page"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("a", "Add a book"),
        key("d / Del", "Delete selected book"),
        key("u", "Reload from the catalog"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(help_text).block(overlay_block()), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(48, 12, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.view.form;
    let fields = [
        (FormField::Title, form.title.as_str()),
        (FormField::Author, form.author.as_str()),
        (FormField::Year, form.year.as_str()),
        (FormField::Genre, form.genre.as_str()),
    ];

    let mut lines = vec![
        Line::from(Span::styled(" Add a book", styles::title_style())),
        Line::from(""),
    ];

    for (field, value) in fields {
        let focused = app.form_focus == field;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        // Show the tail of long values so the cursor stays visible
        let shown: String = value
            .chars()
            .skip(value.chars().count().saturating_sub(FORM_INPUT_WIDTH))
            .collect();
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>7}: [", field.label()), styles::muted_style()),
            Span::styled(
                format!("{:<width$}", format!("{}{}", shown, cursor), width = FORM_INPUT_WIDTH),
                style,
            ),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    let button = if app.submitting {
        Span::styled("  Saving...  ", styles::highlight_style())
    } else if app.form_focus == FormField::Submit {
        Span::styled(" ▶ Add ◀ ", styles::selected_style())
    } else {
        Span::styled("   Add   ", styles::list_item_style())
    };
    lines.push(Line::from(vec![Span::raw("                 ["), button, Span::raw("]")]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab: next field  Enter: submit  Esc: cancel",
        styles::muted_style(),
    )));

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let prompt = app
        .pending_delete
        .as_ref()
        .map(|b| b.confirm_prompt())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", truncate_string(&prompt, 40)),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_notification_overlay(frame: &mut Frame, message: &str) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", message), styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(" Press any key to continue", styles::muted_style())),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(overlay_block());
    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::{ApiClient, Book, BookCache, CacheStore, Catalog, CatalogView};
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let cache = BookCache::new(CacheStore::new(dir.path().to_path_buf()).unwrap());
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        (dir, App::with_catalog(Catalog::new(api, cache)))
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_centered_rect_fixed_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_fixed(40, 40, area), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_render_books_and_empty_state() {
        let (_dir, mut app) = test_app();
        assert!(screen(&app).contains("No books in the catalog"));

        app.view.render_books(&[Book {
            id: "1".to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: 1965,
            genre: "SF".to_string(),
        }]);
        let text = screen(&app);
        assert!(text.contains("Dune by Herbert (1965)"));
        assert!(text.contains("Books (1)"));
    }

    #[test]
    fn test_render_error_in_place_of_list() {
        let (_dir, mut app) = test_app();
        app.view.render_error("Failed to load books: down");
        assert!(screen(&app).contains("Failed to load books: down"));
    }

    #[test]
    fn test_render_loading_indicator() {
        let (_dir, mut app) = test_app();
        app.view.set_loading(true);
        let text = screen(&app);
        assert!(text.contains("Loading..."));
        assert!(text.contains("Loading books..."));
    }

    #[test]
    fn test_status_bar_aligns_non_ascii_message() {
        let (_dir, mut app) = test_app();
        app.status_message = Some("Adding \"Café à la carte\"...".to_string());

        let text = screen(&app);
        let status_row = text
            .lines()
            .find(|row| row.contains("Café"))
            .unwrap();
        assert!(status_row.ends_with("[q]uit "), "{status_row:?}");
    }
}
