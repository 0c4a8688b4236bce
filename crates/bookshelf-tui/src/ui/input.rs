//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_field_char, App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // A pending notification swallows the next key
    if app.view.notification.is_some() {
        app.view.notification = None;
        return false;
    }

    match app.state {
        AppState::AddingBook => {
            handle_form_input(app, key);
            false
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            false
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::Quitting => true,
        AppState::Normal => handle_list_input(app, key),
    }
}

fn handle_list_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('a') => app.start_adding(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('u') => app.start_load(),
        KeyCode::Down | KeyCode::Char('j') => app.view.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.view.select_prev(1),
        KeyCode::PageDown => app.view.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.view.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.view.selection = 0,
        KeyCode::End => app.view.select_next(usize::MAX / 2),
        _ => {}
    }
    false
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Keep what was typed; reopening the form continues where it left off
            app.state = AppState::Normal;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.form_focus = app.form_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.form_focus = app.form_focus.prev();
        }
        KeyCode::Enter => app.submit_form(),
        KeyCode::Backspace => {
            let focus = app.form_focus;
            if let Some(value) = app.view.form_field_mut(focus) {
                value.pop();
            }
        }
        KeyCode::Char(c) => {
            let focus = app.form_focus;
            if let Some(value) = app.view.form_field_mut(focus) {
                if can_add_field_char(focus, value.chars().count(), c) {
                    value.push(c);
                }
            }
        }
        _ => {}
    }
}
