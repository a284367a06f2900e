//! Keyboard and paste event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, ModalContent};
use crate::page::parse_dropped_paths;

/// Process a key event and update the application state.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    // ── Path prompt (captures all keys) ───────────────────
    if app.prompt.is_some() {
        handle_prompt_input(app, key);
        return Ok(());
    }

    // ── Help popup ────────────────────────────────────────
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(());
    }

    // ── Action menu ───────────────────────────────────────
    if app.active_pane_mut().is_some_and(|p| p.menu.is_some()) {
        handle_menu_keys(app, key);
        return Ok(());
    }

    // ── Always-available shortcuts ────────────────────────
    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            return Ok(());
        }
        KeyCode::Char('o') => {
            app.open_prompt();
            return Ok(());
        }
        KeyCode::Esc => {
            app.close_modal();
            return Ok(());
        }
        KeyCode::Char('q') => {
            if !app.close_modal() {
                app.should_quit = true;
            }
            return Ok(());
        }
        _ => {}
    }

    // ── Source modal on top: scrolling only ───────────────
    if let Some(modal) = app.modals.0.last_mut() {
        if let ModalContent::Source { scroll, .. } = &mut modal.content {
            handle_source_scroll(scroll, key);
            return Ok(());
        }
    }

    handle_viewer_keys(app, key);
    Ok(())
}

/// Text pasted into the terminal: a dropped file, or input for the prompt.
pub fn handle_paste(app: &mut App, text: &str) {
    match &mut app.prompt {
        Some(input) => input.push_str(text.trim_end_matches(['\r', '\n'])),
        None => {
            let paths = parse_dropped_paths(text);
            tracing::debug!(count = paths.len(), "Paths pasted into terminal");
            app.drop_paths(paths);
        }
    }
}

fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    let Some(input) = app.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.prompt = None,
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(c) => input.push(c),
        _ => {}
    }
}

fn handle_menu_keys(app: &mut App, key: KeyEvent) {
    let count = app.menu_actions().len();
    match key.code {
        KeyCode::Enter => app.activate_menu(),
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(pane) = app.active_pane_mut() {
                pane.menu = pane.menu.map(|i| (i + 1).min(count.saturating_sub(1)));
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(pane) = app.active_pane_mut() {
                pane.menu = pane.menu.map(|i| i.saturating_sub(1));
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            if let Some(pane) = app.active_pane_mut() {
                pane.menu = None;
            }
        }
        KeyCode::Char('d') => {
            if let Some(pane) = app.active_pane_mut() {
                pane.menu = None;
            }
            app.download_selected();
        }
        KeyCode::Char('v') => {
            if let Some(pane) = app.active_pane_mut() {
                pane.menu = None;
            }
            app.view_selected();
        }
        _ => {}
    }
}

fn handle_source_scroll(scroll: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => *scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => *scroll = scroll.saturating_sub(1),
        KeyCode::PageDown | KeyCode::Char(' ') => *scroll += 20,
        KeyCode::PageUp => *scroll = scroll.saturating_sub(20),
        KeyCode::Char('g') | KeyCode::Home => *scroll = 0,
        _ => {}
    }
}

/// Key handling for the active message viewer.
fn handle_viewer_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        // ── Attachments ──────────────────────────────────────
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.select_attachment(true),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.select_attachment(false),
        KeyCode::Enter => app.open_menu(),
        KeyCode::Char('d') => app.download_selected(),
        KeyCode::Char('v') => app.view_selected(),
        KeyCode::Char('s') => app.view_source(),
        _ => {
            let Some(pane) = app.active_pane_mut() else {
                return;
            };
            let page = pane.page_size() as isize;
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => pane.scroll_by(1),
                KeyCode::Char('k') | KeyCode::Up => pane.scroll_by(-1),
                KeyCode::PageDown | KeyCode::Char(' ') => pane.scroll_by(page),
                KeyCode::PageUp => pane.scroll_by(-page),
                KeyCode::Char('g') | KeyCode::Home => pane.scroll = 0,
                _ => {}
            }
        }
    }
}
