//! Terminal UI: entry point and event loop.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{
    poll as ct_poll, read as ct_read, DisableBracketedPaste, EnableBracketedPaste, Event,
    KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use self::app::App;
use crate::config::Config;

/// Run the TUI application. Blocks until the user quits.
///
/// `initial` is dropped onto the page as soon as the UI starts.
pub fn run_tui(config: Config, initial: Option<PathBuf>) -> anyhow::Result<()> {
    let width = crossterm::terminal::size().map_or(100, |(cols, _)| cols as usize);
    let mut app = App::new(&config, width);
    if let Some(path) = initial {
        app.drop_paths(vec![path]);
    }

    // Setup terminal (alternate screen, bracketed paste for drag and drop)
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    // Restore terminal (always, even on error)
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop: render → poll → handle → repeat.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|frame| {
            ui::render(frame, &mut app);
        })?;

        if ct_poll(tick_rate)? {
            match ct_read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    event::handle_key_event(&mut app, key)?;
                }
                Event::Paste(text) => event::handle_paste(&mut app, &text),
                _ => {}
            }
        }

        // Apply finished reads and parses, expire status messages
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
