pub mod app;
pub mod board;
pub mod focus;
mod input;
pub mod keybindings;
mod message;
pub mod modal;
pub mod panel;
pub mod ui;

use crate::commands;
use crate::config::Config;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub use app::{App, BaseView, RefreshResult, ViewMode};
pub use input::{dispatch, dispatch_mouse, key_string, InputState};
pub use message::Message;

pub async fn run(config: Config) -> Result<()> {
    if !std::io::IsTerminal::is_terminal(&io::stdout()) {
        anyhow::bail!("lazybeads requires an interactive terminal");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let size = terminal.size()?;
    app.update(Message::Resize {
        width: size.width,
        height: size.height,
    })?;

    // Initial data fetch (non-blocking - UI shows immediately with loading state)
    app.start_background_refresh();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut input_state = InputState::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            let msg = match event::read()? {
                Event::Resize(width, height) => Message::Resize { width, height },
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    dispatch(app, &mut input_state, key)
                }
                Event::Mouse(mouse) => dispatch_mouse(mouse, Instant::now()),
                _ => Message::None,
            };
            if app.update(msg)? {
                return Ok(()); // Quit requested
            }
        }

        // Results of writes and comment loads
        while let Some(msg) = app.poll_background() {
            if app.update(msg)? {
                return Ok(());
            }
        }

        if let Some(request) = app.take_editor_request() {
            let result = suspend_for_editor(terminal, &request.text);
            app.update(Message::EditorFinished {
                id: request.id,
                result: result.map_err(|e| format!("{:#}", e)),
            })?;
        }

        if let Some(text) = app.take_clipboard() {
            let backend = terminal.backend_mut();
            backend.write_all(commands::osc52_copy(&text).as_bytes())?;
            backend.flush()?;
        }

        // Handle pending chord timeout (non-blocking)
        if input_state.has_timed_out() {
            input_state.clear();
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());

            // Poll for background refresh results (non-blocking)
            app.poll_refresh();

            last_tick = Instant::now();
        }

        // Yield so the refresh task makes progress on busy input
        tokio::task::yield_now().await;
    }
}

/// Hand the terminal to `$EDITOR` and take it back afterwards.
fn suspend_for_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    text: &str,
) -> Result<String> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    let edited = commands::edit_in_editor(text);

    enable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    terminal.clear()?;

    edited
}
