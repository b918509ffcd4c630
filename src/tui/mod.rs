// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, send-task completions)
// - Rendering the chat display

pub mod app;
pub mod input;
pub mod scroll;
pub mod theme;
pub mod ui;

use crate::events::SessionEvent;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
        KeyCode, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal when
/// done. The loop handles keyboard input, redraw ticks, and the completion
/// events posted back by the send task.
pub async fn run_tui(mut app: App, mut event_rx: mpsc::Receiver<SessionEvent>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three event sources, multiplexed with tokio::select!:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (spinner animation)
/// 3. Completion events from the send task
///
/// All state transitions happen here, one event at a time; the spawned send
/// task never touches state directly. Drawing is gated on the redraw flag
/// raised by the conversation's change listener.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<SessionEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        if app.take_redraw() {
            terminal
                .draw(|f| ui::draw(f, app))
                .context("Failed to draw terminal")?;
        }

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick for the busy spinner
            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            // Send-task completions
            Some(session_event) = event_rx.recv() => {
                app.handle_session_event(session_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        // Quit
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,

        // Chat actions
        KeyCode::Enter => app.send_current(),
        KeyCode::Char('r') if ctrl => app.toggle_reasoning(),
        KeyCode::Char('n') if ctrl => app.new_conversation(),

        // Transcript scrolling
        KeyCode::Up => {
            app.transcript_scroll.scroll_up();
            app.request_redraw();
        }
        KeyCode::Down => {
            app.transcript_scroll.scroll_down();
            app.request_redraw();
        }
        KeyCode::PageUp => {
            app.transcript_scroll.page_up();
            app.request_redraw();
        }
        KeyCode::PageDown => {
            app.transcript_scroll.page_down();
            app.request_redraw();
        }

        // Draft editing
        KeyCode::Left => {
            app.input.move_left();
            app.request_redraw();
        }
        KeyCode::Right => {
            app.input.move_right();
            app.request_redraw();
        }
        KeyCode::Home => {
            app.input.move_home();
            app.request_redraw();
        }
        KeyCode::End => {
            app.input.move_end();
            app.request_redraw();
        }
        KeyCode::Backspace => {
            app.input.backspace();
            app.request_redraw();
        }
        KeyCode::Delete => {
            app.input.delete();
            app.request_redraw();
        }
        KeyCode::Char(c) if !ctrl => {
            app.input.insert_char(c);
            app.request_redraw();
        }
        _ => {}
    }
}

/// Handle mouse input - wheel scrolls the transcript
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => {
            app.transcript_scroll.scroll_up();
            app.request_redraw();
        }
        MouseEventKind::ScrollDown => {
            app.transcript_scroll.scroll_down();
            app.request_redraw();
        }
        _ => {}
    }
}
