// TUI event loop and terminal management
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use crate::app::{command_for_char, App, Command};

/// Idle poll period when the engine has no deadline armed. Keeps the UI
/// responsive to resize events without spinning.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clipboard is optional: headless terminals (ssh, CI) have none, and
    // copy/share should degrade to a notice rather than kill the app.
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| warn!("Clipboard unavailable: {}", e))
        .ok();

    app.start(Instant::now()).await;

    // Main loop
    loop {
        terminal.draw(|f| crate::ui::render(f, &app))?;

        // Sleep until the engine's next deadline (or idle-poll without one).
        let timeout = app
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char(c) => command_for_char(c),
                    KeyCode::Enter => Some(Command::Interact),
                    KeyCode::Right => Some(Command::BookmarkNext),
                    KeyCode::Left => Some(Command::BookmarkPrevious),
                    KeyCode::Esc => Some(Command::Quit),
                    _ => None,
                },
                // Wheel maps to quote navigation; the cooldown in
                // accept_action keeps a single flick to one action.
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => Some(Command::NextQuote),
                    MouseEventKind::ScrollUp => Some(Command::BookmarkPrevious),
                    MouseEventKind::Down(_) => Some(Command::Interact),
                    _ => None,
                },
                _ => None,
            };

            if let Some(command) = command {
                let now = Instant::now();
                if app.accept_action(now) {
                    dispatch(&mut app, command, clipboard.as_mut(), now).await;
                }
            }
        }

        app.tick(Instant::now()).await;

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Resolve one command: clipboard commands here (the runner owns the
/// clipboard handle), everything else in the app.
async fn dispatch(
    app: &mut App,
    command: Command,
    clipboard: Option<&mut arboard::Clipboard>,
    now: Instant,
) {
    match command {
        Command::CopyQuote | Command::Share => {
            let payload = if command == Command::CopyQuote {
                app.copy_payload()
            } else {
                app.share_payload()
            };

            let Some(payload) = payload else {
                app.set_status("Nothing to copy yet");
                return;
            };

            match clipboard {
                Some(clipboard) => match clipboard.set_text(payload) {
                    Ok(()) => app.set_status(if command == Command::Share {
                        "Share text copied"
                    } else {
                        "Quote copied"
                    }),
                    Err(e) => {
                        warn!("Clipboard write failed: {}", e);
                        app.set_status("Copy failed");
                    }
                },
                None => app.set_status("Clipboard unavailable"),
            }
        }
        other => app.handle_command(other, now).await,
    }
}
