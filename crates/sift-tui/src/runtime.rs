//! Interactive terminal loop.
//!
//! The only module that touches crossterm state. The poll timeout is the
//! minimum of the engine's debounce deadline and the refresh interval, so a
//! pending recompute fires promptly once typing goes quiet.

use std::io::{self, Stdout, Write as _};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as TerminalEvent};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::app::{ViewerApp, ViewerCommand, ViewerConfig};
use crate::fs_source::FsLineSource;
use crate::keymap::command_for_key;
use crate::render::render_frame;

const REFRESH_INTERVAL: Duration = Duration::from_millis(400);

/// Rows consumed by the status and input strips.
const CHROME_ROWS: u16 = 2;

/// Run the viewer over a file until the operator quits.
pub fn run(path: &str) -> Result<(), String> {
    let mut app = ViewerApp::new(ViewerConfig::default());
    app.load_path(&FsLineSource, path)?;

    let mut session =
        TerminalSession::enter().map_err(|err| format!("enter raw terminal mode: {err}"))?;
    let (width, height) =
        terminal::size().map_err(|err| format!("read terminal size: {err}"))?;
    let _ = app.apply_at(
        ViewerCommand::Resize {
            viewport_rows: height.saturating_sub(CHROME_ROWS).max(1),
        },
        Instant::now(),
    );

    let mut width = width;
    let mut dirty = true;
    loop {
        if dirty {
            draw(&mut session.stdout, &app, width)
                .map_err(|err| format!("render frame: {err}"))?;
            dirty = false;
        }

        if app.quitting() {
            break;
        }

        let now = Instant::now();
        let timeout = app
            .poll_timeout_at(now)
            .unwrap_or(REFRESH_INTERVAL)
            .min(REFRESH_INTERVAL);
        let has_event =
            event::poll(timeout).map_err(|err| format!("poll terminal event: {err}"))?;

        if has_event {
            match event::read().map_err(|err| format!("read terminal event: {err}"))? {
                TerminalEvent::Key(key) => {
                    if let Some(command) = command_for_key(app.mode(), &key) {
                        dirty |= app.apply_at(command, Instant::now());
                    }
                }
                TerminalEvent::Resize(new_width, new_height) => {
                    width = new_width;
                    dirty |= app.apply_at(
                        ViewerCommand::Resize {
                            viewport_rows: new_height.saturating_sub(CHROME_ROWS).max(1),
                        },
                        Instant::now(),
                    );
                }
                _ => {}
            }
        }

        dirty |= app.tick_at(Instant::now());
    }

    Ok(())
}

fn draw(stdout: &mut Stdout, app: &ViewerApp, width: u16) -> io::Result<()> {
    let snapshot = app.snapshot();
    let frame = render_frame(&snapshot, usize::from(width));

    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in frame.iter().enumerate() {
        queue!(stdout, MoveTo(0, row as u16), Print(line))?;
    }
    stdout.flush()
}

// ---------------------------------------------------------------------------
// TerminalSession — raw-mode guard
// ---------------------------------------------------------------------------

/// RAII wrapper so the terminal is restored on every exit path.
struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
