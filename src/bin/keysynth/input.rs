//! Raw-mode keyboard loop.

use std::{
    io::{self, Write},
    time::Duration,
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};

use keysynth::{engine::Key, engine::InputEvent, SessionInput};

/// How long to wait for a key before flushing the recorder again.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Raw mode for as long as this lives.
struct RawMode {
    /// The terminal sends key releases, not just presses.
    releases: bool,
}

impl RawMode {
    fn enable() -> EyreResult<Self> {
        terminal::enable_raw_mode()?;
        let releases = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if releases {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            log::warn!("terminal does not report key releases, notes end on their own");
        }
        Ok(Self { releases })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.releases {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::F(n) => Some(Key::Function(n)),
        _ => None,
    }
}

fn is_interrupt(event: &KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL)
}

/// Print possibly multi-line text; raw mode needs explicit carriage returns.
fn print_message(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}\r\n", message.replace('\n', "\r\n"))?;
    stdout.flush()
}

/// Returns false once the session asks to exit.
fn dispatch(session: &mut SessionInput, key: Key, pressed: bool) -> io::Result<bool> {
    match session.on_key(key, pressed) {
        InputEvent::Exit => Ok(false),
        InputEvent::Message(message) => print_message(&message).map(|_| true),
        InputEvent::None => Ok(true),
    }
}

pub fn run(mut session: SessionInput) -> EyreResult<()> {
    let raw = RawMode::enable()?;

    print_message("Left/Right = change demo, Up/Down = volume, F1 = clipping, F2 = record, Esc = quit")?;
    print_message(&format!("Demos: {}", session.demo_names().join(", ")))?;
    print_message(&session.enter_current())?;

    loop {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(event) = event::read()? {
                if is_interrupt(&event) {
                    break;
                }
                let Some(key) = map_key(event.code) else {
                    continue;
                };

                let running = match event.kind {
                    KeyEventKind::Press => {
                        let running = dispatch(&mut session, key, true)?;
                        // without release events every press is a tap
                        if running && !raw.releases {
                            dispatch(&mut session, key, false)?
                        } else {
                            running
                        }
                    }
                    KeyEventKind::Release => dispatch(&mut session, key, false)?,
                    KeyEventKind::Repeat => true,
                };
                if !running {
                    break;
                }
            }
        }

        if let Err(err) = session.flush_recording() {
            log::error!("recording flush failed: {err}");
        }
    }

    if session.controls().recording {
        dispatch(&mut session, Key::Function(2), true)?;
    }
    Ok(())
}
