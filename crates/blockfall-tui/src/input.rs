use std::{
    io,
    time::{Duration, Instant},
};

use blockfall_engine::{InputSource, Key};
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Raw-mode key source backed by crossterm's event stream.
///
/// Non-key events and key releases keep the wait going within the same
/// timeout. Esc and Ctrl-C surface as an `Interrupted` error, the orderly
/// quit signal the session layer looks for.
#[derive(Debug)]
pub(crate) struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                return Ok(None);
            }
            let Some(key) = event::read()?.as_key_event() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(key) {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "quit requested"));
            }
            if let Some(key) = translate(key.code) {
                return Ok(Some(key));
            }
        }
    }
}

fn is_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
}

fn translate(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
