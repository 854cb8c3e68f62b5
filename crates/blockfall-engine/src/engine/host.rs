use std::{io, time::Duration};

use super::game::Game;

/// Key identifier delivered by a host's input source.
///
/// Hosts map whatever their input layer produces onto this set; keys without
/// an engine binding are ignored by the fall loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Enter,
    Char(char),
}

/// Source of player keys for [`Game::play`].
///
/// The engine always reads with a timeout, so an implementation never has to
/// block longer than the caller asked for.
pub trait InputSource {
    /// Waits up to `timeout` for the next key.
    ///
    /// `Ok(None)` means the timeout elapsed without input, which is how an
    /// idle tick resolves. A player-requested quit is reported as an error
    /// of kind [`io::ErrorKind::Interrupted`].
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

/// Sink for game state snapshots.
pub trait GameView {
    /// Receives the game after every accepted state change, plus once before
    /// the first tick so the opening frame is up before any input is read.
    fn publish(&mut self, game: &Game) -> io::Result<()>;
}
