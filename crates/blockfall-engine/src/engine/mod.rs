//! Game orchestration around the core grid/block types.
//!
//! - [`Game`] - one run: playfield, upcoming queue, hold slot, score/level,
//!   and the fall/lock/clear loop that drives them
//! - [`ShapeGenerator`] - seedable uniform shape source
//! - [`InputSource`], [`GameView`], [`Key`] - the seams a host drives the
//!   loop through
//!
//! # Game flow
//!
//! 1. Construct a [`Game`] (a fresh instance is also the reset mechanism)
//! 2. Run [`Game::play`] with the host's input source and view
//! 3. The loop spawns queued blocks, races player keys against the level
//!    tick, locks blocks that can no longer descend, clears full rows, and
//!    ends when the next block cannot spawn
//! 4. `play` returns the final score
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Game, ShapeGenerator};
//!
//! let game = Game::with_generator(10, 20, ShapeGenerator::with_seed(7));
//! assert_eq!(game.level(), 1);
//! assert_eq!(game.next_layouts().count(), 3);
//! assert!(game.held_layout().is_none());
//! ```

pub use self::{game::*, generator::*, host::*};

mod game;
mod generator;
mod host;
