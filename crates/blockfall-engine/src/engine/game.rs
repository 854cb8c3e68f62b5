use std::{
    collections::VecDeque,
    io,
    time::{Duration, Instant},
};

use super::{
    generator::ShapeGenerator,
    host::{GameView, InputSource, Key},
};
use crate::core::{Block, Grid, Layout, MoveDirection, Point, RotateDirection, ShapeKind};

/// Upcoming blocks kept visible ahead of the active one.
pub const QUEUE_LEN: usize = 3;

const BASE_TICK_MS: u64 = 1000;
const TICK_STEP_MS: u64 = 50;
const TICK_FLOOR_MS: u64 = 50;
const FAST_DROP_DELAY: Duration = Duration::from_millis(12);
const ROW_SCORE: usize = 40;

/// Engine action a key is bound to.
enum Action {
    Move(MoveDirection),
    Rotate(RotateDirection),
    Skip,
    Hold,
}

fn action_for(key: Key) -> Option<Action> {
    match key {
        Key::Down | Key::Enter | Key::Char('s' | 'S') => Some(Action::Skip),
        Key::Left | Key::Char('a' | 'A') => Some(Action::Move(MoveDirection::Left)),
        Key::Right | Key::Char('d' | 'D') => Some(Action::Move(MoveDirection::Right)),
        Key::Char('q' | 'Q') => Some(Action::Rotate(RotateDirection::Left)),
        Key::Char('e' | 'E' | ' ') => Some(Action::Rotate(RotateDirection::Right)),
        Key::Char('h' | 'H') => Some(Action::Hold),
        _ => None,
    }
}

/// How an active block left the fall loop.
enum FallOutcome {
    /// Could no longer descend and stays where it is.
    Locked,
    /// Put into the hold slot; the carried shape is the one it displaced.
    Held(Option<ShapeKind>),
}

/// How a single tick resolved.
enum TickOutcome {
    Continue,
    Skip,
    Held(Option<ShapeKind>),
}

/// One game run: playfield, upcoming queue, hold slot, and progression
/// counters, plus the fall/lock/clear loop that drives them all.
///
/// A finished game is not restarted; hosts build a fresh `Game` instead.
#[derive(Debug)]
pub struct Game {
    playfield: Grid,
    generator: ShapeGenerator,
    queue: VecDeque<Block>,
    held: Option<ShapeKind>,
    score: usize,
    rows_cleared: usize,
}

impl Game {
    /// Creates a run on an empty `width x height` field with an OS-seeded
    /// generator.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_generator(width, height, ShapeGenerator::new())
    }

    /// Creates a run drawing its shapes from `generator`.
    #[must_use]
    pub fn with_generator(width: usize, height: usize, mut generator: ShapeGenerator) -> Self {
        let playfield = Grid::new(width, height);
        let queue = (0..QUEUE_LEN)
            .map(|_| Block::spawn(generator.draw(), &playfield))
            .collect();
        Self {
            playfield,
            generator,
            queue,
            held: None,
            score: 0,
            rows_cleared: 0,
        }
    }

    /// Field the blocks fall through, with the active block stamped in.
    #[must_use]
    pub fn playfield(&self) -> &Grid {
        &self.playfield
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn rows_cleared(&self) -> usize {
        self.rows_cleared
    }

    /// Current level; one step up per ten cleared rows.
    #[must_use]
    pub fn level(&self) -> usize {
        self.rows_cleared / 10 + 1
    }

    /// Tick length at the current level.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        let level = self.level() as u64;
        let ms = BASE_TICK_MS
            .saturating_sub(TICK_STEP_MS * (level - 1))
            .max(TICK_FLOOR_MS);
        Duration::from_millis(ms)
    }

    /// Layouts of the queued blocks, the next to enter play first.
    pub fn next_layouts(&self) -> impl Iterator<Item = &'static Layout> {
        self.queue.iter().map(Block::layout)
    }

    /// Layout of the held block, if one is stored.
    #[must_use]
    pub fn held_layout(&self) -> Option<&'static Layout> {
        self.held
            .map(|kind| kind.def().layout(kind.def().initial_orientation()))
    }

    /// Runs the fall/lock/clear loop to completion and returns the final
    /// score.
    ///
    /// Each tick races `input` against the level's fall interval, using the
    /// remaining tick time as the read timeout. `view` receives the game
    /// after every accepted change and once up front, so the opening frame
    /// is on screen before any input is read. The run ends when the next
    /// block to enter play no longer fits its spawn position.
    ///
    /// # Errors
    ///
    /// Returns any error from `input` or `view` as is, ending the run.
    pub fn play<I: InputSource, V: GameView>(
        &mut self,
        input: &mut I,
        view: &mut V,
    ) -> io::Result<usize> {
        view.publish(self)?;

        let mut swapped_in: Option<ShapeKind> = None;
        loop {
            let (mut block, can_hold) = if let Some(kind) = swapped_in.take() {
                let block = Block::spawn(kind, &self.playfield);
                if !block.can_spawn(&self.playfield) {
                    break;
                }
                // A block that entered play through the hold swap may not be
                // held again; the allowance returns with the next queued one.
                (block, false)
            } else {
                // Game over is decided one spawn ahead: the front of the
                // queue is probed before it is consumed, so a blocked block
                // stays visible in the published queue.
                let front = *self.queue.front().expect("queue is never empty");
                if !front.can_spawn(&self.playfield) {
                    break;
                }
                self.queue.pop_front();
                self.queue
                    .push_back(Block::spawn(self.generator.draw(), &self.playfield));
                (front, true)
            };

            block.stamp(&mut self.playfield);
            view.publish(self)?;

            match self.drop_block(&mut block, can_hold, input, view)? {
                FallOutcome::Held(displaced) => swapped_in = displaced,
                FallOutcome::Locked => {
                    let cleared = self.clear_rows();
                    if cleared > 0 {
                        // Scored at the level in effect before these rows
                        // are counted.
                        self.score += ROW_SCORE * cleared * self.level();
                        self.rows_cleared += cleared;
                        view.publish(self)?;
                    }
                }
            }
        }
        Ok(self.score)
    }

    /// Drives one block down until it locks or is taken into the hold slot.
    fn drop_block<I: InputSource, V: GameView>(
        &mut self,
        block: &mut Block,
        can_hold: bool,
        input: &mut I,
        view: &mut V,
    ) -> io::Result<FallOutcome> {
        let mut skip = false;
        loop {
            if skip {
                drain_input(input, FAST_DROP_DELAY)?;
            } else {
                match self.run_tick(block, can_hold, input, view)? {
                    TickOutcome::Continue => {}
                    TickOutcome::Skip => skip = true,
                    TickOutcome::Held(displaced) => return Ok(FallOutcome::Held(displaced)),
                }
            }
            if !block.try_move(&mut self.playfield, MoveDirection::Down) {
                return Ok(FallOutcome::Locked);
            }
            view.publish(self)?;
        }
    }

    /// Races key reads against the tick deadline.
    ///
    /// Accepted moves and rotations publish and keep the tick going;
    /// rejected or unbound keys are dropped. Returns at the deadline or as
    /// soon as a skip or hold request comes in.
    fn run_tick<I: InputSource, V: GameView>(
        &mut self,
        block: &mut Block,
        can_hold: bool,
        input: &mut I,
        view: &mut V,
    ) -> io::Result<TickOutcome> {
        let deadline = Instant::now() + self.fall_interval();
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(TickOutcome::Continue);
            }
            let Some(key) = input.read_key(deadline - now)? else {
                return Ok(TickOutcome::Continue);
            };
            match action_for(key) {
                Some(Action::Move(direction)) => {
                    if block.try_move(&mut self.playfield, direction) {
                        view.publish(self)?;
                    }
                }
                Some(Action::Rotate(direction)) => {
                    if block.try_rotate(&mut self.playfield, direction) {
                        view.publish(self)?;
                    }
                }
                Some(Action::Skip) => return Ok(TickOutcome::Skip),
                Some(Action::Hold) if can_hold => {
                    block.erase(&mut self.playfield);
                    let displaced = self.held.replace(block.kind());
                    view.publish(self)?;
                    return Ok(TickOutcome::Held(displaced));
                }
                Some(Action::Hold) | None => {}
            }
        }
    }

    /// Clears full rows bottom to top and returns how many went.
    ///
    /// After a clear the rows above shift down one, so the same index is
    /// tested again before the scan moves up.
    fn clear_rows(&mut self) -> usize {
        let width = self.playfield.width();
        let mut cleared = 0;
        for y in (0..self.playfield.height()).rev() {
            while self.playfield.row(y).iter().all(|cell| cell.is_piece()) {
                for dest in (1..=y).rev() {
                    let above = Grid::from_row(self.playfield.row(dest - 1));
                    self.playfield.paste(&above, Point::new(0, dest as i32));
                }
                self.playfield.paste(&Grid::new(width, 1), Point::new(0, 0));
                cleared += 1;
            }
        }
        cleared
    }
}

/// Consumes and discards keys until `window` elapses or the source runs dry.
fn drain_input<I: InputSource>(input: &mut I, window: Duration) -> io::Result<()> {
    let deadline = Instant::now() + window;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        if input.read_key(deadline - now)?.is_none() {
            return Ok(());
        }
    }
}
