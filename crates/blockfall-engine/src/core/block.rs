use super::{
    grid::{Grid, Point},
    shape::{Layout, Orientation, RotateDirection, ShapeKind},
};

/// Movement sense for [`Block::try_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

/// A falling block: a catalog shape at an orientation and a field anchor.
///
/// A block does not own the playfield. Mutators borrow the field, re-stamp
/// the block's footprint through it, and either commit fully or leave field
/// and block untouched; the footprint cells on the field are the block's
/// published position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    kind: ShapeKind,
    orientation: Orientation,
    anchor: Point,
}

impl Block {
    /// Creates a block at its spawn anchor for the given field:
    /// horizontally centered (`x = ⌊W/2⌋ − width + 1`) with the layout's
    /// bottom row over field row 0 (`y = −(height−1)`).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Block, Grid, Point, ShapeKind};
    ///
    /// let field = Grid::new(10, 20);
    /// let square = Block::spawn(ShapeKind::O, &field);
    /// assert_eq!(square.anchor(), Point::new(4, -1));
    /// ```
    #[must_use]
    pub fn spawn(kind: ShapeKind, field: &Grid) -> Self {
        let orientation = kind.def().initial_orientation();
        let layout = kind.def().layout(orientation);
        let anchor = Point::new(
            field.width() as i32 / 2 - layout.width() as i32 + 1,
            -(layout.height() as i32 - 1),
        );
        Self {
            kind,
            orientation,
            anchor,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// The active orientation's layout.
    #[must_use]
    pub fn layout(&self) -> &'static Layout {
        self.kind.def().layout(self.orientation)
    }

    /// Probes the game-over condition: false when an occupied cell of the
    /// layout's bottom row would land on an occupied cell of field row 0
    /// (or off the field) at this block's spawn offset.
    #[must_use]
    pub fn can_spawn(&self, field: &Grid) -> bool {
        let layout = self.layout();
        let bottom = layout.height() - 1;
        for i in 0..layout.width() {
            if layout.get(i, bottom).is_empty() {
                continue;
            }
            let x = self.anchor.x + i as i32;
            if x < 0 || x >= field.width() as i32 {
                return false;
            }
            if field.get(x as usize, 0).is_piece() {
                return false;
            }
        }
        true
    }

    /// Stamps the block's footprint into the field.
    pub fn stamp(&self, field: &mut Grid) {
        field.paste(&self.layout().to_grid(), self.anchor);
    }

    /// Erases the block's footprint box from the field.
    pub fn erase(&self, field: &mut Grid) {
        let layout = self.layout();
        field.paste(&Grid::new(layout.width(), layout.height()), self.anchor);
    }

    /// Attempts a one-cell move. Commits and returns true, or returns false
    /// with field and block untouched.
    pub fn try_move(&mut self, field: &mut Grid, direction: MoveDirection) -> bool {
        let layout = self.layout();
        let candidate = match direction {
            MoveDirection::Left => {
                if self.anchor.x - 1 < 0 {
                    return false;
                }
                Point::new(self.anchor.x - 1, self.anchor.y)
            }
            MoveDirection::Right => {
                if self.anchor.x + layout.width() as i32 >= field.width() as i32 {
                    return false;
                }
                Point::new(self.anchor.x + 1, self.anchor.y)
            }
            MoveDirection::Down => {
                if self.anchor.y + layout.height() as i32 >= field.height() as i32 {
                    return false;
                }
                Point::new(self.anchor.x, self.anchor.y + 1)
            }
        };
        self.trial_commit(field, layout, candidate, self.orientation)
    }

    /// Attempts a 90° rotation per the shape's transition table. Single-
    /// and dual-topology shapes never rotate, so this is false for them.
    ///
    /// The candidate anchor is the table delta applied to the current
    /// anchor, clamped into the field; a candidate whose layout box would
    /// overhang the right or bottom edge is rejected before the overlap
    /// probe.
    pub fn try_rotate(&mut self, field: &mut Grid, direction: RotateDirection) -> bool {
        let Some(turn) = self.kind.def().turn(self.orientation, direction) else {
            return false;
        };
        let next_layout = self.kind.def().layout(turn.next);
        let candidate = Point::new(
            (self.anchor.x + turn.dx).clamp(0, field.width() as i32 - 1),
            (self.anchor.y + turn.dy).clamp(0, field.height() as i32 - 1),
        );
        if candidate.x + next_layout.width() as i32 > field.width() as i32
            || candidate.y + next_layout.height() as i32 > field.height() as i32
        {
            return false;
        }
        self.trial_commit(field, next_layout, candidate, turn.next)
    }

    /// Clone-trial-replace: erase the current footprint box from a cloned
    /// field, probe the candidate box against the clone, stamp the
    /// candidate, and only then swap the clone in. The live field is never
    /// half-updated and the block never collides with its own footprint.
    ///
    /// Every cell of the candidate box that lies on the field is probed,
    /// occupied or not; rows above the field are skipped.
    fn trial_commit(
        &mut self,
        field: &mut Grid,
        next_layout: &Layout,
        next_anchor: Point,
        next_orientation: Orientation,
    ) -> bool {
        let current = self.layout();
        let mut trial = field.clone();
        trial.paste(&Grid::new(current.width(), current.height()), self.anchor);

        for y in 0..next_layout.height() as i32 {
            let field_y = next_anchor.y + y;
            if field_y < 0 || field_y >= field.height() as i32 {
                continue;
            }
            for x in 0..next_layout.width() as i32 {
                let field_x = next_anchor.x + x;
                if field_x < 0 || field_x >= field.width() as i32 {
                    continue;
                }
                if trial.get(field_x as usize, field_y as usize).is_piece() {
                    return false;
                }
            }
        }

        trial.paste(&next_layout.to_grid(), next_anchor);
        *field = trial;
        self.anchor = next_anchor;
        self.orientation = next_orientation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{super::grid::Cell, *};

    fn field() -> Grid {
        Grid::new(10, 20)
    }

    fn occupied(field: &Grid) -> usize {
        field.rows().flatten().filter(|c| c.is_piece()).count()
    }

    fn single(kind: ShapeKind) -> Grid {
        Grid::from_row(&[Cell::Piece(kind)])
    }

    #[test]
    fn spawn_anchor_centers_the_layout() {
        let field = field();
        assert_eq!(
            Block::spawn(ShapeKind::O, &field).anchor(),
            Point::new(4, -1)
        );
        assert_eq!(Block::spawn(ShapeKind::I, &field).anchor(), Point::new(2, 0));
        assert_eq!(
            Block::spawn(ShapeKind::T, &field).anchor(),
            Point::new(3, -1)
        );
    }

    #[test]
    fn can_spawn_on_an_empty_field() {
        let field = field();
        for kind in ShapeKind::ALL {
            assert!(
                Block::spawn(kind, &field).can_spawn(&field),
                "{kind:?} should spawn on an empty field"
            );
        }
    }

    #[test]
    fn cannot_spawn_onto_a_full_top_row() {
        let mut field = field();
        field.paste(
            &Grid::from_row(&[Cell::Piece(ShapeKind::Z); 10]),
            Point::new(0, 0),
        );
        for kind in ShapeKind::ALL {
            assert!(!Block::spawn(kind, &field).can_spawn(&field));
        }
    }

    #[test]
    fn spawn_probe_ignores_unoccupied_bottom_corners() {
        // The T layout's bottom row occupies only its center column; cells
        // under the empty corners must not block the spawn.
        let mut field = field();
        field.paste(&single(ShapeKind::Z), Point::new(3, 0));
        field.paste(&single(ShapeKind::Z), Point::new(5, 0));
        let block = Block::spawn(ShapeKind::T, &field);
        assert!(block.can_spawn(&field));

        field.paste(&single(ShapeKind::Z), Point::new(4, 0));
        assert!(!block.can_spawn(&field));
    }

    #[test]
    fn square_descends_exactly_nineteen_rows() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::O, &field);
        block.stamp(&mut field);

        let mut drops = 0;
        while block.try_move(&mut field, MoveDirection::Down) {
            drops += 1;
        }
        assert_eq!(drops, 19);
        assert_eq!(block.anchor(), Point::new(4, 18));

        let before = field.clone();
        assert!(!block.try_move(&mut field, MoveDirection::Down));
        assert_eq!(field, before, "rejected move must not touch the field");
    }

    #[test]
    fn walls_stop_horizontal_movement() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::O, &field);
        block.stamp(&mut field);

        let mut lefts = 0;
        while block.try_move(&mut field, MoveDirection::Left) {
            lefts += 1;
        }
        assert_eq!(lefts, 4);
        assert_eq!(block.anchor().x, 0);

        let mut rights = 0;
        while block.try_move(&mut field, MoveDirection::Right) {
            rights += 1;
        }
        assert_eq!(rights, 8);
        assert_eq!(block.anchor().x, 8);

        let before = field.clone();
        let snapshot = block;
        assert!(!block.try_move(&mut field, MoveDirection::Right));
        assert_eq!(field, before);
        assert_eq!(block, snapshot);
    }

    #[test]
    fn occupied_cells_block_descent() {
        let mut field = field();
        field.paste(
            &Grid::from_row(&[Cell::Piece(ShapeKind::I); 10]),
            Point::new(0, 10),
        );
        let mut block = Block::spawn(ShapeKind::O, &field);
        block.stamp(&mut field);

        let mut drops = 0;
        while block.try_move(&mut field, MoveDirection::Down) {
            drops += 1;
        }
        // Rows 0..=9 are free; the square rests with its bottom on row 9.
        assert_eq!(drops, 9);
        assert_eq!(block.anchor(), Point::new(4, 8));

        let before = field.clone();
        assert!(!block.try_move(&mut field, MoveDirection::Down));
        assert_eq!(field, before);
    }

    #[test]
    fn accepted_actions_relocate_exactly_four_cells() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::T, &field);
        block.stamp(&mut field);

        for _ in 0..4 {
            assert!(block.try_move(&mut field, MoveDirection::Down));
            assert_eq!(occupied(&field), 4);
        }
        assert!(block.try_rotate(&mut field, RotateDirection::Right));
        assert_eq!(occupied(&field), 4);
        assert!(block.try_move(&mut field, MoveDirection::Left));
        assert_eq!(occupied(&field), 4);
        assert!(block.try_rotate(&mut field, RotateDirection::Left));
        assert_eq!(occupied(&field), 4);
    }

    #[test]
    fn fixed_topologies_never_rotate() {
        for kind in [ShapeKind::O, ShapeKind::I, ShapeKind::S, ShapeKind::Z] {
            let mut field = field();
            let mut block = Block::spawn(kind, &field);
            block.stamp(&mut field);
            let before = field.clone();
            let snapshot = block;

            for direction in [RotateDirection::Left, RotateDirection::Right] {
                assert!(!block.try_rotate(&mut field, direction), "{kind:?}");
                assert_eq!(field, before);
                assert_eq!(block, snapshot);
            }
        }
    }

    #[test]
    fn four_right_rotations_return_to_the_start() {
        for kind in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            let mut field = field();
            let mut block = Block::spawn(kind, &field);
            block.stamp(&mut field);
            for _ in 0..6 {
                assert!(block.try_move(&mut field, MoveDirection::Down));
            }
            let start = block;

            for _ in 0..4 {
                assert!(block.try_rotate(&mut field, RotateDirection::Right), "{kind:?}");
            }
            assert_eq!(block, start, "{kind:?} should pivot back in place");
        }
    }

    #[test]
    fn rotation_keeps_the_junction_cell_fixed() {
        // T junction (bar center) per orientation, layout-local.
        fn junction(orientation: Orientation) -> Point {
            match orientation {
                Orientation::Up => Point::new(1, 0),
                Orientation::Right | Orientation::Down => Point::new(1, 1),
                Orientation::Left => Point::new(0, 1),
                _ => unreachable!(),
            }
        }

        let mut field = field();
        let mut block = Block::spawn(ShapeKind::T, &field);
        block.stamp(&mut field);
        for _ in 0..6 {
            assert!(block.try_move(&mut field, MoveDirection::Down));
        }

        let local = junction(block.orientation());
        let pivot = Point::new(block.anchor().x + local.x, block.anchor().y + local.y);
        for _ in 0..4 {
            assert!(block.try_rotate(&mut field, RotateDirection::Right));
            let local = junction(block.orientation());
            assert_eq!(
                Point::new(block.anchor().x + local.x, block.anchor().y + local.y),
                pivot
            );
        }
    }

    #[test]
    fn rotation_is_rejected_when_the_box_would_overhang() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::T, &field);
        block.stamp(&mut field);
        for _ in 0..6 {
            assert!(block.try_move(&mut field, MoveDirection::Down));
        }
        assert!(block.try_rotate(&mut field, RotateDirection::Right));
        assert_eq!(block.orientation(), Orientation::Right);

        while block.try_move(&mut field, MoveDirection::Right) {}
        assert_eq!(block.anchor().x, 8);

        // Rotating to `down` needs a three-wide box; at x = 8 it would
        // overhang the right wall.
        let before = field.clone();
        let snapshot = block;
        assert!(!block.try_rotate(&mut field, RotateDirection::Right));
        assert_eq!(field, before);
        assert_eq!(block, snapshot);
    }

    #[test]
    fn rotation_probes_the_whole_candidate_box() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::T, &field);
        block.stamp(&mut field);
        for _ in 0..6 {
            assert!(block.try_move(&mut field, MoveDirection::Down));
        }
        assert_eq!(block.anchor(), Point::new(3, 5));

        // (3, 4) lies inside the rotated box but under one of its empty
        // corners; the box-wide probe still rejects.
        field.paste(&single(ShapeKind::Z), Point::new(3, 4));
        let before = field.clone();
        assert!(!block.try_rotate(&mut field, RotateDirection::Right));
        assert_eq!(field, before);
        assert_eq!(block.orientation(), Orientation::Up);
    }

    #[test]
    fn stamp_then_erase_restores_an_empty_field() {
        let mut field = field();
        let mut block = Block::spawn(ShapeKind::J, &field);
        block.stamp(&mut field);
        for _ in 0..5 {
            assert!(block.try_move(&mut field, MoveDirection::Down));
        }
        block.erase(&mut field);
        assert_eq!(field, Grid::new(10, 20));
    }
}
