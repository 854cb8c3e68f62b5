use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::grid::{Cell, Grid, Point};

/// Enum of the seven catalog shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShapeKind {
    /// The 2×2 square.
    O = 0,
    /// The four-cell line.
    I = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// L-piece.
    L = 4,
    /// Backward L.
    J = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        match rng.random_range(0..=6) {
            0 => ShapeKind::O,
            1 => ShapeKind::I,
            2 => ShapeKind::S,
            3 => ShapeKind::Z,
            4 => ShapeKind::L,
            5 => ShapeKind::J,
            _ => ShapeKind::T,
        }
    }
}

impl ShapeKind {
    /// Number of shapes in the catalog (7).
    pub const LEN: usize = 7;

    /// Every shape, in descriptor order.
    pub const ALL: [ShapeKind; Self::LEN] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
    ];

    /// The shape's catalog descriptor.
    #[must_use]
    pub fn def(self) -> &'static ShapeDef {
        &SHAPE_DEFS[self as usize]
    }

    /// Single-character cell tag for this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::O.as_char(), 'O');
    /// assert_eq!(ShapeKind::J.as_char(), 'J');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::O => 'O',
            ShapeKind::I => 'I',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::L => 'L',
            ShapeKind::J => 'J',
            ShapeKind::T => 'T',
        }
    }
}

/// Orientation key of a layout within its shape's topology.
///
/// `Only` belongs to the single-orientation topology, `Primary`/`Secondary`
/// to the dual topology (180°-apart states distinct, 90°-apart states
/// repeat), and `Up`/`Right`/`Down`/`Left` to the four-orientation cycle.
/// A block's orientation always stays within its own shape's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Only,
    Primary,
    Secondary,
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    /// Position in the up/right/down/left rotation cycle, `None` for the
    /// single- and dual-topology keys.
    const fn cycle_index(self) -> Option<usize> {
        match self {
            Orientation::Up => Some(0),
            Orientation::Right => Some(1),
            Orientation::Down => Some(2),
            Orientation::Left => Some(3),
            _ => None,
        }
    }
}

/// Rotation sense for [`Block::try_rotate`](super::Block::try_rotate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Left,
    Right,
}

/// One orientation's cell matrix, stored as static rows.
///
/// Invariant (checked when the catalog constants are built): at least one
/// row, and every row the same width.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    rows: &'static [&'static [Cell]],
}

impl Layout {
    const fn new(rows: &'static [&'static [Cell]]) -> Self {
        assert!(!rows.is_empty(), "layout must have at least one row");
        let width = rows[0].len();
        assert!(width > 0, "layout rows must be non-empty");
        let mut y = 1;
        while y < rows.len() {
            assert!(rows[y].len() == width, "layout rows must have equal width");
            y += 1;
        }
        Self { rows }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.rows[0].len()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at layout-local coordinates.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'static [Cell]> {
        self.rows.iter().copied()
    }

    /// The layout as an owned grid, ready to paste into a playfield.
    #[must_use]
    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::new(self.width(), self.height());
        for (y, row) in self.rows().enumerate() {
            grid.paste(&Grid::from_row(row), Point::new(0, y as i32));
        }
        grid
    }
}

/// How a shape's layouts are keyed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LayoutSet {
    One(Layout),
    Two {
        primary: Layout,
        secondary: Layout,
    },
    Four {
        up: Layout,
        right: Layout,
        down: Layout,
        left: Layout,
    },
}

/// One rotation-table entry: the next orientation plus the anchor shift that
/// keeps the shape's junction cell fixed on the field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Turn {
    pub(crate) next: Orientation,
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

/// Rotation transitions of a four-orientation shape, indexed by the current
/// orientation's cycle position.
#[derive(Debug)]
pub(crate) struct TurnTable {
    right: [Turn; 4],
    left: [Turn; 4],
}

impl TurnTable {
    fn get(&self, from: Orientation, direction: RotateDirection) -> Option<Turn> {
        let index = from.cycle_index()?;
        let turns = match direction {
            RotateDirection::Right => &self.right,
            RotateDirection::Left => &self.left,
        };
        Some(turns[index])
    }
}

/// Catalog entry for one shape: its orientation-keyed layouts and, for the
/// four-orientation topology, the rotation transition table.
#[derive(Debug)]
pub struct ShapeDef {
    layouts: LayoutSet,
    turns: Option<&'static TurnTable>,
}

impl ShapeDef {
    /// Orientation a block of this shape spawns in.
    #[must_use]
    pub fn initial_orientation(&self) -> Orientation {
        match self.layouts {
            LayoutSet::One(_) => Orientation::Only,
            LayoutSet::Two { .. } => Orientation::Primary,
            LayoutSet::Four { .. } => Orientation::Up,
        }
    }

    /// Layout for one of this shape's orientation keys.
    ///
    /// # Panics
    ///
    /// Panics if the key does not belong to this shape's topology.
    #[must_use]
    pub fn layout(&self, orientation: Orientation) -> &Layout {
        match (&self.layouts, orientation) {
            (LayoutSet::One(layout), Orientation::Only) => layout,
            (LayoutSet::Two { primary, .. }, Orientation::Primary) => primary,
            (LayoutSet::Two { secondary, .. }, Orientation::Secondary) => secondary,
            (LayoutSet::Four { up, .. }, Orientation::Up) => up,
            (LayoutSet::Four { right, .. }, Orientation::Right) => right,
            (LayoutSet::Four { down, .. }, Orientation::Down) => down,
            (LayoutSet::Four { left, .. }, Orientation::Left) => left,
            _ => panic!("orientation {orientation:?} does not belong to this shape"),
        }
    }

    /// Rotation transition out of `from`, or `None` when this shape's
    /// topology does not rotate.
    pub(crate) fn turn(&self, from: Orientation, direction: RotateDirection) -> Option<Turn> {
        self.turns.and_then(|table| table.get(from, direction))
    }
}

const fn turn(next: Orientation, dx: i32, dy: i32) -> Turn {
    Turn { next, dx, dy }
}

// Anchor deltas keep each shape's junction cell (the center of its
// three-cell bar) at the same field coordinate across the rotation, so the
// piece pivots in place. Junctions per orientation:
//   T, J: up (1,0)  right (1,1)  down (1,1)  left (0,1)
//   L:    up (1,1)  right (1,1)  down (1,0)  left (0,1)
// delta = junction(current) - junction(next); tables are indexed by the
// current orientation in up/right/down/left order.
static L_TURNS: TurnTable = TurnTable {
    right: [
        turn(Orientation::Right, 0, 0),
        turn(Orientation::Down, 0, 1),
        turn(Orientation::Left, 1, -1),
        turn(Orientation::Up, -1, 0),
    ],
    left: [
        turn(Orientation::Left, 1, 0),
        turn(Orientation::Up, 0, 0),
        turn(Orientation::Right, 0, -1),
        turn(Orientation::Down, -1, 1),
    ],
};

static T_TURNS: TurnTable = TurnTable {
    right: [
        turn(Orientation::Right, 0, -1),
        turn(Orientation::Down, 0, 0),
        turn(Orientation::Left, 1, 0),
        turn(Orientation::Up, -1, 1),
    ],
    left: [
        turn(Orientation::Left, 1, -1),
        turn(Orientation::Up, 0, 1),
        turn(Orientation::Right, 0, 0),
        turn(Orientation::Down, -1, 0),
    ],
};

static SHAPE_DEFS: [ShapeDef; ShapeKind::LEN] = {
    use Cell::Empty as E;
    const O: Cell = Cell::Piece(ShapeKind::O);
    const I: Cell = Cell::Piece(ShapeKind::I);
    const S: Cell = Cell::Piece(ShapeKind::S);
    const Z: Cell = Cell::Piece(ShapeKind::Z);
    const L: Cell = Cell::Piece(ShapeKind::L);
    const J: Cell = Cell::Piece(ShapeKind::J);
    const T: Cell = Cell::Piece(ShapeKind::T);

    [
        // Square
        ShapeDef {
            layouts: LayoutSet::One(Layout::new(&[
                &[O, O], //
                &[O, O],
            ])),
            turns: None,
        },
        // Line
        ShapeDef {
            layouts: LayoutSet::Two {
                primary: Layout::new(&[
                    &[I, I, I, I], //
                ]),
                secondary: Layout::new(&[
                    &[I], //
                    &[I],
                    &[I],
                    &[I],
                ]),
            },
            turns: None,
        },
        // S
        ShapeDef {
            layouts: LayoutSet::Two {
                primary: Layout::new(&[
                    &[E, S, S], //
                    &[S, S, E],
                ]),
                secondary: Layout::new(&[
                    &[S, E], //
                    &[S, S],
                    &[E, S],
                ]),
            },
            turns: None,
        },
        // Z
        ShapeDef {
            layouts: LayoutSet::Two {
                primary: Layout::new(&[
                    &[Z, Z, E], //
                    &[E, Z, Z],
                ]),
                secondary: Layout::new(&[
                    &[E, Z], //
                    &[Z, Z],
                    &[Z, E],
                ]),
            },
            turns: None,
        },
        // L
        ShapeDef {
            layouts: LayoutSet::Four {
                up: Layout::new(&[
                    &[E, E, L], //
                    &[L, L, L],
                ]),
                right: Layout::new(&[
                    &[L, L], //
                    &[E, L],
                    &[E, L],
                ]),
                down: Layout::new(&[
                    &[L, L, L], //
                    &[L, E, E],
                ]),
                left: Layout::new(&[
                    &[L, E], //
                    &[L, E],
                    &[L, L],
                ]),
            },
            turns: Some(&L_TURNS),
        },
        // Backward L
        ShapeDef {
            layouts: LayoutSet::Four {
                up: Layout::new(&[
                    &[J, J, J], //
                    &[E, E, J],
                ]),
                right: Layout::new(&[
                    &[E, J], //
                    &[E, J],
                    &[J, J],
                ]),
                down: Layout::new(&[
                    &[J, E, E], //
                    &[J, J, J],
                ]),
                left: Layout::new(&[
                    &[J, J], //
                    &[J, E],
                    &[J, E],
                ]),
            },
            turns: Some(&T_TURNS),
        },
        // T
        ShapeDef {
            layouts: LayoutSet::Four {
                up: Layout::new(&[
                    &[T, T, T], //
                    &[E, T, E],
                ]),
                right: Layout::new(&[
                    &[E, T], //
                    &[T, T],
                    &[E, T],
                ]),
                down: Layout::new(&[
                    &[E, T, E], //
                    &[T, T, T],
                ]),
                left: Layout::new(&[
                    &[T, E], //
                    &[T, T],
                    &[T, E],
                ]),
            },
            turns: Some(&T_TURNS),
        },
    ]
};

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn occupied(layout: &Layout) -> usize {
        layout
            .rows()
            .flat_map(<[Cell]>::iter)
            .filter(|cell| cell.is_piece())
            .count()
    }

    fn orientations(kind: ShapeKind) -> Vec<Orientation> {
        match kind.def().layouts {
            LayoutSet::One(_) => vec![Orientation::Only],
            LayoutSet::Two { .. } => vec![Orientation::Primary, Orientation::Secondary],
            LayoutSet::Four { .. } => vec![
                Orientation::Up,
                Orientation::Right,
                Orientation::Down,
                Orientation::Left,
            ],
        }
    }

    #[test]
    fn every_layout_has_four_cells_tagged_with_its_shape() {
        for kind in ShapeKind::ALL {
            for orientation in orientations(kind) {
                let layout = kind.def().layout(orientation);
                assert_eq!(
                    occupied(layout),
                    4,
                    "{kind:?} {orientation:?} should occupy four cells"
                );
                for row in layout.rows() {
                    for cell in row {
                        if let Cell::Piece(k) = cell {
                            assert_eq!(*k, kind, "{kind:?} {orientation:?} holds a foreign tag");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn initial_orientation_matches_topology() {
        assert_eq!(ShapeKind::O.def().initial_orientation(), Orientation::Only);
        for kind in [ShapeKind::I, ShapeKind::S, ShapeKind::Z] {
            assert_eq!(kind.def().initial_orientation(), Orientation::Primary);
        }
        for kind in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            assert_eq!(kind.def().initial_orientation(), Orientation::Up);
        }
    }

    #[test]
    fn fixed_topologies_have_no_turns() {
        for kind in [ShapeKind::O, ShapeKind::I, ShapeKind::S, ShapeKind::Z] {
            let def = kind.def();
            let from = def.initial_orientation();
            assert!(def.turn(from, RotateDirection::Left).is_none());
            assert!(def.turn(from, RotateDirection::Right).is_none());
        }
    }

    #[test]
    fn turns_cycle_through_all_four_orientations() {
        for kind in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            let def = kind.def();
            for direction in [RotateDirection::Right, RotateDirection::Left] {
                let mut seen = vec![Orientation::Up];
                let mut orientation = Orientation::Up;
                for _ in 0..4 {
                    let turn = def.turn(orientation, direction).unwrap();
                    orientation = turn.next;
                    seen.push(orientation);
                }
                let expected = match direction {
                    RotateDirection::Right => [
                        Orientation::Up,
                        Orientation::Right,
                        Orientation::Down,
                        Orientation::Left,
                        Orientation::Up,
                    ],
                    RotateDirection::Left => [
                        Orientation::Up,
                        Orientation::Left,
                        Orientation::Down,
                        Orientation::Right,
                        Orientation::Up,
                    ],
                };
                assert_eq!(seen, expected, "{kind:?} {direction:?} cycle");
            }
        }
    }

    #[test]
    fn turn_deltas_cancel_around_each_cycle() {
        for kind in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            let def = kind.def();
            for direction in [RotateDirection::Right, RotateDirection::Left] {
                let mut orientation = Orientation::Up;
                let (mut dx, mut dy) = (0, 0);
                for _ in 0..4 {
                    let turn = def.turn(orientation, direction).unwrap();
                    dx += turn.dx;
                    dy += turn.dy;
                    orientation = turn.next;
                }
                assert_eq!((dx, dy), (0, 0), "{kind:?} {direction:?} deltas drift");
            }
        }
    }

    #[test]
    fn opposite_turns_undo_each_other() {
        for kind in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            let def = kind.def();
            for from in [
                Orientation::Up,
                Orientation::Right,
                Orientation::Down,
                Orientation::Left,
            ] {
                let right = def.turn(from, RotateDirection::Right).unwrap();
                let back = def.turn(right.next, RotateDirection::Left).unwrap();
                assert_eq!(back.next, from);
                assert_eq!((right.dx + back.dx, right.dy + back.dy), (0, 0));
            }
        }
    }

    #[test]
    fn sampling_covers_the_whole_catalog() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut hit = [false; ShapeKind::LEN];
        for _ in 0..200 {
            let kind: ShapeKind = rng.random();
            hit[kind as usize] = true;
        }
        assert!(hit.iter().all(|&h| h), "200 draws should hit all 7 shapes");
    }
}
