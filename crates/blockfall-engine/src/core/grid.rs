use std::fmt::{self, Write as _};

use super::shape::ShapeKind;

/// One playfield cell: empty, or occupied by a cell of some shape class.
///
/// The shape class only matters for presentation (each class has its own
/// color); collision rules care solely about empty vs. occupied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    Piece(ShapeKind),
}

impl Cell {
    /// Single-character tag for this cell, `' '` when empty.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Piece(kind) => kind.as_char(),
        }
    }
}

/// Playfield coordinate of a layout's top-left corner.
///
/// `y` may be negative while a block still overhangs the top edge; the
/// clipped [`Grid::paste`] drops whatever falls outside the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangular matrix of cell tags, row 0 at the top.
///
/// The only mutation path is [`Grid::paste`]; reads panic on out-of-range
/// coordinates because every caller range-checks before reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds a one-row grid from a slice of cells.
    #[must_use]
    pub fn from_row(row: &[Cell]) -> Self {
        assert!(!row.is_empty(), "grid dimensions must be non-zero");
        Self {
            width: row.len(),
            height: 1,
            cells: row.to_vec(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads one cell.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "cell read out of bounds: ({x}, {y})"
        );
        self.cells[y * self.width + x]
    }

    /// One row as a slice, row 0 at the top.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        assert!(y < self.height, "row read out of bounds: {y}");
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Copies `source` onto this grid with its top-left corner at `anchor`.
    ///
    /// Source cells whose destination falls outside the grid are silently
    /// dropped, so a block overhanging the top edge (negative `y` during
    /// spawn) or either side writes only its in-bounds portion.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Cell, Grid, Point, ShapeKind};
    ///
    /// let mut field = Grid::new(4, 2);
    /// let brick = Grid::from_row(&[Cell::Piece(ShapeKind::O); 2]);
    /// field.paste(&brick, Point::new(3, 1));
    /// assert_eq!(field.to_string(), "    \n   O\n");
    /// ```
    pub fn paste(&mut self, source: &Grid, anchor: Point) {
        let x_start = anchor.x.max(0);
        let x_end = (anchor.x + source.width as i32).min(self.width as i32);
        let y_start = anchor.y.max(0);
        let y_end = (anchor.y + source.height as i32).min(self.height as i32);
        for y in y_start..y_end {
            for x in x_start..x_end {
                let cell = source.get((x - anchor.x) as usize, (y - anchor.y) as usize);
                self.cells[y as usize * self.width + x as usize] = cell;
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_char(cell.as_char())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_row(kind: ShapeKind, len: usize) -> Grid {
        Grid::from_row(&vec![Cell::Piece(kind); len])
    }

    #[test]
    fn new_grid_is_all_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        for y in 0..3 {
            for x in 0..4 {
                assert!(grid.get(x, y).is_empty(), "cell ({x}, {y}) should be empty");
            }
        }
    }

    #[test]
    #[should_panic(expected = "cell read out of bounds")]
    fn get_panics_out_of_bounds() {
        let grid = Grid::new(4, 3);
        let _ = grid.get(4, 0);
    }

    #[test]
    fn paste_writes_in_bounds_region() {
        let mut grid = Grid::new(4, 4);
        grid.paste(&piece_row(ShapeKind::T, 2), Point::new(1, 2));
        assert!(grid.get(1, 2).is_piece());
        assert!(grid.get(2, 2).is_piece());
        assert!(grid.get(0, 2).is_empty());
        assert!(grid.get(3, 2).is_empty());
    }

    #[test]
    fn paste_clips_above_top_edge() {
        let mut grid = Grid::new(4, 4);
        let mut source = Grid::new(2, 2);
        source.paste(&piece_row(ShapeKind::O, 2), Point::new(0, 0));
        source.paste(&piece_row(ShapeKind::O, 2), Point::new(0, 1));

        grid.paste(&source, Point::new(1, -1));

        // Only the source's bottom row lands on the field.
        assert!(grid.get(1, 0).is_piece());
        assert!(grid.get(2, 0).is_piece());
        assert_eq!(grid.rows().flatten().filter(|c| c.is_piece()).count(), 2);
    }

    #[test]
    fn paste_clips_bottom_right_corner() {
        let mut grid = Grid::new(4, 4);
        let mut source = Grid::new(2, 2);
        source.paste(&piece_row(ShapeKind::L, 2), Point::new(0, 0));
        source.paste(&piece_row(ShapeKind::L, 2), Point::new(0, 1));

        grid.paste(&source, Point::new(3, 3));

        assert!(grid.get(3, 3).is_piece());
        assert_eq!(grid.rows().flatten().filter(|c| c.is_piece()).count(), 1);
    }

    #[test]
    fn paste_fully_outside_is_a_no_op() {
        let mut grid = Grid::new(4, 4);
        grid.paste(&piece_row(ShapeKind::S, 3), Point::new(-5, 2));
        grid.paste(&piece_row(ShapeKind::S, 3), Point::new(2, 9));
        assert_eq!(grid, Grid::new(4, 4));
    }

    #[test]
    fn paste_empty_source_erases() {
        let mut grid = Grid::new(3, 3);
        grid.paste(&piece_row(ShapeKind::Z, 3), Point::new(0, 1));
        grid.paste(&Grid::new(3, 1), Point::new(0, 1));
        assert_eq!(grid, Grid::new(3, 3));
    }

    #[test]
    fn row_reads_single_row() {
        let mut grid = Grid::new(3, 2);
        grid.paste(&piece_row(ShapeKind::I, 3), Point::new(0, 1));
        assert!(grid.row(0).iter().all(|c| c.is_empty()));
        assert!(grid.row(1).iter().all(|c| c.is_piece()));
    }

    #[test]
    fn display_renders_tag_matrix() {
        let mut grid = Grid::new(3, 2);
        grid.paste(&piece_row(ShapeKind::T, 2), Point::new(1, 1));
        assert_eq!(grid.to_string(), "   \n TT\n");
    }
}
