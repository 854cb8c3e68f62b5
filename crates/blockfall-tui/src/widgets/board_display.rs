use std::iter;

use blockfall_engine::Grid;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::widgets::CellDisplay;

/// The playfield matrix, one [`CellDisplay`] per cell.
#[derive(Debug)]
pub(crate) struct BoardDisplay<'a> {
    playfield: &'a Grid,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub(crate) fn new(playfield: &'a Grid) -> Self {
        Self {
            playfield,
            block: None,
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        self.playfield.width() as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        self.playfield.height() as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.playfield.width()).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..self.playfield.height()).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (row_areas, row) in iter::zip(grid_rows, self.playfield.rows()) {
            for (cell_area, cell) in iter::zip(row_areas, row) {
                CellDisplay::from_cell(*cell, true).render(cell_area, buf);
            }
        }
    }
}
