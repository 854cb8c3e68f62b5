use std::iter;

use blockfall_engine::Layout;
use ratatui::{
    layout::{Constraint, Flex, Layout as LayoutWidget, Rect},
    prelude::Buffer,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::widgets::CellDisplay;

/// A single shape layout centered in a four-by-two cell box, as used by the
/// hold panel and the queue entries.
#[derive(Debug)]
pub(crate) struct LayoutDisplay<'a> {
    layout: Option<&'static Layout>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LayoutDisplay<'a> {
    pub(crate) fn new() -> Self {
        Self {
            layout: None,
            block: None,
        }
    }

    pub(crate) fn layout(self, layout: &'static Layout) -> Self {
        Self {
            layout: Some(layout),
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for LayoutDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &LayoutDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(layout) = self.layout else {
            return;
        };

        let piece_area = area.centered(
            Constraint::Length(layout.width() as u16 * CellDisplay::width()),
            Constraint::Length(layout.height() as u16 * CellDisplay::height()),
        );
        let horizontal = LayoutWidget::horizontal(
            (0..layout.width()).map(|_| Constraint::Length(CellDisplay::width())),
        )
        .flex(Flex::Center);
        let vertical = LayoutWidget::vertical(
            (0..layout.height()).map(|_| Constraint::Length(CellDisplay::height())),
        );
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (row_areas, row) in iter::zip(grid_rows, layout.rows()) {
            for (cell_area, cell) in iter::zip(row_areas, row.iter()) {
                CellDisplay::from_cell(*cell, false).render(cell_area, buf);
            }
        }
    }
}
