use std::iter;

use blockfall_engine::Layout;
use ratatui::{
    layout::{Constraint, Flex, Layout as LayoutWidget},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::widgets::{CellDisplay, LayoutDisplay};

/// The upcoming blocks, next at the top.
#[derive(Debug)]
pub(crate) struct QueueDisplay<'a> {
    layouts: Vec<&'static Layout>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> QueueDisplay<'a> {
    pub(crate) fn new<I>(layouts: I) -> Self
    where
        I: IntoIterator<Item = &'static Layout>,
    {
        Self {
            layouts: layouts.into_iter().collect(),
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
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        let entries = u16::try_from(self.layouts.len()).unwrap();
        let padding = entries.saturating_sub(1);
        2 * CellDisplay::height() * entries
            + padding
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for QueueDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &QueueDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let vertical = LayoutWidget::vertical(
            (0..self.layouts.len()).map(|_| Constraint::Length(2 * CellDisplay::height())),
        )
        .flex(Flex::SpaceBetween);
        let entries = area.layout_vec(&vertical);

        for (entry_area, layout) in iter::zip(entries, self.layouts.iter().copied()) {
            LayoutDisplay::new().layout(layout).render(entry_area, buf);
        }
    }
}
