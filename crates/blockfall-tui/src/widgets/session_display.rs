use blockfall_engine::Game;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::widgets::{BoardDisplay, LayoutDisplay, QueueDisplay, StatsDisplay, color, style};

/// The whole session screen: hold and stats on the left, the playfield in
/// the middle, the upcoming queue on the right, and the game-over overlay
/// when the run has ended.
#[derive(Debug)]
pub(crate) struct SessionDisplay<'a> {
    game: &'a Game,
    game_over: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub(crate) fn new(game: &'a Game) -> Self {
        Self {
            game,
            game_over: false,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub(crate) fn game_over(self, game_over: bool) -> Self {
        Self { game_over, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = if self.game_over {
            color::RED
        } else {
            color::WHITE
        };

        let board = BoardDisplay::new(self.game.playfield())
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = {
            let panel = LayoutDisplay::new().block(
                Block::bordered()
                    .title(Line::from("HOLD").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style),
            );
            if let Some(layout) = self.game.held_layout() {
                panel.layout(layout)
            } else {
                panel
            }
        };
        let queue = QueueDisplay::new(self.game.next_layouts()).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );
        let stats = StatsDisplay::new(self.game).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(board.width()),
            Constraint::Length(queue.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [queue_area] = Layout::vertical([Constraint::Length(queue.height())]).areas(right_column);

        let board_width = board.width();
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        queue.render(queue_area, buf);

        if self.game_over {
            let popup_style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(popup_style);
            let text = Text::from(vec![
                Line::from("GAME OVER"),
                Line::from(format!("final score {}", self.game.score())),
                Line::from("r restart | q/Esc quit"),
            ])
            .centered();
            let area =
                board_area.centered(Constraint::Length(board_width), Constraint::Length(5));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(3)), buf);
        }
    }
}
