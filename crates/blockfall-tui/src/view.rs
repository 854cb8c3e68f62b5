use std::io;

use blockfall_engine::{Game, GameView};
use ratatui::{
    DefaultTerminal,
    layout::{Constraint, Layout},
};

use crate::widgets::{BINDINGS, KeyBindingDisplay, SessionDisplay};

/// Publishes game snapshots by redrawing the whole session screen.
#[derive(Debug)]
pub(crate) struct SessionView<'a> {
    terminal: &'a mut DefaultTerminal,
}

impl<'a> SessionView<'a> {
    pub(crate) fn new(terminal: &'a mut DefaultTerminal) -> Self {
        Self { terminal }
    }

    /// Draws the final state with the game-over overlay on top.
    pub(crate) fn draw_game_over(&mut self, game: &Game) -> io::Result<()> {
        self.draw(&SessionDisplay::new(game).game_over(true))
    }

    fn draw(&mut self, display: &SessionDisplay) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let [main_area, help_area] = frame
                .area()
                .layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));
            frame.render_widget(display, main_area);
            frame.render_widget(KeyBindingDisplay::new(BINDINGS), help_area);
        })?;
        Ok(())
    }
}

impl GameView for SessionView<'_> {
    fn publish(&mut self, game: &Game) -> io::Result<()> {
        self.draw(&SessionDisplay::new(game))
    }
}
