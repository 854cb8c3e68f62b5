use std::io;

use anyhow::Context as _;
use blockfall_engine::{Game, ShapeGenerator};
use clap::Parser;
use crossterm::event::{self, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal,
    layout::{Constraint, Layout},
    text::{Line, Text},
    widgets::{Block, Padding},
};

use crate::{
    input::CrosstermInput,
    view::SessionView,
    widgets::{BINDINGS, KeyBindingDisplay, style},
};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Playfield width in cells
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(4..))]
    width: u16,
    /// Playfield height in cells
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(4..))]
    height: u16,
    /// Fix the shape sequence for a reproducible game
    #[clap(long)]
    seed: Option<u64>,
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    ratatui::run(|terminal| App::new(&args).run(terminal))
}

#[derive(Debug)]
struct App {
    width: usize,
    height: usize,
    seed: Option<u64>,
}

impl App {
    fn new(args: &Args) -> Self {
        Self {
            width: usize::from(args.width),
            height: usize::from(args.height),
            seed: args.seed,
        }
    }

    fn run(&self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        if !self.start_screen(terminal)? {
            return Ok(());
        }
        loop {
            let mut game = self.new_game();
            let outcome = game.play(&mut CrosstermInput, &mut SessionView::new(terminal));
            match outcome {
                Ok(_) => {
                    if !game_over_screen(terminal, &game)? {
                        return Ok(());
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => return Ok(()),
                Err(err) => return Err(err).context("terminal session failed"),
            }
        }
    }

    fn new_game(&self) -> Game {
        match self.seed {
            Some(seed) => {
                Game::with_generator(self.width, self.height, ShapeGenerator::with_seed(seed))
            }
            None => Game::new(self.width, self.height),
        }
    }

    /// Draws the opening screen and waits; false means the player quit.
    fn start_screen(&self, terminal: &mut DefaultTerminal) -> anyhow::Result<bool> {
        terminal.draw(|frame| {
            let panel = frame
                .area()
                .centered(Constraint::Length(64), Constraint::Length(9));
            let block = Block::bordered()
                .title(Line::from(" BLOCKFALL ").centered())
                .padding(Padding::uniform(1))
                .style(style::DEFAULT);
            let inner = block.inner(panel);
            frame.render_widget(block, panel);

            let [text_area, bindings_area] =
                inner.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));
            let text = Text::from(vec![
                Line::from("Stack the falling blocks and clear full rows.").centered(),
                Line::from(""),
                Line::from("Press any key to start, q or Esc to leave.").centered(),
            ]);
            frame.render_widget(text, text_area);
            frame.render_widget(KeyBindingDisplay::new(BINDINGS), bindings_area);
        })?;

        loop {
            let Some(key) = event::read()?.as_key_event() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            return match key.code {
                KeyCode::Char('q' | 'Q') | KeyCode::Esc => Ok(false),
                _ => Ok(true),
            };
        }
    }
}

/// Shows the finished game behind its overlay and waits for the restart or
/// quit choice; true means play again.
fn game_over_screen(terminal: &mut DefaultTerminal, game: &Game) -> anyhow::Result<bool> {
    SessionView::new(terminal).draw_game_over(game)?;
    loop {
        let Some(key) = event::read()?.as_key_event() else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('r' | 'R') => return Ok(true),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => return Ok(false),
            _ => {}
        }
    }
}
