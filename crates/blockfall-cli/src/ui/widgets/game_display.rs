use blockfall_engine::{GameEngine, GameState, PieceSeed};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, StatsDisplay, color, style};

/// Whole game screen: stats panel on the left, the board in the center.
///
/// The board border reflects the game state, and a popup covers the board while
/// paused or after the game is over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    engine: &'a GameEngine,
    seed: PieceSeed,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(engine: &'a GameEngine, seed: PieceSeed, show_ghost: bool) -> Self {
        Self {
            engine,
            seed,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.engine.state() {
            GameState::Playing => color::WHITE,
            GameState::Paused => color::YELLOW,
            GameState::GameOver => color::RED,
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        let ghost = self
            .show_ghost
            .then(|| self.engine.drop_preview())
            .flatten();
        BoardDisplay::new(self.engine.field())
            .ghost(ghost)
            .falling_piece(self.engine.current_piece().copied())
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            )
    }

    fn stats(&self) -> StatsDisplay<'a> {
        let seed = self.seed.to_string();
        StatsDisplay::new(self.engine).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .title_bottom(Line::from(format!("seed {}", &seed[..8])).centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        self.board().height()
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game_board = self.board();
        let stats = self.stats();

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);

        let popup = match self.engine.state() {
            GameState::Playing => None,
            GameState::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            GameState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
