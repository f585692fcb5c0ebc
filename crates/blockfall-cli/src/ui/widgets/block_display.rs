use blockfall_engine::Block;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One field cell, drawn two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn from_block(block: Block) -> Self {
        match block {
            Block::Empty => Self::new(style::EMPTY_DOT, "."),
            Block::Wall => Self::new(style::WALL, ""),
            Block::Ghost => Self::new(style::GHOST, "[]"),
            Block::Piece(kind) => Self::new(style::piece(kind), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
