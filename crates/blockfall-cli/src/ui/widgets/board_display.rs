use std::iter;

use blockfall_engine::{Block, Field, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// The playing field with the falling piece and its landing preview drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    field: &'a Field,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(field: &'a Field) -> Self {
        Self {
            field,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(Field::WIDTH).unwrap() * BlockDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(Field::HEIGHT).unwrap() * BlockDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Copy of the field with the ghost and the falling piece merged in.
    fn composed_field(&self) -> Field {
        let mut field = self.field.clone();
        if let Some(ghost) = &self.ghost {
            field.place_as(ghost, Block::Ghost);
        }
        if let Some(piece) = &self.falling_piece {
            field.place(piece);
        }
        field
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let field = self.composed_field();

        let col_constraints = (0..Field::WIDTH).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints = (0..Field::HEIGHT).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ Field::HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Field::WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, field.rows()) {
            for (grid_cell, block) in iter::zip(grid_row, row) {
                BlockDisplay::from_block(*block).render(grid_cell, buf);
            }
        }
    }
}
