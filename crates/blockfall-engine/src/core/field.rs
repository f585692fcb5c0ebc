use super::piece::{Piece, PieceKind};

/// A single cell as seen through [`Field::get_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Outside the field; never a valid placement target.
    Wall,
    /// Landing preview, only drawn on render copies of the field.
    Ghost,
    /// Settled block of a specific piece kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Single character representation, `.` for an empty cell.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Wall => '#',
            Block::Ghost => '+',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

/// One row of the field, left to right.
pub type FieldRow = [Block; Field::WIDTH];

/// The 10×20 grid of settled blocks.
///
/// Row 0 is the top of the field and x grows to the right. Coordinates are
/// signed so that piece geometry can probe outside the field; any such probe
/// reads as [`Block::Wall`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, Field, Piece, PieceKind};
///
/// let mut field = Field::INITIAL;
/// let piece = Piece::new(PieceKind::O);
/// assert!(field.can_place(&piece, 0, 0));
///
/// field.place(&piece);
/// assert_eq!(field.get_cell(4, 1), Block::Piece(PieceKind::O));
/// assert_eq!(field.get_cell(-1, 0), Block::Wall);
/// assert!(!field.can_place(&piece, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    rows: [FieldRow; Field::HEIGHT],
}

impl Default for Field {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Field {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    const EMPTY_ROW: FieldRow = [Block::Empty; Self::WIDTH];

    pub const INITIAL: Self = Self {
        rows: [Self::EMPTY_ROW; Self::HEIGHT],
    };

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < Self::WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < Self::HEIGHT)?;
        Some((x, y))
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.rows.fill(Self::EMPTY_ROW);
    }

    /// Returns the cell at `(x, y)`, or [`Block::Wall`] outside the field.
    #[must_use]
    pub fn get_cell(&self, x: i32, y: i32) -> Block {
        Self::index(x, y).map_or(Block::Wall, |(x, y)| self.rows[y][x])
    }

    /// Checks whether the piece, moved by `(dx, dy)`, fits inside the field
    /// without overlapping settled blocks.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece
            .occupied_cells()
            .into_iter()
            .all(|(x, y)| self.get_cell(x + dx, y + dy).is_empty())
    }

    /// Writes the piece's kind into its occupied cells at its current anchor.
    ///
    /// Legality is not re-checked; cells outside the field are skipped.
    pub fn place(&mut self, piece: &Piece) {
        self.place_as(piece, Block::Piece(piece.kind()));
    }

    /// Like [`Self::place`], but writes an arbitrary block.
    ///
    /// Used on render copies, e.g. to draw the landing preview as [`Block::Ghost`].
    pub fn place_as(&mut self, piece: &Piece, block: Block) {
        for (x, y) in piece.occupied_cells() {
            if let Some((x, y)) = Self::index(x, y) {
                self.rows[y][x] = block;
            }
        }
    }

    /// Returns true if every cell of row `y` is occupied.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|block| !block.is_empty()))
    }

    /// Removes row `y`, shifting every row above it down by one.
    ///
    /// An empty row enters at the top; rows below `y` are untouched.
    pub fn remove_line(&mut self, y: usize) {
        if y >= Self::HEIGHT {
            return;
        }
        self.rows.copy_within(..y, 1);
        self.rows[0] = Self::EMPTY_ROW;
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &FieldRow> {
        self.rows.iter()
    }

    /// Returns the number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|block| !block.is_empty())
            .count()
    }

    /// Renders each row as a string of [`Block::as_char`] characters.
    pub fn row_strings(&self) -> impl Iterator<Item = String> + '_ {
        self.rows
            .iter()
            .map(|row| row.iter().map(|block| block.as_char()).collect())
    }

    /// Creates a field from ASCII art for testing.
    ///
    /// `.` is an empty cell, a piece letter is a block of that kind and `#` is an
    /// I block. The last line is the bottom row of the field.
    #[cfg(test)]
    pub(crate) fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(lines.len() <= Self::HEIGHT, "too many rows");

        let mut field = Self::INITIAL;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            assert_eq!(cells.len(), Self::WIDTH, "row {i} must have {} cells", Self::WIDTH);
            for (x, ch) in cells.into_iter().enumerate() {
                field.rows[top + i][x] = match ch {
                    '.' => Block::Empty,
                    '#' => Block::Piece(PieceKind::I),
                    ch => Block::Piece(PieceKind::from_char(ch).expect("invalid cell")),
                };
            }
        }
        field
    }
}
