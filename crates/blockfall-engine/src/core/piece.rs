use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Occupancy of a piece within its 4×4 bounding box, indexed as `mask[row][column]`.
pub type PieceMask = [[bool; 4]; 4];

/// Absolute field coordinates of a piece's occupied cells.
///
/// Sized for a whole 4×4 mask, so collecting never overflows.
pub type PieceCells = ArrayVec<(i32, i32), 16>;

/// A falling piece: identity, current rotation mask and field anchor.
///
/// The anchor is the field coordinate of the mask's top-left corner. It may be
/// negative or beyond the right edge as long as the occupied cells are not, since
/// most masks have empty rows and columns.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let mut piece = Piece::new(PieceKind::I);
/// assert_eq!(piece.position(), (3, 0));
///
/// piece.rotate_clockwise();
/// let cells: Vec<_> = piece.occupied_cells().into_iter().collect();
/// assert_eq!(cells, [(5, 0), (5, 1), (5, 2), (5, 3)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    mask: PieceMask,
    x: i32,
    y: i32,
}

impl Piece {
    pub const SPAWN_X: i32 = 3;
    pub const SPAWN_Y: i32 = 0;

    /// Creates a piece with its canonical mask at the spawn anchor.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            mask: kind.canonical_mask(),
            x: Self::SPAWN_X,
            y: Self::SPAWN_Y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> &PieceMask {
        &self.mask
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Moves the anchor by the given offset without any legality check.
    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Rotates the mask 90° clockwise in place.
    ///
    /// The O-piece is rotation invariant and is left untouched.
    pub fn rotate_clockwise(&mut self) {
        if self.kind == PieceKind::O {
            return;
        }
        let mut rotated = [[false; 4]; 4];
        for (y, row) in self.mask.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                rotated[x][3 - y] = cell;
            }
        }
        self.mask = rotated;
    }

    /// Returns the mask offsets `(dx, dy)` of the occupied cells, row by row.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        mask_offsets(&self.mask)
    }

    /// Returns the absolute field coordinates of the occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> PieceCells {
        self.occupied_offsets()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn mask_offsets(mask: &PieceMask) -> impl Iterator<Item = (i32, i32)> + '_ {
    mask.iter().enumerate().flat_map(|(dy, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(move |(dx, _)| (dx as i32, dy as i32))
    })
}

/// Identity of a piece.
///
/// Locked cells on the field remember the identity of the piece they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All piece kinds, in discriminant order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the spawn orientation mask of this kind.
    #[must_use]
    pub const fn canonical_mask(self) -> PieceMask {
        CANONICAL_MASKS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Display color associated with this kind.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0x00, 0xff, 0xff),
            PieceKind::O => Rgb::new(0xff, 0xff, 0x00),
            PieceKind::T => Rgb::new(0x80, 0x00, 0x80),
            PieceKind::S => Rgb::new(0x00, 0x80, 0x00),
            PieceKind::Z => Rgb::new(0xff, 0x00, 0x00),
            PieceKind::J => Rgb::new(0x00, 0x00, 0xff),
            PieceKind::L => Rgb::new(0xff, 0xa5, 0x00),
        }
    }
}

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const CANONICAL_MASKS: [PieceMask; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-piece
        [EEEE, [C, C, C, C], EEEE, EEEE],
        // O-piece
        [EEEE, [E, C, C, E], [E, C, C, E], EEEE],
        // T-piece
        [EEEE, [E, C, C, C], [E, E, C, E], EEEE],
        // S-piece
        [EEEE, [E, E, C, C], [E, C, C, E], EEEE],
        // Z-piece
        [EEEE, [E, C, C, E], [E, E, C, C], EEEE],
        // J-piece
        [EEEE, [E, C, C, C], [E, E, E, C], EEEE],
        // L-piece
        [EEEE, [E, C, C, C], [E, C, E, E], EEEE],
    ]
};
