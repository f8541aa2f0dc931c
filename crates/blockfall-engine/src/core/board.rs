use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BoardParseError;

use super::{
    BOARD_HEIGHT, BOARD_HEIGHT_I32, BOARD_WIDTH, BOARD_WIDTH_I32,
    piece::{Piece, PieceColor},
    shape::Shape,
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Settled block left behind by a locked piece.
    Filled(PieceColor),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn color(self) -> Option<PieceColor> {
        match self {
            Block::Empty => None,
            Block::Filled(color) => Some(color),
        }
    }

    const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Filled(color) => color.as_char(),
        }
    }

    const fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Block::Empty);
        }
        match PieceColor::from_char(c) {
            Some(color) => Some(Block::Filled(color)),
            None => None,
        }
    }
}

/// Indices of completely filled rows, in ascending order.
pub type FullRows = ArrayVec<usize, BOARD_HEIGHT>;

type Row = [Block; BOARD_WIDTH];

/// The settled content of the playfield.
///
/// A fixed 10×20 grid; row 0 is the top. The active piece is never part of the
/// board until it locks. All operations that change content return a new board.
///
/// # Text form
///
/// Boards serialize as 20 strings of 10 characters: `.` for an empty cell and the
/// color character ([`PieceColor::as_char`]) for a filled one.
///
/// ```
/// use blockfall_engine::Board;
///
/// let mut rows = vec![".........."; 19];
/// rows.push("rrrr.rrrrr");
/// let board = Board::from_text_rows(&rows).unwrap();
///
/// assert!(board.find_full_rows().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.to_text_rows())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_text_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [[Block::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
    };

    /// Parses a board from its text form (see the type-level docs).
    pub fn from_text_rows<S>(rows: &[S]) -> Result<Self, BoardParseError>
    where
        S: AsRef<str>,
    {
        if rows.len() != BOARD_HEIGHT {
            return Err(BoardParseError::RowCount {
                expected: BOARD_HEIGHT,
                actual: rows.len(),
            });
        }

        let mut board = Self::EMPTY;
        for (y, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            let width = text.chars().count();
            if width != BOARD_WIDTH {
                return Err(BoardParseError::RowWidth {
                    row: y,
                    expected: BOARD_WIDTH,
                    actual: width,
                });
            }
            for (x, ch) in text.chars().enumerate() {
                board.rows[y][x] = Block::from_char(ch).ok_or(BoardParseError::InvalidCell {
                    row: y,
                    col: x,
                    ch,
                })?;
            }
        }
        Ok(board)
    }

    #[must_use]
    pub fn to_text_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|b| b.as_char()).collect())
            .collect()
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the board.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Block {
        self.rows[row][col]
    }

    /// Returns a copy of the board with the cell at `(row, col)` replaced.
    #[must_use]
    pub fn with_cell(&self, row: usize, col: usize, block: Block) -> Self {
        let mut board = self.clone();
        board.rows[row][col] = block;
        board
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block; BOARD_WIDTH]> {
        self.rows.iter()
    }

    fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows[row].iter().all(|b| !b.is_empty())
    }

    /// Tests whether `shape` anchored at `(x, y)` overlaps walls, the floor, or
    /// settled blocks.
    ///
    /// Cells above the board (`y < 0`) never hit settled blocks but still count for
    /// the side walls.
    #[must_use]
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.occupied_offsets().any(|(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            if !(0..BOARD_WIDTH_I32).contains(&cx) || cy >= BOARD_HEIGHT_I32 {
                return true;
            }
            self.block_at(cx, cy).is_some_and(|b| !b.is_empty())
        })
    }

    #[must_use]
    pub fn is_piece_colliding(&self, piece: &Piece) -> bool {
        self.collides(piece.shape(), piece.x(), piece.y())
    }

    /// Returns the board with `piece` merged in as settled blocks of its color.
    ///
    /// Cells of the piece that lie above the board are dropped.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        let block = Block::Filled(piece.color());
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = board.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = block;
            }
        }
        board
    }

    /// Returns the indices of all completely filled rows, top to bottom.
    #[must_use]
    pub fn find_full_rows(&self) -> FullRows {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Removes the given rows and pads the top with empty rows.
    ///
    /// Every remaining row falls by the number of removed rows below it. Duplicate
    /// indices are treated as one.
    ///
    /// # Panics
    ///
    /// Panics if an index is outside the board.
    #[must_use]
    pub fn clear_rows(&self, rows: &[usize]) -> Self {
        let mut removed = [false; BOARD_HEIGHT];
        for &y in rows {
            assert!(y < BOARD_HEIGHT, "row index {y} out of range");
            removed[y] = true;
        }

        let mut board = Self::EMPTY;
        let mut dst = BOARD_HEIGHT;
        for src in (0..BOARD_HEIGHT).rev().filter(|&y| !removed[y]) {
            dst -= 1;
            board.rows[dst] = self.rows[src];
        }
        board
    }
}
