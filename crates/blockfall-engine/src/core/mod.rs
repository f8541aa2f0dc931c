pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board. Row 0 is the top.
pub const BOARD_HEIGHT: usize = 20;

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) const BOARD_WIDTH_I32: i32 = BOARD_WIDTH as i32;
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) const BOARD_HEIGHT_I32: i32 = BOARD_HEIGHT as i32;
