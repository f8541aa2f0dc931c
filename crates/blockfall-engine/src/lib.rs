//! Rules engine for a single-player falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - pure data and geometry: shapes, the piece catalog, the board grid,
//!   collision testing, and row clearing
//! - [`engine`] - the game itself: the immutable [`GameState`] state machine,
//!   scoring/leveling, the piece source, and the [`GameController`] timing driver
//!
//! Rendering and input capture live outside this crate. A presentation layer reads
//! [`GameSnapshot`]s and feeds intents (move, rotate, drops, pause, restart) into the
//! controller.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameState, PieceSeed};
//!
//! let state = GameState::with_seed(PieceSeed::from_u128(7));
//! let state = state.move_left().rotate().hard_drop();
//!
//! assert_eq!(state.stats().completed_pieces(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a shape matrix cannot be built from the given rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape has no rows")]
    NoRows,
    #[display("shape has no columns")]
    NoColumns,
    #[display("shape is {height}x{width}, larger than 4x4")]
    TooLarge { height: usize, width: usize },
    #[display("shape row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("shape cell ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
}

/// Error returned when a board cannot be parsed from its text rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[display("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid cell {ch:?} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, ch: char },
}
