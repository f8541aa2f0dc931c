//! Game rules and real-time driving.
//!
//! - [`GameState`] - immutable game aggregate; every transition returns a new state
//! - [`GameStats`] - score, level, and lock/clear counters
//! - [`PieceGenerator`] - seeded uniform piece source
//! - [`GameController`] - owns the gravity cadence, the clear-commit timer, and
//!   the pause/soft-drop input state
//! - [`GameSnapshot`] - per-frame read-only view for renderers
//!
//! # Game Flow
//!
//! 1. The falling piece moves, rotates, and falls one row per gravity interval
//! 2. A piece that cannot fall further locks into the board
//! 3. If the lock completed rows, they flash for [`GameConfig::clear_delay`]
//!    before being removed and scored
//! 4. The queued piece spawns above the board and a new one is drawn
//! 5. Repeat until a piece is blocked before fully entering the board

pub use self::{
    clock::*, config::*, controller::*, game_state::*, piece_generator::*, scoring::*,
    snapshot::*,
};

mod clock;
mod config;
mod controller;
mod game_state;
mod piece_generator;
mod scoring;
mod snapshot;
