use std::time::Duration;

use crate::{
    Board, FullRows, NextPiece, Piece,
    engine::{
        piece_generator::{PieceGenerator, PieceSeed},
        scoring::GameStats,
    },
};

/// Offsets tried, in order, when a rotated piece collides.
///
/// A simplified wall kick: sideways by one and two cells, then one cell up.
const ROTATION_KICKS: [(i32, i32); 6] = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0), (0, -1)];

/// Outcome of a clearing lock, applied once the row-flash delay is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClear {
    post_grid: Board,
    lines: usize,
    next_spawn: Piece,
    next_next: NextPiece,
    stats: GameStats,
    game_over_after_spawn: bool,
}

impl PendingClear {
    /// Board after the full rows are removed.
    #[must_use]
    pub fn post_grid(&self) -> &Board {
        &self.post_grid
    }

    /// Number of rows the clear removes.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Piece that becomes current on commit.
    #[must_use]
    pub fn next_spawn(&self) -> &Piece {
        &self.next_spawn
    }

    /// Piece that becomes the queued piece on commit.
    #[must_use]
    pub fn next_next(&self) -> &NextPiece {
        &self.next_next
    }

    /// Score, level, and counters after the clear pays out.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Whether the spawned piece overlaps the post-clear board.
    #[must_use]
    pub fn game_over_after_spawn(&self) -> bool {
        self.game_over_after_spawn
    }
}

/// Phase of play.
///
/// Pause is not a phase: it is an input/timing concern owned by the controller and
/// never changes the game state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    /// Normal play.
    Active,
    /// Completed rows are flashing. The board still shows them, and movement,
    /// rotation, and gravity are suspended until [`GameState::commit_clear`].
    Animating {
        clearing_rows: FullRows,
        pending: Box<PendingClear>,
    },
    /// Terminal; only a restart leaves it.
    GameOver,
}

/// The single authoritative game aggregate.
///
/// Every transition takes `&self` and returns a new state, so consumers can hold on
/// to a state while the next one is being computed. Rejected intents return an
/// unchanged copy.
///
/// The random piece stream is part of the state, which keeps transitions pure: the
/// same state and the same sequence of transitions always produce the same result.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameState, PieceSeed};
///
/// let state = GameState::with_seed(PieceSeed::from_u128(1));
/// let queued = *state.next_piece();
///
/// let state = state.hard_drop();
///
/// assert_eq!(state.current_piece().shape(), queued.shape());
/// assert_eq!(state.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    grid: Board,
    current_piece: Piece,
    next_piece: NextPiece,
    stats: GameStats,
    phase: Phase,
    generator: PieceGenerator,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Starts a game with a randomly seeded piece stream.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    /// Starts a game whose piece stream is seeded with `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    /// Starts a game on an empty board, drawing the first two pieces from `generator`.
    #[must_use]
    pub fn with_generator(mut generator: PieceGenerator) -> Self {
        let current_piece = generator.draw().spawn();
        let next_piece = generator.draw();
        Self::from_parts(Board::EMPTY, current_piece, next_piece, generator)
    }

    /// Builds an active state from explicit parts, with fresh statistics.
    ///
    /// Useful for puzzles, replays, and tests that need a specific board or piece.
    #[must_use]
    pub fn from_parts(
        grid: Board,
        current_piece: Piece,
        next_piece: NextPiece,
        generator: PieceGenerator,
    ) -> Self {
        Self {
            grid,
            current_piece,
            next_piece,
            stats: GameStats::new(),
            phase: Phase::Active,
            generator,
        }
    }

    /// Settled cells. While a clear is animating this still contains the full rows.
    #[must_use]
    pub fn grid(&self) -> &Board {
        &self.grid
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &NextPiece {
        &self.next_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    /// Seconds-per-row of normal gravity at the current level.
    #[must_use]
    pub fn fall_speed(&self) -> Duration {
        self.stats.fall_speed()
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn is_animating_clear(&self) -> bool {
        self.phase.is_animating()
    }

    /// Rows currently flashing; empty unless a clear is animating.
    #[must_use]
    pub fn clearing_rows(&self) -> &[usize] {
        match &self.phase {
            Phase::Animating { clearing_rows, .. } => clearing_rows.as_slice(),
            Phase::Active | Phase::GameOver => &[],
        }
    }

    #[must_use]
    pub fn pending_clear(&self) -> Option<&PendingClear> {
        match &self.phase {
            Phase::Animating { pending, .. } => Some(pending.as_ref()),
            Phase::Active | Phase::GameOver => None,
        }
    }

    fn with_current_piece(&self, current_piece: Piece) -> Self {
        Self {
            current_piece,
            ..self.clone()
        }
    }

    /// Shifts the current piece horizontally by `dx` if the target is free.
    #[must_use]
    pub fn move_by(&self, dx: i32) -> Self {
        if !self.phase.is_active() {
            return self.clone();
        }
        let moved = self.current_piece.moved(dx, 0);
        if self.grid.is_piece_colliding(&moved) {
            return self.clone();
        }
        self.with_current_piece(moved)
    }

    #[must_use]
    pub fn move_left(&self) -> Self {
        self.move_by(-1)
    }

    #[must_use]
    pub fn move_right(&self) -> Self {
        self.move_by(1)
    }

    /// Rotates the current piece clockwise, trying each kick offset in order.
    #[must_use]
    pub fn rotate(&self) -> Self {
        if !self.phase.is_active() {
            return self.clone();
        }
        let rotated = self
            .current_piece
            .with_shape(self.current_piece.shape().rotated_clockwise());
        ROTATION_KICKS
            .iter()
            .map(|&(dx, dy)| rotated.moved(dx, dy))
            .find(|piece| !self.grid.is_piece_colliding(piece))
            .map_or_else(|| self.clone(), |piece| self.with_current_piece(piece))
    }

    /// Moves the current piece down one row, or locks it if it cannot move.
    ///
    /// A piece blocked before it has fully entered the board (`y < 0`) ends the
    /// game without being merged.
    #[must_use]
    pub fn gravity_step(&self) -> Self {
        if !self.phase.is_active() {
            return self.clone();
        }
        let lowered = self.current_piece.moved(0, 1);
        if !self.grid.is_piece_colliding(&lowered) {
            return self.with_current_piece(lowered);
        }
        if self.current_piece.y() < 0 {
            return Self {
                phase: Phase::GameOver,
                ..self.clone()
            };
        }
        self.lock()
    }

    /// Drops the current piece as far as it goes and locks it there.
    #[must_use]
    pub fn hard_drop(&self) -> Self {
        if !self.phase.is_active() {
            return self.clone();
        }
        let mut landed = self.current_piece;
        while !self.grid.is_piece_colliding(&landed.moved(0, 1)) {
            landed = landed.moved(0, 1);
        }
        self.with_current_piece(landed).lock()
    }

    fn lock(&self) -> Self {
        let merged = self.grid.with_piece(&self.current_piece);
        let full_rows = merged.find_full_rows();
        let mut generator = self.generator.clone();
        let next_spawn = self.next_piece.spawn();
        let next_next = generator.draw();
        let locked_stats = self.stats.with_locked_piece();

        if full_rows.is_empty() {
            let phase = if merged.is_piece_colliding(&next_spawn) {
                Phase::GameOver
            } else {
                Phase::Active
            };
            return Self {
                grid: merged,
                current_piece: next_spawn,
                next_piece: next_next,
                stats: locked_stats.with_cleared_lines(0),
                phase,
                generator,
            };
        }

        let post_grid = merged.clear_rows(&full_rows);
        let game_over_after_spawn = post_grid.is_piece_colliding(&next_spawn);
        let pending = PendingClear {
            post_grid,
            lines: full_rows.len(),
            next_spawn,
            next_next,
            stats: locked_stats.with_cleared_lines(full_rows.len()),
            game_over_after_spawn,
        };
        Self {
            grid: merged,
            current_piece: self.current_piece,
            next_piece: self.next_piece,
            stats: locked_stats,
            phase: Phase::Animating {
                clearing_rows: full_rows,
                pending: Box::new(pending),
            },
            generator,
        }
    }

    /// Applies a pending clear: compacted board, new pieces, new score.
    ///
    /// Does nothing unless a clear is animating.
    #[must_use]
    pub fn commit_clear(&self) -> Self {
        let Some(pending) = self.pending_clear() else {
            return self.clone();
        };
        let pending = pending.clone();
        Self {
            grid: pending.post_grid,
            current_piece: pending.next_spawn,
            next_piece: pending.next_next,
            stats: pending.stats,
            phase: if pending.game_over_after_spawn {
                Phase::GameOver
            } else {
                Phase::Active
            },
            generator: self.generator.clone(),
        }
    }

    /// Starts over on an empty board with score 0 and level 1.
    ///
    /// The new pieces come from the same random stream, so seeded games stay
    /// reproducible across restarts.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::with_generator(self.generator.clone())
    }
}
