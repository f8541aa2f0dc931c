use std::time::Duration;

use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [u32; 5] = [0, 40, 100, 300, 1200];

/// Score needed to advance one level.
pub const LEVEL_SCORE_STEP: u32 = 1000;

const BASE_FALL_MILLIS: u64 = 800;
const FALL_STEP_MILLIS: u64 = 50;
const MIN_FALL_MILLIS: u64 = 50;

/// Returns the base points for clearing `lines` rows at once.
///
/// The result is multiplied by the level at the time of the clear. Line counts
/// above 4 cannot happen with the catalog's pieces; they trip a debug assertion and
/// score nothing.
///
/// # Examples
///
/// ```
/// use blockfall_engine::score_delta;
///
/// assert_eq!(score_delta(1), 40);
/// assert_eq!(score_delta(4), 1200);
/// ```
#[must_use]
pub fn score_delta(lines: usize) -> u32 {
    debug_assert!(
        lines < SCORE_TABLE.len(),
        "{lines} rows cleared at once, the catalog allows at most 4"
    );
    SCORE_TABLE.get(lines).copied().unwrap_or(0)
}

/// Level for a cumulative score: one level per 1000 points, starting at 1.
#[must_use]
pub const fn level_for_score(score: u32) -> u32 {
    score / LEVEL_SCORE_STEP + 1
}

/// Time for one row of normal-speed fall at `level`.
///
/// Starts at 800ms on level 1 and shrinks by 50ms per level down to a 50ms floor,
/// reached at level 16.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::fall_speed;
///
/// assert_eq!(fall_speed(1), Duration::from_millis(800));
/// assert_eq!(fall_speed(2), Duration::from_millis(750));
/// assert_eq!(fall_speed(40), Duration::from_millis(50));
/// ```
#[must_use]
pub fn fall_speed(level: u32) -> Duration {
    let steps = u64::from(level.saturating_sub(1));
    let millis = BASE_FALL_MILLIS
        .saturating_sub(steps * FALL_STEP_MILLIS)
        .max(MIN_FALL_MILLIS);
    Duration::from_millis(millis)
}

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// Level is always derived from score, and fall speed from level. Locks and clears
/// are recorded separately because a clearing lock only pays out once its row-flash
/// delay has elapsed.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let stats = GameStats::new().with_locked_piece().with_cleared_lines(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u32,
    level: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker: score 0, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn fall_speed(&self) -> Duration {
        fall_speed(self.level)
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by number of rows cleared.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of locks with 0 lines cleared
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of quads (4 lines)
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Counts one more locked piece.
    #[must_use]
    pub const fn with_locked_piece(self) -> Self {
        Self {
            completed_pieces: self.completed_pieces + 1,
            ..self
        }
    }

    /// Applies the outcome of a lock that cleared `lines` rows.
    ///
    /// Points are scaled by the level before the update; the new level is then
    /// derived from the new score.
    #[must_use]
    pub fn with_cleared_lines(self, lines: usize) -> Self {
        let score = self
            .score
            .saturating_add(score_delta(lines).saturating_mul(self.level));
        let mut line_cleared_counter = self.line_cleared_counter;
        if let Some(count) = line_cleared_counter.get_mut(lines) {
            *count += 1;
        }
        Self {
            score,
            level: level_for_score(score),
            completed_pieces: self.completed_pieces,
            total_cleared_lines: self.total_cleared_lines + lines,
            line_cleared_counter,
        }
    }
}
