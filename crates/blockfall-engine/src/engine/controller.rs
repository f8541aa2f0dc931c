use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::{
    FullRows,
    engine::{
        clock::{Clock, SystemClock},
        config::{ConfigError, GameConfig},
        game_state::GameState,
        snapshot::GameSnapshot,
    },
};

/// Something noteworthy that happened while handling a frame or an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum GameEvent {
    /// The falling piece was merged into the board.
    PieceLocked { cleared_rows: usize },
    /// Completed rows started flashing.
    LineClearStarted { rows: FullRows },
    /// Flashing rows were removed and their points paid out.
    LineClearCommitted { lines: usize, score: u32, level: u32 },
    GameOver,
    Restarted,
}

/// Events produced by one controller call.
///
/// A single frame yields at most a clear commit followed by a lock and its
/// outcome, so the capacity is never exceeded.
pub type GameEvents = ArrayVec<GameEvent, 4>;

/// Drives a [`GameState`] in real time.
///
/// The controller owns the two timers of a running game: the gravity cadence and
/// the one-shot clear commit. The host calls [`on_frame`](Self::on_frame) from its
/// frame loop (or sleeps until [`next_deadline`](Self::next_deadline)) and forwards
/// player intents. Stopping the controller cancels both timers, so nothing fires
/// against a game that has been torn down.
///
/// Pause is held here rather than in the state: while paused, gravity and
/// movement stop, but a clear that is already flashing still commits on time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::{GameConfig, GameController, ManualClock, PieceSeed};
///
/// let config = GameConfig {
///     seed: Some(PieceSeed::from_u128(42)),
///     ..GameConfig::default()
/// };
/// let clock = ManualClock::new();
/// let mut controller = GameController::with_clock(config, clock.clone()).unwrap();
/// controller.start();
///
/// let y = controller.state().current_piece().y();
/// clock.advance(Duration::from_millis(800));
/// controller.on_frame();
///
/// assert_eq!(controller.state().current_piece().y(), y + 1);
/// ```
#[derive(Debug)]
pub struct GameController<C = SystemClock> {
    config: GameConfig,
    clock: C,
    state: GameState,
    paused: bool,
    soft_drop: bool,
    running: bool,
    last_fall: Instant,
    clear_deadline: Option<Instant>,
}

impl GameController {
    /// Creates a stopped controller driven by the wall clock.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C> GameController<C>
where
    C: Clock,
{
    /// Creates a stopped controller with a fresh game.
    ///
    /// The piece stream is seeded from `config.seed` when present.
    pub fn with_clock(config: GameConfig, clock: C) -> Result<Self, ConfigError> {
        let state = config.seed.map_or_else(GameState::new, GameState::with_seed);
        Self::with_state(config, clock, state)
    }

    /// Creates a stopped controller that resumes `state`.
    pub fn with_state(
        config: GameConfig,
        clock: C,
        state: GameState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let last_fall = clock.now();
        Ok(Self {
            config,
            clock,
            state,
            paused: false,
            soft_drop: false,
            running: false,
            last_fall,
            clear_deadline: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(&self.state, self.paused)
    }

    /// Time between two gravity steps at the current level and soft-drop setting.
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        let fall_speed = self.state.fall_speed();
        if self.soft_drop {
            self.config.soft_drop_interval(fall_speed)
        } else {
            fall_speed
        }
    }

    /// Starts the gravity cadence.
    ///
    /// A state that is already flashing a clear gets a fresh commit timer.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        let now = self.clock.now();
        self.last_fall = now;
        if self.state.is_animating_clear() {
            self.clear_deadline = Some(now + self.config.clear_delay);
        }
    }

    /// Stops the gravity cadence and cancels a pending clear commit.
    pub fn stop(&mut self) {
        self.running = false;
        self.soft_drop = false;
        self.clear_deadline = None;
    }

    /// Runs whatever is due at the current time.
    ///
    /// A due clear commit runs first and restarts the gravity reference, so the
    /// spawned piece gets a full interval.
    pub fn on_frame(&mut self) -> GameEvents {
        let mut events = GameEvents::new();
        if !self.running {
            return events;
        }
        let now = self.clock.now();

        if self.clear_deadline.is_some_and(|deadline| now >= deadline) {
            self.clear_deadline = None;
            let next = self.state.commit_clear();
            self.apply(next, &mut events);
            self.last_fall = now;
        }

        if !self.paused
            && self.state.phase().is_active()
            && now.duration_since(self.last_fall) >= self.gravity_interval()
        {
            let next = self.state.gravity_step();
            self.last_fall = now;
            self.apply(next, &mut events);
        }
        events
    }

    /// Returns the earliest instant at which [`on_frame`](Self::on_frame) has work
    /// to do, or `None` if nothing is scheduled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.running {
            return None;
        }
        let gravity = (!self.paused && self.state.phase().is_active())
            .then(|| self.last_fall + self.gravity_interval());
        [gravity, self.clear_deadline].into_iter().flatten().min()
    }

    pub fn move_left(&mut self) -> GameEvents {
        self.intent(GameState::move_left)
    }

    pub fn move_right(&mut self) -> GameEvents {
        self.intent(GameState::move_right)
    }

    pub fn rotate(&mut self) -> GameEvents {
        self.intent(GameState::rotate)
    }

    /// Drops and locks the falling piece; the next piece gets a full gravity
    /// interval.
    pub fn hard_drop(&mut self) -> GameEvents {
        let events = self.intent(GameState::hard_drop);
        if self.running && !self.paused {
            self.last_fall = self.clock.now();
        }
        events
    }

    /// Presses or releases soft drop.
    ///
    /// Holding only shortens the gravity interval; it never moves the piece by
    /// itself. A press is ignored while paused or when no piece is falling; a
    /// release is always accepted. A held press survives line clears and is
    /// only dropped by a release, [`stop`](Self::stop), or
    /// [`restart`](Self::restart).
    pub fn soft_drop_hold(&mut self, held: bool) {
        if held && (!self.running || self.paused || !self.state.phase().is_active()) {
            return;
        }
        self.soft_drop = held;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Replaces the game with a fresh one.
    ///
    /// Cancels a pending clear commit and clears the pause and soft-drop flags.
    pub fn restart(&mut self) -> GameEvents {
        self.clear_deadline = None;
        self.paused = false;
        self.soft_drop = false;
        self.last_fall = self.clock.now();
        self.state = self.state.restart();

        let mut events = GameEvents::new();
        events.push(GameEvent::Restarted);
        events
    }

    fn intent(&mut self, transition: impl FnOnce(&GameState) -> GameState) -> GameEvents {
        let mut events = GameEvents::new();
        if self.running && !self.paused {
            let next = transition(&self.state);
            self.apply(next, &mut events);
        }
        events
    }

    fn apply(&mut self, next: GameState, events: &mut GameEvents) {
        let prev = std::mem::replace(&mut self.state, next);
        let next = &self.state;

        if next.stats().completed_pieces() > prev.stats().completed_pieces() {
            events.push(GameEvent::PieceLocked {
                cleared_rows: next.clearing_rows().len(),
            });
        }
        if let Some(pending) = prev.pending_clear()
            && !next.is_animating_clear()
        {
            events.push(GameEvent::LineClearCommitted {
                lines: pending.lines(),
                score: next.score(),
                level: next.level(),
            });
        }
        if !prev.is_animating_clear() && next.is_animating_clear() {
            events.push(GameEvent::LineClearStarted {
                rows: next.clearing_rows().iter().copied().collect(),
            });
            self.clear_deadline = Some(self.clock.now() + self.config.clear_delay);
        }
        if !prev.is_game_over() && next.is_game_over() {
            events.push(GameEvent::GameOver);
        }

        if !self.state.is_animating_clear() {
            self.clear_deadline = None;
        }
    }
}
