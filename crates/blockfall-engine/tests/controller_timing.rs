//! Real-time behavior of the controller, driven by a manual clock.

use std::time::Duration;

use blockfall_engine::{
    BOARD_HEIGHT, Board, Clock as _, GameConfig, GameController, GameEvent, GameState, ManualClock,
    NextPiece, Piece, PieceColor, PieceGenerator, PieceKind, PieceSeed,
};

const FALL: Duration = Duration::from_millis(800);
const CLEAR_DELAY: Duration = Duration::from_millis(260);
const MS: Duration = Duration::from_millis(1);

fn started(state: GameState) -> (GameController<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut controller =
        GameController::with_state(GameConfig::default(), clock.clone(), state).unwrap();
    controller.start();
    (controller, clock)
}

fn fresh() -> GameState {
    GameState::with_seed(PieceSeed::from_u128(0xDEAD_BEEF))
}

/// An I piece resting in the only gap of the bottom row; a hard drop clears it.
fn about_to_clear() -> GameState {
    let mut rows = vec![".........."; BOARD_HEIGHT];
    rows[19] = "rr....rrrr";
    GameState::from_parts(
        Board::from_text_rows(&rows).unwrap(),
        Piece::new(PieceKind::I.shape(), PieceColor::Cyan, 2, 19),
        NextPiece::from(PieceKind::O),
        PieceGenerator::with_seed(PieceSeed::from_u128(3)),
    )
}

fn y(controller: &GameController<ManualClock>) -> i32 {
    controller.state().current_piece().y()
}

#[test]
fn gravity_follows_fall_speed() {
    let (mut controller, clock) = started(fresh());
    assert_eq!(y(&controller), -2);

    clock.advance(FALL - MS);
    assert!(controller.on_frame().is_empty());
    assert_eq!(y(&controller), -2);

    clock.advance(MS);
    controller.on_frame();
    assert_eq!(y(&controller), -1);

    // The reference time moved with the step.
    clock.advance(FALL - MS);
    controller.on_frame();
    assert_eq!(y(&controller), -1);
    clock.advance(MS);
    controller.on_frame();
    assert_eq!(y(&controller), 0);
}

#[test]
fn one_step_per_frame_even_when_late() {
    let (mut controller, clock) = started(fresh());
    clock.advance(FALL * 5);
    controller.on_frame();
    assert_eq!(y(&controller), -1);
}

#[test]
fn soft_drop_shortens_the_interval() {
    let (mut controller, clock) = started(fresh());
    controller.soft_drop_hold(true);
    assert!(controller.gravity_interval() < Duration::from_millis(65));

    clock.advance(Duration::from_millis(60));
    controller.on_frame();
    assert_eq!(y(&controller), -2);

    clock.advance(Duration::from_millis(5));
    controller.on_frame();
    assert_eq!(y(&controller), -1);

    controller.soft_drop_hold(false);
    assert_eq!(controller.gravity_interval(), FALL);
}

#[test]
fn soft_drop_stays_held_through_a_clear() {
    let (mut controller, clock) = started(about_to_clear());
    controller.soft_drop_hold(true);

    // The resting I piece locks on the first soft-drop step.
    clock.advance(Duration::from_millis(65));
    controller.on_frame();
    assert!(controller.state().is_animating_clear());
    assert!(controller.is_soft_dropping());

    clock.advance(CLEAR_DELAY);
    controller.on_frame();
    assert!(controller.state().phase().is_active());
    assert!(controller.is_soft_dropping());
    assert!(controller.gravity_interval() < Duration::from_millis(65));

    // The spawned piece falls at the soft-drop cadence.
    clock.advance(Duration::from_millis(65));
    controller.on_frame();
    assert_eq!(y(&controller), -1);
}

#[test]
fn pause_suspends_gravity_and_intents() {
    let (mut controller, clock) = started(fresh());
    controller.toggle_pause();

    clock.advance(FALL * 5);
    assert!(controller.on_frame().is_empty());
    assert!(controller.move_left().is_empty());
    assert_eq!(y(&controller), -2);
    assert_eq!(controller.next_deadline(), None);

    // Resuming after a long pause catches up with a single step.
    controller.toggle_pause();
    controller.on_frame();
    assert_eq!(y(&controller), -1);
}

#[test]
fn clear_commits_after_the_delay() {
    let (mut controller, clock) = started(about_to_clear());
    controller.hard_drop();
    assert!(controller.state().is_animating_clear());
    assert_eq!(controller.snapshot().current_piece(), None);

    clock.advance(CLEAR_DELAY - MS);
    assert!(controller.on_frame().is_empty());
    assert!(controller.state().is_animating_clear());
    // Intents are rejected while the rows flash.
    let before = controller.state().clone();
    controller.move_left();
    controller.rotate();
    assert_eq!(controller.state(), &before);

    clock.advance(MS);
    let events = controller.on_frame();
    assert_eq!(
        events.as_slice(),
        &[GameEvent::LineClearCommitted {
            lines: 1,
            score: 40,
            level: 1,
        }]
    );
    assert!(controller.state().phase().is_active());
    assert_eq!(controller.state().grid(), &Board::EMPTY);
    assert_eq!(y(&controller), -2);
}

#[test]
fn spawned_piece_gets_a_full_interval_after_commit() {
    let (mut controller, clock) = started(about_to_clear());
    controller.hard_drop();
    clock.advance(CLEAR_DELAY);
    controller.on_frame();

    clock.advance(FALL - MS);
    controller.on_frame();
    assert_eq!(y(&controller), -2);
    clock.advance(MS);
    controller.on_frame();
    assert_eq!(y(&controller), -1);
}

#[test]
fn clear_timer_keeps_running_while_paused() {
    let (mut controller, clock) = started(about_to_clear());
    controller.hard_drop();
    controller.toggle_pause();

    clock.advance(CLEAR_DELAY);
    let events = controller.on_frame();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_line_clear_committed());
    assert!(controller.snapshot().is_paused());
}

#[test]
fn restart_cancels_a_pending_commit() {
    let (mut controller, clock) = started(about_to_clear());
    controller.hard_drop();
    controller.restart();

    clock.advance(CLEAR_DELAY * 2);
    assert!(controller.on_frame().is_empty());
    assert!(controller.state().phase().is_active());
    assert_eq!(controller.state().score(), 0);
    assert_eq!(controller.state().grid(), &Board::EMPTY);
}

#[test]
fn stop_cancels_everything_and_start_rearms() {
    let (mut controller, clock) = started(about_to_clear());
    controller.hard_drop();
    controller.stop();

    clock.advance(FALL * 2);
    assert!(controller.on_frame().is_empty());
    assert!(controller.state().is_animating_clear());
    assert_eq!(controller.next_deadline(), None);

    controller.start();
    assert_eq!(controller.next_deadline(), Some(clock.now() + CLEAR_DELAY));
    clock.advance(CLEAR_DELAY);
    controller.on_frame();
    assert!(controller.state().phase().is_active());
}

#[test]
fn next_deadline_tracks_the_earliest_timer() {
    let (mut controller, clock) = started(about_to_clear());
    let start = clock.now();
    assert_eq!(controller.next_deadline(), Some(start + FALL));

    clock.advance(Duration::from_millis(100));
    controller.hard_drop();
    // Gravity is suspended while animating; only the commit is scheduled.
    assert_eq!(
        controller.next_deadline(),
        Some(start + Duration::from_millis(100) + CLEAR_DELAY)
    );

    controller.toggle_pause();
    assert_eq!(
        controller.next_deadline(),
        Some(start + Duration::from_millis(100) + CLEAR_DELAY)
    );
}

#[test]
fn game_over_stops_the_clock_work() {
    let mut rows = vec![".........."; BOARD_HEIGHT];
    rows[1] = "...ppp....";
    let state = GameState::from_parts(
        Board::from_text_rows(&rows).unwrap(),
        Piece::new(PieceKind::T.shape(), PieceColor::Purple, 3, -1),
        NextPiece::from(PieceKind::I),
        PieceGenerator::with_seed(PieceSeed::from_u128(3)),
    );
    let (mut controller, clock) = started(state);

    clock.advance(FALL);
    assert_eq!(controller.on_frame().as_slice(), &[GameEvent::GameOver]);
    assert!(controller.snapshot().is_game_over());
    assert_eq!(controller.next_deadline(), None);

    clock.advance(FALL * 3);
    assert!(controller.on_frame().is_empty());

    let events = controller.restart();
    assert_eq!(events.as_slice(), &[GameEvent::Restarted]);
    assert!(!controller.snapshot().is_game_over());
    assert_eq!(controller.next_deadline(), Some(clock.now() + FALL));
}
