use serde::Serialize;

use crate::{Board, FullRows, NextPiece, Piece, engine::game_state::GameState};

/// Read-only view of one frame, handed to renderers.
///
/// Snapshots compare by value; a renderer can skip a frame whose snapshot equals
/// the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    grid: Board,
    current_piece: Option<Piece>,
    next_piece: NextPiece,
    clearing_rows: FullRows,
    score: u32,
    level: u32,
    game_over: bool,
    paused: bool,
}

impl GameSnapshot {
    /// Captures `state` together with the controller's pause flag.
    #[must_use]
    pub fn new(state: &GameState, paused: bool) -> Self {
        let clearing_rows = state.clearing_rows().iter().copied().collect();
        Self {
            grid: state.grid().clone(),
            current_piece: (!state.is_animating_clear()).then(|| *state.current_piece()),
            next_piece: *state.next_piece(),
            clearing_rows,
            score: state.score(),
            level: state.level(),
            game_over: state.is_game_over(),
            paused,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Board {
        &self.grid
    }

    /// The falling piece, or `None` while completed rows are flashing.
    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> &NextPiece {
        &self.next_piece
    }

    #[must_use]
    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the board as it should be drawn: settled cells plus the falling
    /// piece.
    ///
    /// Piece cells above the board are left out.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{GameSnapshot, GameState, PieceSeed};
    ///
    /// let state = GameState::with_seed(PieceSeed::from_u128(2))
    ///     .gravity_step()
    ///     .gravity_step();
    /// let snapshot = GameSnapshot::new(&state, false);
    ///
    /// // After two steps the piece's top row is at row 0.
    /// assert!(snapshot.visible_board().rows().next().unwrap().iter().any(|b| !b.is_empty()));
    /// assert!(snapshot.grid().rows().flatten().all(|b| b.is_empty()));
    /// ```
    #[must_use]
    pub fn visible_board(&self) -> Board {
        match &self.current_piece {
            Some(piece) => self.grid.with_piece(piece),
            None => self.grid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        BOARD_HEIGHT, BOARD_WIDTH, Block, PieceColor, PieceGenerator, PieceKind, PieceSeed,
    };

    use super::*;

    fn clearing_state() -> GameState {
        let mut board = Board::EMPTY;
        for x in (0..BOARD_WIDTH).filter(|x| !(2..6).contains(x)) {
            board = board.with_cell(BOARD_HEIGHT - 1, x, Block::Filled(PieceColor::Red));
        }
        let piece = Piece::new(PieceKind::I.shape(), PieceColor::Cyan, 2, 19);
        GameState::from_parts(
            board,
            piece,
            NextPiece::from(PieceKind::O),
            PieceGenerator::with_seed(PieceSeed::from_u128(1)),
        )
        .gravity_step()
    }

    #[test]
    fn test_snapshot_of_active_state() {
        let state = GameState::with_seed(PieceSeed::from_u128(4));
        let snapshot = GameSnapshot::new(&state, true);
        assert_eq!(snapshot.current_piece(), Some(state.current_piece()));
        assert_eq!(snapshot.next_piece(), state.next_piece());
        assert_eq!(snapshot.score(), 0);
        assert_eq!(snapshot.level(), 1);
        assert!(snapshot.is_paused());
        assert!(!snapshot.is_game_over());
        assert!(snapshot.clearing_rows().is_empty());
    }

    #[test]
    fn test_snapshot_hides_piece_while_animating() {
        let state = clearing_state();
        let snapshot = GameSnapshot::new(&state, false);
        assert_eq!(snapshot.current_piece(), None);
        assert_eq!(snapshot.clearing_rows(), &[19]);
        assert!(snapshot.grid().is_row_full(19));
        assert_eq!(snapshot.visible_board(), *snapshot.grid());
    }

    #[test]
    fn test_visible_board_paints_piece() {
        let piece = Piece::new(PieceKind::O.shape(), PieceColor::Yellow, 0, -1);
        let state = GameState::from_parts(
            Board::EMPTY,
            piece,
            NextPiece::from(PieceKind::T),
            PieceGenerator::with_seed(PieceSeed::from_u128(1)),
        );
        let board = GameSnapshot::new(&state, false).visible_board();
        assert_eq!(board.cell(0, 0), Block::Filled(PieceColor::Yellow));
        assert_eq!(board.cell(0, 1), Block::Filled(PieceColor::Yellow));
        assert_eq!(board.rows().flatten().filter(|b| !b.is_empty()).count(), 2);
    }

    #[test]
    fn test_snapshot_equality_by_value() {
        let state = GameState::with_seed(PieceSeed::from_u128(8));
        assert_eq!(
            GameSnapshot::new(&state, false),
            GameSnapshot::new(&state.clone(), false)
        );
        assert_ne!(GameSnapshot::new(&state, false), GameSnapshot::new(&state, true));
        assert_ne!(
            GameSnapshot::new(&state, false),
            GameSnapshot::new(&state.move_left(), false)
        );
    }

    #[test]
    fn test_snapshot_json() {
        let json = serde_json::to_value(GameSnapshot::new(&clearing_state(), false)).unwrap();
        assert_eq!(json["clearing_rows"], serde_json::json!([19]));
        assert_eq!(json["current_piece"], serde_json::Value::Null);
        assert_eq!(json["grid"][19], "rrccccrrrr");
        assert_eq!(json["game_over"], false);
    }
}
