/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use log::{debug, info};

use crate::{
    attacked_squares, in_check, legal_moves, perft, targets_of, Bitboard, ChessError, Color, Move,
    MoveList, Piece, PieceKind, Position, Result, Square,
};

/// Lifecycle of a [`Game`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum GameState {
    /// Created, but [`Game::start`] has not been called.
    #[default]
    NotStarted,

    /// Moves may be applied.
    InProgress,

    /// The side to move has no legal moves.
    Over,
}

/// How a finished [`Game`] ended.
///
/// The draw variants are part of the vocabulary, but [`Game::final_status`] only ever
/// reports checkmate or stalemate.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GameResult {
    CheckmateByWhite,
    CheckmateByBlack,
    Stalemate,
    DrawByInsufficientMaterial,
    DrawByRepetition,
    DrawByFiftyMoves,
}

impl GameResult {
    /// The checkmate result in which `winner` delivered mate.
    #[inline(always)]
    pub const fn checkmate_by(winner: Color) -> Self {
        match winner {
            Color::White => Self::CheckmateByWhite,
            Color::Black => Self::CheckmateByBlack,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CheckmateByWhite => "checkmate, white wins",
            Self::CheckmateByBlack => "checkmate, black wins",
            Self::Stalemate => "stalemate",
            Self::DrawByInsufficientMaterial => "draw by insufficient material",
            Self::DrawByRepetition => "draw by repetition",
            Self::DrawByFiftyMoves => "draw by the fifty-move rule",
        };
        write!(f, "{text}")
    }
}

/// Something that happened to a [`Game`], sent to every registered [`GameListener`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GameEvent {
    /// [`Game::start`] succeeded.
    GameStarted,

    /// [`Game::apply_move`] committed this move.
    MoveApplied(Move),
}

/// Receives [`GameEvent`]s from a [`Game`].
///
/// Any `FnMut(GameEvent)` closure is a listener.
pub trait GameListener {
    fn on_event(&mut self, event: GameEvent);
}

impl<F: FnMut(GameEvent)> GameListener for F {
    #[inline(always)]
    fn on_event(&mut self, event: GameEvent) {
        self(event)
    }
}

/// A game of chess with its rules enforced.
///
/// A [`Game`] owns a single [`Position`], moves it forward only through legal moves, and
/// notices when the side to move has run out of them. Listeners are notified
/// synchronously, in the order they were registered, after each change has been committed.
///
/// # Example
/// ```
/// # use gambit::{Game, GameState, GameResult, Move};
/// let mut game = Game::default();
/// game.start().unwrap();
///
/// for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
///     let mv = Move::from_uci(game.position(), uci).unwrap();
///     game.apply_move(mv).unwrap();
/// }
///
/// assert_eq!(game.state(), GameState::Over);
/// assert_eq!(game.final_status().unwrap(), GameResult::CheckmateByBlack);
/// ```
pub struct Game {
    position: Position,
    state: GameState,
    listeners: Vec<Box<dyn GameListener>>,
}

impl Game {
    /// Creates a new, not yet started [`Game`] from `position`.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            state: GameState::NotStarted,
            listeners: Vec::new(),
        }
    }

    /// Creates a new, not yet started [`Game`] from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    #[inline(always)]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Moves the game from [`GameState::NotStarted`] to [`GameState::InProgress`].
    ///
    /// If the side to move already has no legal moves, the game goes straight to [`GameState::Over`].
    pub fn start(&mut self) -> Result<()> {
        if self.state != GameState::NotStarted {
            return Err(ChessError::invalid_state(format!(
                "cannot start a game that is {:?}",
                self.state
            )));
        }

        self.state = GameState::InProgress;
        debug!("game started from {}", self.position);
        self.update_state();

        self.notify(GameEvent::GameStarted);
        Ok(())
    }

    /// Applies a legal move for the side to move.
    ///
    /// Fails with [`ChessError::InvalidState`] unless the game is in progress, and with
    /// [`ChessError::IllegalMove`] if `mv` is not one of [`Game::legal_moves`] for the side to
    /// move. On failure nothing changes.
    ///
    /// Listeners are notified after the move is committed, so a panicking listener unwinds
    /// into the caller with the new position already in place.
    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        self.require(GameState::InProgress, "apply a move")?;

        let color = self.side_to_move();
        if !legal_moves(&self.position, color).contains(&mv) {
            return Err(ChessError::IllegalMove(mv));
        }

        self.position = self.position.with_move_made(mv)?;
        debug!("{} played {mv:?}, now at {}", color.name(), self.position);
        self.update_state();

        self.notify(GameEvent::MoveApplied(mv));
        Ok(())
    }

    /// Returns `true` if `mv` may be applied right now.
    ///
    /// Requires the game to be in progress and the source square of `mv` to hold a piece.
    pub fn can_make(&self, mv: Move) -> Result<bool> {
        self.require(GameState::InProgress, "check a move")?;

        if self.position.piece_at(mv.from()).is_none() {
            return Err(ChessError::invalid_argument(format!(
                "no piece on {} to move",
                mv.from()
            )));
        }

        Ok(legal_moves(&self.position, self.side_to_move()).contains(&mv))
    }

    /// Returns `true` if the side to move has no legal moves.
    ///
    /// Requires the game to have been started.
    pub fn is_over(&self) -> Result<bool> {
        if self.state == GameState::NotStarted {
            return Err(ChessError::invalid_state("the game has not started"));
        }

        Ok(legal_moves(&self.position, self.side_to_move()).is_empty())
    }

    /// Reports how the game ended: checkmate if the side to move is in check, stalemate otherwise.
    ///
    /// Requires the game to be over.
    pub fn final_status(&self) -> Result<GameResult> {
        self.require(GameState::Over, "report a result")?;

        let loser = self.side_to_move();
        if in_check(&self.position, loser) {
            Ok(GameResult::checkmate_by(loser.opponent()))
        } else {
            Ok(GameResult::Stalemate)
        }
    }

    /// Adds a listener that is notified of every subsequent [`GameEvent`].
    pub fn register_listener(&mut self, listener: Box<dyn GameListener>) {
        self.listeners.push(listener);
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// All legal moves for `color`, as if it were `color`'s turn.
    #[inline(always)]
    pub fn legal_moves(&self, color: Color) -> MoveList {
        legal_moves(&self.position, color)
    }

    /// All squares attacked by `color`.
    #[inline(always)]
    pub fn attacked_squares(&self, color: Color) -> Bitboard {
        attacked_squares(&self.position, color)
    }

    /// Legal destinations of the piece on `square`, or `None` if it is empty.
    #[inline(always)]
    pub fn targets_of(&self, square: Square) -> Option<Bitboard> {
        targets_of(&self.position, square)
    }

    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.position.king_square(color)
    }

    #[inline(always)]
    pub fn piece_kind_at(&self, square: Square) -> Option<PieceKind> {
        self.position.piece_at(square).map(|piece| piece.kind())
    }

    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.piece_at(square)
    }

    /// The castling rights still held, as a FEN castling field such as `KQkq` or `-`.
    #[inline(always)]
    pub fn castling_rights(&self) -> String {
        self.position.castling_rights().to_fen()
    }

    #[inline(always)]
    pub const fn en_passant_target(&self) -> Option<Square> {
        self.position.en_passant_target()
    }

    /// Borrows the current position.
    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// An independent copy of the current position. Changing it does not affect the game.
    #[inline(always)]
    pub const fn position_snapshot(&self) -> Position {
        self.position
    }

    #[inline(always)]
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Counts the leaf positions reachable from the current position. See [`perft`].
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        perft(&self.position, depth)
    }

    fn require(&self, state: GameState, action: &str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(ChessError::invalid_state(format!(
                "cannot {action} while the game is {:?}",
                self.state
            )))
        }
    }

    fn update_state(&mut self) {
        if legal_moves(&self.position, self.side_to_move()).is_empty() {
            self.state = GameState::Over;
            info!(
                "game over: {} has no legal moves in {}",
                self.side_to_move().name(),
                self.position
            );
        }
    }

    fn notify(&mut self, event: GameEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}

impl Default for Game {
    /// A game from the standard starting position.
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position.to_fen())
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.position)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{MoveFlag, FEN_STARTPOS};

    fn started(fen: &str) -> Game {
        let mut game = Game::from_fen(fen).unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn test_lifecycle() {
        let mut game = Game::default();
        assert_eq!(game.state(), GameState::NotStarted);
        assert!(matches!(game.is_over(), Err(ChessError::InvalidState(_))));

        game.start().unwrap();
        assert_eq!(game.state(), GameState::InProgress);
        assert_eq!(game.is_over(), Ok(false));

        assert!(matches!(game.start(), Err(ChessError::InvalidState(_))));
        assert!(matches!(game.final_status(), Err(ChessError::InvalidState(_))));
    }

    #[test]
    fn test_moves_need_a_started_game() {
        let mut game = Game::default();
        let mv = Move::new(Square::E2, Square::E4, MoveFlag::DoublePawnPush);

        assert!(matches!(game.apply_move(mv), Err(ChessError::InvalidState(_))));
        assert!(matches!(game.can_make(mv), Err(ChessError::InvalidState(_))));
        assert_eq!(game.to_fen(), FEN_STARTPOS);
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = started(FEN_STARTPOS);

        // Right squares, wrong flag
        let mislabeled = Move::new(Square::E2, Square::E4, MoveFlag::None);
        assert_eq!(
            game.apply_move(mislabeled),
            Err(ChessError::IllegalMove(mislabeled))
        );

        // Black piece on White's turn
        let wrong_side = Move::new(Square::E7, Square::E5, MoveFlag::DoublePawnPush);
        assert_eq!(
            game.apply_move(wrong_side),
            Err(ChessError::IllegalMove(wrong_side))
        );

        assert_eq!(game.to_fen(), FEN_STARTPOS);
        assert_eq!(game.state(), GameState::InProgress);
    }

    #[test]
    fn test_can_make() {
        let game = started(FEN_STARTPOS);

        let push = Move::new(Square::E2, Square::E4, MoveFlag::DoublePawnPush);
        assert_eq!(game.can_make(push), Ok(true));

        let too_far = Move::new(Square::E2, Square::E5, MoveFlag::None);
        assert_eq!(game.can_make(too_far), Ok(false));

        let from_empty = Move::new(Square::E4, Square::E5, MoveFlag::None);
        assert!(matches!(
            game.can_make(from_empty),
            Err(ChessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_stalemate_on_start() {
        let game = started("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(game.state(), GameState::Over);
        assert_eq!(game.is_over(), Ok(true));
        assert_eq!(game.final_status(), Ok(GameResult::Stalemate));
    }

    #[test]
    fn test_listeners_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::default();

        for id in 0..2 {
            let log = Rc::clone(&log);
            game.register_listener(Box::new(move |event: GameEvent| {
                log.borrow_mut().push((id, event))
            }));
        }

        game.start().unwrap();
        let mv = Move::new(Square::G1, Square::F3, MoveFlag::None);
        game.apply_move(mv).unwrap();

        // Rejected moves are not announced
        let _ = game.apply_move(mv);

        assert_eq!(
            *log.borrow(),
            vec![
                (0, GameEvent::GameStarted),
                (1, GameEvent::GameStarted),
                (0, GameEvent::MoveApplied(mv)),
                (1, GameEvent::MoveApplied(mv)),
            ]
        );
    }

    #[test]
    fn test_queries() {
        let game = started("r3k2r/8/8/3pP3/8/8/8/R3K2R w Kq d6 0 1");

        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.king_square(Color::Black), Square::E8);
        assert_eq!(game.piece_kind_at(Square::D5), Some(PieceKind::Pawn));
        assert_eq!(game.piece_at(Square::A1), Some(Piece::WHITE_ROOK));
        assert_eq!(game.piece_kind_at(Square::D4), None);
        assert_eq!(game.castling_rights(), "Kq");
        assert_eq!(game.en_passant_target(), Some(Square::D6));

        let targets = game.targets_of(Square::E5).unwrap();
        assert!(targets.contains(Square::D6));
        assert!(targets.contains(Square::E6));
        assert_eq!(targets.population(), 2);

        let mut snapshot = game.position_snapshot();
        snapshot
            .make_move(Move::new(Square::E5, Square::E6, MoveFlag::None))
            .unwrap();
        assert_eq!(game.piece_at(Square::E5), Some(Piece::WHITE_PAWN));
    }
}
