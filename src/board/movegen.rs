/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    Bitboard, Color, Direction, Move, MoveFlag, MoveList, Piece, PieceKind, Position, Square,
};
use crate::{ChessError, Result};

/// A function that produces the pseudo-legal moves of the piece on a square.
///
/// Every generator checks that the square holds a piece of its own kind, and returns
/// [`ChessError::InvalidArgument`] otherwise. Generators only read the position.
pub type MoveGenerator = fn(&Position, Square) -> Result<MoveList>;

/// One [`MoveGenerator`] per [`PieceKind`], indexed by [`PieceKind::index`].
pub const GENERATORS: [MoveGenerator; PieceKind::COUNT] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

/// Generates the pseudo-legal moves of whatever piece stands on `origin`.
///
/// Pseudo-legal moves obey piece movement and occupancy, but may leave the mover's king in check.
///
/// # Example
/// ```
/// # use gambit::{pseudo_legal_moves, Position, Square};
/// let pos = Position::default();
/// assert_eq!(pseudo_legal_moves(&pos, Square::G1).unwrap().len(), 2);
/// assert!(pseudo_legal_moves(&pos, Square::E4).is_err());
/// ```
pub fn pseudo_legal_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let piece = position
        .piece_at(origin)
        .ok_or_else(|| ChessError::invalid_argument(format!("no piece on {origin}")))?;

    GENERATORS[piece.kind()](position, origin)
}

/// Generates pawn pushes, double pushes, captures, en passant and promotions.
pub fn pawn_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let pawn = piece_of_kind(position, origin, PieceKind::Pawn)?;
    let mut moves = MoveList::new();
    gen_pawn(position, origin, pawn.color(), &mut moves);
    Ok(moves)
}

/// Generates the (up to) eight knight jumps.
pub fn knight_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let knight = piece_of_kind(position, origin, PieceKind::Knight)?;
    let mut moves = MoveList::new();
    gen_steps(
        position,
        origin,
        knight.color(),
        &Direction::KNIGHT_JUMPS,
        MoveFlag::None,
        &mut moves,
    );
    Ok(moves)
}

/// Generates diagonal slides.
pub fn bishop_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let bishop = piece_of_kind(position, origin, PieceKind::Bishop)?;
    let mut moves = MoveList::new();
    gen_slides(
        position,
        origin,
        bishop.color(),
        &Direction::DIAGONALS,
        MoveFlag::None,
        &mut moves,
    );
    Ok(moves)
}

/// Generates orthogonal slides, all tagged [`MoveFlag::RookMove`].
pub fn rook_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let rook = piece_of_kind(position, origin, PieceKind::Rook)?;
    let mut moves = MoveList::new();
    gen_slides(
        position,
        origin,
        rook.color(),
        &Direction::ORTHOGONALS,
        MoveFlag::RookMove,
        &mut moves,
    );
    Ok(moves)
}

/// Generates slides in all eight directions.
pub fn queen_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let queen = piece_of_kind(position, origin, PieceKind::Queen)?;
    let mut moves = MoveList::new();
    gen_slides(
        position,
        origin,
        queen.color(),
        &Direction::ALL,
        MoveFlag::None,
        &mut moves,
    );
    Ok(moves)
}

/// Generates king steps, tagged [`MoveFlag::KingMove`], and castling.
///
/// A castle is offered only if the right is held, the king and rook stand on their home
/// squares, the squares between them are empty, and the king is not attacked on its
/// origin, on the square it crosses, or on the square it lands on.
pub fn king_moves(position: &Position, origin: Square) -> Result<MoveList> {
    let king = piece_of_kind(position, origin, PieceKind::King)?;
    let mut moves = MoveList::new();
    gen_king(position, origin, king.color(), &mut moves);
    Ok(moves)
}

/// Fetches the piece on `origin`, requiring it to be of `kind`.
fn piece_of_kind(position: &Position, origin: Square, kind: PieceKind) -> Result<Piece> {
    match position.piece_at(origin) {
        Some(piece) if piece.kind() == kind => Ok(piece),
        Some(piece) => Err(ChessError::invalid_argument(format!(
            "{origin} holds a {}, not a {}",
            piece.name(),
            kind.name()
        ))),
        None => Err(ChessError::invalid_argument(format!(
            "no {} on {origin}, it is empty",
            kind.name()
        ))),
    }
}

/// Pushes pseudo-legal moves of the `color` piece on `origin`, dispatching on its kind.
#[inline(always)]
fn gen_piece(position: &Position, origin: Square, piece: Piece, moves: &mut MoveList) {
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => gen_pawn(position, origin, color, moves),
        PieceKind::Knight => gen_steps(
            position,
            origin,
            color,
            &Direction::KNIGHT_JUMPS,
            MoveFlag::None,
            moves,
        ),
        PieceKind::Bishop => gen_slides(
            position,
            origin,
            color,
            &Direction::DIAGONALS,
            MoveFlag::None,
            moves,
        ),
        PieceKind::Rook => gen_slides(
            position,
            origin,
            color,
            &Direction::ORTHOGONALS,
            MoveFlag::RookMove,
            moves,
        ),
        PieceKind::Queen => {
            gen_slides(position, origin, color, &Direction::ALL, MoveFlag::None, moves)
        }
        PieceKind::King => gen_king(position, origin, color, moves),
    }
}

/// Returns `true` if `square` is empty or holds a piece that `color` may capture.
#[inline(always)]
fn is_enemy_or_empty(position: &Position, square: Square, color: Color) -> bool {
    position
        .piece_at(square)
        .map_or(true, |piece| piece.color() != color)
}

fn gen_steps(
    position: &Position,
    origin: Square,
    color: Color,
    directions: &[Direction],
    flag: MoveFlag,
    moves: &mut MoveList,
) {
    for &dir in directions {
        if let Some(to) = origin.step(dir) {
            if is_enemy_or_empty(position, to, color) {
                moves.push(Move::new(origin, to, flag));
            }
        }
    }
}

fn gen_slides(
    position: &Position,
    origin: Square,
    color: Color,
    directions: &[Direction],
    flag: MoveFlag,
    moves: &mut MoveList,
) {
    for &dir in directions {
        let mut current = origin;
        while let Some(to) = current.step(dir) {
            match position.piece_at(to) {
                None => moves.push(Move::new(origin, to, flag)),
                Some(piece) => {
                    if piece.color() != color {
                        moves.push(Move::new(origin, to, flag));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// Ranks, by color, that matter to pawns: `(start, en passant, last)`.
#[inline(always)]
const fn pawn_ranks(color: Color) -> (u8, u8, u8) {
    match color {
        Color::White => (6, 3, 0),
        Color::Black => (1, 4, 7),
    }
}

fn gen_pawn(position: &Position, origin: Square, color: Color, moves: &mut MoveList) {
    let forward = color.forward();
    let (start_rank, ep_rank, last_rank) = pawn_ranks(color);

    let push = |to: Square, moves: &mut MoveList| {
        if to.rank() == last_rank {
            for kind in PieceKind::promotions() {
                if let Some(flag) = MoveFlag::promotion(kind) {
                    moves.push(Move::new(origin, to, flag));
                }
            }
        } else {
            moves.push(Move::new(origin, to, MoveFlag::None));
        }
    };

    if let Some(one) = origin.offset(forward, 0) {
        if position.piece_at(one).is_none() {
            push(one, moves);

            if origin.rank() == start_rank {
                if let Some(two) = one.offset(forward, 0) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(origin, two, MoveFlag::DoublePawnPush));
                    }
                }
            }
        }
    }

    for files in [-1, 1] {
        let Some(to) = origin.offset(forward, files) else {
            continue;
        };

        match position.piece_at(to) {
            Some(victim) if victim.color() != color => push(to, moves),
            Some(_) => {}
            None => {
                let passed = Square::from_coords_unchecked(origin.rank(), to.file());
                if origin.rank() == ep_rank
                    && position.en_passant_target() == Some(to)
                    && position.piece_at(passed)
                        == Some(Piece::new(color.opponent(), PieceKind::Pawn))
                {
                    moves.push(Move::new(origin, to, MoveFlag::EnPassant));
                }
            }
        }
    }
}

fn gen_king(position: &Position, origin: Square, color: Color, moves: &mut MoveList) {
    gen_steps(
        position,
        origin,
        color,
        &Direction::ALL,
        MoveFlag::KingMove,
        moves,
    );

    let rights = position.castling_rights();
    let opponent = color.opponent();
    let own_rook = Some(Piece::new(color, PieceKind::Rook));

    let mut candidates = rights
        .iter()
        .filter(|castle| castle.color == color && castle.king_from == origin)
        .peekable();

    // Only look at attacks if a castle is on the table at all
    if candidates.peek().is_none() || is_attacked(position, origin, opponent) {
        return;
    }

    for castle in candidates {
        if position.piece_at(castle.rook_from) != own_rook {
            continue;
        }
        if castle.between.iter().any(|&sq| position.piece_at(sq).is_some()) {
            continue;
        }
        if castle
            .king_path
            .iter()
            .any(|&sq| is_attacked(position, sq, opponent))
        {
            continue;
        }

        moves.push(Move::new(origin, castle.king_to, castle.flag()));
    }
}

/// Computes every square attacked by `color`.
///
/// A square is attacked if a `color` piece could move there or capture there, ignoring
/// whether its own king would be exposed. Pawns attack their two forward diagonals whatever
/// stands on them, and never attack by pushing. Castling attacks nothing. Squares holding
/// `color`'s own pieces are never included.
///
/// # Example
/// ```
/// # use gambit::{attacked_squares, Color, Position, Square};
/// let pos = Position::default();
/// let attacks = attacked_squares(&pos, Color::White);
/// assert!(attacks.contains(Square::E3));
/// assert!(attacks.contains(Square::F3));
/// assert!(!attacks.contains(Square::E4));
/// assert_eq!(attacks.population(), 8);
/// ```
pub fn attacked_squares(position: &Position, color: Color) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;

    for (origin, piece) in position.board().pieces_of(color) {
        match piece.kind() {
            PieceKind::Pawn => {
                for files in [-1, 1] {
                    if let Some(to) = origin.offset(color.forward(), files) {
                        if is_enemy_or_empty(position, to, color) {
                            attacks.set(to);
                        }
                    }
                }
            }
            PieceKind::King => {
                for &dir in &Direction::ALL {
                    if let Some(to) = origin.step(dir) {
                        if is_enemy_or_empty(position, to, color) {
                            attacks.set(to);
                        }
                    }
                }
            }
            _ => {
                let mut moves = MoveList::new();
                gen_piece(position, origin, piece, &mut moves);
                attacks.extend(moves.iter().map(|mv| mv.to()));
            }
        }
    }

    attacks
}

/// Returns `true` if `square` is attacked by `by`.
///
/// Answers the same question as `attacked_squares(position, by).contains(square)`, but looks
/// outward from `square` instead of generating every attack.
///
/// # Example
/// ```
/// # use gambit::{is_attacked, Color, Position, Square};
/// let pos: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
/// assert!(is_attacked(&pos, Square::A8, Color::White));
/// assert!(!is_attacked(&pos, Square::B8, Color::White));
/// ```
pub fn is_attacked(position: &Position, square: Square, by: Color) -> bool {
    if position.piece_at(square).is_some_and(|piece| piece.color() == by) {
        return false;
    }

    let holds = |sq: Square, kinds: &[PieceKind]| {
        position
            .piece_at(sq)
            .is_some_and(|piece| piece.color() == by && kinds.contains(&piece.kind()))
    };

    // Pawns of `by` attack forward, so look backward from their point of view
    for files in [-1, 1] {
        if let Some(sq) = square.offset(-by.forward(), files) {
            if holds(sq, &[PieceKind::Pawn]) {
                return true;
            }
        }
    }

    let jumps = |dirs: &[Direction], kinds: &[PieceKind]| {
        dirs.iter()
            .filter_map(|&dir| square.step(dir))
            .any(|sq| holds(sq, kinds))
    };

    if jumps(&Direction::KNIGHT_JUMPS, &[PieceKind::Knight])
        || jumps(&Direction::ALL, &[PieceKind::King])
    {
        return true;
    }

    let rays = |dirs: &[Direction], kinds: &[PieceKind]| {
        dirs.iter().any(|&dir| {
            let mut current = square;
            while let Some(sq) = current.step(dir) {
                if position.piece_at(sq).is_some() {
                    return holds(sq, kinds);
                }
                current = sq;
            }
            false
        })
    };

    rays(&Direction::ORTHOGONALS, &[PieceKind::Rook, PieceKind::Queen])
        || rays(&Direction::DIAGONALS, &[PieceKind::Bishop, PieceKind::Queen])
}

/// Returns `true` if `color`'s king is attacked.
#[inline(always)]
pub fn in_check(position: &Position, color: Color) -> bool {
    is_attacked(position, position.king_square(color), color.opponent())
}

/// Keeps only the moves in `candidates` that neither capture a king nor leave `color`'s
/// king attacked.
fn retain_legal(position: &Position, color: Color, candidates: &mut MoveList) {
    candidates.retain(|mv| {
        if position.piece_at(mv.to()).is_some_and(|piece| piece.is_king()) {
            return false;
        }

        match position.with_move_made(*mv) {
            Ok(next) => !in_check(&next, color),
            Err(_) => false,
        }
    });
}

/// Generates every legal move for `color`, as if it were `color`'s turn.
///
/// Each pseudo-legal move is tried on a private copy of `position` and kept only if the
/// mover's king is not attacked afterwards.
///
/// # Example
/// ```
/// # use gambit::{legal_moves, Color, Position};
/// let pos = Position::default();
/// assert_eq!(legal_moves(&pos, Color::White).len(), 20);
/// assert_eq!(legal_moves(&pos, Color::Black).len(), 20);
/// ```
pub fn legal_moves(position: &Position, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for (origin, piece) in position.board().pieces_of(color) {
        gen_piece(position, origin, piece, &mut moves);
    }

    retain_legal(position, color, &mut moves);
    moves
}

/// Generates the legal moves of the piece on `square`, or `None` if it is empty.
pub fn legal_moves_of(position: &Position, square: Square) -> Option<MoveList> {
    let piece = position.piece_at(square)?;
    let mut moves = MoveList::new();
    gen_piece(position, square, piece, &mut moves);

    retain_legal(position, piece.color(), &mut moves);
    Some(moves)
}

/// The set of squares the piece on `square` may legally move to, or `None` if it is empty.
///
/// # Example
/// ```
/// # use gambit::{targets_of, Position, Square};
/// let pos = Position::default();
/// let targets = targets_of(&pos, Square::B1).unwrap();
/// assert!(targets.contains(Square::A3) && targets.contains(Square::C3));
/// assert!(targets_of(&pos, Square::E4).is_none());
/// ```
pub fn targets_of(position: &Position, square: Square) -> Option<Bitboard> {
    legal_moves_of(position, square).map(|moves| moves.iter().map(|mv| mv.to()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn has_move(moves: &MoveList, from: Square, to: Square, flag: MoveFlag) -> bool {
        moves.contains(&Move::new(from, to, flag))
    }

    #[test]
    fn test_generator_table_order() {
        let pos = Position::default();
        for (square, piece) in pos.board().iter() {
            for kind in PieceKind::all() {
                let result = GENERATORS[kind](&pos, square);
                assert_eq!(result.is_ok(), kind == piece.kind(), "{square} {kind:?}");
            }
        }
    }

    #[test]
    fn test_generator_precondition() {
        let pos = Position::default();
        assert!(matches!(
            rook_moves(&pos, Square::E4),
            Err(ChessError::InvalidArgument(_))
        ));
        assert!(matches!(
            knight_moves(&pos, Square::A1),
            Err(ChessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flags_tag_kings_and_rooks() {
        let pos = position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");

        let rook = rook_moves(&pos, Square::A1).unwrap();
        assert_eq!(rook.len(), 10);
        assert!(rook.iter().all(|mv| mv.flag() == MoveFlag::RookMove));

        let king = king_moves(&pos, Square::E1).unwrap();
        assert_eq!(king.len(), 5);
        assert!(king.iter().all(|mv| mv.flag() == MoveFlag::KingMove));
    }

    #[test]
    fn test_slider_stops_at_pieces() {
        let pos = position("4k3/8/8/1p6/8/3B4/8/K7 w - - 0 1");
        let moves = bishop_moves(&pos, Square::D3).unwrap();

        assert!(has_move(&moves, Square::D3, Square::C4, MoveFlag::None));
        assert!(has_move(&moves, Square::D3, Square::B5, MoveFlag::None));
        assert!(!has_move(&moves, Square::D3, Square::A6, MoveFlag::None));
        assert!(has_move(&moves, Square::D3, Square::H7, MoveFlag::None));
        assert!(has_move(&moves, Square::D3, Square::C2, MoveFlag::None));
        assert!(has_move(&moves, Square::D3, Square::B1, MoveFlag::None));
        assert_eq!(moves.len(), 10);
    }

    #[test]
    fn test_pawn_moves() {
        let pos = position("4k3/8/8/8/8/2p5/3P4/4K3 w - - 0 1");
        let moves = pawn_moves(&pos, Square::D2).unwrap();

        assert!(has_move(&moves, Square::D2, Square::D3, MoveFlag::None));
        assert!(has_move(&moves, Square::D2, Square::D4, MoveFlag::DoublePawnPush));
        assert!(has_move(&moves, Square::D2, Square::C3, MoveFlag::None));
        assert_eq!(moves.len(), 3);

        // Blocked pawns can't double push either
        let blocked = position("4k3/8/8/8/8/3n4/3P4/4K3 w - - 0 1");
        assert!(pawn_moves(&blocked, Square::D2).unwrap().is_empty());
    }

    #[test]
    fn test_pawn_promotions() {
        let pos = position("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = pawn_moves(&pos, Square::A7).unwrap();
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|mv| mv.is_promotion()));
        assert!(has_move(&moves, Square::A7, Square::B8, MoveFlag::PromoteKnight));
        assert!(has_move(&moves, Square::A7, Square::A8, MoveFlag::PromoteQueen));

        let black = position("4k3/8/8/8/8/8/7p/4K3 b - - 0 1");
        let moves = pawn_moves(&black, Square::H2).unwrap();
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_en_passant_generation() {
        let pos = position("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let moves = pawn_moves(&pos, Square::E5).unwrap();
        assert!(has_move(&moves, Square::E5, Square::D6, MoveFlag::EnPassant));

        // Without the target square there is nothing to capture
        let stale = position("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2");
        let moves = pawn_moves(&stale, Square::E5).unwrap();
        assert!(moves.iter().all(|mv| !mv.is_en_passant()));
    }

    #[test]
    fn test_en_passant_pin() {
        // Capturing would expose the king along the rank
        let pos = position("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        let moves = legal_moves(&pos, Color::White);
        assert!(moves.iter().all(|mv| !mv.is_en_passant()));
    }

    #[test]
    fn test_castling_generation() {
        let pos = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = legal_moves(&pos, Color::White);
        assert!(has_move(&moves, Square::E1, Square::G1, MoveFlag::CastleKingside));
        assert!(has_move(&moves, Square::E1, Square::C1, MoveFlag::CastleQueenside));

        let moves = legal_moves(&pos, Color::Black);
        assert!(has_move(&moves, Square::E8, Square::G8, MoveFlag::CastleKingside));
        assert!(has_move(&moves, Square::E8, Square::C8, MoveFlag::CastleQueenside));
    }

    #[test]
    fn test_no_castling_out_of_through_or_into_check() {
        let castles = |fen: &str| -> Vec<MoveFlag> {
            king_moves(&position(fen), Square::E1)
                .unwrap()
                .iter()
                .filter(|mv| mv.is_castle())
                .map(|mv| mv.flag())
                .collect()
        };

        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").len(), 2);

        // Out of check
        assert!(castles("r3k2r/8/8/8/4q3/8/8/R3K2R w KQkq - 0 1").is_empty());

        // Through check, on both wings
        assert!(castles("r3k2r/8/8/8/8/3r1r2/8/R3K2R w KQkq - 0 1").is_empty());

        // Into check on the queenside only
        assert_eq!(
            castles("2r1k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1"),
            vec![MoveFlag::CastleKingside]
        );

        // b1 may be attacked: the king never crosses it
        assert_eq!(
            castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"),
            vec![MoveFlag::CastleQueenside]
        );
    }

    #[test]
    fn test_no_castling_when_blocked_or_rook_missing() {
        let blocked = position("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(king_moves(&blocked, Square::E1).unwrap().iter().all(|m| !m.is_castle()));

        let missing = position("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1");
        assert!(king_moves(&missing, Square::E1).unwrap().iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_attacked_squares_matches_is_attacked() {
        for fen in [
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ] {
            let pos = position(fen);
            for color in Color::all() {
                let attacks = attacked_squares(&pos, color);
                for square in Square::iter() {
                    assert_eq!(
                        attacks.contains(square),
                        is_attacked(&pos, square, color),
                        "{fen} {color:?} {square}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pawns_attack_diagonals_only() {
        let pos = position("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        let attacks = attacked_squares(&pos, Color::White);
        assert!(attacks.contains(Square::D3));
        assert!(attacks.contains(Square::F3));
        assert!(!attacks.contains(Square::E3));
        assert!(!attacks.contains(Square::E4));
    }

    #[test]
    fn test_legal_moves_never_expose_king() {
        let pos = position(FEN_KIWIPETE);
        for color in Color::all() {
            for mv in legal_moves(&pos, color) {
                let next = pos.with_move_made(mv).unwrap();
                assert!(!in_check(&next, color), "{mv:?}");
            }
        }
    }

    #[test]
    fn test_pinned_piece() {
        let pos = position("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        let moves = legal_moves_of(&pos, Square::E2).unwrap();
        assert!(moves.is_empty());
        assert_eq!(targets_of(&pos, Square::E2), Some(Bitboard::EMPTY));
        assert_eq!(targets_of(&pos, Square::E4), None);
    }

    #[test]
    fn test_kings_are_never_captured() {
        // Black is in check with White to move
        let pos = position("R3k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(in_check(&pos, Color::Black));
        assert!(attacked_squares(&pos, Color::White).contains(Square::E8));

        let moves = legal_moves(&pos, Color::White);
        assert!(!moves.iter().any(|mv| mv.to() == Square::E8));
        assert!(has_move(&moves, Square::A8, Square::D8, MoveFlag::RookMove));

        let targets = targets_of(&pos, Square::A8).unwrap();
        assert!(!targets.contains(Square::E8));
        assert_eq!(targets.population(), 10);
    }
}
