/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index, str::FromStr};

use super::{Color, Move, MoveFlag, Piece, PieceKind, Square};
use crate::{ChessError, Result};

/// The two wings a king may castle towards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// Static geometry of one castling move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Castle {
    pub color: Color,
    pub side: CastleSide,
    /// Letter used for this right in FEN.
    pub letter: char,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between the king and the rook. All must be empty.
    pub between: &'static [Square],
    /// Squares the king crosses and lands on. None may be attacked.
    pub king_path: &'static [Square],
}

/// All four castling moves, in FEN order `KQkq`.
pub static CASTLES: [Castle; 4] = [
    Castle {
        color: Color::White,
        side: CastleSide::Kingside,
        letter: 'K',
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        between: &[Square::F1, Square::G1],
        king_path: &[Square::F1, Square::G1],
    },
    Castle {
        color: Color::White,
        side: CastleSide::Queenside,
        letter: 'Q',
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        between: &[Square::D1, Square::C1, Square::B1],
        king_path: &[Square::D1, Square::C1],
    },
    Castle {
        color: Color::Black,
        side: CastleSide::Kingside,
        letter: 'k',
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        between: &[Square::F8, Square::G8],
        king_path: &[Square::F8, Square::G8],
    },
    Castle {
        color: Color::Black,
        side: CastleSide::Queenside,
        letter: 'q',
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        between: &[Square::D8, Square::C8, Square::B8],
        king_path: &[Square::D8, Square::C8],
    },
];

impl Castle {
    /// Fetches the castling geometry for `color` on `side`.
    #[inline(always)]
    pub fn get(color: Color, side: CastleSide) -> &'static Self {
        &CASTLES[Self::index(color, side)]
    }

    /// Fetches the castling geometry for a castling flag, if `flag` is one.
    #[inline(always)]
    pub fn for_flag(color: Color, flag: MoveFlag) -> Option<&'static Self> {
        match flag {
            MoveFlag::CastleKingside => Some(Self::get(color, CastleSide::Kingside)),
            MoveFlag::CastleQueenside => Some(Self::get(color, CastleSide::Queenside)),
            _ => None,
        }
    }

    /// The move flag that performs this castle.
    #[inline(always)]
    pub const fn flag(&self) -> MoveFlag {
        match self.side {
            CastleSide::Kingside => MoveFlag::CastleKingside,
            CastleSide::Queenside => MoveFlag::CastleQueenside,
        }
    }

    #[inline(always)]
    const fn index(color: Color, side: CastleSide) -> usize {
        color.index() * 2 + side as usize
    }

    #[inline(always)]
    const fn bit(&self) -> u8 {
        1 << Self::index(self.color, self.side)
    }
}

/// The set of castling rights still held by both players.
///
/// Rights are only ever removed during play, never restored.
///
/// # Example
/// ```
/// # use gambit::{CastlingRights, CastleSide, Color};
/// let mut rights = CastlingRights::from_fen("KQkq").unwrap();
/// rights.remove(Color::White, CastleSide::Queenside);
/// assert_eq!(rights.to_string(), "Kkq");
/// assert!(!rights.has(Color::White, CastleSide::Queenside));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    /// Returns `true` if `color` may still castle on `side`.
    #[inline(always)]
    pub const fn has(&self, color: Color, side: CastleSide) -> bool {
        self.0 & (1 << Castle::index(color, side)) != 0
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Removes `color`'s right to castle on `side`.
    #[inline(always)]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Castle::get(color, side).bit();
    }

    /// Removes both of `color`'s castling rights.
    #[inline(always)]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// Removes whichever right is tied to a rook starting on `square`.
    #[inline(always)]
    pub fn remove_corner(&mut self, square: Square) {
        for castle in CASTLES.iter().filter(|c| c.rook_from == square) {
            self.0 &= !castle.bit();
        }
    }

    /// The castling moves still available, in `KQkq` order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Castle> + '_ {
        CASTLES.iter().filter(|c| self.0 & c.bit() != 0)
    }

    /// Parses the castling field of a FEN string.
    ///
    /// Accepts `-`, or any non-empty combination of `KQkq` without repeats.
    pub fn from_fen(castling: &str) -> Result<Self> {
        if castling == "-" {
            return Ok(Self::NONE);
        }
        if castling.is_empty() {
            return Err(ChessError::parse("castling field is empty"));
        }

        let mut rights = Self::NONE;
        for c in castling.chars() {
            let castle = CASTLES.iter().find(|castle| castle.letter == c).ok_or_else(|| {
                ChessError::parse(format!("invalid castling character {c:?} in {castling:?}"))
            })?;

            if rights.0 & castle.bit() != 0 {
                return Err(ChessError::parse(format!(
                    "castling right {c:?} repeated in {castling:?}"
                )));
            }
            rights.0 |= castle.bit();
        }

        Ok(rights)
    }

    /// Formats these rights as a FEN castling field, always in `KQkq` order.
    pub fn to_fen(&self) -> String {
        if self.is_empty() {
            return String::from("-");
        }
        self.iter().map(|c| c.letter).collect()
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({})", self.to_fen())
    }
}

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of castling rights, en passant, or move counters. If you need those, see [`Position`].
///
/// Internally a mailbox of 64 optional pieces, plus a cache of where each king stands.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
    kings: [Square; Color::COUNT],
}

impl Board {
    /// An empty board. King squares are meaningless until both kings are placed.
    pub(crate) const fn empty() -> Self {
        Self {
            squares: [None; Square::COUNT],
            kings: [Square::E1, Square::E8],
        }
    }

    /// Parses the piece placement field of a FEN string.
    ///
    /// The first rank descriptor is rank `8` (the top of the board), and every descriptor
    /// must cover exactly eight files. Each side must have exactly one king.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
    /// assert!(Board::from_fen("8/8/8/8/8/8/8/8").is_err());
    /// ```
    pub fn from_fen(placements: &str) -> Result<Self> {
        let mut board = Self::empty();
        let mut king_counts = [0usize; Color::COUNT];

        let ranks: Vec<&str> = placements.split('/').collect();
        if ranks.len() != Square::SIZE as usize {
            return Err(ChessError::parse(format!(
                "board must have 8 ranks, found {} in {placements:?}",
                ranks.len()
            )));
        }

        for (rank, descriptor) in ranks.into_iter().enumerate() {
            let mut file = 0u8;

            for c in descriptor.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::parse(format!(
                            "invalid empty-square count {c:?} in rank {descriptor:?}"
                        )));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_char(c)?;
                    if file >= Square::SIZE {
                        return Err(ChessError::parse(format!(
                            "rank {descriptor:?} describes more than 8 files"
                        )));
                    }
                    if piece.is_king() {
                        king_counts[piece.color()] += 1;
                    }
                    board.place(piece, Square::from_coords_unchecked(rank as u8, file));
                    file += 1;
                }

                if file > Square::SIZE {
                    return Err(ChessError::parse(format!(
                        "rank {descriptor:?} describes more than 8 files"
                    )));
                }
            }

            if file != Square::SIZE {
                return Err(ChessError::parse(format!(
                    "rank {descriptor:?} describes {file} files instead of 8"
                )));
            }
        }

        for color in Color::all() {
            if king_counts[color] != 1 {
                return Err(ChessError::parse(format!(
                    "{} must have exactly one king, found {}",
                    color.name(),
                    king_counts[color]
                )));
            }
        }

        Ok(board)
    }

    /// Fetches the piece on `square`, if any.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Fetches the square of `color`'s king.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Places `piece` on `square`, replacing whatever stood there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        if piece.is_king() {
            self.kings[piece.color()] = square;
        }
        self.squares[square] = Some(piece);
    }

    /// Removes and returns the piece on `square`, if any.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square].take()
    }

    /// An iterator over every occupied square and its piece.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// An iterator over the squares holding pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Generates the piece placement field of a FEN string.
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for rank in 0..Square::SIZE {
            let mut empty = 0;

            for file in 0..Square::SIZE {
                match self.piece_at(Square::from_coords_unchecked(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            placements += &empty.to_string();
                            empty = 0;
                        }
                        placements.push(piece.char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                placements += &empty.to_string();
            }
            if rank != Square::SIZE - 1 {
                placements.push('/');
            }
        }

        placements
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in Square::iter() {
            if square.file() == 0 {
                write!(f, "{}| ", square.rank_char())?;
            }

            let occupant = self.piece_at(square).map(|p| p.char()).unwrap_or('.');
            write!(f, "{occupant} ")?;

            if square.file() == Square::SIZE - 1 {
                writeln!(f)?;
            }
        }
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

/// Represents the current state of the game, including move counters.
///
/// This is analogous to a FEN string. A [`Position`] is a plain value: copying it is how
/// moves are tried out without touching the original. If you want rules enforcement and
/// game-over detection, use [`crate::Game`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    castling_rights: CastlingRights,

    /// Square passed over by the last double pawn push, if the last move was one.
    ep_target: Option<Square>,

    /// Plies since the last pawn move or capture.
    halfmove: usize,

    /// Starts at 1 and increments after Black moves.
    fullmove: usize,
}

impl Position {
    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// The string must have exactly six space-separated fields. Nothing is built
    /// unless every field is valid.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Position, Color, FEN_STARTPOS};
    /// let pos = Position::from_fen(FEN_STARTPOS).unwrap();
    /// assert_eq!(pos.side_to_move(), Color::White);
    /// assert_eq!(pos.to_fen(), FEN_STARTPOS);
    ///
    /// assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields: Vec<&str> = fen.trim().split(' ').collect();
        let [placements, active_color, castling, en_passant, halfmove, fullmove] = fields[..]
        else {
            return Err(ChessError::parse(format!(
                "FEN must have exactly 6 fields, found {} in {fen:?}",
                fields.len()
            )));
        };

        let board = Board::from_fen(placements)?;

        let mut color_chars = active_color.chars();
        let side_to_move = match (color_chars.next(), color_chars.next()) {
            (Some(c), None) => Color::from_fen_char(c)?,
            _ => {
                return Err(ChessError::parse(format!(
                    "side to move must be 'w' or 'b', got {active_color:?}"
                )))
            }
        };

        let castling_rights = CastlingRights::from_fen(castling)?;

        let ep_target = match en_passant {
            "-" => None,
            square => Some(Square::from_algebraic(square)?),
        };

        let halfmove = parse_clock(halfmove, "half-move clock")?;
        let fullmove = parse_clock(fullmove, "full-move number")?;

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            ep_target,
            halfmove,
            fullmove,
        })
    }

    /// Generates a FEN string from this position, deriving every field from its current state.
    #[inline(always)]
    pub fn to_fen(&self) -> String {
        format!("{self}")
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Fetches the piece on `square`, if any.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Fetches the square of `color`'s king.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.board.king_square(color)
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// The square a pawn may capture onto en passant, if the last move was a double push.
    #[inline(always)]
    pub const fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }

    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Returns `true` if neither side has enough material to ever deliver checkmate.
    ///
    /// That is: bare kings, a single minor piece, or one bishop each on the same square color.
    /// This is informational only; games are never adjudicated with it.
    ///
    /// # Example
    /// ```
    /// # use gambit::Position;
    /// let kbk: Position = "8/4k3/8/8/3K4/8/5B2/8 w - - 0 1".parse().unwrap();
    /// assert!(kbk.has_insufficient_material());
    ///
    /// let krk: Position = "8/4k3/8/8/3K4/8/5R2/8 w - - 0 1".parse().unwrap();
    /// assert!(!krk.has_insufficient_material());
    /// ```
    pub fn has_insufficient_material(&self) -> bool {
        let mut knights = [0u8; Color::COUNT];
        let mut bishops: [Option<Square>; Color::COUNT] = [None; Color::COUNT];
        let mut bishop_count = [0u8; Color::COUNT];

        for (square, piece) in self.board.iter() {
            let color = piece.color();
            match piece.kind() {
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => knights[color] += 1,
                PieceKind::Bishop => {
                    bishop_count[color] += 1;
                    bishops[color] = Some(square);
                }
                PieceKind::King => {}
            }
        }

        let square_color = |sq: Square| (sq.rank() + sq.file()) % 2;

        match (bishop_count, knights) {
            ([0, 0], [0, 0]) => true,
            ([1, 0], [0, 0]) | ([0, 1], [0, 0]) => true,
            ([0, 0], [1, 0]) | ([0, 0], [0, 1]) => true,
            ([1, 1], [0, 0]) => match bishops {
                [Some(white), Some(black)] => square_color(white) == square_color(black),
                _ => false,
            },
            _ => false,
        }
    }

    /// Returns a copy of this position with `mv` applied.
    ///
    /// See [`Position::make_move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Result<Self> {
        let mut copied = *self;
        copied.make_move(mv)?;
        Ok(copied)
    }

    /// Applies the move without checking its legality.
    ///
    /// The flag of `mv` decides the side effects: en passant removes the pawn standing
    /// beside the mover, castling also relocates the matching rook, and promotions replace
    /// the pawn. Castling rights, clocks, the en passant target and the side to move are
    /// all updated.
    ///
    /// Either the whole move is applied, or an error is returned and `self` is untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<()> {
        let mut next = *self;
        let (from, to, flag) = (mv.from(), mv.to(), mv.flag());

        let piece = next.board.take(from).ok_or_else(|| {
            ChessError::invalid_argument(format!("no piece on {from} to apply {mv}"))
        })?;
        let color = piece.color();

        // The en passant victim stands beside the mover, on the mover's rank.
        let captured = if flag == MoveFlag::EnPassant {
            next.board
                .take(Square::from_coords_unchecked(from.rank(), to.file()))
        } else {
            next.board.take(to)
        };

        if let Some(castle) = Castle::for_flag(color, flag) {
            let rook = next
                .board
                .take(castle.rook_from)
                .filter(|rook| rook.is_rook() && rook.color() == color)
                .ok_or(ChessError::MissingCastlingRook(castle.rook_from))?;
            next.board.place(rook, castle.rook_to);
        }

        let landed = match flag.promoted_kind() {
            Some(kind) => piece.promoted(kind),
            None => piece,
        };
        next.board.place(landed, to);

        if piece.is_king() {
            next.castling_rights.remove_color(color);
        }
        next.castling_rights.remove_corner(from);
        next.castling_rights.remove_corner(to);

        if piece.is_pawn() || captured.is_some() {
            next.halfmove = 0;
        } else {
            next.halfmove += 1;
        }

        next.ep_target = if flag == MoveFlag::DoublePawnPush {
            from.offset(color.forward(), 0)
        } else {
            None
        };

        if color.is_black() {
            next.fullmove += 1;
        }
        next.side_to_move = color.opponent();

        *self = next;
        Ok(())
    }
}

/// Parses a FEN clock field: a non-negative decimal integer.
fn parse_clock(field: &str, name: &str) -> Result<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChessError::parse(format!(
            "{name} must be a non-negative integer, got {field:?}"
        )));
    }

    field
        .parse()
        .map_err(|e| ChessError::parse(format!("{name} {field:?} is out of range: {e}")))
}

impl FromStr for Position {
    type Err = ChessError;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Position {
    /// The standard starting position.
    fn default() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Board::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let file = file as u8;
            board.place(Piece::new(Color::Black, kind), Square::from_coords_unchecked(0, file));
            board.place(Piece::BLACK_PAWN, Square::from_coords_unchecked(1, file));
            board.place(Piece::WHITE_PAWN, Square::from_coords_unchecked(6, file));
            board.place(Piece::new(Color::White, kind), Square::from_coords_unchecked(7, file));
        }

        Self {
            board,
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            ep_target: None,
            halfmove: 0,
            fullmove: 1,
        }
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let en_passant_target = self
            .ep_target
            .map(|square| square.to_string())
            .unwrap_or_else(|| String::from("-"));

        write!(
            f,
            "{} {} {} {en_passant_target} {} {}",
            self.board.to_fen(),
            self.side_to_move,
            self.castling_rights,
            self.halfmove,
            self.fullmove
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in Square::iter() {
            if square.file() == 0 {
                write!(f, "{}|", square.rank_char())?;
            }

            let piece_char = self.piece_at(square).map(|p| p.char()).unwrap_or('.');
            write!(f, " {piece_char}")?;

            if square.file() == Square::SIZE - 1 {
                match square.rank() {
                    1 => write!(f, "           FEN: {self}")?,
                    2 => write!(f, "          Side: {}", self.side_to_move.name())?,
                    3 => write!(f, "      Castling: {}", self.castling_rights)?,
                    4 => {
                        let ep = self.ep_target.map(|t| t.to_string());
                        write!(f, "            EP: {}", ep.as_deref().unwrap_or("-"))?
                    }
                    5 => write!(f, "     Half-move: {}", self.halfmove)?,
                    6 => write!(f, "     Full-move: {}", self.fullmove)?,
                    _ => {}
                }
                writeln!(f)?;
            }
        }
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    fn play(pos: &mut Position, moves: &[&str]) {
        for uci in moves {
            let mv = Move::from_uci(pos, uci).unwrap();
            pos.make_move(mv).unwrap();
        }
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "4k3/8/8/8/8/8/8/4K3 b - - 99 0",
        ];

        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
            assert_eq!(Position::from_fen(&pos.to_fen()).unwrap(), pos);
        }
    }

    #[test]
    fn test_default_is_startpos() {
        assert_eq!(Position::default().to_fen(), FEN_STARTPOS);
        assert_eq!(Position::default(), FEN_STARTPOS.parse().unwrap());
    }

    #[test]
    fn test_fen_rejects_malformed() {
        let bad = [
            "",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNK w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkqK - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KX - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 x",
        ];

        for fen in bad {
            assert!(
                matches!(Position::from_fen(fen), Err(ChessError::Parse(_))),
                "{fen:?} should not decode"
            );
        }
    }

    #[test]
    fn test_castling_canonical_order() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w qkQK - 0 1".parse().unwrap();
        assert_eq!(pos.castling_rights().to_fen(), "KQkq");
    }

    #[test]
    fn test_castling_rights_update_on_king_move() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();

        play(&mut pos, &["e1d1"]);
        assert_eq!(pos.castling_rights().to_fen(), "kq");

        play(&mut pos, &["e8f8"]);
        assert_eq!(pos.castling_rights().to_fen(), "-");

        // Returning home does not restore anything
        play(&mut pos, &["d1e1", "f8e8"]);
        assert_eq!(pos.castling_rights().to_fen(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_rook_move() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();

        play(&mut pos, &["h1h2"]);
        assert_eq!(pos.castling_rights().to_fen(), "Qkq");

        play(&mut pos, &["a8a7"]);
        assert_eq!(pos.castling_rights().to_fen(), "Qk");

        play(&mut pos, &["h2h1"]);
        assert_eq!(pos.castling_rights().to_fen(), "Qk");
    }

    #[test]
    fn test_castling_rights_update_on_rook_captured() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();

        play(&mut pos, &["a1a8"]);
        assert_eq!(pos.castling_rights().to_fen(), "Kk");

        play(&mut pos, &["h8h1"]);
        assert_eq!(pos.castling_rights().to_fen(), "-");
    }

    #[test]
    fn test_castling_relocates_rook() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 1".parse().unwrap();

        play(&mut pos, &["e1g1"]);
        assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 1");

        play(&mut pos, &["e8c8"]);
        assert_eq!(pos.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 2");
    }

    #[test]
    fn test_castling_without_rook_fails() {
        let mut pos: Position = "4k3/8/8/8/8/8/8/4K3 w K - 0 1".parse().unwrap();
        let before = pos;

        let mv = Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside);
        assert_eq!(
            pos.make_move(mv),
            Err(ChessError::MissingCastlingRook(Square::H1))
        );
        assert_eq!(pos, before);
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let mut pos: Position = "4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1".parse().unwrap();

        play(&mut pos, &["d7d5"]);
        assert_eq!(pos.en_passant_target(), Some(Square::D6));

        play(&mut pos, &["e5d6"]);
        assert_eq!(pos.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
        assert_eq!(pos.en_passant_target(), None);
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let mut pos: Position = "r3k3/1P6/8/8/8/8/8/4K3 w q - 7 40".parse().unwrap();

        play(&mut pos, &["b7a8n"]);
        assert_eq!(pos.piece_at(Square::A8), Some(Piece::WHITE_KNIGHT));
        assert_eq!(pos.piece_at(Square::B7), None);
        assert_eq!(pos.castling_rights().to_fen(), "-");
        assert_eq!(pos.halfmove(), 0);
    }

    #[test]
    fn test_clocks() {
        let mut pos = Position::default();

        play(&mut pos, &["g1f3"]);
        assert_eq!((pos.halfmove(), pos.fullmove()), (1, 1));

        play(&mut pos, &["g8f6"]);
        assert_eq!((pos.halfmove(), pos.fullmove()), (2, 2));

        play(&mut pos, &["e2e4"]);
        assert_eq!((pos.halfmove(), pos.fullmove()), (0, 2));
        assert_eq!(pos.en_passant_target(), Some(Square::E3));

        play(&mut pos, &["f6e4"]);
        assert_eq!((pos.halfmove(), pos.fullmove()), (0, 3));
        assert_eq!(pos.en_passant_target(), None);
    }

    #[test]
    fn test_make_move_from_empty_square() {
        let mut pos = Position::default();
        let mv = Move::new(Square::E4, Square::E5, MoveFlag::None);
        assert!(matches!(
            pos.make_move(mv),
            Err(ChessError::InvalidArgument(_))
        ));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn test_insufficient_material() {
        let drawn = [
            "8/4k3/8/8/3K4/8/8/8 w - - 0 1",
            "8/4k3/2n5/8/3K4/8/8/8 w - - 0 1",
            "8/2b1k3/8/8/3K4/8/5B2/8 w - - 0 1",
        ];
        for fen in drawn {
            assert!(Position::from_fen(fen).unwrap().has_insufficient_material(), "{fen}");
        }

        let playable = [
            FEN_STARTPOS,
            "8/3bk3/8/8/3K4/8/5B2/8 w - - 0 1",
            "8/4k3/8/8/3K4/8/4P3/8 w - - 0 1",
            "8/4k3/8/8/3K4/8/3NN3/8 w - - 0 1",
        ];
        for fen in playable {
            assert!(!Position::from_fen(fen).unwrap().has_insufficient_material(), "{fen}");
        }
    }
}
