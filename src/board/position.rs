/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::{CastleSide, Cell, Color, Piece, PieceKind, Square};

/// Represents the castling rights of a single player.
///
/// A right only says that neither the King nor the Rook on that wing has moved (or been captured).
/// Whether castling is possible *right now* is decided by [`Board::is_legal`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct CastlingRights {
    pub(crate) short: bool,
    pub(crate) long: bool,
}

impl CastlingRights {
    /// Creates a new [`CastlingRights`] from its kingside and queenside parts.
    #[inline(always)]
    pub const fn new(short: bool, long: bool) -> Self {
        Self { short, long }
    }

    /// Fetches the right to castle on the provided wing.
    #[inline(always)]
    pub const fn get(&self, side: CastleSide) -> bool {
        match side {
            CastleSide::Short => self.short,
            CastleSide::Long => self.long,
        }
    }

    /// Returns `true` if either wing may still castle.
    #[inline(always)]
    pub const fn any(&self) -> bool {
        self.short || self.long
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self, side: CastleSide) {
        match side {
            CastleSide::Short => self.short = false,
            CastleSide::Long => self.long = false,
        }
    }
}

/// A chess position held in a 10x12 mailbox, together with the side to move, castling rights,
/// and the en passant target.
///
/// This is the only mutable state of the engine. Moves are applied in place with
/// [`Board::make_move`] and reverted with [`Board::undo_move`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Every cell of the mailbox, border included.
    pub(crate) cells: [Cell; Square::COUNT],

    /// The [`Color`] of the current player.
    pub(crate) side_to_move: Color,

    /// Castling rights for each player.
    pub(crate) castling_rights: [CastlingRights; Color::COUNT],

    /// The square a pawn skipped over on the previous ply, if it made a double push.
    pub(crate) ep_square: Option<Square>,
}

impl Board {
    /// Creates a new [`Board`] in the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, FEN_STARTPOS};
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), FEN_STARTPOS);
    /// ```
    pub fn new() -> Self {
        use PieceKind::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for color in Color::all() {
            let (back, front) = match color {
                Color::White => (0, 1),
                Color::Black => (7, 6),
            };

            for (file, kind) in back_rank.into_iter().enumerate() {
                board.place(Piece::new(color, kind), Square::new(file as u8, back));
                board.place(Piece::new(color, Pawn), Square::new(file as u8, front));
            }
        }

        board.castling_rights = [CastlingRights::new(true, true); Color::COUNT];
        board
    }

    /// Creates a [`Board`] with no pieces, no castling rights, and White to move.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Board;
    /// let board = Board::empty();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    /// ```
    pub fn empty() -> Self {
        let mut cells = [Cell::OffBoard; Square::COUNT];
        for square in Square::iter() {
            cells[square.index()] = Cell::Empty;
        }

        Self {
            cells,
            side_to_move: Color::White,
            castling_rights: [CastlingRights::default(); Color::COUNT],
            ep_square: None,
        }
    }

    /// Creates a new [`Board`] from the provided FEN string.
    ///
    /// The halfmove and fullmove counters are accepted but not tracked.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Color, Square};
    /// let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    /// assert_eq!(board.side_to_move(), Color::White);
    /// assert_eq!(board.ep_square(), Some(Square::D6));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::empty();
        let mut split = fen.split_ascii_whitespace();

        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != 8 {
            bail!("FEN placements must have 8 ranks. Got {}", ranks.len());
        }

        // FEN lists ranks from the eighth down to the first
        for (i, rank_str) in ranks.into_iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        bail!("Invalid empty square count {c:?} in FEN string {fen:?}");
                    }
                    if file + skip as u8 > 8 {
                        bail!("Rank {} of FEN string {fen:?} has too many squares", rank + 1);
                    }
                    file += skip as u8;
                } else {
                    if file >= 8 {
                        bail!("Rank {} of FEN string {fen:?} has too many squares", rank + 1);
                    }
                    board.place(Piece::from_char(c)?, Square::new(file, rank));
                    file += 1;
                }
            }

            if file != 8 {
                bail!("Rank {} of FEN string {fen:?} must span 8 squares. Got {file}", rank + 1);
            }
        }

        board.side_to_move = split.next().unwrap_or("w").parse()?;

        let castling = split.next().unwrap_or("-");
        if castling != "-" {
            for c in castling.chars() {
                let (color, side) = match c {
                    'K' => (Color::White, CastleSide::Short),
                    'Q' => (Color::White, CastleSide::Long),
                    'k' => (Color::Black, CastleSide::Short),
                    'q' => (Color::Black, CastleSide::Long),
                    _ => bail!("Invalid castling rights {castling:?} in FEN string {fen:?}"),
                };
                match side {
                    CastleSide::Short => board.castling_rights[color.index()].short = true,
                    CastleSide::Long => board.castling_rights[color.index()].long = true,
                }
            }
        }

        board.ep_square = match split.next().unwrap_or("-") {
            "-" => None,
            square => {
                let square = Square::from_uci(square)?;
                // The passed square lies behind the pawn that just moved
                let expected_rank = match board.side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if square.rank() != expected_rank {
                    bail!(
                        "En passant square {square} is impossible with {} to move in FEN string {fen:?}",
                        board.side_to_move.name()
                    );
                }
                Some(square)
            }
        };

        for counter in split.take(2) {
            if counter.parse::<u32>().is_err() {
                bail!("FEN string must have valid move counters. Got {counter:?}");
            }
        }

        Ok(board)
    }

    /// Generates a FEN string of this position.
    ///
    /// Move counters are not tracked, so they are always written as `0 1`.
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty > 0 {
                        placements += &empty.to_string();
                        empty = 0;
                    }
                    placements.push(piece.char());
                } else {
                    empty += 1;
                }
            }

            if empty > 0 {
                placements += &empty.to_string();
            }
            if rank > 0 {
                placements.push('/');
            }
        }

        let ep = self
            .ep_square
            .map(|sq| sq.to_string())
            .unwrap_or(String::from("-"));

        format!(
            "{placements} {} {} {ep} 0 1",
            self.side_to_move,
            self.castling_rights_fen()
        )
    }

    /// Fetches the castling rights as they appear in a FEN string, such as `KQkq`.
    pub fn castling_rights_fen(&self) -> String {
        let white = self.castling_rights(Color::White);
        let black = self.castling_rights(Color::Black);

        let rights = [
            (white.short, 'K'),
            (white.long, 'Q'),
            (black.short, 'k'),
            (black.long, 'q'),
        ]
        .into_iter()
        .filter_map(|(allowed, c)| allowed.then_some(c))
        .collect::<String>();

        if rights.is_empty() {
            String::from("-")
        } else {
            rights
        }
    }

    /// The [`Color`] of the player to move.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The square a pawn may capture onto en passant, if any.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// The castling rights of `color`.
    #[inline(always)]
    pub const fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling_rights[color.index()]
    }

    /// Fetches the contents of the mailbox at `square`.
    #[inline(always)]
    pub const fn cell(&self, square: Square) -> Cell {
        self.cells[square.index()]
    }

    /// Fetches the piece at `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()].piece()
    }

    /// Locates the King of `color`.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.iter()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// An iterator over every occupied square and the piece on it, from `a1` to `h8`.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Places `piece` on `square`, replacing whatever was there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        debug_assert!(square.is_playable(), "Cannot place a piece on {square:?}");
        self.cells[square.index()] = Cell::Occupied(piece);
    }

    /// Removes and returns the piece on `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        debug_assert!(square.is_playable(), "Cannot take a piece from {square:?}");
        let piece = self.piece_at(square);
        self.cells[square.index()] = Cell::Empty;
        piece
    }

    /// Sets the contents of `square`. Used when restoring a square to a recorded state.
    #[inline(always)]
    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.index()] = Cell::from(piece);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Board {
    /// Prints the board from White's side, with the position's metadata alongside.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{}|", rank + 1)?;
            for file in 0..8 {
                let piece = self.piece_at(Square::new(file, rank));
                write!(f, " {}", piece.map(|p| p.char()).unwrap_or('.'))?;
            }

            match rank {
                7 => write!(f, "           FEN: {}", self.to_fen())?,
                6 => write!(f, "          Side: {}", self.side_to_move.name())?,
                5 => write!(f, "      Castling: {}", self.castling_rights_fen())?,
                4 => {
                    let ep = self
                        .ep_square
                        .map(|sq| sq.to_string())
                        .unwrap_or(String::from("-"));
                    write!(f, "            EP: {ep}")?
                }
                _ => {}
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..8 {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in 'a'..='h' {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    #[test]
    fn test_startpos_matches_fen() {
        let board = Board::new();
        assert_eq!(board, Board::from_fen(FEN_STARTPOS).unwrap());
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.iter().count(), 32);
    }

    #[test]
    fn test_fen_round_trip() {
        for fen in [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2pP4/8/8/PPP1PPPP/RNBQKBNR w Kq c6 0 1",
        ] {
            assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_border_is_off_board() {
        let board = Board::new();
        for i in 0..Square::COUNT {
            let square = Square::from_index(i).unwrap();
            assert_eq!(board.cell(square).is_off_board(), !square.is_playable());
        }
    }

    #[test]
    fn test_bad_fens_are_rejected() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/7x w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w Z - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w - z9 0 1").is_err());
        assert!(Board::from_fen("54/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("08/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn test_long_digit_runs_are_rejected() {
        let fen = format!("{}/8/8/8/8/8/8/8 w - - 0 1", "9".repeat(40));
        assert!(Board::from_fen(&fen).is_err());

        // Runs that would add up to a multiple of 256 plus 8
        let fen = format!("{}/8/8/8/8/8/8/8 w - - 0 1", "8".repeat(33));
        assert!(Board::from_fen(&fen).is_err());
    }

    #[test]
    fn test_en_passant_square_must_match_side_to_move() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(board.ep_square(), Some(Square::D6));
        let board = Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert_eq!(board.ep_square(), Some(Square::D3));

        assert!(Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e4 0 1").is_err());
        assert!(Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 1").is_err());
        assert!(Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d6 0 1").is_err());
    }
}
