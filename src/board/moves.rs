/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::{Board, CastlingRights, Color, Piece, PieceKind, Square};

/// The wing a King castles towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Kingside, written `O-O`.
    Short,
    /// Queenside, written `O-O-O`.
    Long,
}

impl CastleSide {
    /// Both wings, kingside first.
    #[inline(always)]
    pub const fn all() -> [Self; 2] {
        [Self::Short, Self::Long]
    }

    /// Square the King lands on when castling to this wing.
    #[inline(always)]
    pub const fn king_to(&self, color: Color) -> Square {
        match (self, color) {
            (Self::Short, Color::White) => Square::G1,
            (Self::Long, Color::White) => Square::C1,
            (Self::Short, Color::Black) => Square::G8,
            (Self::Long, Color::Black) => Square::C8,
        }
    }

    /// Home square of the Rook on this wing.
    #[inline(always)]
    pub const fn rook_from(&self, color: Color) -> Square {
        match (self, color) {
            (Self::Short, Color::White) => Square::H1,
            (Self::Long, Color::White) => Square::A1,
            (Self::Short, Color::Black) => Square::H8,
            (Self::Long, Color::Black) => Square::A8,
        }
    }

    /// Square the Rook lands on when castling to this wing.
    #[inline(always)]
    pub const fn rook_to(&self, color: Color) -> Square {
        match (self, color) {
            (Self::Short, Color::White) => Square::F1,
            (Self::Long, Color::White) => Square::D1,
            (Self::Short, Color::Black) => Square::F8,
            (Self::Long, Color::Black) => Square::D8,
        }
    }

    /// Squares between the King and the Rook, which must be empty to castle.
    pub fn between(&self, color: Color) -> &'static [Square] {
        match (self, color) {
            (Self::Short, Color::White) => &[Square::F1, Square::G1],
            (Self::Long, Color::White) => &[Square::B1, Square::C1, Square::D1],
            (Self::Short, Color::Black) => &[Square::F8, Square::G8],
            (Self::Long, Color::Black) => &[Square::B8, Square::C8, Square::D8],
        }
    }

    /// Squares the King stands on while castling: start, transit, and landing.
    ///
    /// None of these may be attacked.
    #[inline(always)]
    pub const fn king_path(&self, color: Color) -> [Square; 3] {
        let from = Square::king_home(color);
        [from, self.rook_to(color), self.king_to(color)]
    }

    /// The wing whose Rook starts on `square`, if any.
    pub fn from_rook_home(square: Square, color: Color) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|side| side.rook_from(color) == square)
    }
}

/// Represents a move made on a chess board.
///
/// Castling moves carry the King's start and landing squares in `from` and `to`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    is_capture: bool,
    castle: Option<CastleSide>,
}

impl Move {
    /// Creates a new, non-castling [`Move`].
    #[inline(always)]
    pub const fn new(from: Square, to: Square, is_capture: bool) -> Self {
        Self {
            from,
            to,
            promotion: None,
            is_capture,
            castle: None,
        }
    }

    /// Creates a new pawn [`Move`] that promotes to `promotion`.
    #[inline(always)]
    pub const fn promote(from: Square, to: Square, promotion: PieceKind, is_capture: bool) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            is_capture,
            castle: None,
        }
    }

    /// Creates a castling [`Move`] for `color` towards `side`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{CastleSide, Color, Move, Square};
    /// let mv = Move::castle(Color::Black, CastleSide::Long);
    /// assert_eq!(mv.from(), Square::E8);
    /// assert_eq!(mv.to(), Square::C8);
    /// assert_eq!(mv.to_string(), "O-O-O");
    /// ```
    #[inline(always)]
    pub const fn castle(color: Color, side: CastleSide) -> Self {
        Self {
            from: Square::king_home(color),
            to: side.king_to(color),
            promotion: None,
            is_capture: false,
            castle: Some(side),
        }
    }

    /// Fetches the source (or "from") part of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the piece a pawn promotes to on this move, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns `true` if this move removes an enemy piece, en passant included.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.is_capture
    }

    /// Fetches the castling wing of this move, if it is a castling move.
    #[inline(always)]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        self.castle
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        matches!(self.castle, Some(CastleSide::Short))
    }

    #[inline(always)]
    pub const fn is_long_castle(&self) -> bool {
        matches!(self.castle, Some(CastleSide::Long))
    }

    /// Parses a [`Move`] from text, against the provided board.
    ///
    /// Accepted notation:
    /// * `e2e4`, optionally prefixed by a piece letter (`Ng1f3`)
    /// * `e7e8=Q` for promotions
    /// * `O-O` and `O-O-O` for castling; a King moving two files (`e1g1`) also castles
    ///
    /// This only builds the move. Whether it is legal is up to [`Board::is_legal`].
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Move, PieceKind, Square};
    /// let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    /// let mv = Move::parse(&board, "a7a8=N").unwrap();
    /// assert_eq!(mv.from(), Square::A7);
    /// assert_eq!(mv.promotion(), Some(PieceKind::Knight));
    /// ```
    pub fn parse(board: &Board, text: &str) -> Result<Self> {
        let text = text.trim();
        let color = board.side_to_move();

        match text {
            "O-O" | "0-0" => return Ok(Self::castle(color, CastleSide::Short)),
            "O-O-O" | "0-0-0" => return Ok(Self::castle(color, CastleSide::Long)),
            _ => {}
        }

        let (squares, promotion) = match text.split_once('=') {
            Some((squares, promo)) => {
                let mut chars = promo.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    bail!("Promotion must be a single piece letter. Got {promo:?} in {text:?}");
                };
                let kind = PieceKind::from_char(c)?;
                if !kind.is_promotion() {
                    bail!("Cannot promote to a {} in {text:?}", kind.name());
                }
                (squares, Some(kind))
            }
            None => (text, None),
        };

        if !squares.is_ascii() {
            bail!("Move must be written in ASCII. Got {text:?}");
        }

        // A leading piece letter is allowed, and ignored
        let squares = match squares.len() {
            5 if squares.starts_with(|c: char| c.is_ascii_uppercase()) => &squares[1..],
            4 => squares,
            _ => bail!("Move must name an origin and destination square, such as \"e2e4\". Got {text:?}"),
        };

        let from = Square::from_uci(&squares[..2])?;
        let to = Square::from_uci(&squares[2..])?;

        let mover = board.piece_at(from);
        if mover.is_some_and(|piece| piece.kind() == PieceKind::King)
            && from == Square::king_home(color)
            && promotion.is_none()
        {
            if let Some(side) = CastleSide::all()
                .into_iter()
                .find(|side| side.king_to(color) == to)
            {
                return Ok(Self::castle(color, side));
            }
        }

        let is_ep = mover.is_some_and(|piece| piece.kind() == PieceKind::Pawn)
            && from.file() != to.file()
            && board.ep_square() == Some(to);
        let is_capture = board.piece_at(to).is_some() || is_ep;

        Ok(Self {
            from,
            to,
            promotion,
            is_capture,
            castle: None,
        })
    }
}

impl fmt::Display for Move {
    /// Prints the move as `e2e4`, `e7e8=Q`, `O-O`, or `O-O-O`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle {
            Some(CastleSide::Short) => write!(f, "O-O"),
            Some(CastleSide::Long) => write!(f, "O-O-O"),
            None => {
                write!(f, "{}{}", self.from, self.to)?;
                if let Some(promotion) = self.promotion {
                    write!(f, "={promotion}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Move {
    /// Prints the move along with its capture flag, such as `d5e6 (capture)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_capture {
            write!(f, "{self} (capture)")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Everything [`Board::undo_move`] needs, besides the move itself, to revert [`Board::make_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    /// Piece that stood on the destination square before the move.
    pub(crate) captured: Option<Piece>,

    /// Piece that left the origin square. Differs from the piece on the destination after a promotion.
    pub(crate) moved: Option<Piece>,

    pub(crate) ep_square: Option<Square>,

    pub(crate) castling_rights: [CastlingRights; Color::COUNT],
}
