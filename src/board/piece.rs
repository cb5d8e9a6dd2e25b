/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a player or piece.
///
/// In Western chess, White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns a multiplier for negating numbers relative to this color.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::White.negation_multiplier(), 1);
    /// assert_eq!(Color::Black.negation_multiplier(), -1);
    /// ```
    #[inline(always)]
    pub const fn negation_multiplier(&self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    ///
    /// Will be `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a [`Color`] from a `char`, as found in the side-to-move field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Color;
    /// assert_eq!(Color::from_char('b').unwrap(), Color::Black);
    /// assert!(Color::from_char('x').is_err());
    /// ```
    pub fn from_char(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color:?}"),
        }
    }

    /// Converts this [`Color`] to a char, as found in the side-to-move field of a FEN string.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => bail!("Color must be a single character. Found {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// The kinds a pawn may promote to, in the order they are generated.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Queen, Rook, Bishop, Knight]
    }

    /// Returns `true` if a pawn is allowed to promote to this kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(self, Self::Knight | Self::Bishop | Self::Rook | Self::Queen)
    }

    /// Creates a [`PieceKind`] from a character, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use tadpole::PieceKind;
    /// assert_eq!(PieceKind::from_char('q').unwrap(), PieceKind::Queen);
    /// assert_eq!(PieceKind::from_char('N').unwrap(), PieceKind::Knight);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(kind: char) -> Result<Self> {
        match kind.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Must be one of [p, n, b, r, q, k]. Got {kind:?}"),
        }
    }

    /// Converts this [`PieceKind`] to an uppercase character.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A chess piece: a [`PieceKind`] owned by a [`Color`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);
    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    /// Creates a new [`Piece`] from the provided [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Fetches the [`Color`] of this piece.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this piece.
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns `true` if this piece is of the provided color and kind.
    #[inline(always)]
    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }

    /// Creates a [`Piece`] from a FEN character, where uppercase is White and lowercase is Black.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Color, Piece, PieceKind};
    /// let black_knight = Piece::from_char('n').unwrap();
    /// assert_eq!(black_knight, Piece::new(Color::Black, PieceKind::Knight));
    /// ```
    pub fn from_char(piece: char) -> Result<Self> {
        let color = if piece.is_ascii_lowercase() {
            Color::Black
        } else {
            Color::White
        };

        Ok(Self::new(color, PieceKind::from_char(piece)?))
    }

    /// Converts this piece to its FEN character.
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// The contents of a single cell of the mailbox.
///
/// Cells in the border around the playing area are [`Cell::OffBoard`] and never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    OffBoard,
    Empty,
    Occupied(Piece),
}

impl Cell {
    /// Returns the piece in this cell, if there is one.
    #[inline(always)]
    pub const fn piece(&self) -> Option<Piece> {
        match self {
            Self::Occupied(piece) => Some(*piece),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline(always)]
    pub const fn is_off_board(&self) -> bool {
        matches!(self, Self::OffBoard)
    }

    /// Returns `true` if this cell holds a piece of the provided color.
    #[inline(always)]
    pub fn is_color(&self, color: Color) -> bool {
        self.piece().is_some_and(|piece| piece.color() == color)
    }

    /// Returns `true` if this cell holds exactly the provided piece.
    #[inline(always)]
    pub fn holds(&self, color: Color, kind: PieceKind) -> bool {
        self.piece().is_some_and(|piece| piece.is(color, kind))
    }
}

impl From<Option<Piece>> for Cell {
    fn from(value: Option<Piece>) -> Self {
        match value {
            Some(piece) => Self::Occupied(piece),
            None => Self::Empty,
        }
    }
}
