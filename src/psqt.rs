/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Color, Piece, PieceKind, Score, Square};

/// Centipawns awarded per point of a table entry.
pub const PSQT_WEIGHT: i32 = 9;

/// Pawn bonus table, in points, written from White's perspective with `a8` first.
///
/// Rewards central and advanced pawns.
#[rustfmt::skip]
const PAWN: Psqt = Psqt::new([
     0,  0,  0,  0,  0,  0,  0,  0,
    10, 10, 10, 10, 10, 10, 10, 10,
     4,  4,  5,  6,  6,  5,  4,  4,
     2,  2,  3,  5,  5,  3,  2,  2,
     1,  1,  2,  4,  4,  2,  1,  1,
     1,  0,  1,  2,  2,  1,  0,  1,
     1,  1,  1, -2, -2,  1,  1,  1,
     0,  0,  0,  0,  0,  0,  0,  0,
]);

/// A Piece-Square Table: a per-square bonus for a kind of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psqt([i32; Square::PLAYABLE]);

impl Psqt {
    /// Positional bonus of `piece` standing on `square`, in centipawns.
    ///
    /// Only pawns have a table; every other piece scores zero.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Piece, Psqt, Score, Square};
    /// assert_eq!(Psqt::eval(Piece::WHITE_PAWN, Square::E7), Score(90));
    /// assert_eq!(Psqt::eval(Piece::BLACK_PAWN, Square::E2), Score(90));
    /// assert_eq!(Psqt::eval(Piece::WHITE_ROOK, Square::E7), Score(0));
    /// ```
    #[inline(always)]
    pub fn eval(piece: Piece, square: Square) -> Score {
        Self::get_table_for(piece.kind())
            .map(|table| Score(table.get_relative(square, piece.color()) * PSQT_WEIGHT))
            .unwrap_or(Score::DRAW)
    }

    /// Fetch the table for the provided [`PieceKind`], if it has one.
    #[inline(always)]
    pub fn get_table_for(kind: PieceKind) -> Option<&'static Self> {
        match kind {
            PieceKind::Pawn => Some(&PAWN),
            _ => None,
        }
    }

    /// Creates a new [`Psqt`] from points written from White's perspective.
    const fn new(psqt: [i32; Square::PLAYABLE]) -> Self {
        Self(psqt)
    }

    /// Get the points of this table at the provided square, relative to `color`.
    #[inline(always)]
    pub const fn get_relative(&self, square: Square, color: Color) -> i32 {
        self.0[square.table_index(color)]
    }
}

impl fmt::Display for Psqt {
    /// Printing a [`Psqt`] will display it in the same way it is written in the code (White's perspective).
    ///
    /// If the alternate formatter is used (`#`), it will print as if from Black's perspective.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = if f.alternate() {
            Color::Black
        } else {
            Color::White
        };

        for rank in (0..8).rev() {
            write!(f, "{}| ", rank + 1)?;
            for file in 0..8 {
                let value = self.get_relative(Square::new(file, rank), color);
                write!(f, "{value:3} ")?;
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..8 {
            write!(f, "----")?;
        }
        write!(f, "\n    ")?;
        for file in 'a'..='h' {
            write!(f, "{file}   ")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_is_mirrored_for_colors() {
        for square in Square::iter() {
            for kind in PieceKind::all() {
                let mirrored = Square::new(square.file(), 7 - square.rank());
                let white = Psqt::eval(Piece::new(Color::White, kind), square);
                let black = Psqt::eval(Piece::new(Color::Black, kind), mirrored);

                assert_eq!(
                    white,
                    black,
                    "{} on {square}: {white} (white) != {black} (black)",
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn test_display_matches_source_layout() {
        let printed = PAWN.to_string();
        let first = printed.lines().next().unwrap();
        assert_eq!(first.trim_end(), "8|   0   0   0   0   0   0   0   0");
        assert!(printed.lines().nth(6).unwrap().contains(" -2 "));
    }
}
