/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::MAX_DEPTH;

/// A numerical representation of the evaluation of a position / move, in units of ["centipawns"](https://www.chessprogramming.org/Score).
///
/// This value is internally capped at [`Self::INF`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Largest possible score ever achievable.
    pub const INF: Self = Self(i16::MAX as i32);

    /// Score of mate in the current position.
    pub const MATE: Self = Self(Self::INF.0 - 1);

    /// Score of a draw.
    pub const DRAW: Self = Self(0);

    /// Lowest possible score for mate.
    ///
    /// This is only obtainable if mate is possible in [`MAX_DEPTH`] moves.
    pub const LOWEST_MATE: Self = Self(Self::MATE.0 - MAX_DEPTH as i32);

    /// Returns `true` if the score is a mate score.
    #[inline(always)]
    pub fn is_mate(&self) -> bool {
        self.abs() >= Self::LOWEST_MATE
    }

    /// Returns the number of plies (half moves) this score is from mate.
    #[inline(always)]
    pub const fn plies_to_mate(&self) -> i32 {
        Self::MATE.0 - self.0.abs()
    }

    /// Returns the number of moves (full moves) this score is from mate.
    ///
    /// Positive if the side to move delivers mate, negative if it is mated.
    #[inline(always)]
    pub const fn moves_to_mate(&self) -> i32 {
        let plies = self.plies_to_mate();

        // Our own mating move still has to be played, theirs already has
        let relative_to_side = if self.0 > 0 { plies + 1 } else { -plies };

        relative_to_side / 2
    }

    /// Returns the absolute value of this [`Score`].
    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// "Normalizes" a score so that it can be printed as a float, in pawns.
    #[inline(always)]
    pub fn normalize(&self) -> f32 {
        self.0 as f32 / 100.0
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(std::ops::$trait::$fn(self.0, rhs.0))
            }
        }

        impl std::ops::$trait<i32> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self::Output {
                Self(std::ops::$trait::$fn(self.0, rhs))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl fmt::Display for Score {
    /// Prints the raw centipawn value.
    ///
    /// The alternate formatter (`#`) prints `cp <n>`, or `mate <n>` for mate scores.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            self.0.fmt(f)
        } else if self.is_mate() {
            write!(f, "mate {}", self.moves_to_mate())
        } else {
            write!(f, "cp {}", self.0)
        }
    }
}

impl fmt::Debug for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            write!(
                f,
                "{} (mate in {} plies {} moves)",
                self.0,
                self.plies_to_mate(),
                self.moves_to_mate()
            )
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_to_mate() {
        // We mate on our next move
        let our_mate = Score::MATE - 1;
        assert_eq!(our_mate.plies_to_mate(), 1);
        assert_eq!(our_mate.moves_to_mate(), 1);

        // We are mated after our move
        let their_mate = -(Score::MATE - 2);
        assert_eq!(their_mate.plies_to_mate(), 2);
        assert_eq!(their_mate.moves_to_mate(), -1);

        assert!(our_mate.is_mate());
        assert!(their_mate.is_mate());
        assert!(!Score(900).is_mate());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Score(5) + Score(3), Score(8));
        assert_eq!(Score(5) - Score(3), Score(2));
        assert_eq!(-Score::MATE + 3, Score(3 - Score::MATE.0));
        assert_eq!(Score::MATE - 1, Score(Score::MATE.0 - 1));
        assert_eq!(Score(109) * -1, Score(-109));
        assert_eq!(-Score(-7), Score(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(Score(-35).to_string(), "-35");
        assert_eq!(format!("{:#}", Score(-35)), "cp -35");
        assert_eq!(format!("{:#}", Score::MATE - 1), "mate 1");
        assert_eq!(format!("{:#}", -Score::MATE), "mate 0");
    }
}
