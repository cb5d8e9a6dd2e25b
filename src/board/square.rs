/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::Color;

/// Represents a single cell of the 10x12 mailbox.
///
/// The 8x8 playing area sits inside a two-cell border (one cell on the files), so that any
/// knight jump or sliding step taken from a playing square lands on a valid cell index.
/// A square is addressed as `21 + rank * 10 + file`, giving `a1 = 21` and `h8 = 98`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self::new(0, 0);
    pub const B1: Self = Self::new(1, 0);
    pub const C1: Self = Self::new(2, 0);
    pub const D1: Self = Self::new(3, 0);
    pub const E1: Self = Self::new(4, 0);
    pub const F1: Self = Self::new(5, 0);
    pub const G1: Self = Self::new(6, 0);
    pub const H1: Self = Self::new(7, 0);
    pub const A2: Self = Self::new(0, 1);
    pub const B2: Self = Self::new(1, 1);
    pub const C2: Self = Self::new(2, 1);
    pub const D2: Self = Self::new(3, 1);
    pub const E2: Self = Self::new(4, 1);
    pub const F2: Self = Self::new(5, 1);
    pub const G2: Self = Self::new(6, 1);
    pub const H2: Self = Self::new(7, 1);
    pub const A3: Self = Self::new(0, 2);
    pub const B3: Self = Self::new(1, 2);
    pub const C3: Self = Self::new(2, 2);
    pub const D3: Self = Self::new(3, 2);
    pub const E3: Self = Self::new(4, 2);
    pub const F3: Self = Self::new(5, 2);
    pub const G3: Self = Self::new(6, 2);
    pub const H3: Self = Self::new(7, 2);
    pub const A4: Self = Self::new(0, 3);
    pub const B4: Self = Self::new(1, 3);
    pub const C4: Self = Self::new(2, 3);
    pub const D4: Self = Self::new(3, 3);
    pub const E4: Self = Self::new(4, 3);
    pub const F4: Self = Self::new(5, 3);
    pub const G4: Self = Self::new(6, 3);
    pub const H4: Self = Self::new(7, 3);
    pub const A5: Self = Self::new(0, 4);
    pub const B5: Self = Self::new(1, 4);
    pub const C5: Self = Self::new(2, 4);
    pub const D5: Self = Self::new(3, 4);
    pub const E5: Self = Self::new(4, 4);
    pub const F5: Self = Self::new(5, 4);
    pub const G5: Self = Self::new(6, 4);
    pub const H5: Self = Self::new(7, 4);
    pub const A6: Self = Self::new(0, 5);
    pub const B6: Self = Self::new(1, 5);
    pub const C6: Self = Self::new(2, 5);
    pub const D6: Self = Self::new(3, 5);
    pub const E6: Self = Self::new(4, 5);
    pub const F6: Self = Self::new(5, 5);
    pub const G6: Self = Self::new(6, 5);
    pub const H6: Self = Self::new(7, 5);
    pub const A7: Self = Self::new(0, 6);
    pub const B7: Self = Self::new(1, 6);
    pub const C7: Self = Self::new(2, 6);
    pub const D7: Self = Self::new(3, 6);
    pub const E7: Self = Self::new(4, 6);
    pub const F7: Self = Self::new(5, 6);
    pub const G7: Self = Self::new(6, 6);
    pub const H7: Self = Self::new(7, 6);
    pub const A8: Self = Self::new(0, 7);
    pub const B8: Self = Self::new(1, 7);
    pub const C8: Self = Self::new(2, 7);
    pub const D8: Self = Self::new(3, 7);
    pub const E8: Self = Self::new(4, 7);
    pub const F8: Self = Self::new(5, 7);
    pub const G8: Self = Self::new(6, 7);
    pub const H8: Self = Self::new(7, 7);

    /// Number of cells in the mailbox, border included.
    pub const COUNT: usize = 120;

    /// Number of playable squares.
    pub const PLAYABLE: usize = 64;

    /// Creates a new playing [`Square`] from a file and rank, both in `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Square;
    /// assert_eq!(Square::new(4, 3), Square::E4);
    /// assert_eq!(Square::new(0, 0).index(), 21);
    /// ```
    #[inline(always)]
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "File and rank must be in [0, 7]");
        Self(21 + rank * 10 + file)
    }

    /// Creates a [`Square`] from a raw mailbox index, which must be in `[0, 119]`.
    ///
    /// The index may name a border cell; use [`Square::is_playable`] to tell them apart.
    pub fn from_index(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            bail!("Invalid mailbox index: Must be in [0, {}]. Got {index}", Self::COUNT - 1)
        }
    }

    /// An iterator over all 64 playing squares, from `a1` to `h8` in mailbox order.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..8).flat_map(|rank| (0..8).map(move |file| Self::new(file, rank)))
    }

    /// Fetches the raw mailbox index of this square.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this square lies inside the 8x8 playing area.
    #[inline(always)]
    pub const fn is_playable(&self) -> bool {
        let col = self.0 % 10;
        let row = self.0 / 10;
        col >= 1 && col <= 8 && row >= 2 && row <= 9
    }

    /// File of this square, in `[0, 7]` (`a` through `h`).
    ///
    /// Only meaningful for playable squares.
    #[inline(always)]
    pub const fn file(&self) -> u8 {
        self.0 % 10 - 1
    }

    /// Rank of this square, in `[0, 7]` (`1` through `8`).
    ///
    /// Only meaningful for playable squares.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.0 / 10 - 2
    }

    /// Rank of this square as seen by `color`, so that each side's back rank is `0`.
    #[inline(always)]
    pub const fn rank_relative_to(&self, color: Color) -> u8 {
        match color {
            Color::White => self.rank(),
            Color::Black => 7 - self.rank(),
        }
    }

    /// Index of this square into a 64-element table written from White's point of view,
    /// with `a8` first and `h1` last, mirrored vertically when `color` is Black.
    #[inline(always)]
    pub const fn table_index(&self, color: Color) -> usize {
        (7 - self.rank_relative_to(color) as usize) * 8 + self.file() as usize
    }

    /// Shifts this square by a mailbox offset.
    ///
    /// Any offset used by a chess piece, applied to a playable square, stays within the mailbox.
    #[inline(always)]
    pub const fn offset(&self, delta: i8) -> Self {
        let index = self.0 as i16 + delta as i16;
        debug_assert!(index >= 0 && index < Self::COUNT as i16, "Offset left the mailbox");
        Self(index as u8)
    }

    /// The square a king starts on for `color`.
    #[inline(always)]
    pub const fn king_home(color: Color) -> Self {
        match color {
            Color::White => Self::E1,
            Color::Black => Self::E8,
        }
    }

    /// Parses a [`Square`] from its name, such as `"e4"`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Square;
    /// assert_eq!(Square::from_uci("e4").unwrap(), Square::E4);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be two characters, such as \"e4\". Got {square:?}");
        };

        let file = match file.to_ascii_lowercase() {
            f @ 'a'..='h' => f as u8 - b'a',
            _ => bail!("Invalid file {file:?} in square {square:?}"),
        };
        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(anyhow!("Invalid rank {rank:?} in square {square:?}"))? as u8;

        Ok(Self::new(file, rank - 1))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_playable() {
            write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_layout() {
        assert_eq!(Square::A1.index(), 21);
        assert_eq!(Square::H1.index(), 28);
        assert_eq!(Square::A8.index(), 91);
        assert_eq!(Square::H8.index(), 98);
        assert_eq!(Square::iter().count(), Square::PLAYABLE);
        assert!(Square::iter().all(|sq| sq.is_playable()));

        let border = (0..Square::COUNT)
            .filter(|&i| !Square::from_index(i).unwrap().is_playable())
            .count();
        assert_eq!(border, Square::COUNT - Square::PLAYABLE);
        assert!(Square::from_index(120).is_err());
    }

    #[test]
    fn test_square_names() {
        for square in Square::iter() {
            assert_eq!(square.to_string().parse::<Square>().unwrap(), square);
        }
        assert_eq!(Square::E4.to_string(), "e4");
        assert!(Square::from_uci("e").is_err());
        assert!(Square::from_uci("e44").is_err());
    }

    #[test]
    fn test_table_index_is_mirrored_for_black() {
        assert_eq!(Square::A8.table_index(Color::White), 0);
        assert_eq!(Square::H1.table_index(Color::White), 63);
        assert_eq!(Square::A1.table_index(Color::Black), 0);
        assert_eq!(Square::E2.table_index(Color::White), Square::E7.table_index(Color::Black));
    }
}
