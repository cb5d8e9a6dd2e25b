/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Board, Color, PieceKind, Psqt, Score, Square};

/// Weight of the mobility term, in centipawns.
///
/// Reached only when one side has every legal move and the other has none.
pub const MOBILITY_WEIGHT: i32 = 400;

/// Encapsulates the logic of scoring a chess position.
///
/// Positions are evaluated from the side-to-move's perspective, as a negamax search expects:
/// if it is Black's turn, a "good" evaluation for Black will be a positive number.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The board whose position to evaluate.
    board: &'a Board,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] for the provided board.
    #[inline(always)]
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Evaluate this position from the side-to-move's perspective.
    ///
    /// A positive/high number is good for the side-to-move, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Evaluator, Score};
    /// let board = Board::new();
    /// assert_eq!(Evaluator::new(&board).eval(), Score(0));
    /// ```
    #[inline(always)]
    pub fn eval(&self) -> Score {
        self.material_and_position(self.board.side_to_move()) + self.mobility()
    }

    /// Sum of piece values and pawn bonuses, from `color`'s perspective.
    fn material_and_position(&self, color: Color) -> Score {
        self.board.iter().fold(Score::DRAW, |score, (square, piece)| {
            let value = Score(value_of(piece.kind())) + Psqt::eval(piece, square);
            if piece.color() == color {
                score + value
            } else {
                score - value
            }
        })
    }

    /// Compares the number of legal moves of both sides, from the side-to-move's perspective.
    ///
    /// The opponent's moves are counted on a copy of the board with the turn passed to them.
    fn mobility(&self) -> Score {
        let (ours, theirs) = self.move_counts();
        let total = ours + theirs;

        if total == 0 {
            Score::DRAW
        } else {
            Score(MOBILITY_WEIGHT * (ours - theirs) / total)
        }
    }

    /// Legal move counts of the side to move and of its opponent.
    fn move_counts(&self) -> (i32, i32) {
        let ours = self.board.legal_moves().len() as i32;

        let mut flipped = *self.board;
        flipped.toggle_side_to_move();
        let theirs = flipped.legal_moves().len() as i32;

        (ours, theirs)
    }

    /// Fetches the value for the piece on the specified square, if one exists, from White's perspective.
    ///
    /// Only used when printing the evaluator
    #[inline(always)]
    fn value_at(&self, square: Square) -> Option<Score> {
        self.board.piece_at(square).map(|piece| {
            (Score(value_of(piece.kind())) + Psqt::eval(piece, square))
                * piece.color().negation_multiplier()
        })
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.board.side_to_move();

        write!(f, "  +")?;
        for _ in 0..8 {
            write!(f, "-----+")?;
        }
        writeln!(f)?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;

            // Step 1: Write the piece char
            for file in 0..8 {
                let piece = self.board.piece_at(Square::new(file, rank));
                let piece_char = piece.map(|p| p.char()).unwrap_or(' ');
                write!(f, "  {piece_char}  |")?;
            }
            writeln!(f)?;
            write!(f, "  |")?;

            // Step 2: Write the contribution of that piece
            for file in 0..8 {
                let score = if let Some(val) = self.value_at(Square::new(file, rank)) {
                    let s = if val > Score::DRAW {
                        format!("+{}", val.normalize())
                    } else {
                        format!("{}", val.normalize())
                    };

                    format!("{s:^5}")
                } else {
                    String::from("     ")
                };
                write!(f, "{score}|")?;
            }

            writeln!(f)?;

            write!(f, "  +")?;
            for _ in 0..8 {
                write!(f, "-----+")?;
            }
            writeln!(f)?;
        }
        for file in 'a'..='h' {
            write!(f, "     {file}")?;
        }

        let (ours, theirs) = self.move_counts();
        let score = self.eval();

        let winning_side = if score > Score::DRAW {
            Some(color)
        } else if score < Score::DRAW {
            Some(color.opponent())
        } else {
            None
        };

        writeln!(f, "\n\nMaterial: {}", self.material_and_position(color))?;
        writeln!(
            f,
            "Mobility: {} ({ours} moves vs {theirs})",
            self.mobility()
        )?;
        writeln!(
            f,
            "Winning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )?;
        writeln!(f, "Score: {score}")?;

        Ok(())
    }
}

/// Returns a value of the provided `PieceKind`, in centipawns.
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 310,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0, // King is invaluable, but 0 is easier to work with in computations
    }
}
