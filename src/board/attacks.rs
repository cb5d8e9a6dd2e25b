/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    pawn_captures, Board, Cell, Color, PieceKind, Square, BISHOP_DIRECTIONS, KING_OFFSETS,
    KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

impl Board {
    /// Returns `true` if the King of the side to move is attacked.
    ///
    /// A position without such a King is never in check.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Board;
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
    /// assert!(board.is_in_check());
    /// assert!(!Board::new().is_in_check());
    /// ```
    pub fn is_in_check(&self) -> bool {
        let color = self.side_to_move();
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, color.opponent()))
    }

    /// Returns `true` if any piece of color `by` attacks `square`.
    ///
    /// Probes outward from `square`: knight jumps, the two pawn diagonals, King steps,
    /// then the diagonal and orthogonal rays up to the first occupied cell.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        let hits = |offset: i8, kind: PieceKind| self.cell(square.offset(offset)).holds(by, kind);

        if KNIGHT_OFFSETS
            .into_iter()
            .any(|offset| hits(offset, PieceKind::Knight))
        {
            return true;
        }

        // An attacking pawn sits on the square a defending pawn would capture onto
        if pawn_captures(by.opponent())
            .into_iter()
            .any(|offset| hits(offset, PieceKind::Pawn))
        {
            return true;
        }

        if KING_OFFSETS
            .into_iter()
            .any(|offset| hits(offset, PieceKind::King))
        {
            return true;
        }

        let slider_hits = |directions: [i8; 4], kind: PieceKind| {
            directions.into_iter().any(|dir| match self.first_blocker(square, dir) {
                Cell::Occupied(piece) => {
                    piece.color() == by && (piece.kind() == kind || piece.kind() == PieceKind::Queen)
                }
                _ => false,
            })
        };

        slider_hits(BISHOP_DIRECTIONS, PieceKind::Bishop)
            || slider_hits(ROOK_DIRECTIONS, PieceKind::Rook)
    }

    /// Walks from `square` in steps of `dir` and returns the first cell that is not empty.
    ///
    /// This is either an occupied cell or the border.
    #[inline(always)]
    fn first_blocker(&self, square: Square, dir: i8) -> Cell {
        let mut current = square.offset(dir);
        loop {
            match self.cell(current) {
                Cell::Empty => current = current.offset(dir),
                cell => return cell,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_check(fen: &str) -> bool {
        Board::from_fen(fen).unwrap().is_in_check()
    }

    #[test]
    fn test_startpos_has_no_checks() {
        let mut board = Board::new();
        assert!(!board.is_in_check());
        board.toggle_side_to_move();
        assert!(!board.is_in_check());
    }

    #[test]
    fn test_knight_check() {
        assert!(in_check("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1"));
        assert!(!in_check("4k3/8/8/8/8/4n3/8/4K3 w - - 0 1"));
    }

    #[test]
    fn test_pawn_checks_depend_on_direction() {
        // Black pawn on d2 attacks e1
        assert!(in_check("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1"));
        // Black pawn on d1's rank does not attack backwards
        assert!(!in_check("4k3/8/8/8/8/8/8/3pK3 w - - 0 1"));
        // White pawn on f7 attacks e8
        assert!(in_check("4k3/5P2/8/8/8/8/8/4K3 b - - 0 1"));
        // A friendly pawn is never an attacker
        assert!(!in_check("4k3/8/8/8/8/8/3P4/4K3 w - - 0 1"));
    }

    #[test]
    fn test_sliders_are_blocked() {
        assert!(in_check("4k3/8/8/8/8/8/8/r3K3 w - - 0 1"));
        assert!(!in_check("4k3/8/8/8/8/8/8/r1N1K3 w - - 0 1"));
        assert!(in_check("4k3/8/8/b7/8/8/8/4K3 w - - 0 1"));
        assert!(!in_check("4k3/8/8/b7/8/2P5/8/4K3 w - - 0 1"));
        assert!(in_check("4k3/8/8/8/8/8/8/q3K3 w - - 0 1"));
        assert!(in_check("4k3/8/8/q7/8/8/8/4K3 w - - 0 1"));
        // A rook does not attack along a diagonal
        assert!(!in_check("4k3/8/8/r7/8/8/8/4K3 w - - 0 1"));
    }

    #[test]
    fn test_adjacent_king_attacks() {
        let board = Board::from_fen("8/8/8/8/8/8/3k4/4K3 w - - 0 1").unwrap();
        assert!(board.is_in_check());
        assert!(board.is_attacked(Square::D1, Color::Black));
    }
}
