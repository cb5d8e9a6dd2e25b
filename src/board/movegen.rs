/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    pawn_captures, pawn_push, Board, CastleSide, Cell, Move, PieceKind, Square, BISHOP_DIRECTIONS,
    KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};

impl Board {
    /// Generates every legal move for the side to move.
    ///
    /// Castling comes first (kingside, then queenside), followed by the moves of each piece
    /// in square order from `a1` to `h8`.
    ///
    /// # Example
    /// ```
    /// # use tadpole::Board;
    /// assert_eq!(Board::new().legal_moves().len(), 20);
    /// ```
    pub fn legal_moves(&self) -> Vec<Move> {
        let color = self.side_to_move();
        let mut moves = Vec::with_capacity(48);

        for side in CastleSide::all() {
            let mv = Move::castle(color, side);
            if self.is_legal(mv) {
                moves.push(mv);
            }
        }

        for square in Square::iter() {
            if self.cell(square).is_color(color) {
                self.push_moves_from(square, &mut moves);
            }
        }

        moves
    }

    /// Generates every legal move of the piece on `square`.
    ///
    /// Castling moves are included when `square` holds the King.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from() == square)
            .collect()
    }

    /// Returns `true` if the side to move has no legal moves.
    ///
    /// This holds for stalemate as well as checkmate. See [`Board::is_checkmate`] and
    /// [`Board::is_stalemate`] to tell them apart.
    pub fn is_checkmated(&self) -> bool {
        self.legal_moves().is_empty()
    }

    /// Returns `true` if the side to move is in check and has no legal moves.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.is_checkmated()
    }

    /// Returns `true` if the side to move is not in check but has no legal moves.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.is_checkmated()
    }

    /// Submits every candidate destination of the piece on `from` to [`Board::is_legal`].
    fn push_moves_from(&self, from: Square, moves: &mut Vec<Move>) {
        let Cell::Occupied(piece) = self.cell(from) else {
            return;
        };

        match piece.kind() {
            PieceKind::Pawn => self.push_pawn_moves(from, moves),
            PieceKind::Knight => self.push_steps(from, &KNIGHT_OFFSETS, moves),
            PieceKind::Bishop => self.push_slides(from, &BISHOP_DIRECTIONS, moves),
            PieceKind::Rook => self.push_slides(from, &ROOK_DIRECTIONS, moves),
            PieceKind::Queen => self.push_slides(from, &QUEEN_DIRECTIONS, moves),
            PieceKind::King => self.push_steps(from, &KING_OFFSETS, moves),
        }
    }

    fn push_pawn_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let color = self.side_to_move();
        let push = pawn_push(color);

        let mut targets = vec![from.offset(push)];
        if from.rank_relative_to(color) == 1 {
            targets.push(from.offset(2 * push));
        }
        targets.extend(pawn_captures(color).map(|offset| from.offset(offset)));

        for to in targets {
            if self.cell(to).is_off_board() {
                continue;
            }

            let is_capture = self.cell(to).is_color(color.opponent())
                || (self.ep_square() == Some(to) && from.file() != to.file());

            if to.rank_relative_to(color) == 7 {
                for kind in PieceKind::promotions() {
                    self.push_if_legal(Move::promote(from, to, kind, is_capture), moves);
                }
            } else {
                self.push_if_legal(Move::new(from, to, is_capture), moves);
            }
        }
    }

    fn push_steps(&self, from: Square, offsets: &[i8], moves: &mut Vec<Move>) {
        let enemy = self.side_to_move().opponent();
        for &offset in offsets {
            let to = from.offset(offset);
            if !self.cell(to).is_off_board() {
                let is_capture = self.cell(to).is_color(enemy);
                self.push_if_legal(Move::new(from, to, is_capture), moves);
            }
        }
    }

    fn push_slides(&self, from: Square, directions: &[i8], moves: &mut Vec<Move>) {
        let enemy = self.side_to_move().opponent();
        for &dir in directions {
            let mut to = from.offset(dir);
            loop {
                match self.cell(to) {
                    Cell::Empty => self.push_if_legal(Move::new(from, to, false), moves),
                    Cell::Occupied(piece) => {
                        if piece.color() == enemy {
                            self.push_if_legal(Move::new(from, to, true), moves);
                        }
                        break;
                    }
                    Cell::OffBoard => break,
                }
                to = to.offset(dir);
            }
        }
    }

    #[inline(always)]
    fn push_if_legal(&self, mv: Move, moves: &mut Vec<Move>) {
        if self.is_legal(mv) {
            moves.push(mv);
        }
    }
}

/// Nudges captures towards the front of `moves`.
///
/// Makes a single pass from left to right, swapping a capture with the move directly before
/// it when that move is not a capture. This is not a full sort: a capture moves at most one slot.
///
/// # Example
/// ```
/// # use tadpole::{order_moves, Move, Square};
/// let quiet = Move::new(Square::A2, Square::A3, false);
/// let capture = Move::new(Square::B2, Square::C3, true);
/// let mut moves = [quiet, quiet, capture];
/// order_moves(&mut moves);
/// assert_eq!(moves, [quiet, capture, quiet]);
/// ```
pub fn order_moves(moves: &mut [Move]) {
    for i in 1..moves.len() {
        if moves[i].is_capture() && !moves[i - 1].is_capture() {
            moves.swap(i - 1, i);
        }
    }
}
