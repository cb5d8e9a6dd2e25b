/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    pawn_captures, pawn_push, Board, CastleSide, Cell, Move, Piece, PieceKind, Square,
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

impl Board {
    /// Returns `true` if `mv` may be played by the side to move in this position.
    ///
    /// The board is never modified; any hypothetical positions are built on a copy.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Move, Square};
    /// let board = Board::new();
    /// assert!(board.is_legal(Move::new(Square::E2, Square::E4, false)));
    /// assert!(!board.is_legal(Move::new(Square::E2, Square::E5, false)));
    /// assert!(!board.is_legal(Move::new(Square::E7, Square::E5, false)));
    /// ```
    pub fn is_legal(&self, mv: Move) -> bool {
        if let Some(side) = mv.castle_side() {
            return self.is_legal_castle(side);
        }

        let color = self.side_to_move();
        let (from, to) = (mv.from(), mv.to());

        let Cell::Occupied(piece) = self.cell(from) else {
            return false;
        };
        if piece.color() != color || self.cell(to).is_off_board() || self.cell(to).is_color(color) {
            return false;
        }

        // Promotions happen exactly when a pawn reaches the last rank
        let reaches_last_rank =
            piece.kind() == PieceKind::Pawn && to.rank_relative_to(color) == 7;
        match mv.promotion() {
            Some(kind) if !reaches_last_rank || !kind.is_promotion() => return false,
            None if reaches_last_rank => return false,
            _ => {}
        }

        match piece.kind() {
            PieceKind::Pawn => self.is_legal_pawn(from, to),
            PieceKind::Knight => self.is_legal_step(from, to, &KNIGHT_OFFSETS),
            PieceKind::Bishop => self.is_legal_slide(from, to, &BISHOP_DIRECTIONS),
            PieceKind::Rook => self.is_legal_slide(from, to, &ROOK_DIRECTIONS),
            PieceKind::Queen => {
                self.is_legal_slide(from, to, &ROOK_DIRECTIONS)
                    || self.is_legal_slide(from, to, &BISHOP_DIRECTIONS)
            }
            PieceKind::King => self.is_legal_step(from, to, &KING_OFFSETS),
        }
    }

    /// Castling requires the right, the Rook at home, empty squares in between, and a King
    /// that is not attacked on its start, transit, or landing square.
    fn is_legal_castle(&self, side: CastleSide) -> bool {
        let color = self.side_to_move();
        let king_home = Square::king_home(color);

        if !self.castling_rights(color).get(side)
            || !self.cell(king_home).holds(color, PieceKind::King)
            || !self.cell(side.rook_from(color)).holds(color, PieceKind::Rook)
            || side.between(color).iter().any(|&sq| !self.cell(sq).is_empty())
        {
            return false;
        }

        side.king_path(color).into_iter().all(|square| {
            let mut sim = *self;
            sim.take(king_home);
            sim.place(Piece::new(color, PieceKind::King), square);
            !sim.is_in_check()
        })
    }

    /// Pushes, double pushes, captures, and en passant captures.
    fn is_legal_pawn(&self, from: Square, to: Square) -> bool {
        let color = self.side_to_move();
        let push = pawn_push(color);
        let delta = to.index() as i16 - from.index() as i16;

        // Square of a pawn taken en passant
        let mut ep_victim = None;

        if delta == push as i16 {
            if !self.cell(to).is_empty() {
                return false;
            }
        } else if delta == 2 * push as i16 {
            if from.rank_relative_to(color) != 1
                || !self.cell(from.offset(push)).is_empty()
                || !self.cell(to).is_empty()
            {
                return false;
            }
        } else if pawn_captures(color).iter().any(|&c| delta == c as i16) {
            match self.cell(to) {
                Cell::Occupied(victim) if victim.color() != color => {}
                Cell::Empty if self.ep_square() == Some(to) => {
                    let behind = to.offset(-push);
                    if !self.cell(behind).holds(color.opponent(), PieceKind::Pawn) {
                        return false;
                    }
                    ep_victim = Some(behind);
                }
                _ => return false,
            }
        } else {
            return false;
        }

        let mut sim = *self;
        if let Some(victim) = ep_victim {
            sim.take(victim);
        }
        sim.relocate(from, to);
        !sim.is_in_check()
    }

    /// Knight and King moves: `to` must be one fixed offset away from `from`.
    fn is_legal_step(&self, from: Square, to: Square, offsets: &[i8]) -> bool {
        let delta = to.index() as i16 - from.index() as i16;
        offsets.iter().any(|&offset| delta == offset as i16) && self.is_safe_after(from, to)
    }

    /// Bishop and Rook moves: `to` must be reachable along one ray with nothing in between.
    fn is_legal_slide(&self, from: Square, to: Square, directions: &[i8]) -> bool {
        directions.iter().any(|&dir| self.ray_reaches(from, to, dir)) && self.is_safe_after(from, to)
    }

    /// Returns `true` if walking from `from` in steps of `dir` arrives at `to` before hitting anything.
    fn ray_reaches(&self, from: Square, to: Square, dir: i8) -> bool {
        let mut current = from.offset(dir);
        loop {
            if current == to {
                return true;
            }
            if !self.cell(current).is_empty() {
                return false;
            }
            current = current.offset(dir);
        }
    }

    /// Returns `true` if moving the piece on `from` to `to` leaves the mover's King safe.
    fn is_safe_after(&self, from: Square, to: Square) -> bool {
        let mut sim = *self;
        sim.relocate(from, to);
        !sim.is_in_check()
    }

    /// Moves whatever stands on `from` onto `to`, overwriting it.
    #[inline(always)]
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let piece = self.take(from);
        self.set(to, piece);
    }
}
