/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{pawn_push, Board, CastleSide, CastlingRights, Color, Move, Piece, PieceKind, Undo};

impl Board {
    /// Applies `mv` to this board, returning what is needed to revert it with [`Board::undo_move`].
    ///
    /// The move must be legal in this position (see [`Board::is_legal`]). A pawn reaching the
    /// last rank without a promotion piece becomes a Queen.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Move, Square};
    /// let mut board = Board::new();
    /// let mv = Move::new(Square::E2, Square::E4, false);
    /// let undo = board.make_move(mv);
    /// assert_eq!(board.ep_square(), Some(Square::E3));
    ///
    /// board.undo_move(mv, undo);
    /// assert_eq!(board, Board::new());
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let color = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        let undo = Undo {
            captured: if mv.is_castle() { None } else { self.piece_at(to) },
            moved: self.piece_at(from),
            ep_square: self.ep_square,
            castling_rights: self.castling_rights,
        };

        let ep_target = self.ep_square.take();

        if let Some(side) = mv.castle_side() {
            let king = self.take(from);
            let rook = self.take(side.rook_from(color));
            self.set(to, king);
            self.set(side.rook_to(color), rook);
            self.castling_rights[color.index()] = CastlingRights::default();
        } else {
            debug_assert!(
                undo.moved.is_some_and(|piece| piece.color() == color),
                "{color} cannot move from {from} in {self:?}"
            );

            let mut piece = self.take(from);

            if let Some(moved) = piece.filter(|p| p.kind() == PieceKind::Pawn) {
                let push = pawn_push(color);
                let delta = to.index() as i16 - from.index() as i16;

                if delta == 2 * push as i16 {
                    self.ep_square = Some(from.offset(push));
                } else if ep_target == Some(to) && from.file() != to.file() {
                    self.take(to.offset(-push));
                } else if to.rank_relative_to(color) == 7 {
                    let kind = mv.promotion().unwrap_or(PieceKind::Queen);
                    piece = Some(Piece::new(moved.color(), kind));
                }
            }

            if piece.is_some_and(|p| p.kind() == PieceKind::King) {
                self.castling_rights[color.index()] = CastlingRights::default();
            }

            self.set(to, piece);
        }

        // Anything leaving or landing on a Rook's home corner ends castling on that wing
        for square in [from, to] {
            for owner in Color::all() {
                if let Some(side) = CastleSide::from_rook_home(square, owner) {
                    self.castling_rights[owner.index()].clear(side);
                }
            }
        }

        self.side_to_move = color.opponent();
        undo
    }

    /// Reverts `mv`, which must be the last move applied with [`Board::make_move`].
    ///
    /// `undo` is the value that call returned.
    pub fn undo_move(&mut self, mv: Move, undo: Undo) {
        let color = self.side_to_move.opponent();
        let (from, to) = (mv.from(), mv.to());

        if let Some(side) = mv.castle_side() {
            self.take(to);
            self.take(side.rook_to(color));
            self.place(Piece::new(color, PieceKind::King), from);
            self.place(Piece::new(color, PieceKind::Rook), side.rook_from(color));
        } else {
            self.set(from, undo.moved);
            self.set(to, undo.captured);

            let was_ep = undo.ep_square == Some(to)
                && from.file() != to.file()
                && undo.moved.is_some_and(|p| p.kind() == PieceKind::Pawn);
            if was_ep {
                let behind = to.offset(-pawn_push(color));
                self.place(Piece::new(color.opponent(), PieceKind::Pawn), behind);
            }
        }

        self.ep_square = undo.ep_square;
        self.castling_rights = undo.castling_rights;
        self.side_to_move = color;
    }

    /// Passes the turn to the opponent without moving a piece.
    ///
    /// Any en passant target is cleared, as it would be by a real move.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        self.ep_square = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Square, FEN_KIWIPETE};

    fn play(board: &mut Board, text: &str) -> (Move, Undo) {
        let mv = Move::parse(board, text).unwrap();
        assert!(board.is_legal(mv), "{text} should be legal in {board:?}");
        (mv, board.make_move(mv))
    }

    #[test]
    fn test_every_move_round_trips() {
        for fen in [
            FEN_KIWIPETE,
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
        ] {
            let mut board = Board::from_fen(fen).unwrap();
            let original = board;
            for mv in board.legal_moves() {
                let undo = board.make_move(mv);
                assert_ne!(board.side_to_move(), original.side_to_move());
                board.undo_move(mv, undo);
                assert_eq!(board, original, "{mv:?} did not round trip");
            }
        }
    }

    #[test]
    fn test_double_push_sets_passed_square() {
        let mut board = Board::new();
        play(&mut board, "d2d4");
        assert_eq!(board.ep_square(), Some(Square::D3));
        play(&mut board, "g8f6");
        assert_eq!(board.ep_square(), None);
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let original = board;
        let (mv, undo) = play(&mut board, "e5d6");
        assert_eq!(board.piece_at(Square::D5), None);
        assert_eq!(board.piece_at(Square::D6), Some(Piece::WHITE_PAWN));

        board.undo_move(mv, undo);
        assert_eq!(board, original);
    }

    #[test]
    fn test_castling_relocates_king_and_rook() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut board, "O-O");
        assert_eq!(board.piece_at(Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Square::F1), Some(Piece::WHITE_ROOK));
        assert_eq!(board.piece_at(Square::E1), None);
        assert_eq!(board.piece_at(Square::H1), None);
        assert!(!board.castling_rights(Color::White).any());
        assert!(board.castling_rights(Color::Black).any());

        play(&mut board, "O-O-O");
        assert_eq!(board.piece_at(Square::C8), Some(Piece::BLACK_KING));
        assert_eq!(board.piece_at(Square::D8), Some(Piece::BLACK_ROOK));
        assert_eq!(board.castling_rights_fen(), "-");
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let original = board;
        let mv = Move::new(Square::A7, Square::A8, false);
        let undo = board.make_move(mv);
        assert_eq!(
            board.piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );

        board.undo_move(mv, undo);
        assert_eq!(board.piece_at(Square::A7), Some(Piece::WHITE_PAWN));
        assert_eq!(board, original);
    }

    #[test]
    fn test_underpromotion() {
        let mut board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        play(&mut board, "a7b8=N");
        assert_eq!(
            board.piece_at(Square::B8),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn test_rook_capture_forfeits_one_wing() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut board, "a1a8");
        assert_eq!(board.castling_rights_fen(), "Kk");

        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut board, "h1h2");
        assert_eq!(board.castling_rights_fen(), "Qkq");
    }

    #[test]
    fn test_king_move_forfeits_both_wings() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut board, "e1e2");
        assert_eq!(board.castling_rights_fen(), "kq");
    }

    #[test]
    fn test_null_move_clears_en_passant() {
        let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        board.toggle_side_to_move();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.ep_square(), None);
    }
}
