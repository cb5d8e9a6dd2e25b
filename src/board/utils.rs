/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Color;

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Mailbox offsets of a knight's jumps.
pub const KNIGHT_OFFSETS: [i8; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];

/// Mailbox offsets of a king's single steps.
pub const KING_OFFSETS: [i8; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

/// Mailbox steps along the four diagonals.
pub const BISHOP_DIRECTIONS: [i8; 4] = [11, 9, -9, -11];

/// Mailbox steps along the four ranks and files.
pub const ROOK_DIRECTIONS: [i8; 4] = [10, 1, -1, -10];

/// Mailbox steps along all eight lines a queen may travel.
pub const QUEEN_DIRECTIONS: [i8; 8] = [11, 10, 9, 1, -1, -9, -10, -11];

/// Mailbox offset of a single pawn push for `color`.
#[inline(always)]
pub const fn pawn_push(color: Color) -> i8 {
    match color {
        Color::White => 10,
        Color::Black => -10,
    }
}

/// Mailbox offsets of a pawn's two capture diagonals for `color`.
#[inline(always)]
pub const fn pawn_captures(color: Color) -> [i8; 2] {
    match color {
        Color::White => [9, 11],
        Color::Black => [-9, -11],
    }
}
