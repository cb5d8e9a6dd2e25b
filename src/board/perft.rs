/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::debug;

use super::Board;

/// Counts the leaf nodes of the legal move tree of `board`, `depth` plies deep.
///
/// Moves are made and unmade on `board` itself, which is left as it was found.
///
/// # Example
/// ```
/// # use tadpole::{perft, Board};
/// let mut board = Board::new();
/// assert_eq!(perft(&mut board, 2), 400);
/// ```
pub fn perft(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();

    // Bulk counting
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let undo = board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.undo_move(mv, undo);
    }

    nodes
}

/// Like [`perft`], but prints the node count beneath each root move as it is searched.
///
/// Returns the total node count.
pub fn splitperft(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in board.legal_moves() {
        let undo = board.make_move(mv);
        let count = perft(board, depth - 1);
        board.undo_move(mv, undo);

        println!("{mv}\t{count}");
        nodes += count;
    }

    debug!(depth, nodes, fen = %board.to_fen(), "splitperft finished");
    nodes
}
