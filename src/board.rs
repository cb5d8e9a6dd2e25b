/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Squares attacked by a given side, and check detection.
mod attacks;

/// Whether a single move may be played in a position.
mod legality;

/// Applying and reverting moves.
mod makemove;

/// Move representation and parsing.
mod moves;

/// Listing all legal moves of a position, and ordering them for search.
mod movegen;

/// Performance testing of move generation.
mod perft;

/// Colors, pieces, and the contents of a mailbox cell.
mod piece;

/// The board itself: piece placement, side to move, castling rights, and en passant.
mod position;

/// Squares of the 10x12 mailbox.
mod square;

/// Mailbox offsets and common FEN strings.
mod utils;

pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use utils::*;
