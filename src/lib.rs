/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The chess board and the rules of the game: move legality, generation, and application.
mod board;

/// Command-line interface and the commands the engine understands.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Piece-Square tables.
mod psqt;

/// Centipawn scores.
mod score;

/// Main engine logic; all search related code.
mod search;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use psqt::*;
pub use score::*;
pub use search::*;
pub use utils::*;
