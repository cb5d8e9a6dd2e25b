/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Square, DEFAULT_DEPTH};

/// Command-line options given when starting the engine.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Position to start from, as a FEN string. Defaults to the standard starting position.
    #[arg(short, long)]
    pub fen: Option<String>,

    /// Depth of any search that does not specify its own.
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// A single engine command to execute on startup, such as `bench`.
    ///
    /// The engine keeps reading commands from `stdin` afterwards.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND>")
)]
pub enum EngineCommand {
    /// Run a benchmark of fixed-depth searches over a series of positions.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the default benchmark depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, the contribution of every piece will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Flips the side-to-move. Equivalent to playing a nullmove.
    ///
    /// This also forgets all moves played so far, so they can no longer be taken back.
    Flip,

    /// Search the current position and print the best move found.
    Go {
        /// Depth to search to, if not the engine's default.
        #[arg(short, long, required = false)]
        depth: Option<usize>,

        /// If set, the best move found will also be played.
        #[arg(short, long, default_value = "false")]
        play: bool,
    },

    /// Set the position from a FEN string.
    #[command(alias = "position")]
    Load {
        /// The FEN string. It may span several arguments, so it need not be quoted.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        fen: Vec<String>,
    },

    /// Apply the provided move to the game, if it is legal.
    ///
    /// Moves are written as `e2e4`, `e7e8=Q`, `O-O`, or `O-O-O`.
    #[command(aliases = ["move", "m"])]
    MakeMove { mv_string: String },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be printed using their debug formatter, which also marks captures.
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are listed in the order they are generated.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Reset to the standard starting position.
    #[command(alias = "ucinewgame")]
    NewGame,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print whether the side to move is in check, checkmated, or stalemated.
    Status,

    /// Take back the last move played.
    #[command(alias = "takeback")]
    Undo,
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a line of input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
