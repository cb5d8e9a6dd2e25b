/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use tracing::{debug, trace};

use crate::{order_moves, Board, Evaluator, Move, Score};

/// Maximum depth that can be searched
pub const MAX_DEPTH: usize = 255;

/// Depth searched when none is specified.
pub const DEFAULT_DEPTH: usize = 4;

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth, in plies, to search to. Depth `0` only evaluates the position.
    pub depth: usize,
}

impl SearchConfig {
    /// Constructs a new [`SearchConfig`] that searches to `depth`, capped at [`MAX_DEPTH`].
    #[inline(always)]
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.min(MAX_DEPTH),
        }
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

/// Executes a fixed-depth search on the provided board.
pub struct Search<'a> {
    /// The board to search on.
    ///
    /// Moves are made and unmade on this board in place, and it is returned to its original state
    /// before the search concludes.
    board: &'a mut Board,

    /// The result of the search, updated as-needed during search.
    result: SearchResult,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] instance to execute on the provided [`Board`].
    #[inline(always)]
    pub fn new(board: &'a mut Board, config: SearchConfig) -> Self {
        let result = SearchResult {
            // Initialize `bestmove` to the first move available
            bestmove: board.legal_moves().first().copied(),
            ..Default::default()
        };

        Self {
            board,
            result,
            config,
        }
    }

    /// Start the search with a full window, returning its results.
    ///
    /// # Example
    /// ```
    /// # use tadpole::{Board, Search, SearchConfig};
    /// let mut board: Board = "k7/8/KQ6/8/8/8/8/8 w - - 0 1".parse().unwrap();
    /// let res = Search::new(&mut board, SearchConfig::new(2)).start();
    /// assert_eq!(res.score.moves_to_mate(), 1);
    /// ```
    pub fn start(self) -> SearchResult {
        self.start_with_window(-Score::INF, Score::INF)
    }

    /// Start the search with the window `(alpha, beta)`, returning its results.
    ///
    /// Scores outside the window are clamped to its bounds.
    pub fn start_with_window(mut self, alpha: Score, beta: Score) -> SearchResult {
        let starttime = Instant::now();
        let depth = self.config.depth;

        self.result.score = self.negamax(depth, alpha, beta, 0);

        let res = self.result;
        debug!(
            depth,
            nodes = res.nodes,
            score = %res.score,
            bestmove = %res.bestmove.map(|mv| mv.to_string()).unwrap_or_default(),
            elapsed_ms = starttime.elapsed().as_millis() as u64,
            "search finished"
        );

        res
    }

    /// Primary location of search logic.
    ///
    /// Uses the [negamax](https://www.chessprogramming.org/Negamax) algorithm with fail-hard
    /// [alpha-beta pruning](https://www.chessprogramming.org/Alpha-Beta).
    fn negamax(&mut self, depth: usize, mut alpha: Score, beta: Score, ply: i32) -> Score {
        self.result.nodes += 1;

        // If we've reached a terminal node, evaluate the position
        if depth == 0 {
            return Evaluator::new(self.board).eval();
        }

        let mut moves = self.board.legal_moves();

        // If there are no legal moves, it's either mate or a draw.
        if moves.is_empty() {
            return if self.board.is_in_check() {
                // Prefer earlier mates
                -Score::MATE + ply
            } else {
                Score::DRAW
            };
        }

        order_moves(&mut moves);

        for mv in moves {
            let undo = self.board.make_move(mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.board.undo_move(mv, undo);

            if ply == 0 {
                trace!(%mv, %score, "root move");
            }

            // Our opponent will never allow this line
            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;

                if ply == 0 {
                    self.result.bestmove = Some(mv);
                }
            }
        }

        alpha
    }
}
