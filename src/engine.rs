/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use crate::{
    perft, splitperft, Board, Cli, EngineCommand, Evaluator, Move, Search, SearchConfig,
    SearchResult, Undo, BENCHMARK_FENS, DEFAULT_DEPTH,
};

/// Default depth at which to run the benchmark searches.
const BENCH_DEPTH: usize = 3;

/// The Tadpole chess engine.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the chess board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    board: Board,

    /// Every move played on `board` since it was last set, so that they may be taken back.
    history: Vec<(Move, Undo)>,

    /// Depth of searches that do not specify their own.
    depth: usize,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            board: Board::default(),
            history: Vec::with_capacity(128),
            depth: DEFAULT_DEPTH,
            sender,
            receiver,
        }
    }

    /// Constructs a new [`Engine`] configured by command-line options.
    ///
    /// Any startup command in `cli` is queued to run before input is read.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut engine = Self::new();
        engine.depth = SearchConfig::new(cli.depth).depth;

        if let Some(fen) = &cli.fen {
            engine.board = Board::from_fen(fen).context("Invalid starting position")?;
        }

        if !cli.command.is_empty() {
            let cmd = EngineCommand::try_parse_from(&cli.command)
                .map_err(|err| anyhow!("Invalid startup command {:?}:\n{err}", cli.command))?;
            engine.send_command(cmd)?;
        }

        Ok(engine)
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Returns a string of all authors of this engine.
    pub fn authors(&self) -> String {
        // Split multiple authors by comma-space
        env!("CARGO_PKG_AUTHORS").replace(':', ", ")
    }

    /// The position the engine is currently on.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Engine is no longer receiving commands")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// Errors from individual commands are reported and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        info!("{} started by {}", self.name(), self.authors());

        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err:#}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if cmd == EngineCommand::Exit {
                break;
            }

            // Keep running, even on error
            if let Err(err) = self.execute(cmd) {
                warn!("{err:#}");
                eprintln!("Error: {err:#}");
            }
        }

        Ok(())
    }

    /// Executes a single [`EngineCommand`] on the current position.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Display => println!("{}", self.board),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Exit => {}

            EngineCommand::Fen => println!("{}", self.board.to_fen()),

            EngineCommand::Flip => {
                self.board.toggle_side_to_move();
                self.history.clear();
            }

            EngineCommand::Go { depth, play } => {
                self.go(depth, play)?;
            }

            EngineCommand::Load { fen } => self.load(&fen.join(" "))?,

            EngineCommand::MakeMove { mv_string } => {
                self.make_move(&mv_string)?;
                self.status();
            }

            EngineCommand::Moves { square, debug, sort } => {
                // Get the legal moves
                let moves = if let Some(square) = square {
                    self.board.legal_moves_from(square)
                } else {
                    self.board.legal_moves()
                };

                let mut moves = moves
                    .into_iter()
                    .map(|mv| if debug { format!("{mv:?}") } else { mv.to_string() })
                    .collect::<Vec<_>>();

                if sort {
                    moves.sort();
                }

                // If there are none, print "(none)"
                if moves.is_empty() {
                    println!("(none)");
                } else {
                    println!("{}", moves.join(", "));
                }
            }

            EngineCommand::NewGame => self.new_game(),

            EngineCommand::Perft { depth } => {
                let starttime = Instant::now();
                let nodes = perft(&mut self.board, depth);
                let elapsed = starttime.elapsed();
                debug!(depth, nodes, elapsed_ms = elapsed.as_millis() as u64, "perft finished");
                println!("{nodes}");
            }

            EngineCommand::Splitperft { depth } => {
                let nodes = splitperft(&mut self.board, depth);
                println!("\n{nodes}");
            }

            EngineCommand::Status => self.status(),

            EngineCommand::Undo => self.undo()?,
        }

        Ok(())
    }

    /// Execute the `bench` command, running a benchmark of a fixed search on a series of positions and displaying the results.
    fn bench(&self, depth: Option<usize>, pretty: bool) -> Result<()> {
        // Set up the benchmarking config
        let config = SearchConfig::new(depth.unwrap_or(BENCH_DEPTH));

        let num_tests = BENCHMARK_FENS.len();
        let mut nodes = 0;
        let starttime = Instant::now();

        // Run a fixed search on each position
        for (i, fen) in BENCHMARK_FENS.into_iter().enumerate() {
            println!("Benchmark position {}/{}: {fen}", i + 1, num_tests);

            let mut board = Board::from_fen(fen)
                .with_context(|| format!("Invalid benchmark position {fen:?}"))?;
            nodes += Search::new(&mut board, config).start().nodes;
        }

        // Compute results
        let elapsed = starttime.elapsed();
        let nps = (nodes as f32 / elapsed.as_secs_f32()) as u64;
        let k_nps = nodes as f32 / elapsed.as_secs_f32() / 1_000.0;
        let ms = elapsed.as_millis();

        if pretty {
            // Display the results in a nice table
            println!();
            println!("+--- Benchmark Complete ---+");
            println!("| time (ms)  : {ms:<12}|");
            println!("| nodes      : {nodes:<12}|");
            println!("| nps        : {nps:<12}|");
            println!("| Knps       : {k_nps:<12.2}|");
            println!("+--------------------------+");
        } else {
            println!("{nodes} nodes {nps} nps");
        }

        Ok(())
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        let evaluator = Evaluator::new(&self.board);
        if pretty {
            println!("{evaluator}");
        } else {
            println!("{}", evaluator.eval());
        }
    }

    /// Executes the `go` command, searching the current position and printing the result.
    ///
    /// If `play` is set, the best move is then applied to the board.
    fn go(&mut self, depth: Option<usize>, play: bool) -> Result<SearchResult> {
        let config = SearchConfig::new(depth.unwrap_or(self.depth));
        let res = Search::new(&mut self.board, config).start();

        let Some(bestmove) = res.bestmove else {
            println!("bestmove (none) score {:#} nodes {}", res.score, res.nodes);
            return Ok(res);
        };

        println!("bestmove {bestmove} score {:#} nodes {}", res.score, res.nodes);

        if play {
            self.play(bestmove)?;
            self.status();
        }

        Ok(res)
    }

    /// Set the position to the supplied FEN string, forgetting all moves played so far.
    fn load(&mut self, fen: &str) -> Result<()> {
        self.board = Board::from_fen(fen)?;
        self.history.clear();
        Ok(())
    }

    /// Parses `mv_string` against the current position and plays it, if it is legal.
    fn make_move(&mut self, mv_string: &str) -> Result<()> {
        let mv = Move::parse(&self.board, mv_string)?;
        self.play(mv)
    }

    /// Plays `mv` on the board, if it is one of the legal moves of the current position.
    fn play(&mut self, mv: Move) -> Result<()> {
        if !self.board.legal_moves().contains(&mv) {
            bail!(
                "Illegal move {mv} for {} in {}",
                self.board.side_to_move(),
                self.board.to_fen()
            );
        }

        let undo = self.board.make_move(mv);
        self.history.push((mv, undo));
        Ok(())
    }

    /// Takes back the last move played.
    fn undo(&mut self) -> Result<()> {
        let Some((mv, undo)) = self.history.pop() else {
            bail!("There are no moves to take back");
        };

        self.board.undo_move(mv, undo);
        Ok(())
    }

    /// Prints the state of the game from the side to move's point of view.
    fn status(&self) {
        let color = self.board.side_to_move().name();
        if self.board.is_checkmate() {
            println!("{color} is checkmated");
        } else if self.board.is_stalemate() {
            println!("{color} is stalemated");
        } else if self.board.is_in_check() {
            println!("{color} is in check");
        } else {
            println!("{color} to move");
        }
    }

    /// Resets the engine's internal game state.
    fn new_game(&mut self) {
        self.board = Board::default();
        self.history.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => {
                warn!(input = buf, "rejected command");
                eprintln!("{err}");
            }
        }
    }
}
