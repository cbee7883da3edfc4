//! Block Blast Solver
//!
//! Reads a board and a set of pieces, then tries every piece order and every
//! placement to find the arrangement that places all pieces while clearing
//! the most rows and columns. Prints each placement step with the board after
//! its clears.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::Uptime;
use tracing_subscriber::EnvFilter;

use blockblast::clear::Chunk;
use blockblast::grid::format_report;
use blockblast::parse::Puzzle;
use blockblast::permutation::PermutationAlgorithm;
use blockblast::{Search, SearchOptions};

/// Finds the piece order and placements that clear the most lines.
#[derive(Parser, Debug)]
#[command(name = "blockblast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle description to read. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Also clear fully occupied chunks of this size, e.g. 3x3.
    #[arg(short, long, value_name = "ROWSxCOLS")]
    chunk: Option<Chunk>,

    /// Enumerate piece orders with Steinhaus-Johnson-Trotter instead of Heap's algorithm.
    #[arg(short, long)]
    sjt: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            chunk: self.chunk,
            permutations: if self.sjt {
                PermutationAlgorithm::SteinhausJohnsonTrotter
            } else {
                PermutationAlgorithm::Heap
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = read_input(cli.input.as_deref())?;
    let puzzle: Puzzle = input.parse().context("invalid puzzle description")?;
    info!(
        rows = puzzle.board.rows(),
        cols = puzzle.board.cols(),
        pieces = puzzle.pieces.len(),
        "solving"
    );

    print!("{}", run_solver(&puzzle, cli.options())?);
    Ok(())
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_line_number(true)
        .with_timer(Uptime::default())
        .init();
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Solves the puzzle and returns the formatted report.
fn run_solver(puzzle: &Puzzle, options: SearchOptions) -> anyhow::Result<String> {
    let mut search = Search::with_options(&puzzle.board, &puzzle.pieces, options)
        .context("invalid chunk size")?;
    let report = search.run(&mut puzzle.identity_order());

    match &report.solution {
        Some(solution) => info!(clears = solution.total, "solution found"),
        None => warn!("unsolvable"),
    }

    Ok(format_report(&puzzle.board, report.solution.as_ref()))
}
