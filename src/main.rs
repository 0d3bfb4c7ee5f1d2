//! seqprep: FASTA dataset preparation
//!
//! Subcommands:
//! - `dedup`: remove duplicate records by sequence, id, or both
//! - `species`: keep the first record of every species named in the headers
//! - `split`: shuffle and split records into training and validation sets

mod dedup;
mod error;
mod seqio;
mod species;
mod split;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};

/// seqprep CLI
#[derive(Parser, Debug)]
#[command(name = "seqprep")]
#[command(author, version, about = "FASTA dataset preparation utilities", long_about = None)]
struct Cli {
    /// Residues per line in written FASTA (0 = single line)
    #[arg(long = "line-width", value_name = "INT", global = true, default_value_t = seqio::DEFAULT_LINE_WIDTH)]
    line_width: usize,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove duplicate sequences from a FASTA file
    Dedup(dedup::DedupArgs),
    /// Select one sequence per species from a FASTA file
    Species(species::SpeciesArgs),
    /// Split FASTA sequences into training and validation sets
    Split(split::SplitArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    // usage errors exit with 1, help/version with 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            e.print()?;
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };
    init_logging(cli.verbose);
    debug!("{:?}", cli);

    match cli.command {
        Commands::Dedup(args) => dedup::run(args, cli.line_width)?,
        Commands::Species(args) => species::run(args, cli.line_width)?,
        Commands::Split(args) => split::run(args, cli.line_width)?,
    }
    Ok(())
}
