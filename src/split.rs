//! Train/validation splitter (`split`).
//!
//! Shuffles all records with a seeded generator and cuts the shuffled list at
//! `floor(total * ratio)`: the head goes to the training file, the tail to the validation file.
//! The same input and seed always give the same two files.
//!
//! ### Example
//! ```text
//! seqprep split unique.fa train.fa val.fa --ratio 0.8 --seed 7
//! ```

use crate::seqio::{read_fasta, write_fasta, Record};
use anyhow::{Context, Result};
use clap::Args;
use log::info;
use rand::prelude::*;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Input FASTA (optionally .gz)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output FASTA for the training set
    #[arg(value_name = "TRAIN")]
    pub train: PathBuf,

    /// Output FASTA for the validation set
    #[arg(value_name = "VAL")]
    pub val: PathBuf,

    /// Fraction of sequences for training
    #[arg(long = "ratio", value_name = "FLOAT", default_value_t = 0.5, allow_negative_numbers = true)]
    pub ratio: f64,

    /// RNG seed for reproducibility
    #[arg(long = "seed", value_name = "INT", default_value_t = 42, allow_negative_numbers = true)]
    pub seed: i64,
}

/// Number of training records for `total` records at `ratio`.
///
/// Ratios outside [0, 1] are not rejected; they clamp to an empty or full training set.
pub fn train_size(total: usize, ratio: f64) -> usize {
    // float-to-int `as` saturates (NaN becomes 0)
    ((total as f64 * ratio).floor() as usize).min(total)
}

/// Shuffle `records` with `rng` and split them into (train, val).
pub fn shuffle_split<R: Rng + ?Sized>(
    mut records: Vec<Record>,
    ratio: f64,
    rng: &mut R,
) -> (Vec<Record>, Vec<Record>) {
    records.shuffle(rng);
    let n_train = train_size(records.len(), ratio);
    let val = records.split_off(n_train);
    (records, val)
}

/// Shuffle with a generator seeded from `seed` and split into (train, val).
///
/// Negative seeds are valid; they are reinterpreted bit-for-bit as `u64`.
pub fn split(records: Vec<Record>, ratio: f64, seed: i64) -> (Vec<Record>, Vec<Record>) {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    shuffle_split(records, ratio, &mut rng)
}

/// Execute the `split` subcommand.
pub fn run(args: SplitArgs, line_width: usize) -> Result<()> {
    let records = read_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let total = records.len();

    let (train, val) = split(records, args.ratio, args.seed);
    info!("Split {} records with seed {}", total, args.seed);

    write_fasta(&train, &args.train, line_width)
        .with_context(|| format!("Failed to write {}", args.train.display()))?;
    write_fasta(&val, &args.val, line_width)
        .with_context(|| format!("Failed to write {}", args.val.display()))?;

    println!("Total sequences: {}", total);
    println!("Training sequences: {} ({:.1}%)", train.len(), args.ratio * 100.0);
    println!("Validation sequences: {} ({:.1}%)", val.len(), (1.0 - args.ratio) * 100.0);
    Ok(())
}
