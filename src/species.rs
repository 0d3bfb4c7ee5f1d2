//! One record per species (`species`).
//!
//! The species of a record is the first `Genus epithet`-looking pair of words in its header, i.e.
//! the first match of `[A-Z][a-z]+ [a-z]+`. The first record seen for each species is kept; records
//! whose header has no such pair are dropped.
//!
//! Any capitalised word followed by a lowercase one matches, so `>x Unknown protein Bacillus subtilis`
//! is filed under "Unknown protein".

use crate::seqio::{read_fasta, write_fasta, Record};
use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Args, Debug, Clone)]
pub struct SpeciesArgs {
    /// Input FASTA (optionally .gz)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output FASTA path (gzipped if it ends with .gz)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

fn species_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z][a-z]+ [a-z]+").expect("species pattern is valid"))
}

/// Species key of a header, if any.
pub fn extract_species(description: &str) -> Option<&str> {
    species_pattern().find(description).map(|m| m.as_str())
}

/// Keep the first record of every species, in input order.
pub fn select_one_per_species(records: Vec<Record>) -> Vec<Record> {
    let mut seen_species: HashSet<String> = HashSet::new();
    let mut selected: Vec<Record> = Vec::new();

    for rec in records {
        match extract_species(&rec.description) {
            Some(species) => {
                if seen_species.insert(species.to_string()) {
                    debug!("{}: first record of {}", rec.id, species);
                    selected.push(rec);
                }
            }
            None => debug!("{}: no species in header, skipped", rec.id),
        }
    }
    selected
}

/// Execute the `species` subcommand.
pub fn run(args: SpeciesArgs, line_width: usize) -> Result<()> {
    let records = read_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let total = records.len();

    // one record per species, so the selection size is the species count
    let selected = select_one_per_species(records);

    write_fasta(&selected, &args.output, line_width)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Found {} unique species.", selected.len());
    println!("Selected {} sequences out of {} total.", selected.len(), total);
    Ok(())
}
