//! Duplicate remover (`dedup`).
//!
//! Reads a FASTA file, drops every record whose sequence (compared case-insensitively), id, or
//! either of the two was already seen earlier in the file, and writes the survivors in input order.
//!
//! ### Example
//! ```text
//! seqprep dedup proteins.fa unique.fa --method both
//! ```

use crate::seqio::{read_fasta, write_fasta, Record};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

/// What makes two records duplicates of each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DedupMethod {
    /// Same sequence, ignoring case
    Sequence,
    /// Same record id
    Id,
    /// Same sequence or same id
    Both,
}

impl DedupMethod {
    fn checks_sequence(self) -> bool {
        matches!(self, DedupMethod::Sequence | DedupMethod::Both)
    }

    fn checks_id(self) -> bool {
        matches!(self, DedupMethod::Id | DedupMethod::Both)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DedupArgs {
    /// Input FASTA (optionally .gz)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output FASTA path (gzipped if it ends with .gz)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// How to identify duplicates
    #[arg(long = "method", value_enum, default_value_t = DedupMethod::Sequence)]
    pub method: DedupMethod,
}

/// Record counts of one `dedup` run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DedupStats {
    pub read: usize,
    pub removed: usize,
    pub written: usize,
}

impl DedupStats {
    pub fn new(read: usize, written: usize) -> Self {
        DedupStats { read, removed: read - written, written }
    }
}

/// [`deduplicate`] plus the counts of what it kept and dropped.
pub fn deduplicate_with_stats(records: Vec<Record>, method: DedupMethod) -> (Vec<Record>, DedupStats) {
    let read = records.len();
    let unique = deduplicate(records, method);
    let stats = DedupStats::new(read, unique.len());
    (unique, stats)
}

/// Keep the first occurrence of every record, in input order.
///
/// Each active check owns its seen-set and updates it on its own verdict: with
/// [`DedupMethod::Both`], a record dropped for a repeated sequence still marks its id as
/// seen (and vice versa).
pub fn deduplicate(records: Vec<Record>, method: DedupMethod) -> Vec<Record> {
    let mut seen_sequences: HashSet<Vec<u8>> = HashSet::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut unique: Vec<Record> = Vec::with_capacity(records.len());

    for rec in records {
        let mut is_duplicate = false;

        if method.checks_sequence() && !seen_sequences.insert(rec.seq.to_ascii_uppercase()) {
            debug!("{}: sequence already seen", rec.id);
            is_duplicate = true;
        }
        if method.checks_id() && !seen_ids.insert(rec.id.clone()) {
            debug!("{}: id already seen", rec.id);
            is_duplicate = true;
        }

        if !is_duplicate {
            unique.push(rec);
        }
    }
    unique
}

/// Execute the `dedup` subcommand.
pub fn run(args: DedupArgs, line_width: usize) -> Result<()> {
    let records = read_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let (unique, stats) = deduplicate_with_stats(records, args.method);
    println!("Read {} sequences from {}", stats.read, args.input.display());

    write_fasta(&unique, &args.output, line_width)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Removed {} duplicate sequences", stats.removed);
    println!("Wrote {} unique sequences to {}", stats.written, args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seqio::DEFAULT_LINE_WIDTH;
    use std::fs;
    use tempfile::tempdir;

    fn rec(id: &str, seq: &str) -> Record {
        Record::new(id, seq.as_bytes().to_vec())
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("id1", "ACGT"),
            rec("id2", "acgt"),
            rec("id1", "TTTT"),
            rec("id3", "GGGG"),
            rec("id4", "TTTT"),
            rec("id3", "CCCC"),
        ]
    }

    #[test]
    fn same_sequence_different_ids() {
        let input = vec![rec("id1", "ACGT"), rec("id2", "ACGT")];
        assert_eq!(ids(&deduplicate(input.clone(), DedupMethod::Sequence)), ["id1"]);
        assert_eq!(ids(&deduplicate(input, DedupMethod::Id)), ["id1", "id2"]);
    }

    #[test]
    fn sequence_check_ignores_case() {
        let out = deduplicate(sample(), DedupMethod::Sequence);
        assert_eq!(ids(&out), ["id1", "id1", "id3", "id3"]);
        // output keeps the residues as read
        assert_eq!(out[0].seq, b"ACGT");
    }

    #[test]
    fn id_check_keeps_first_id() {
        let out = deduplicate(sample(), DedupMethod::Id);
        assert_eq!(ids(&out), ["id1", "id2", "id3", "id4"]);
        let seqs: Vec<&[u8]> = out.iter().map(|r| r.seq.as_slice()).collect();
        let expected: [&[u8]; 4] = [b"ACGT", b"acgt", b"GGGG", b"TTTT"];
        assert_eq!(seqs, expected);
    }

    #[test]
    fn both_applies_either_check() {
        let out = deduplicate(sample(), DedupMethod::Both);
        assert_eq!(ids(&out), ["id1", "id3"]);
    }

    #[test]
    fn both_registers_id_of_sequence_duplicate() {
        // id2 is dropped for its sequence, but its id still counts as seen
        let input = vec![rec("id1", "ACGT"), rec("id2", "ACGT"), rec("id2", "GGGG")];
        let out = deduplicate(input, DedupMethod::Both);
        assert_eq!(ids(&out), ["id1"]);
    }

    #[test]
    fn counts_per_method() {
        let expect = [
            (DedupMethod::Sequence, DedupStats { read: 6, removed: 2, written: 4 }),
            (DedupMethod::Id, DedupStats { read: 6, removed: 2, written: 4 }),
            (DedupMethod::Both, DedupStats { read: 6, removed: 4, written: 2 }),
        ];
        for (method, stats) in expect {
            let (unique, got) = deduplicate_with_stats(sample(), method);
            assert_eq!(got, stats, "{:?}", method);
            assert_eq!(unique.len(), got.written);
        }
        let (unique, got) = deduplicate_with_stats(Vec::new(), DedupMethod::Both);
        assert!(unique.is_empty());
        assert_eq!(got, DedupStats { read: 0, removed: 0, written: 0 });
    }

    #[test]
    fn output_is_ordered_and_unique() {
        let input = sample();
        for method in [DedupMethod::Sequence, DedupMethod::Id, DedupMethod::Both] {
            let out = deduplicate(input.clone(), method);
            let mut pos = 0;
            for r in &out {
                pos += input[pos..].iter().position(|x| x == r).unwrap() + 1;
            }
            if method.checks_sequence() {
                let seqs: HashSet<Vec<u8>> = out.iter().map(|r| r.seq.to_ascii_uppercase()).collect();
                assert_eq!(seqs.len(), out.len());
            }
            if method.checks_id() {
                let uniq: HashSet<&str> = out.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(uniq.len(), out.len());
            }
        }
    }

    #[test]
    fn run_writes_unique_records() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.fa");
        let output = dir.path().join("out.fa");
        fs::write(&input, ">id1 first\nACGT\n>id2 second\nacgt\n>id3 third\nGG\n").unwrap();

        let args = DedupArgs { input, output: output.clone(), method: DedupMethod::Sequence };
        run(args, DEFAULT_LINE_WIDTH).unwrap();

        let out = fs::read_to_string(output).unwrap();
        assert_eq!(out, ">id1 first\nACGT\n>id3 third\nGG\n");
    }

    #[test]
    fn run_fails_on_malformed_input_without_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.fa");
        let output = dir.path().join("out.fa");
        fs::write(&input, "ACGT\n>id1\nACGT\n").unwrap();

        let args = DedupArgs { input, output: output.clone(), method: DedupMethod::Id };
        assert!(run(args, DEFAULT_LINE_WIDTH).is_err());
        assert!(!output.exists());
    }
}
