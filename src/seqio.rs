use crate::error::{Result, SeqprepError};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Residues per line in written FASTA unless overridden with `--line-width`.
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// A single FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// First token of the header (accession)
    pub id: String,
    /// Full header text without the leading '>', id included
    pub description: String,
    /// Residues as read (case preserved, line breaks removed)
    pub seq: Vec<u8>,
}

impl Record {
    /// Build a record from a header line (without '>') and its residues.
    pub fn new(description: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        let description = description.into().trim_end().to_string();
        let id = description.split_whitespace().next().unwrap_or("").to_string();
        Record { id, description, seq: seq.into() }
    }
}

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("gz")).unwrap_or(false)
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path).map_err(|e| SeqprepError::io(path, e))?;
    if is_gz(path) {
        let gz = MultiGzDecoder::new(f);
        Ok(Box::new(BufReader::new(gz)))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Parse FASTA text from `reader`. `path` is only used in error messages.
///
/// Blank lines are skipped and whitespace inside sequence lines is dropped.
/// Text before the first header is rejected. An input without any header
/// yields an empty dataset.
pub fn parse_fasta<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();
    let mut current_header: Option<String> = None;
    let mut current_seq: Vec<u8> = Vec::new();

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => SeqprepError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                msg: "invalid UTF-8".to_string(),
            },
            _ => SeqprepError::io(path, e),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            if let Some(prev) = current_header.take() {
                records.push(Record::new(prev, std::mem::take(&mut current_seq)));
            }
            current_header = Some(header.to_string());
        } else if current_header.is_some() {
            current_seq.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        } else {
            let msg = if line.starts_with('@') {
                "expected '>' header, input looks like FASTQ".to_string()
            } else {
                "sequence data before the first '>' header".to_string()
            };
            return Err(SeqprepError::Parse { path: path.to_path_buf(), line: idx + 1, msg });
        }
    }
    if let Some(prev) = current_header.take() {
        records.push(Record::new(prev, current_seq));
    }
    Ok(records)
}

/// Read every record of a FASTA file (optionally gzipped) into memory.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path_ref: &Path = path.as_ref();
    let rdr = open_maybe_gz(path_ref)?;
    let records = parse_fasta(rdr, path_ref)?;
    info!("Parsed {} records from {}", records.len(), path_ref.display());
    Ok(records)
}

fn write_records<W: Write>(w: &mut W, records: &[Record], line_width: usize) -> std::io::Result<()> {
    let lw = if line_width == 0 { usize::MAX } else { line_width };
    for rec in records {
        writeln!(w, ">{}", rec.description)?;
        for chunk in rec.seq.chunks(lw) {
            w.write_all(chunk)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Temporary file in `dir` created with the same mode `File::create` would use.
fn temp_output(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".seqprep");
    // umask still applies
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Write records to a FASTA file (wrapped to `line_width` chars, 0 = no wrapping).
///
/// Output goes to a temporary file next to `path` that replaces `path` only once
/// everything is flushed. A `.gz` extension gzips the output.
pub fn write_fasta<P: AsRef<Path>>(records: &[Record], path: P, line_width: usize) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = temp_output(dir).map_err(|e| SeqprepError::io(path, e))?;

    {
        let io_err = |e| SeqprepError::io(path, e);
        let buf = BufWriter::new(tmp.as_file());
        if is_gz(path) {
            let mut enc = GzEncoder::new(buf, Compression::default());
            write_records(&mut enc, records, line_width).map_err(io_err)?;
            enc.finish().map_err(io_err)?.flush().map_err(io_err)?;
        } else {
            let mut buf = buf;
            write_records(&mut buf, records, line_width).map_err(io_err)?;
            buf.flush().map_err(io_err)?;
        }
    }

    tmp.persist(path).map_err(|e| SeqprepError::io(path, e.error))?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
