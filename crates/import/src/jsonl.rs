use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use totalline_label::{LabeledLine, ReceiptRecord};

use crate::hash::{record_key, to_hex};

#[derive(Error, Debug)]
pub enum JsonlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize sample: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Decode newline-delimited receipt records. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<ReceiptRecord>, JsonlError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .map_err(|source| JsonlError::Parse { line: idx + 1, source })?;
        records.push(record);
    }

    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<ReceiptRecord>, JsonlError> {
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;
    tracing::info!("Loaded {} receipt records from {}", records.len(), path.display());
    Ok(records)
}

/// Drop records whose OCR text and total exactly repeat an earlier record.
/// Returns the kept records in original order and the number removed.
pub fn dedup_records(records: Vec<ReceiptRecord>) -> (Vec<ReceiptRecord>, usize) {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<ReceiptRecord> = records
        .into_iter()
        .filter(|r| {
            let key = record_key(r);
            let fresh = seen.insert(key);
            if !fresh {
                tracing::warn!("Dropping duplicate receipt record {}", to_hex(&key));
            }
            fresh
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Write one `{"text":..,"label":..}` object per line.
pub fn write_samples<W: Write>(mut writer: W, samples: &[LabeledLine]) -> Result<(), JsonlError> {
    for sample in samples {
        serde_json::to_writer(&mut writer, sample).map_err(JsonlError::Serialize)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_samples(path: &Path, samples: &[LabeledLine]) -> Result<(), JsonlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_samples(BufWriter::new(File::create(path)?), samples)?;
    tracing::info!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}
