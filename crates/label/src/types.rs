use serde::{Deserialize, Deserializer, Serialize};
use std::ops::{Add, AddAssign};

/// One exported dataset row: raw OCR text paired with the user-confirmed total.
///
/// Both fields are kept exactly as captured. Missing or `null` fields decode as empty
/// strings; any other keys in the export (merchant, date, meta) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptRecord {
    #[serde(rename = "ocrText", default, deserialize_with = "null_as_empty")]
    pub ocr_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub total: String,
}

impl ReceiptRecord {
    pub fn new(ocr_text: impl Into<String>, total: impl Into<String>) -> Self {
        Self { ocr_text: ocr_text.into(), total: total.into() }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single training sample: one OCR line and whether it states the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledLine {
    pub text: String,
    /// 1 when the line carries the confirmed total, else 0.
    pub label: u8,
}

impl LabeledLine {
    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// Parallel line/label vectors for one receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledLines {
    pub lines: Vec<String>,
    pub labels: Vec<u8>,
}

impl LabeledLines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    pub fn into_samples(self) -> impl Iterator<Item = LabeledLine> {
        self.lines
            .into_iter()
            .zip(self.labels)
            .map(|(text, label)| LabeledLine { text, label })
    }
}

/// Running counts over a batch of receipts.
///
/// Counts are plain sums, so stats built over disjoint shards can be added together
/// in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStats {
    pub receipts: usize,
    pub lines: usize,
    pub positive_lines: usize,
    pub receipts_with_positive: usize,
}

impl Add for SampleStats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        SampleStats {
            receipts: self.receipts + rhs.receipts,
            lines: self.lines + rhs.lines,
            positive_lines: self.positive_lines + rhs.positive_lines,
            receipts_with_positive: self.receipts_with_positive + rhs.receipts_with_positive,
        }
    }
}

impl AddAssign for SampleStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for SampleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "receipts={} receipts_with_positive={} lines={} positive_lines={}",
            self.receipts, self.receipts_with_positive, self.lines, self.positive_lines
        )
    }
}
