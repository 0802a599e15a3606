use thiserror::Error;
use totalline_core::normalize;

use crate::labeler::label_lines_normalized;
use crate::types::{LabeledLine, ReceiptRecord, SampleStats};

/// Default minimum positive lines for the linear baseline.
pub const DEFAULT_MIN_POSITIVES: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Not enough positive lines to train: found {found}, need at least {required}. Collect more labeled receipts.")]
    NotEnoughPositives { found: usize, required: usize },
}

/// Why a record produced no samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyText,
    UnparseableTotal,
    NoLines,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyText => write!(f, "empty OCR text"),
            SkipReason::UnparseableTotal => write!(f, "total has no parseable amount"),
            SkipReason::NoLines => write!(f, "no non-blank lines"),
        }
    }
}

/// Samples and stats contributed by a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSamples {
    pub samples: Vec<LabeledLine>,
    pub stats: SampleStats,
}

/// Label one record independently of any other.
///
/// Skipped records still count as one receipt; only `stats.receipts` is set for them.
pub fn assemble_record(record: &ReceiptRecord) -> (RecordSamples, Option<SkipReason>) {
    let mut out = RecordSamples {
        stats: SampleStats { receipts: 1, ..SampleStats::default() },
        ..RecordSamples::default()
    };

    let total = normalize(&record.total);
    if record.ocr_text.is_empty() {
        return (out, Some(SkipReason::EmptyText));
    }
    if total.is_empty() {
        return (out, Some(SkipReason::UnparseableTotal));
    }

    let labeled = label_lines_normalized(&record.ocr_text, &total);
    if labeled.is_empty() {
        return (out, Some(SkipReason::NoLines));
    }

    let positives = labeled.positives();
    out.stats.lines = labeled.len();
    out.stats.positive_lines = positives;
    out.stats.receipts_with_positive = usize::from(positives > 0);
    out.samples = labeled.into_samples().collect();
    (out, None)
}

/// Incremental dataset builder; feed records in order, then [`Assembler::finish`].
#[derive(Debug, Default)]
pub struct Assembler {
    samples: Vec<LabeledLine>,
    stats: SampleStats,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &ReceiptRecord) {
        let index = self.stats.receipts;
        let (part, skipped) = assemble_record(record);
        if let Some(reason) = skipped {
            tracing::debug!(record = index, %reason, "skipping receipt");
        }
        self.merge(part);
    }

    /// Fold in samples labeled elsewhere, e.g. by another worker.
    pub fn merge(&mut self, part: RecordSamples) {
        self.samples.extend(part.samples);
        self.stats += part.stats;
    }

    pub fn stats(&self) -> SampleStats {
        self.stats
    }

    pub fn finish(self) -> (Vec<LabeledLine>, SampleStats) {
        tracing::info!(
            receipts = self.stats.receipts,
            receipts_with_positive = self.stats.receipts_with_positive,
            lines = self.stats.lines,
            positive_lines = self.stats.positive_lines,
            "dataset assembled"
        );
        (self.samples, self.stats)
    }
}

/// Build the flat sample list and summary stats for a batch of receipts.
///
/// Records with empty text, an unparseable total, or no surviving lines are skipped
/// silently but still count toward `stats.receipts`. Sample order follows record order,
/// then line order.
pub fn assemble<'a, I>(records: I) -> (Vec<LabeledLine>, SampleStats)
where
    I: IntoIterator<Item = &'a ReceiptRecord>,
{
    let mut assembler = Assembler::new();
    for record in records {
        assembler.push(record);
    }
    assembler.finish()
}

/// Refuses to hand a dataset to the trainer below a positive-line threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingGate {
    pub min_positives: usize,
}

impl Default for TrainingGate {
    fn default() -> Self {
        Self { min_positives: DEFAULT_MIN_POSITIVES }
    }
}

impl TrainingGate {
    pub fn new(min_positives: usize) -> Self {
        Self { min_positives }
    }

    pub fn check(&self, stats: &SampleStats) -> Result<(), DatasetError> {
        if stats.positive_lines < self.min_positives {
            return Err(DatasetError::NotEnoughPositives {
                found: stats.positive_lines,
                required: self.min_positives,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn batch() -> Vec<ReceiptRecord> {
        vec![
            ReceiptRecord::new("ITEM A 5.000\nTOTAL 12.500\nCASH 15.000", "12.500"),
            ReceiptRecord::new("", "10.000"),
            ReceiptRecord::new("TOTAL 9.000", ""),
            ReceiptRecord::new("\n \n", "5.000"),
            ReceiptRecord::new("KOPI 18.000\nTOTAL 18.000", "18.000"),
            ReceiptRecord::new("TOTAL 7.000", "8.000"),
        ]
    }

    #[test]
    fn counts_every_receipt_and_skips_degenerate_ones() {
        let (samples, stats) = assemble(&batch());
        assert_eq!(stats.receipts, 6);
        assert_eq!(stats.lines, 3 + 2 + 1);
        assert_eq!(stats.positive_lines, 1 + 2);
        assert_eq!(stats.receipts_with_positive, 2);
        assert_eq!(samples.len(), stats.lines);
    }

    #[test]
    fn positives_in_samples_match_stats() {
        let (samples, stats) = assemble(&batch());
        let positives = samples.iter().filter(|s| s.is_positive()).count();
        assert_eq!(positives, stats.positive_lines);
        assert!(stats.receipts_with_positive <= stats.receipts);
    }

    #[test]
    fn samples_follow_record_then_line_order() {
        let (samples, _) = assemble(&batch());
        let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "ITEM A 5.000",
                "TOTAL 12.500",
                "CASH 15.000",
                "KOPI 18.000",
                "TOTAL 18.000",
                "TOTAL 7.000",
            ]
        );
    }

    #[test]
    fn empty_batch() {
        let none: Vec<ReceiptRecord> = Vec::new();
        let (samples, stats) = assemble(&none);
        assert!(samples.is_empty());
        assert_eq!(stats, SampleStats::default());
    }

    #[test]
    fn skip_reasons() {
        let (_, r) = assemble_record(&ReceiptRecord::new("", "1"));
        assert_eq!(r, Some(SkipReason::EmptyText));
        let (_, r) = assemble_record(&ReceiptRecord::new("TOTAL 1", "Rp"));
        assert_eq!(r, Some(SkipReason::UnparseableTotal));
        let (part, r) = assemble_record(&ReceiptRecord::new("  ", "1"));
        assert_eq!(r, Some(SkipReason::NoLines));
        assert_eq!(part.stats, SampleStats { receipts: 1, ..SampleStats::default() });
        assert!(part.samples.is_empty());
    }

    #[test]
    fn sharded_merge_matches_sequential() {
        let records = batch();
        let (seq_samples, seq_stats) = assemble(&records);

        let mut merged = Assembler::new();
        for (part, _) in records.iter().map(assemble_record) {
            merged.merge(part);
        }
        let (samples, stats) = merged.finish();
        assert_eq!(samples, seq_samples);
        assert_eq!(stats, seq_stats);
    }

    #[test]
    fn deterministic() {
        assert_eq!(assemble(&batch()), assemble(&batch()));
    }

    #[test]
    fn gate_rejects_below_threshold() {
        let stats = SampleStats { positive_lines: 19, ..SampleStats::default() };
        assert_eq!(
            TrainingGate::default().check(&stats),
            Err(DatasetError::NotEnoughPositives { found: 19, required: 20 })
        );
        assert!(TrainingGate::new(19).check(&stats).is_ok());
    }

    #[test]
    fn gate_error_message_is_actionable() {
        let err = TrainingGate::new(50)
            .check(&SampleStats::default())
            .unwrap_err();
        assert!(err.to_string().contains("found 0, need at least 50"));
    }

    proptest! {
        #[test]
        fn batch_invariants_hold(
            rows in proptest::collection::vec(
                ("[A-Z0-9 .,\n]{0,30}", "[0-9.,]{0,8}"),
                0..12,
            )
        ) {
            let records: Vec<ReceiptRecord> =
                rows.into_iter().map(|(t, total)| ReceiptRecord::new(t, total)).collect();
            let (samples, stats) = assemble(&records);
            prop_assert_eq!(stats.receipts, records.len());
            prop_assert_eq!(samples.len(), stats.lines);
            prop_assert_eq!(samples.iter().filter(|s| s.is_positive()).count(), stats.positive_lines);
            prop_assert!(stats.receipts_with_positive <= stats.receipts);
            prop_assert!(stats.positive_lines <= stats.lines);
        }
    }
}
