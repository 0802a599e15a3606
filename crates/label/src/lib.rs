pub mod dataset;
pub mod labeler;
pub mod select;
pub mod types;

pub use dataset::{
    assemble, assemble_record, Assembler, DatasetError, RecordSamples, SkipReason, TrainingGate,
    DEFAULT_MIN_POSITIVES,
};
pub use labeler::{label_lines, label_lines_normalized, line_has_amount, split_lines};
pub use select::{guess_total, KeywordScorer, LineScorer, Selection, TotalLineSelector};
pub use types::{LabeledLine, LabeledLines, ReceiptRecord, SampleStats};
