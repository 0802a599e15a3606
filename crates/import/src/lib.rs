pub mod hash;
pub mod jsonl;

pub use hash::{record_key, to_hex};
pub use jsonl::{
    dedup_records, load_records, read_records, save_samples, write_samples, JsonlError,
};

pub mod import {
    use std::path::Path;

    use totalline_label::{assemble, LabeledLine, SampleStats};

    use crate::*;

    /// Load an exported dataset and label it in one step.
    pub fn build_dataset(
        path: &Path,
        dedup: bool,
    ) -> Result<(Vec<LabeledLine>, SampleStats), JsonlError> {
        let mut records = load_records(path)?;
        if dedup {
            let (kept, removed) = dedup_records(records);
            if removed > 0 {
                tracing::info!("Removed {removed} duplicate records");
            }
            records = kept;
        }
        Ok(assemble(&records))
    }
}
