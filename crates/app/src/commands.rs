use anyhow::{Context, Result};
use std::io::Write;
use totalline_core::normalize;
use totalline_import::{import::build_dataset, save_samples};
use totalline_label::{
    guess_total, label_lines, split_lines, KeywordScorer, SampleStats, TotalLineSelector,
    TrainingGate,
};

use crate::config::TrainerConfig;

/// Print `raw<TAB>canonical<TAB>cents` for each input; `-` when cents are unavailable.
pub fn normalize_amounts<W: Write>(raws: &[String], out: &mut W) -> Result<()> {
    for raw in raws {
        let amount = normalize(raw);
        let cents = amount.to_cents().map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        writeln!(out, "{raw}\t{amount}\t{cents}")?;
    }
    Ok(())
}

/// Print `label<TAB>line` for every surviving line of one receipt, then the heuristic pick.
pub fn label_receipt<W: Write>(ocr_text: &str, total: &str, out: &mut W) -> Result<()> {
    let labeled = label_lines(ocr_text, total);
    for (line, label) in labeled.lines.iter().zip(&labeled.labels) {
        writeln!(out, "{label}\t{line}")?;
    }
    if labeled.positives() == 0 {
        tracing::warn!("No line matches total '{}'", normalize(total));
    }

    let lines = split_lines(ocr_text);
    let selection = TotalLineSelector::pick(&KeywordScorer, &lines);
    writeln!(
        out,
        "# selected: {} (score {:.2})",
        selection.best_line.as_deref().unwrap_or("-"),
        selection.best_score
    )?;
    writeln!(
        out,
        "# heuristic total: {}",
        guess_total(&lines).map(|t| t.to_string()).unwrap_or_else(|| "-".into())
    )?;
    Ok(())
}

fn print_stats<W: Write>(stats: &SampleStats, out: &mut W) -> Result<()> {
    writeln!(out, "Receipts: {}", stats.receipts)?;
    writeln!(out, "Receipts with at least one positive line: {}", stats.receipts_with_positive)?;
    writeln!(out, "Lines: {}", stats.lines)?;
    writeln!(out, "Positive lines: {}", stats.positive_lines)?;
    Ok(())
}

/// Report dataset statistics without writing anything.
pub fn stats<W: Write>(config: &TrainerConfig, out: &mut W) -> Result<SampleStats> {
    let (_, stats) = build_dataset(&config.dataset, config.dedup)
        .with_context(|| format!("Failed to build dataset from {}", config.dataset.display()))?;
    print_stats(&stats, out)?;

    if let Err(e) = TrainingGate::new(config.min_positives).check(&stats) {
        tracing::warn!("{e}");
    }
    Ok(stats)
}

/// Label the dataset and write samples for the trainer.
///
/// Fails with [`totalline_label::DatasetError`] when the positive count is below
/// `min_positives`; nothing is written in that case.
pub fn export<W: Write>(config: &TrainerConfig, out: &mut W) -> Result<SampleStats> {
    let (samples, stats) = build_dataset(&config.dataset, config.dedup)
        .with_context(|| format!("Failed to build dataset from {}", config.dataset.display()))?;
    print_stats(&stats, out)?;

    TrainingGate::new(config.min_positives).check(&stats)?;

    save_samples(&config.output, &samples)
        .with_context(|| format!("Failed to write samples to {}", config.output.display()))?;
    writeln!(out, "Saved {}", config.output.display())?;
    Ok(stats)
}
