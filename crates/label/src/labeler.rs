use totalline_core::{extract_candidates, normalize, CanonicalAmount};

use crate::types::LabeledLines;

/// Split OCR text into trimmed, non-empty lines.
///
/// `\n`, `\r\n` and a lone `\r` all break lines. Blank lines are dropped outright, so
/// indices into the result are not physical line numbers.
pub fn split_lines(ocr_text: &str) -> Vec<&str> {
    ocr_text
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Weak-label every line of `ocr_text` against the user-confirmed total.
///
/// A line is positive when one of its money candidates normalizes to exactly the same
/// canonical string as `confirmed_total_raw`. An unparseable total labels every line 0.
pub fn label_lines(ocr_text: &str, confirmed_total_raw: &str) -> LabeledLines {
    label_lines_normalized(ocr_text, &normalize(confirmed_total_raw))
}

/// [`label_lines`] with the total already normalized.
pub fn label_lines_normalized(ocr_text: &str, total: &CanonicalAmount) -> LabeledLines {
    let lines: Vec<String> = split_lines(ocr_text).into_iter().map(str::to_string).collect();
    let labels = lines
        .iter()
        .map(|line| u8::from(line_has_amount(line, total)))
        .collect();
    LabeledLines { lines, labels }
}

/// Whether `line` carries `total` as one of its candidates (exact string match).
pub fn line_has_amount(line: &str, total: &CanonicalAmount) -> bool {
    !total.is_empty() && extract_candidates(line).iter().any(|c| c == total)
}
