use std::sync::OnceLock;

use regex::Regex;
use totalline_core::{extract_candidates, CanonicalAmount};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_total_label,
    r"(?i)\b(?:grand\s+total|total\s+due|total\s+belanja|total)\b");
re!(re_subtotal_label,
    r"(?i)\bsub\s*-?\s*total\b");

/// Scores how likely a single OCR line is to state the receipt total.
///
/// A trained line classifier plugs in here; [`KeywordScorer`] is the built-in fallback.
pub trait LineScorer {
    fn score(&self, line: &str) -> f32;
}

impl<F> LineScorer for F
where
    F: Fn(&str) -> f32,
{
    fn score(&self, line: &str) -> f32 {
        self(line)
    }
}

// ── Keyword scorer (always available, used when no model is installed) ──────

/// Deterministic scorer keyed on total/subtotal labels. Lines without any money
/// candidate score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl LineScorer for KeywordScorer {
    fn score(&self, line: &str) -> f32 {
        if extract_candidates(line).is_empty() {
            return 0.0;
        }
        if re_subtotal_label().is_match(line) {
            0.3
        } else if re_total_label().is_match(line) {
            0.9
        } else {
            0.1
        }
    }
}

/// Outcome of picking the total line.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub best_line: Option<String>,
    /// Score of `best_line`, or -1.0 when there were no lines.
    pub best_score: f32,
    /// Last money candidate on `best_line`.
    pub total: Option<CanonicalAmount>,
}

pub struct TotalLineSelector;

impl TotalLineSelector {
    /// Pick the highest-scoring line (first wins on ties) and read its amount.
    pub fn pick<S, L>(scorer: &S, lines: &[L]) -> Selection
    where
        S: LineScorer + ?Sized,
        L: AsRef<str>,
    {
        let mut best: Option<&str> = None;
        let mut best_score = -1.0f32;
        for line in lines {
            let line = line.as_ref();
            let score = scorer.score(line);
            if score > best_score {
                best_score = score;
                best = Some(line);
            }
        }

        Selection {
            best_line: best.map(str::to_string),
            best_score,
            total: best.and_then(|l| extract_candidates(l).pop()),
        }
    }
}

/// Heuristic total without any scorer.
///
/// The first line with a total label answers with its last amount. If that line has no
/// amount, or no line is labeled, the numerically largest amount on the receipt wins
/// (first occurrence on ties).
pub fn guess_total<L: AsRef<str>>(lines: &[L]) -> Option<CanonicalAmount> {
    let labeled = lines
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|l| re_total_label().is_match(l) && !re_subtotal_label().is_match(l));
    if let Some(amount) = labeled.and_then(|l| extract_candidates(l).pop()) {
        return Some(amount);
    }

    lines
        .iter()
        .flat_map(|l| extract_candidates(l.as_ref()))
        .filter_map(|c| c.to_decimal().map(|value| (value, c)))
        .fold(None, |best, (value, c)| match best {
            Some((best_value, _)) if best_value >= value => best,
            _ => Some((value, c)),
        })
        .map(|(_, c)| c)
}
