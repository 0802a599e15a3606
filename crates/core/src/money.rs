use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A money amount reduced to digits and at most one `.` decimal separator.
///
/// The empty amount means "nothing parseable". Two amounts are equal only when their
/// canonical strings are byte-identical; `"12.5"` and `"12.50"` are different amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalAmount(String);

impl CanonicalAmount {
    pub fn empty() -> Self {
        CanonicalAmount(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value of the amount, `None` when empty.
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.0.is_empty() {
            return None;
        }
        // `Decimal` rejects a bare leading or trailing separator.
        let padded = if self.0.starts_with('.') {
            format!("0{}", self.0)
        } else {
            self.0.clone()
        };
        Decimal::from_str(&padded).ok()
    }

    /// Amount in hundredths, `None` when empty or out of `i64` range.
    pub fn to_cents(&self) -> Option<i64> {
        self.to_decimal()?
            .checked_mul(Decimal::from(100))?
            .round()
            .to_i64()
    }
}

impl fmt::Display for CanonicalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalAmount {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalAmount {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalAmount {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Normalization ────────────────────────────────────────────────────────────

/// Canonicalize a raw money string regardless of locale separator conventions.
///
/// The decimal separator is decided by position and group length:
///
/// * both `.` and `,` present: the later one is decimal (`1.234,56`, `1,234.56`)
/// * one kind present: it is decimal only when it occurs once and is followed by one or
///   two digits (`12,34`, `12.5`); otherwise it groups thousands (`12.345`, `1,234,567`)
///
/// Currency symbols, letters and whitespace are dropped. Never fails; input with no
/// digits or separators yields [`CanonicalAmount::empty`].
pub fn normalize(raw: &str) -> CanonicalAmount {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CanonicalAmount::empty();
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return CanonicalAmount::empty();
    }

    let canonical = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) => {
            let sep = comma.max(dot);
            let head = digits_only(&cleaned[..sep]);
            let tail = &cleaned[sep + 1..];
            if is_fraction(tail) {
                format!("{head}.{tail}")
            } else {
                // A 0- or 3+-digit tail cannot be cents; every separator was grouping.
                head + tail
            }
        }
        (Some(_), None) => {
            let parts: Vec<&str> = cleaned.split(',').collect();
            if parts.len() == 2 && is_fraction(parts[1]) {
                format!("{}.{}", parts[0], parts[1])
            } else {
                cleaned.replace(',', "")
            }
        }
        (None, Some(_)) => {
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() == 2 && is_fraction(parts[1]) {
                cleaned
            } else {
                cleaned.replace('.', "")
            }
        }
        (None, None) => cleaned,
    };

    CanonicalAmount(canonical)
}

fn is_fraction(group: &str) -> bool {
    (1..=2).contains(&group.len())
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Separator disambiguation ─────────────────────────────────────────────

    #[test]
    fn dot_with_three_digit_group_is_thousands() {
        assert_eq!(normalize("12.345"), "12345");
        assert_eq!(normalize("1.234.567"), "1234567");
    }

    #[test]
    fn dot_with_two_digit_group_is_decimal() {
        assert_eq!(normalize("12.34"), "12.34");
        assert_eq!(normalize("12.5"), "12.5");
    }

    #[test]
    fn comma_with_two_digit_group_is_decimal() {
        assert_eq!(normalize("12,34"), "12.34");
        assert_eq!(normalize("12000,5"), "12000.5");
    }

    #[test]
    fn comma_groups_are_thousands() {
        assert_eq!(normalize("12,000"), "12000");
        assert_eq!(normalize("1,234,567"), "1234567");
        assert_eq!(normalize("1,23,45"), "12345");
    }

    #[test]
    fn european_mixed_separators() {
        assert_eq!(normalize("1.234,56"), "1234.56");
        assert_eq!(normalize("1.234.567,8"), "1234567.8");
    }

    #[test]
    fn us_mixed_separators() {
        assert_eq!(normalize("1,234.56"), "1234.56");
        assert_eq!(normalize("1,234,567.89"), "1234567.89");
    }

    #[test]
    fn mixed_separators_with_long_tail_are_all_grouping() {
        assert_eq!(normalize("1.234,567"), "1234567");
        assert_eq!(normalize("1,2.345"), "12345");
        assert_eq!(normalize("1,2."), "12");
    }

    #[test]
    fn currency_symbols_and_text_are_stripped() {
        assert_eq!(normalize("Rp 12.000"), "12000");
        assert_eq!(normalize("$ 49.99"), "49.99");
        assert_eq!(normalize("  IDR 1.500.000,00 "), "1500000.00");
    }

    #[test]
    fn plain_digits_pass_through() {
        assert_eq!(normalize("12000"), "12000");
        assert_eq!(normalize("007"), "007");
    }

    #[test]
    fn nothing_parseable_is_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("TOTAL").is_empty());
        assert!(normalize(".").is_empty());
        assert!(normalize(",,").is_empty());
    }

    #[test]
    fn lone_separator_edge_cases() {
        assert_eq!(normalize(",5"), ".5");
        assert_eq!(normalize("5,"), "5");
        assert_eq!(normalize("5."), "5");
    }

    #[test]
    fn non_ascii_digits_are_dropped() {
        assert_eq!(normalize("١٢٣"), "");
        assert_eq!(normalize("12٣"), "12");
    }

    #[test]
    fn repeated_calls_are_identical() {
        for raw in ["1.234,56", "Rp 12.000", "12,34", ""] {
            assert_eq!(normalize(raw), normalize(raw));
        }
    }

    // ── CanonicalAmount ──────────────────────────────────────────────────────

    #[test]
    fn to_decimal_and_cents() {
        assert_eq!(normalize("1.234,56").to_cents(), Some(123456));
        assert_eq!(normalize("12.000").to_cents(), Some(1200000));
        assert_eq!(normalize(",5").to_cents(), Some(50));
        assert_eq!(normalize("").to_decimal(), None);
        assert_eq!(normalize("").to_cents(), None);
    }

    #[test]
    fn to_cents_out_of_range_is_none() {
        let huge = normalize("Rp 9.999.999.999.999.999.999.999.999.999");
        assert_eq!(huge, "9999999999999999999999999999");
        assert!(huge.to_decimal().is_some());
        assert_eq!(huge.to_cents(), None);

        // Fits in a Decimal but not in i64 once scaled.
        assert_eq!(normalize("99999999999999999999").to_cents(), None);
    }

    #[test]
    fn equality_is_textual_not_numeric() {
        let a = normalize("12.5");
        let b = normalize("12.50");
        assert_eq!(a.to_decimal(), b.to_decimal());
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&normalize("1.234,56")).unwrap();
        assert_eq!(json, "\"1234.56\"");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,24}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(once.as_str()), once);
        }

        #[test]
        fn normalize_is_idempotent_on_separator_soup(raw in "[0-9.,]{0,16}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(once.as_str()), once.clone());
            prop_assert!(once.as_str().matches('.').count() <= 1);
            prop_assert!(once.as_str().chars().all(|c| c.is_ascii_digit() || c == '.'));
        }
    }
}
