use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RawCell;

/// How to read a dotted amount that carries no comma, e.g. `"1.234"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DotPolicy {
    /// The dot is a decimal point: `"1.234"` is 1.234. Matches prior outputs.
    #[default]
    Decimal,
    /// Dots forming complete thousands groups are separators: `"1.234"` is 1234.
    Thousands,
}

fn grouped_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").unwrap())
}

/// Convert a raw cell into an exact amount. Never fails: anything that cannot
/// be read as a number counts as zero.
pub fn normalize(value: &RawCell, policy: DotPolicy) -> Decimal {
    match value {
        RawCell::Int(i) => Decimal::from(*i),
        RawCell::Float(f) => Decimal::from_f64(*f).unwrap_or_else(|| {
            tracing::debug!(value = f, "non-finite amount, counted as zero");
            Decimal::ZERO
        }),
        RawCell::Text(s) => normalize_text(s, policy),
        RawCell::Empty | RawCell::Bool(_) => Decimal::ZERO,
    }
}

pub fn normalize_text(raw: &str, policy: DotPolicy) -> Decimal {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed);
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Decimal::ZERO;
    }

    let canonical = if compact.contains(',') {
        compact.replace('.', "").replace(',', ".")
    } else if policy == DotPolicy::Thousands && grouped_integer().is_match(&compact) {
        compact.replace('.', "")
    } else {
        compact
    };

    match canonical.parse::<Decimal>() {
        Ok(d) => d,
        Err(_) => {
            tracing::debug!(value = raw, "unparseable amount, counted as zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_numeric_cells_pass_through() {
        assert_eq!(normalize(&RawCell::Int(1234), DotPolicy::Decimal), dec!(1234));
        assert_eq!(normalize(&RawCell::Float(1234.56), DotPolicy::Decimal), dec!(1234.56));
        assert_eq!(normalize(&RawCell::Float(0.1), DotPolicy::Thousands), dec!(0.1));
        assert_eq!(normalize(&RawCell::Float(1.234), DotPolicy::Thousands), dec!(1.234));
    }

    #[test]
    fn test_comma_is_decimal_separator() {
        assert_eq!(normalize(&text("1.234,56"), DotPolicy::Decimal), dec!(1234.56));
        assert_eq!(normalize(&text("0,5"), DotPolicy::Decimal), dec!(0.5));
        assert_eq!(normalize(&text("1.200.300,01"), DotPolicy::Decimal), dec!(1200300.01));
        assert_eq!(normalize(&text("  300,00 "), DotPolicy::Decimal), dec!(300.00));
    }

    #[test]
    fn test_no_comma_is_plain_decimal() {
        assert_eq!(normalize(&text("1234.56"), DotPolicy::Decimal), dec!(1234.56));
        assert_eq!(normalize(&text("42"), DotPolicy::Decimal), dec!(42));
        assert_eq!(normalize(&text("-7.5"), DotPolicy::Decimal), dec!(-7.5));
    }

    #[test]
    fn test_dotted_integer_is_ambiguous_under_default_policy() {
        // Grouped integers without a decimal part are under-counted.
        assert_eq!(normalize(&text("1.234"), DotPolicy::Decimal), dec!(1.234));
    }

    #[test]
    fn test_thousands_policy_reads_grouped_integers() {
        assert_eq!(normalize(&text("1.234"), DotPolicy::Thousands), dec!(1234));
        assert_eq!(normalize(&text("1.234.567"), DotPolicy::Thousands), dec!(1234567));
        assert_eq!(normalize(&text("1234.56"), DotPolicy::Thousands), dec!(1234.56));
        assert_eq!(normalize(&text("12.34"), DotPolicy::Thousands), dec!(12.34));
        assert_eq!(normalize(&text("1.234,5"), DotPolicy::Thousands), dec!(1234.5));
    }

    #[test]
    fn test_unreadable_values_are_zero() {
        assert_eq!(normalize(&text(""), DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&text("   "), DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&text("abc"), DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&text("1,2,3"), DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&RawCell::Empty, DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&RawCell::Bool(true), DotPolicy::Decimal), Decimal::ZERO);
        assert_eq!(normalize(&RawCell::Float(f64::NAN), DotPolicy::Decimal), Decimal::ZERO);
    }

    #[test]
    fn test_currency_prefix_is_tolerated() {
        assert_eq!(normalize(&text("R$ 1.500,50"), DotPolicy::Decimal), dec!(1500.50));
        assert_eq!(normalize(&text("R$ -1.500,50"), DotPolicy::Decimal), dec!(-1500.50));
    }
}
