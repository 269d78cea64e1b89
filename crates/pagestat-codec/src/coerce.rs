//! Scalar coercers: pure cell-text -> typed-value conversions.
//!
//! Each coercer is total over its documented input grammar and rejects
//! everything else; nothing outside the explicitly listed empty-string
//! defaults is silently downgraded. The functions carry no field context of
//! their own; the structurer attaches the owning field to any failure.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// A cell that violated a coercer's grammar: the raw text plus the grammar
/// that rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, received {value:?}")]
pub struct CoerceError {
    pub value: String,
    pub expected: &'static str,
}

impl CoerceError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

const MAGNITUDE_GRAMMAR: &str = "a number with a K/M/B/T magnitude suffix";
const FLOAT_GRAMMAR: &str = "a decimal number";
const PERCENTAGE_GRAMMAR: &str = "a percentage like '28.77%'";
const RANK_GRAMMAR: &str = "a rank with a leading '#'";
const DURATION_GRAMMAR: &str = "a duration in HH:MM:SS form";
const TIMESTAMP_GRAMMAR: &str = "an ISO 8601 timestamp";

/// Floor sentinel the source emits instead of a number below its reporting
/// threshold.
const MAGNITUDE_FLOOR: &str = "< 5K";

/// Parses an abbreviated magnitude such as `"86.4B"` into an absolute count.
///
/// Suffixes scale by thousands: `K` x10^3, `M` x10^6, `B` x10^9, `T` x10^12.
/// The `"< 5K"` floor sentinel maps to 0. The scaled value truncates toward
/// zero. There is no empty default: a blank cell is a coercion failure.
pub fn parse_magnitude(value: &str) -> Result<u64, CoerceError> {
    if value == MAGNITUDE_FLOOR {
        return Ok(0);
    }
    let Some(suffix) = value.chars().last() else {
        return Err(CoerceError::new(value, MAGNITUDE_GRAMMAR));
    };
    let factor = match suffix {
        'K' => 1e3,
        'M' => 1e6,
        'B' => 1e9,
        'T' => 1e12,
        _ => return Err(CoerceError::new(value, MAGNITUDE_GRAMMAR)),
    };
    let number = &value[..value.len() - suffix.len_utf8()];
    let scaled = number
        .parse::<f64>()
        .map_err(|_| CoerceError::new(value, MAGNITUDE_GRAMMAR))?
        * factor;
    if !scaled.is_finite() || scaled < 0.0 {
        return Err(CoerceError::new(value, MAGNITUDE_GRAMMAR));
    }
    Ok(scaled as u64)
}

/// Parses a plain decimal float. Empty cells default to `0.0`.
pub fn parse_float(value: &str) -> Result<f64, CoerceError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse()
        .map_err(|_| CoerceError::new(value, FLOAT_GRAMMAR))
}

/// Parses a percentage cell, keeping the value in percentage units (28.77%
/// stays 28.77, not 0.2877). Empty cells default to `0.0`; the trailing `%`
/// is stripped when present.
pub fn parse_percentage(value: &str) -> Result<f64, CoerceError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .strip_suffix('%')
        .unwrap_or(value)
        .parse()
        .map_err(|_| CoerceError::new(value, PERCENTAGE_GRAMMAR))
}

/// Parses a ranked identifier such as `"#7,277,936"`. Empty cells default to
/// `0`; a missing leading `#` is an error. No upper bound is enforced:
/// observed source data contains concatenation artifacts that parse as one
/// huge rank, and those are tolerated as-is.
pub fn parse_rank(value: &str) -> Result<u64, CoerceError> {
    if value.is_empty() {
        return Ok(0);
    }
    let Some(digits) = value.strip_prefix('#') else {
        return Err(CoerceError::new(value, RANK_GRAMMAR));
    };
    digits
        .replace(',', "")
        .parse()
        .map_err(|_| CoerceError::new(value, RANK_GRAMMAR))
}

/// Parses an `HH:MM:SS` duration into total whole seconds. Empty cells
/// default to `0`.
pub fn parse_duration_seconds(value: &str) -> Result<u32, CoerceError> {
    if value.is_empty() {
        return Ok(0);
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .map_err(|_| CoerceError::new(value, DURATION_GRAMMAR))?;
    Ok(time.num_seconds_from_midnight())
}

/// Parses the scrape timestamp. No empty default: a snapshot without its
/// capture time is unusable downstream.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, CoerceError> {
    value
        .parse()
        .map_err(|_| CoerceError::new(value, TIMESTAMP_GRAMMAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_floor_sentinel() {
        assert_eq!(parse_magnitude("< 5K"), Ok(0));
    }

    #[test]
    fn test_magnitude_suffix_table() {
        assert_eq!(parse_magnitude("5K"), Ok(5_000));
        assert_eq!(parse_magnitude("1.5M"), Ok(1_500_000));
        assert_eq!(parse_magnitude("86.4B"), Ok(86_400_000_000));
        assert_eq!(parse_magnitude("2T"), Ok(2_000_000_000_000));
    }

    #[test]
    fn test_magnitude_truncates_instead_of_rounding() {
        // 0.0019K scales to 1.9; the fraction is dropped.
        assert_eq!(parse_magnitude("0.0019K"), Ok(1));
    }

    #[test]
    fn test_magnitude_rejects_unknown_suffix() {
        assert!(parse_magnitude("5X").is_err());
    }

    #[test]
    fn test_magnitude_rejects_missing_digits_and_empty() {
        assert!(parse_magnitude("K").is_err());
        assert!(parse_magnitude("").is_err());
    }

    #[test]
    fn test_magnitude_rejects_negative() {
        assert!(parse_magnitude("-5K").is_err());
    }

    #[test]
    fn test_float_empty_default() {
        assert_eq!(parse_float(""), Ok(0.0));
        assert_eq!(parse_float("8.29"), Ok(8.29));
        assert!(parse_float("eight").is_err());
    }

    #[test]
    fn test_percentage_keeps_percentage_units() {
        assert_eq!(parse_percentage(""), Ok(0.0));
        assert_eq!(parse_percentage("28.77%"), Ok(28.77));
        assert_eq!(parse_percentage("3.70"), Ok(3.70));
        assert!(parse_percentage("n/a%").is_err());
    }

    #[test]
    fn test_rank_requires_leading_hash() {
        assert_eq!(parse_rank(""), Ok(0));
        assert_eq!(parse_rank("#1"), Ok(1));
        assert_eq!(parse_rank("#7,277,936"), Ok(7_277_936));
        assert!(parse_rank("755500").is_err());
    }

    #[test]
    fn test_rank_tolerates_concatenation_artifacts() {
        // Two numbers run together in the source are accepted as one rank.
        assert_eq!(parse_rank("#7,277,9362,350,824"), Ok(72_779_362_350_824));
    }

    #[test]
    fn test_duration_whole_seconds() {
        assert_eq!(parse_duration_seconds(""), Ok(0));
        assert_eq!(parse_duration_seconds("00:10:35"), Ok(635));
        assert_eq!(parse_duration_seconds("23:59:59"), Ok(86_399));
        assert!(parse_duration_seconds("10:35").is_err());
        assert!(parse_duration_seconds("24:00:00").is_err());
    }

    #[test]
    fn test_timestamp_iso8601() {
        let parsed = parse_timestamp("2023-03-15T12:49:28.850051").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-03-15 12:49:28");
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("March 15th").is_err());
    }
}
