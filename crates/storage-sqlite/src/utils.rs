//! Helpers shared by the SQLite repositories.
//!
//! Decimals are stored as TEXT so values round-trip exactly. Parsing of
//! descriptive columns is tolerant: a malformed cell is logged and read as
//! zero instead of failing the whole query. Ledger columns use the strict
//! parsers, since a balance folded from a zeroed amount would be wrong.

use log::{error, warn};
use rust_decimal::Decimal;
use std::str::FromStr;

use energycoop_core::errors::{Error, Result};

/// Parses a stored decimal, logging and falling back to zero on bad data.
pub fn parse_decimal(value: &str, field: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        warn!("Invalid decimal '{}' in column {}: {}", value, field, e);
        Decimal::ZERO
    })
}

/// Parses a stored decimal that money depends on; bad data is an error.
pub fn parse_decimal_strict(value: &str, field: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        error!("Invalid decimal '{}' in column {}: {}", value, field, e);
        Error::Unexpected(format!("Column {} holds an invalid decimal", field))
    })
}

/// Parses a stored enum column that money depends on; unknown values are an error.
pub fn parse_enum_strict<T: FromStr>(value: &str, field: &str) -> Result<T> {
    value.parse().map_err(|_| {
        error!("Unknown value '{}' in column {}", value, field);
        Error::Unexpected(format!("Column {} holds an unknown value", field))
    })
}

pub fn parse_optional_decimal(value: Option<&str>, field: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal(v, field))
}

/// Canonical TEXT form of a decimal.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// `LIKE` pattern matching `term` anywhere. SQLite's LIKE is already
/// case-insensitive for ASCII.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Certifications are kept as a JSON array of strings.
pub fn certifications_to_json(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

pub fn certifications_from_json(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Invalid certifications payload '{}': {}", raw, e);
        Vec::new()
    })
}

/// Parses a stored enum column, logging and falling back to `default`.
pub fn parse_enum<T: FromStr>(value: &str, field: &str, default: T) -> T {
    value.parse().unwrap_or_else(|_| {
        warn!("Unknown value '{}' in column {}", value, field);
        default
    })
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_falls_back_to_zero() {
        assert_eq!(parse_decimal("12.50", "amount"), dec!(12.50));
        assert_eq!(parse_decimal("abc", "amount"), Decimal::ZERO);
    }

    #[test]
    fn test_strict_parsers_reject_bad_data() {
        assert_eq!(parse_decimal_strict("-40", "balances.amount").unwrap(), dec!(-40));
        assert!(matches!(
            parse_decimal_strict("abc", "balances.amount"),
            Err(Error::Unexpected(_))
        ));
        assert!(matches!(
            parse_enum_strict::<i32>("seven", "balances.status"),
            Err(Error::Unexpected(_))
        ));
    }

    #[test]
    fn test_decimal_text_is_normalized() {
        assert_eq!(decimal_to_text(dec!(10.500)), "10.5");
        assert_eq!(decimal_to_text(dec!(-3)), "-3");
    }

    #[test]
    fn test_like_pattern_trims() {
        assert_eq!(like_pattern(" solar "), "%solar%");
    }

    #[test]
    fn test_certifications_json() {
        let list = vec!["ISO 14001".to_string(), "GO".to_string()];
        let raw = certifications_to_json(&list);
        assert_eq!(certifications_from_json(&raw), list);
        assert!(certifications_from_json("not json").is_empty());
    }
}
