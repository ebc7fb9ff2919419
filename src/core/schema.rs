//! Validation for the exchange form fields.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const DEFAULT_SOURCE_TOKEN: &str = "USD";

/// Whole number with up to four decimal places.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d{1,4})?$").expect("amount pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Invalid amount '{value}' for field {field}")]
    InvalidAmount { field: &'static str, value: String },
}

/// Form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExchangeForm {
    pub source: String,
    pub target: String,
    pub source_token: Option<String>,
    pub target_token: Option<String>,
}

/// Form fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeValues {
    pub source: f64,
    pub target: f64,
    pub source_token: String,
    pub target_token: Option<String>,
}

pub struct ExchangeSchema;

impl ExchangeSchema {
    pub fn validate(raw: &RawExchangeForm) -> Result<ExchangeValues, SchemaError> {
        Ok(ExchangeValues {
            source: Self::validate_amount("source", &raw.source)?,
            target: Self::validate_amount("target", &raw.target)?,
            source_token: raw
                .source_token
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_TOKEN.to_string()),
            target_token: raw.target_token.clone(),
        })
    }

    pub fn validate_amount(field: &'static str, value: &str) -> Result<f64, SchemaError> {
        let invalid = || SchemaError::InvalidAmount {
            field,
            value: value.to_string(),
        };
        if !AMOUNT_PATTERN.is_match(value) {
            return Err(invalid());
        }
        value.parse::<f64>().map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_amounts() {
        for (input, expected) in [
            ("1", 1.0),
            ("0", 0.0),
            ("1.2345", 1.2345),
            ("100.5", 100.5),
            ("007", 7.0),
        ] {
            assert_eq!(
                ExchangeSchema::validate_amount("source", input).unwrap(),
                expected,
                "input {input}"
            );
        }
    }

    #[test]
    fn test_invalid_amounts() {
        for input in ["", "abc", "-1", "1.23456", "1.", ".5", "1e5", " 1", "1,5"] {
            let err = ExchangeSchema::validate_amount("target", input).unwrap_err();
            assert_eq!(
                err,
                SchemaError::InvalidAmount {
                    field: "target",
                    value: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_validate_defaults_source_token() {
        let raw = RawExchangeForm {
            source: "10".to_string(),
            target: "0.0050".to_string(),
            source_token: None,
            target_token: Some("ETH".to_string()),
        };
        let values = ExchangeSchema::validate(&raw).unwrap();
        assert_eq!(values.source, 10.0);
        assert_eq!(values.target, 0.005);
        assert_eq!(values.source_token, "USD");
        assert_eq!(values.target_token.as_deref(), Some("ETH"));
    }

    #[test]
    fn test_validate_reports_failing_field() {
        let raw = RawExchangeForm {
            source: "1".to_string(),
            target: "".to_string(),
            ..Default::default()
        };
        let err = ExchangeSchema::validate(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Invalid amount '' for field target");
    }
}
