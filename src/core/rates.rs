//! Rate records, cross rates and amount conversion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Latest known unit price of one currency in the feed's reference unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub currency: String,
    pub price: f64,
}

impl RateRecord {
    pub fn new(currency: &str, price: f64) -> Self {
        RateRecord {
            currency: currency.to_string(),
            price,
        }
    }

    pub fn icon_url(&self, icon_base_url: &str) -> String {
        format!(
            "{}/{}.svg",
            icon_base_url.trim_end_matches('/'),
            self.currency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    #[error("Currency {0} not found")]
    CurrencyNotFound(String),

    #[error("Invalid price {price} for currency {currency}")]
    InvalidPrice { currency: String, price: f64 },
}

/// An immutable, deduplicated rate table. A refresh produces a new snapshot
/// instead of mutating the old one.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub records: Vec<RateRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(records: Vec<RateRecord>) -> Self {
        RateSnapshot {
            records: dedupe(records),
            fetched_at: Utc::now(),
        }
    }

    pub fn rate(&self, source: &str, target: &str) -> Result<f64, ExchangeError> {
        exchange_rate(&self.records, source, target)
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.currency.as_str())
    }
}

/// Drops every record whose currency was already seen, keeping input order.
pub fn dedupe(records: Vec<RateRecord>) -> Vec<RateRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.currency.clone()))
        .collect()
}

/// Price of one `source` unit expressed in `target` units.
///
/// The first record of each currency wins. A record can only fill one role
/// per scan; asking for the same currency on both sides yields `1.0` when it
/// is listed. A missing source is reported before a missing target.
pub fn exchange_rate(
    table: &[RateRecord],
    source: &str,
    target: &str,
) -> Result<f64, ExchangeError> {
    let mut source_price = None;
    let mut target_price = None;

    for record in table {
        if record.currency == source {
            source_price.get_or_insert(record.price);
        } else if record.currency == target {
            target_price.get_or_insert(record.price);
        }
    }

    let source_price =
        source_price.ok_or_else(|| ExchangeError::CurrencyNotFound(source.to_string()))?;
    check_price(source, source_price)?;

    if source == target {
        return Ok(1.0);
    }

    let target_price =
        target_price.ok_or_else(|| ExchangeError::CurrencyNotFound(target.to_string()))?;
    check_price(target, target_price)?;

    Ok(source_price / target_price)
}

fn check_price(currency: &str, price: f64) -> Result<(), ExchangeError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ExchangeError::InvalidPrice {
            currency: currency.to_string(),
            price,
        })
    }
}

pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// Display form of an amount: always 4 decimal places.
pub fn format_amount(value: f64) -> String {
    format!("{value:.4}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source_currency: String,
    pub target_currency: String,
    pub source_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub rate: f64,
    pub target_amount: f64,
}

impl ConversionRequest {
    pub fn resolve(&self, table: &[RateRecord]) -> Result<ConversionResult, ExchangeError> {
        let rate = exchange_rate(table, &self.source_currency, &self.target_currency)?;
        Ok(ConversionResult {
            rate,
            target_amount: convert(self.source_amount, rate),
        })
    }
}
