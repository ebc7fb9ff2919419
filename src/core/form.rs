//! Exchange form state.
//!
//! The form keeps the two amount fields as display strings and the selected
//! tokens. Every user edit may derive the opposite amount from the current
//! rate snapshot. Derived writes go through a private setter and never call
//! back into the edit handlers, so editing one field can't loop.

use crate::core::rates::{ExchangeError, RateSnapshot, convert, format_amount};
use crate::core::schema::{
    DEFAULT_SOURCE_TOKEN, ExchangeSchema, ExchangeValues, RawExchangeForm, SchemaError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do when a derived update can't find a usable rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRatePolicy {
    /// Leave the fields untouched and say nothing.
    #[default]
    Ignore,
    /// Hand the error back to the caller.
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Source,
    Target,
}

/// A value the form wrote on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: Field,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOption {
    pub currency: String,
    pub disabled: bool,
}

pub type EditResult = Result<Option<FieldUpdate>, ExchangeError>;

#[derive(Debug, Clone)]
pub struct ExchangeForm {
    source: String,
    target: String,
    source_token: String,
    target_token: Option<String>,
    policy: MissingRatePolicy,
    last_edit: Option<Field>,
}

impl Default for ExchangeForm {
    fn default() -> Self {
        Self::new(MissingRatePolicy::default())
    }
}

impl ExchangeForm {
    pub fn new(policy: MissingRatePolicy) -> Self {
        ExchangeForm {
            source: String::new(),
            target: String::new(),
            source_token: DEFAULT_SOURCE_TOKEN.to_string(),
            target_token: None,
            policy,
            last_edit: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn source_token(&self) -> &str {
        &self.source_token
    }

    pub fn target_token(&self) -> Option<&str> {
        self.target_token.as_deref()
    }

    pub fn policy(&self) -> MissingRatePolicy {
        self.policy
    }

    /// User typed into the source amount; derives the target amount.
    pub fn edit_source(&mut self, snapshot: &RateSnapshot, value: &str) -> EditResult {
        self.source = value.to_string();
        self.last_edit = Some(Field::Source);
        self.derive_target(snapshot)
    }

    /// User typed into the target amount; derives the source amount.
    pub fn edit_target(&mut self, snapshot: &RateSnapshot, value: &str) -> EditResult {
        self.target = value.to_string();
        self.last_edit = Some(Field::Target);
        self.derive_source(snapshot)
    }

    /// Re-derives the source amount from the target amount.
    pub fn select_source_token(&mut self, snapshot: &RateSnapshot, token: &str) -> EditResult {
        self.source_token = token.to_string();
        self.derive_source(snapshot)
    }

    /// Re-derives the target amount from the source amount.
    pub fn select_target_token(&mut self, snapshot: &RateSnapshot, token: &str) -> EditResult {
        self.target_token = Some(token.to_string());
        self.derive_target(snapshot)
    }

    /// Recomputes whichever field the user did not type last, against a
    /// newer snapshot.
    pub fn refresh(&mut self, snapshot: &RateSnapshot) -> EditResult {
        match self.last_edit {
            Some(Field::Source) => self.derive_target(snapshot),
            Some(Field::Target) => self.derive_source(snapshot),
            None => Ok(None),
        }
    }

    /// Currencies offered for `side`. The one picked on the other side is disabled.
    pub fn selectable_tokens(&self, snapshot: &RateSnapshot, side: Field) -> Vec<TokenOption> {
        let taken = match side {
            Field::Source => self.target_token.as_deref(),
            Field::Target => Some(self.source_token.as_str()),
        };
        snapshot
            .currencies()
            .map(|currency| TokenOption {
                currency: currency.to_string(),
                disabled: Some(currency) == taken,
            })
            .collect()
    }

    /// Submission needs at least one amount and no pending submission.
    pub fn can_submit(&self, busy: bool) -> bool {
        !busy && (!self.source.is_empty() || !self.target.is_empty())
    }

    pub fn values(&self) -> Result<ExchangeValues, SchemaError> {
        ExchangeSchema::validate(&RawExchangeForm {
            source: self.source.clone(),
            target: self.target.clone(),
            source_token: Some(self.source_token.clone()),
            target_token: self.target_token.clone(),
        })
    }

    fn derive_target(&mut self, snapshot: &RateSnapshot) -> EditResult {
        let (Some(amount), Some(target_token)) = (parse_amount(&self.source), &self.target_token)
        else {
            return Ok(None);
        };
        let rate = snapshot.rate(&self.source_token, target_token);
        self.write_derived(Field::Target, amount, rate)
    }

    fn derive_source(&mut self, snapshot: &RateSnapshot) -> EditResult {
        let (Some(amount), Some(target_token)) = (parse_amount(&self.target), &self.target_token)
        else {
            return Ok(None);
        };
        let rate = snapshot.rate(target_token, &self.source_token);
        self.write_derived(Field::Source, amount, rate)
    }

    fn write_derived(
        &mut self,
        field: Field,
        amount: f64,
        rate: Result<f64, ExchangeError>,
    ) -> EditResult {
        let rate = match rate {
            Ok(rate) => rate,
            Err(e) => {
                return match self.policy {
                    MissingRatePolicy::Ignore => {
                        debug!(error = %e, ?field, "No rate, leaving field unchanged");
                        Ok(None)
                    }
                    MissingRatePolicy::Report => Err(e),
                };
            }
        };

        let value = format_amount(convert(amount, rate));
        match field {
            Field::Source => self.source = value.clone(),
            Field::Target => self.target = value.clone(),
        }
        Ok(Some(FieldUpdate { field, value }))
    }
}

/// Zero, empty and unparsable input never derive anything.
fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateRecord;

    fn snapshot() -> RateSnapshot {
        RateSnapshot::new(vec![
            RateRecord::new("USD", 1.0),
            RateRecord::new("ETH", 2000.0),
            RateRecord::new("ATOM", 8.0),
        ])
    }

    fn usd_to_eth(policy: MissingRatePolicy) -> ExchangeForm {
        let mut form = ExchangeForm::new(policy);
        form.select_target_token(&snapshot(), "ETH").unwrap();
        form
    }

    #[test]
    fn test_edit_source_derives_target() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        let update = form.edit_source(&snapshot(), "100").unwrap();
        assert_eq!(
            update,
            Some(FieldUpdate {
                field: Field::Target,
                value: "0.0500".to_string()
            })
        );
        assert_eq!(form.source(), "100");
        assert_eq!(form.target(), "0.0500");
    }

    #[test]
    fn test_edit_target_derives_source() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        let update = form.edit_target(&snapshot(), "0.5").unwrap().unwrap();
        assert_eq!(update.field, Field::Source);
        assert_eq!(form.source(), "1000.0000");
        assert_eq!(form.target(), "0.5");
    }

    #[test]
    fn test_zero_or_garbage_input_does_nothing() {
        let mut form = usd_to_eth(MissingRatePolicy::Report);
        for input in ["0", "", "abc", "0.0000"] {
            assert_eq!(form.edit_source(&snapshot(), input).unwrap(), None);
            assert_eq!(form.target(), "");
        }
    }

    #[test]
    fn test_no_target_token_does_nothing() {
        let mut form = ExchangeForm::default();
        assert_eq!(form.edit_source(&snapshot(), "10").unwrap(), None);
        assert_eq!(form.target(), "");
    }

    #[test]
    fn test_missing_rate_ignored_by_default() {
        let mut form = ExchangeForm::default();
        form.select_target_token(&snapshot(), "XYZ").unwrap();
        assert_eq!(form.edit_source(&snapshot(), "10").unwrap(), None);
        assert_eq!(form.target(), "");
    }

    #[test]
    fn test_missing_rate_reported() {
        let mut form = ExchangeForm::new(MissingRatePolicy::Report);
        form.edit_source(&snapshot(), "10").unwrap();
        let err = form.select_target_token(&snapshot(), "XYZ").unwrap_err();
        assert_eq!(err, ExchangeError::CurrencyNotFound("XYZ".to_string()));
        assert_eq!(form.target(), "");
    }

    #[test]
    fn test_select_source_token_rederives_source() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        form.edit_target(&snapshot(), "1").unwrap();
        assert_eq!(form.source(), "2000.0000");

        let update = form.select_source_token(&snapshot(), "ATOM").unwrap().unwrap();
        assert_eq!(update.field, Field::Source);
        assert_eq!(form.source(), "250.0000");
        assert_eq!(form.source_token(), "ATOM");
    }

    #[test]
    fn test_select_target_token_rederives_target() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        form.edit_source(&snapshot(), "16").unwrap();
        form.select_target_token(&snapshot(), "ATOM").unwrap();
        assert_eq!(form.target(), "2.0000");
        assert_eq!(form.target_token(), Some("ATOM"));
    }

    #[test]
    fn test_refresh_uses_last_edited_field() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        assert_eq!(form.refresh(&snapshot()).unwrap(), None);

        form.edit_source(&snapshot(), "100").unwrap();
        let newer = RateSnapshot::new(vec![
            RateRecord::new("USD", 1.0),
            RateRecord::new("ETH", 4000.0),
        ]);
        form.refresh(&newer).unwrap();
        assert_eq!(form.source(), "100");
        assert_eq!(form.target(), "0.0250");
    }

    #[test]
    fn test_selectable_tokens_disable_other_side() {
        let form = usd_to_eth(MissingRatePolicy::Ignore);
        let source_side = form.selectable_tokens(&snapshot(), Field::Source);
        let disabled: Vec<_> = source_side
            .iter()
            .filter(|t| t.disabled)
            .map(|t| t.currency.as_str())
            .collect();
        assert_eq!(disabled, vec!["ETH"]);

        let target_side = form.selectable_tokens(&snapshot(), Field::Target);
        assert!(target_side.iter().any(|t| t.currency == "USD" && t.disabled));
        assert_eq!(target_side.len(), 3);
    }

    #[test]
    fn test_can_submit_and_values() {
        let mut form = usd_to_eth(MissingRatePolicy::Ignore);
        assert!(!form.can_submit(false));
        form.edit_source(&snapshot(), "100").unwrap();
        assert!(form.can_submit(false));
        assert!(!form.can_submit(true));

        let values = form.values().unwrap();
        assert_eq!(values.source, 100.0);
        assert_eq!(values.target, 0.05);
        assert_eq!(values.source_token, "USD");
        assert_eq!(values.target_token.as_deref(), Some("ETH"));
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: MissingRatePolicy = serde_yaml::from_str("report").unwrap();
        assert_eq!(policy, MissingRatePolicy::Report);
    }
}
