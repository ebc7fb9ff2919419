use super::{rates, ui};
use crate::core::schema::ExchangeSchema;
use crate::core::{ExchangeForm, MissingRatePolicy, PriceFeed, RateSnapshot};
use anyhow::{Result, bail};

/// A currency pair plus exactly one amount, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub from: Option<String>,
    pub to: String,
    pub amount: Option<String>,
    pub target_amount: Option<String>,
}

/// Fills a fresh form the way a user would: pick both tokens, then type the
/// one amount that was given.
pub fn fill_form(
    snapshot: &RateSnapshot,
    options: &ConvertOptions,
    default_source: &str,
    policy: MissingRatePolicy,
) -> Result<ExchangeForm> {
    let mut form = ExchangeForm::new(policy);
    let from = options.from.as_deref().unwrap_or(default_source);
    form.select_source_token(snapshot, from)?;
    form.select_target_token(snapshot, &options.to)?;

    match (&options.amount, &options.target_amount) {
        (Some(amount), None) => {
            ExchangeSchema::validate_amount("source", amount)?;
            form.edit_source(snapshot, amount)?;
        }
        (None, Some(amount)) => {
            ExchangeSchema::validate_amount("target", amount)?;
            form.edit_target(snapshot, amount)?;
        }
        _ => bail!("Exactly one of --amount or --target-amount is required"),
    }
    Ok(form)
}

pub fn display_form(form: &ExchangeForm) -> String {
    format!(
        "{} {} = {} {}",
        ui::amount_text(form.source()),
        form.source_token(),
        ui::amount_text(form.target()),
        form.target_token().unwrap_or("N/A")
    )
}

pub async fn run(feed: &dyn PriceFeed, options: &ConvertOptions, default_source: &str) -> Result<()> {
    let snapshot = rates::fetch_snapshot(feed).await?;
    let form = fill_form(&snapshot, options, default_source, MissingRatePolicy::Report)?;
    println!("{}", display_form(&form));
    Ok(())
}
