use super::convert::{ConvertOptions, display_form, fill_form};
use super::{rates, ui};
use crate::core::swap::SwapSubmitter;
use crate::core::{MissingRatePolicy, PriceFeed};
use anyhow::{Result, bail};

pub async fn run(
    feed: &dyn PriceFeed,
    options: &ConvertOptions,
    default_source: &str,
    submitter: &SwapSubmitter,
) -> Result<()> {
    let snapshot = rates::fetch_snapshot(feed).await?;
    let form = fill_form(&snapshot, options, default_source, MissingRatePolicy::Report)?;
    if !form.can_submit(submitter.is_busy()) {
        bail!("Nothing to submit");
    }
    let values = form.values()?;
    println!("{}", display_form(&form));

    let pb = ui::new_spinner("Submitting swap...");
    let result = submitter.submit(&values).await;
    pb.finish_and_clear();

    match result {
        Ok(receipt) => {
            println!(
                "{}\n{}",
                ui::style_text(&receipt.title, ui::StyleType::Title),
                receipt.description
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", ui::style_text("An error has occurred", ui::StyleType::Error));
            Err(e.into())
        }
    }
}
