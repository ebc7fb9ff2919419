use super::ui;
use crate::core::{PriceFeed, RateSnapshot};
use anyhow::Result;
use comfy_table::Cell;

impl RateSnapshot {
    pub fn display_as_table(&self, icon_base_url: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Price"),
            ui::header_cell("Icon"),
        ]);

        for record in &self.records {
            table.add_row(vec![
                Cell::new(&record.currency),
                ui::number_cell(format!("{}", record.price)),
                Cell::new(record.icon_url(icon_base_url)),
            ]);
        }

        format!(
            "{}\n\n{}\n\n{}",
            ui::style_text("Rates", ui::StyleType::Title),
            table,
            ui::style_text(
                &format!(
                    "{} currencies, fetched at {}",
                    self.records.len(),
                    self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                ui::StyleType::Subtle
            )
        )
    }
}

/// Fetches the feed once and returns the deduplicated snapshot.
pub async fn fetch_snapshot(feed: &dyn PriceFeed) -> Result<RateSnapshot> {
    let pb = ui::new_spinner("Fetching prices...");
    let records = feed.fetch_rates().await;
    pb.finish_and_clear();
    Ok(RateSnapshot::new(records?))
}

pub async fn run(feed: &dyn PriceFeed, icon_base_url: &str) -> Result<()> {
    let snapshot = fetch_snapshot(feed).await?;
    println!("{}", snapshot.display_as_table(icon_base_url));
    Ok(())
}
