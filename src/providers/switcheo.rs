use crate::core::PriceFeed;
use crate::core::rates::RateRecord;
use crate::providers::util::{FETCH_RETRIES, FETCH_RETRY_DELAY_MS, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://interview.switcheo.com";

/// Reads the public `prices.json` table.
pub struct SwitcheoPriceFeed {
    base_url: String,
    client: reqwest::Client,
}

impl SwitcheoPriceFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxswap/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SwitcheoPriceFeed {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn prices_url(&self) -> String {
        format!("{}/prices.json", self.base_url)
    }
}

#[async_trait]
impl PriceFeed for SwitcheoPriceFeed {
    #[instrument(name = "SwitcheoPriceFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Result<Vec<RateRecord>> {
        let url = self.prices_url();
        debug!("Requesting rate table from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            FETCH_RETRIES,
            FETCH_RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), url));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        let records: Vec<RateRecord> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate table from {}: {}", url, e))?;

        debug!(count = records.len(), "Received rate table");
        Ok(records)
    }
}
