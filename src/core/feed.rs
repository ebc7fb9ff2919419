//! Price feed abstractions

use crate::core::rates::RateRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Source of the full, possibly duplicated, rate table.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_rates(&self) -> Result<Vec<RateRecord>>;
}
