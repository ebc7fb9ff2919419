//! Simulated swap submission.

use crate::core::schema::ExchangeValues;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SWAP_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_SWAP_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("A swap is already in progress")]
    Busy,

    #[error("Swap timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub title: String,
    pub description: String,
}

impl SwapReceipt {
    fn completed(values: &ExchangeValues) -> Self {
        SwapReceipt {
            title: "Swap successfully".to_string(),
            description: format!(
                "Your currency swap from {} to {} has been completed successfully",
                values.source_token,
                values.target_token.as_deref().unwrap_or("N/A")
            ),
        }
    }
}

/// Runs one submission at a time; a second caller gets [`SwapError::Busy`].
pub struct SwapSubmitter {
    delay: Duration,
    timeout: Duration,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for SwapSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SWAP_DELAY, DEFAULT_SWAP_TIMEOUT)
    }
}

impl SwapSubmitter {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        SwapSubmitter {
            delay,
            timeout,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn submit(&self, values: &ExchangeValues) -> Result<SwapReceipt, SwapError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SwapError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        debug!(
            source = values.source,
            source_token = %values.source_token,
            target_token = ?values.target_token,
            "Submitting swap"
        );
        tokio::time::timeout(self.timeout, tokio::time::sleep(self.delay))
            .await
            .map_err(|_| SwapError::TimedOut(self.timeout))?;

        Ok(SwapReceipt::completed(values))
    }
}
