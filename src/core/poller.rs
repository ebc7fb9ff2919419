//! Background refresh of the rate table.
//!
//! A single task owns the feed. Every successful fetch is deduplicated into a
//! new [`RateSnapshot`] and published whole on a `watch` channel; readers
//! only ever see complete snapshots. A failed fetch leaves the previous
//! snapshot in place.

use crate::core::PriceFeed;
use crate::core::rates::RateSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(2000);
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

pub type SnapshotReceiver = watch::Receiver<Option<Arc<RateSnapshot>>>;

pub struct RatePoller {
    receiver: SnapshotReceiver,
    refresh: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl RatePoller {
    /// Fetches right away, then once per `interval` until shut down.
    /// Intervals below [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn spawn(feed: Arc<dyn PriceFeed>, interval: Duration) -> Self {
        if interval < MIN_REFRESH_INTERVAL {
            warn!(?interval, "Refresh interval too short, using {:?}", MIN_REFRESH_INTERVAL);
        }
        let interval = interval.max(MIN_REFRESH_INTERVAL);
        let (sender, receiver) = watch::channel(None);
        let refresh = Arc::new(Notify::new());
        let notify = Arc::clone(&refresh);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = notify.notified() => {
                        debug!("Refresh requested");
                        ticker.reset();
                    }
                }
                poll_once(feed.as_ref(), &sender).await;
            }
        });

        RatePoller {
            receiver,
            refresh,
            handle,
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.receiver.clone()
    }

    /// Most recent snapshot, if any fetch has succeeded yet.
    pub fn latest(&self) -> Option<Arc<RateSnapshot>> {
        self.receiver.borrow().clone()
    }

    /// Fetches again without waiting for the next tick.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for RatePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns whether a new snapshot was published.
pub async fn poll_once(
    feed: &dyn PriceFeed,
    sender: &watch::Sender<Option<Arc<RateSnapshot>>>,
) -> bool {
    match feed.fetch_rates().await {
        Ok(records) => {
            let snapshot = Arc::new(RateSnapshot::new(records));
            debug!(
                currencies = snapshot.records.len(),
                fetched_at = %snapshot.fetched_at,
                "Publishing rate snapshot"
            );
            sender.send_replace(Some(snapshot));
            true
        }
        Err(e) => {
            warn!(error = %e, "Rate refresh failed, keeping previous snapshot");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::testing::ScriptedFeed;
    use crate::core::rates::RateRecord;
    use anyhow::anyhow;
    use std::sync::atomic::Ordering;

    #[tokio::test(start_paused = true)]
    async fn test_publishes_deduped_snapshots_and_keeps_stale_on_error() {
        let feed = ScriptedFeed::new(vec![
            Ok(vec![
                RateRecord::new("USD", 1.0),
                RateRecord::new("ETH", 2000.0),
                RateRecord::new("USD", 1.01),
            ]),
            Err(anyhow!("connection reset")),
            Ok(vec![
                RateRecord::new("USD", 1.0),
                RateRecord::new("ETH", 4000.0),
            ]),
        ]);
        let poller = RatePoller::spawn(feed.clone(), DEFAULT_REFRESH_INTERVAL);
        let mut rx = poller.subscribe();
        assert!(poller.latest().is_none());

        rx.changed().await.unwrap();
        let first = poller.latest().unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.rate("USD", "ETH").unwrap(), 0.0005);

        // The failed refresh publishes nothing, so the next change is the
        // third response.
        rx.changed().await.unwrap();
        let third = rx.borrow_and_update().clone().unwrap();
        assert_eq!(third.rate("USD", "ETH").unwrap(), 0.00025);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 3);

        poller.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_skips_the_wait() {
        let feed = ScriptedFeed::new(vec![
            Ok(vec![RateRecord::new("USD", 1.0)]),
            Ok(vec![
                RateRecord::new("USD", 1.0),
                RateRecord::new("ATOM", 8.0),
            ]),
        ]);
        let poller = RatePoller::spawn(feed.clone(), Duration::from_secs(3600));
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().records.len(), 1);

        let started = tokio::time::Instant::now();
        poller.refresh_now();
        rx.changed().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(3600));
        assert_eq!(poller.latest().unwrap().records.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_polls() {
        let feed = ScriptedFeed::new(vec![Ok(vec![RateRecord::new("USD", 1.0)])]);
        let poller = RatePoller::spawn(feed, Duration::ZERO);
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(poller.latest().unwrap().records.len(), 1);
        poller.shutdown();
    }

    #[tokio::test]
    async fn test_poll_once_reports_outcome() {
        let feed = ScriptedFeed::new(vec![Ok(vec![RateRecord::new("USD", 1.0)])]);
        let (sender, receiver) = watch::channel(None);

        assert!(poll_once(feed.as_ref(), &sender).await);
        assert!(!poll_once(feed.as_ref(), &sender).await);
        assert_eq!(receiver.borrow().as_ref().unwrap().records.len(), 1);
    }
}
