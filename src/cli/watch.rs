use super::convert::{ConvertOptions, display_form, fill_form};
use super::ui;
use crate::core::poller::RatePoller;
use crate::core::{ExchangeForm, MissingRatePolicy, PriceFeed, RateSnapshot};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    pub conversion: ConvertOptions,
    /// Stop after this many snapshots
    pub ticks: Option<usize>,
}

/// Re-derives the conversion on every new snapshot until Ctrl-C or
/// `ticks` snapshots. Pressing Enter refreshes right away.
pub async fn run(
    feed: Arc<dyn PriceFeed>,
    options: &WatchOptions,
    default_source: &str,
    interval: Duration,
    policy: MissingRatePolicy,
) -> Result<()> {
    let poller = RatePoller::spawn(feed, interval);
    let result = drive(
        &poller,
        spawn_enter_listener(),
        options,
        default_source,
        policy,
        |line| println!("{line}"),
    )
    .await;
    poller.shutdown();
    result
}

/// The watch loop proper. Every unit received on `enter` asks the poller for
/// an immediate refresh; every snapshot is rendered and handed to `emit`.
pub async fn drive(
    poller: &RatePoller,
    mut enter: mpsc::UnboundedReceiver<()>,
    options: &WatchOptions,
    default_source: &str,
    policy: MissingRatePolicy,
    mut emit: impl FnMut(&str),
) -> Result<()> {
    let mut snapshots = poller.subscribe();
    let mut enter_open = true;
    let mut form: Option<ExchangeForm> = None;
    let mut seen = 0;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("Rate poller stopped")?;
            }
            key = enter.recv(), if enter_open => {
                match key {
                    Some(()) => poller.refresh_now(),
                    None => enter_open = false,
                }
                continue;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }

        let Some(snapshot) = snapshots.borrow_and_update().clone() else {
            continue;
        };

        let line = render_tick(&mut form, &snapshot, &options.conversion, default_source, policy)?;
        emit(&line);

        seen += 1;
        if options.ticks.is_some_and(|ticks| seen >= ticks) {
            break;
        }
    }

    Ok(())
}

/// Fills the form from the first snapshot, then re-derives it against each
/// later one. Returns the line to display.
pub fn render_tick(
    form: &mut Option<ExchangeForm>,
    snapshot: &RateSnapshot,
    options: &ConvertOptions,
    default_source: &str,
    policy: MissingRatePolicy,
) -> Result<String> {
    let current = match form.take() {
        Some(mut current) => {
            current.refresh(snapshot)?;
            current
        }
        None => fill_form(snapshot, options, default_source, policy)?,
    };
    let line = format!(
        "{} {}",
        ui::style_text(
            &snapshot.fetched_at.format("%H:%M:%S").to_string(),
            ui::StyleType::Subtle
        ),
        display_form(&current)
    );
    *form = Some(current);
    Ok(line)
}

/// Reads stdin on its own thread so a pending read never holds up the
/// runtime on exit.
fn spawn_enter_listener() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
