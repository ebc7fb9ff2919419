pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::cli::convert::ConvertOptions;
use crate::cli::watch::WatchOptions;
use crate::core::PriceFeed;
use crate::core::sum::SumStrategy;
use crate::core::swap::SwapSubmitter;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub enum AppCommand {
    Sum {
        n: u64,
        strategy: Option<SumStrategy>,
    },
    Rates,
    Convert(ConvertOptions),
    Watch(WatchOptions),
    Swap(ConvertOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    // Summing never touches the network or the config.
    if let AppCommand::Sum { n, strategy } = command {
        return cli::sum::run(n, strategy);
    }

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let feed: Arc<dyn PriceFeed> = Arc::new(providers::SwitcheoPriceFeed::new(
        &config.feed.base_url,
    )?);
    let default_source = config.default_source_token.as_str();

    match command {
        AppCommand::Sum { .. } => Ok(()),
        AppCommand::Rates => cli::rates::run(feed.as_ref(), &config.icons.base_url).await,
        AppCommand::Convert(options) => {
            cli::convert::run(feed.as_ref(), &options, default_source).await
        }
        AppCommand::Watch(options) => {
            cli::watch::run(
                feed,
                &options,
                default_source,
                config.refresh_interval(),
                config.missing_rate_policy,
            )
            .await
        }
        AppCommand::Swap(options) => {
            let submitter = SwapSubmitter::new(config.swap_delay(), config.swap_timeout());
            cli::swap::run(feed.as_ref(), &options, default_source, &submitter).await
        }
    }
}
