use anyhow::Result;
use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use fxswap::cli::convert::ConvertOptions;
use fxswap::cli::watch::WatchOptions;
use fxswap::core::log::init_logging;
use fxswap::core::sum::SumStrategy;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["amount", "target_amount"])
))]
struct PairArgs {
    /// Currency to sell, defaults to the configured source token
    #[arg(short, long)]
    from: Option<String>,

    /// Currency to buy
    #[arg(short, long)]
    to: String,

    /// Amount to sell, up to 4 decimal places
    #[arg(short, long)]
    amount: Option<String>,

    /// Amount to buy, up to 4 decimal places
    #[arg(long)]
    target_amount: Option<String>,
}

impl From<PairArgs> for ConvertOptions {
    fn from(args: PairArgs) -> ConvertOptions {
        ConvertOptions {
            from: args.from,
            to: args.to,
            amount: args.amount,
            target_amount: args.target_amount,
        }
    }
}

impl From<Commands> for fxswap::AppCommand {
    fn from(cmd: Commands) -> fxswap::AppCommand {
        match cmd {
            Commands::Sum { n, strategy } => fxswap::AppCommand::Sum { n, strategy },
            Commands::Rates => fxswap::AppCommand::Rates,
            Commands::Convert(pair) => fxswap::AppCommand::Convert(pair.into()),
            Commands::Watch { pair, ticks } => fxswap::AppCommand::Watch(WatchOptions {
                conversion: pair.into(),
                ticks,
            }),
            Commands::Swap(pair) => fxswap::AppCommand::Swap(pair.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Sum the integers from 1 to N
    Sum {
        n: u64,

        /// Only run one strategy and print the bare result
        #[arg(short, long, value_enum)]
        strategy: Option<SumStrategy>,
    },
    /// List the latest price of every currency
    Rates,
    /// Convert an amount between two currencies
    Convert(PairArgs),
    /// Keep converting as prices refresh; press Enter to refresh now
    Watch {
        #[command(flatten)]
        pair: PairArgs,

        /// Stop after this many price updates
        #[arg(long)]
        ticks: Option<usize>,
    },
    /// Convert, then submit a simulated swap
    Swap(PairArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxswap::cli::setup::setup(),
        Some(cmd) => fxswap::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
