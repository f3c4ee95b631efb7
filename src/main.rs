use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fintick::core::log::init_logging;

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

impl From<Commands> for fintick::AppCommand {
    fn from(cmd: Commands) -> fintick::AppCommand {
        match cmd {
            Commands::Ticker { watch } => fintick::AppCommand::Ticker { watch },
            Commands::Markets { filter, watch } => fintick::AppCommand::Markets { filter, watch },
            Commands::Buy {
                symbol,
                amount,
                price,
            } => fintick::AppCommand::Buy {
                symbol,
                amount,
                price,
            },
            Commands::Portfolio { sell } => fintick::AppCommand::Portfolio { sell },
            Commands::Convert { amount, from, to } => {
                fintick::AppCommand::Convert { amount, from, to }
            }
            Commands::Loan {
                principal,
                rate,
                years,
            } => fintick::AppCommand::Loan {
                principal,
                rate,
                years,
            },
            Commands::Subs(cmd) => fintick::AppCommand::Subs(cmd.into()),
            Commands::Vault(cmd) => fintick::AppCommand::Vault(cmd.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

impl From<SubsCommands> for fintick::SubsCommand {
    fn from(cmd: SubsCommands) -> fintick::SubsCommand {
        match cmd {
            SubsCommands::List => fintick::SubsCommand::List,
            SubsCommands::Add {
                name,
                amount,
                cycle,
                due,
                category,
            } => fintick::SubsCommand::Add {
                name,
                amount,
                cycle,
                due,
                category,
            },
            SubsCommands::Remove { id } => fintick::SubsCommand::Remove { id },
        }
    }
}

impl From<VaultCommands> for fintick::VaultCommand {
    fn from(cmd: VaultCommands) -> fintick::VaultCommand {
        match cmd {
            VaultCommands::List => fintick::VaultCommand::List,
            VaultCommands::Add {
                name,
                target,
                deadline,
            } => fintick::VaultCommand::Add {
                name,
                target,
                deadline,
            },
            VaultCommands::Deposit { id, amount } => {
                fintick::VaultCommand::Deposit { id, amount }
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display a one line market ticker
    Ticker {
        /// Redraw every minute until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Display the markets dashboard
    Markets {
        /// Show only assets matching this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Redraw every minute until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Record a crypto purchase in the portfolio
    Buy {
        /// Asset symbol, e.g. btc
        symbol: String,
        /// Units purchased
        amount: f64,
        /// Price per unit, defaults to the live price
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Display portfolio holdings with live profit and loss
    Portfolio {
        /// Remove the holding with this id
        #[arg(long)]
        sell: Option<String>,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    /// Calculate a fixed rate loan payment
    Loan {
        /// Loan principal
        principal: f64,
        /// Annual interest rate in percent
        rate: f64,
        /// Term in years
        years: u32,
    },
    /// Track recurring subscriptions
    #[command(subcommand)]
    Subs(SubsCommands),
    /// Track savings goals
    #[command(subcommand)]
    Vault(VaultCommands),
}

#[derive(Subcommand)]
enum SubsCommands {
    /// List subscriptions with monthly and yearly totals
    List,
    /// Add a subscription
    Add {
        name: String,
        amount: f64,
        /// Billing cycle, monthly or yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,
        /// Next due date as YYYY-MM-DD
        #[arg(long)]
        due: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove a subscription by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum VaultCommands {
    /// List savings vaults with progress
    List,
    /// Create a savings vault
    Add {
        name: String,
        target: f64,
        /// Target date as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Add money to a vault
    Deposit { id: String, amount: f64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fintick::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fintick::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  coingecko:
    base_url: "https://api.coingecko.com"
  frankfurter:
    base_url: "https://api.frankfurter.app"
  metals:
    base_url: "https://api.metals.live"

currency: "USD"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
