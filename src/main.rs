use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxview::core::log::init_logging;

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

impl From<Commands> for fxview::AppCommand {
    fn from(cmd: Commands) -> fxview::AppCommand {
        match cmd {
            Commands::Currencies => fxview::AppCommand::Currencies,
            Commands::Rates { base, search } => fxview::AppCommand::Rates { base, search },
            Commands::Convert { amount, from, to } => {
                fxview::AppCommand::Convert { amount, from, to }
            }
            Commands::Interactive => fxview::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List available currencies
    Currencies,
    /// Display latest rates against a base currency
    Rates {
        /// Base currency, defaults to the configured one
        #[arg(short, long)]
        base: Option<String>,
        /// Only show codes containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency, defaults to the configured one
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency, defaults to the configured one
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Browse rates and convert amounts in an interactive session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => {
            fxview::cli::setup::setup(cli.config_path.as_deref()).map(|_| ())
        }
        Some(cmd) => fxview::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
