pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::Dashboard;
use crate::providers::{ExchangeRateHostProvider, FallbackProvider, FrankfurterProvider};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Rates {
        base: Option<String>,
        search: Option<String>,
    },
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxview starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rate_provider = FallbackProvider::new(vec![
        Box::new(FrankfurterProvider::new(&config.providers.primary.base_url)),
        Box::new(ExchangeRateHostProvider::new(
            &config.providers.secondary.base_url,
        )),
    ]);
    // Conversions go straight to the primary provider, without fallback
    let converter = FrankfurterProvider::new(&config.providers.primary.base_url);

    let mut dashboard = Dashboard::new(&rate_provider, &converter, &config);

    match command {
        AppCommand::Currencies => cli::currencies::run(&mut dashboard).await,
        AppCommand::Rates { base, search } => {
            cli::rates::run(&mut dashboard, base.as_deref(), search.as_deref()).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&mut dashboard, &amount, from.as_deref(), to.as_deref()).await
        }
        AppCommand::Interactive => cli::interactive::run(&mut dashboard).await,
    }
}
