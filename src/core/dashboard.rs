//! The refresh/render cycle behind every command.

use super::config::{AppConfig, ConversionConfig, NumberFormat};
use super::currency::{ConversionProvider, RateProvider, RateSnapshot};
use super::error::{ConvertError, ValidationError};
use super::format::format_number;
use super::state::{AppState, Phase, Picker, RateView, Timestamp};
use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, error, info};

/// Identifies one rate refresh. Only the most recently issued ticket may
/// update the rate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    token: u64,
    base: String,
}

impl RefreshTicket {
    pub fn base(&self) -> &str {
        &self.base
    }
}

pub struct Dashboard<'a> {
    rate_provider: &'a dyn RateProvider,
    converter: &'a dyn ConversionProvider,
    state: AppState,
    format: NumberFormat,
    defaults: ConversionConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        rate_provider: &'a dyn RateProvider,
        converter: &'a dyn ConversionProvider,
        config: &AppConfig,
    ) -> Self {
        Dashboard {
            rate_provider,
            converter,
            state: AppState::new(&config.base_currency),
            format: config.number_format.clone(),
            defaults: config.conversion.clone(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> RateView {
        self.state.view(&self.format)
    }

    /// Loads symbols, fills all pickers, then fetches rates for the base.
    pub async fn init(&mut self) -> Result<()> {
        self.init_with_base(None).await
    }

    /// Like [`Dashboard::init`], but selects `base` once the symbols are
    /// known so rates are fetched a single time, for that base. An unknown
    /// `base` is rejected before any rate request.
    pub async fn init_with_base(&mut self, base: Option<&str>) -> Result<()> {
        self.load_symbols().await?;
        if let Some(base) = base {
            self.state.base_picker.select(base)?;
            if let Some(selected) = self.state.base_picker.selected() {
                self.state.base = selected.to_string();
            }
        }
        self.refresh().await;
        Ok(())
    }

    /// Fetches the symbol table and populates the pickers from it.
    /// Failure is fatal: the state moves to [`Phase::Failed`].
    pub async fn load_symbols(&mut self) -> Result<()> {
        let symbols = match self.rate_provider.list_currencies().await {
            Ok(symbols) => symbols,
            Err(e) => {
                self.state.phase = Phase::Failed;
                return Err(e).context("Failed to load currencies");
            }
        };
        info!(count = symbols.len(), "Loaded currency symbols");

        self.state.base_picker = Picker::populate(&symbols, &self.state.base);
        self.state.from_picker = Picker::populate(&symbols, &self.defaults.from);
        self.state.to_picker = Picker::populate(&symbols, &self.defaults.to);
        self.state.symbols = symbols;
        self.state.phase = Phase::Ready;
        Ok(())
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.state.request_token += 1;
        self.state.phase = Phase::Loading;
        debug!(
            token = self.state.request_token,
            base = %self.state.base,
            "Starting rate refresh"
        );
        RefreshTicket {
            token: self.state.request_token,
            base: self.state.base.clone(),
        }
    }

    /// Applies a fetch result. Returns `false` if the ticket was superseded
    /// and the result discarded.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<RateSnapshot>,
    ) -> bool {
        if ticket.token != self.state.request_token {
            debug!(
                token = ticket.token,
                latest = self.state.request_token,
                "Discarding stale rate refresh"
            );
            return false;
        }

        match result {
            Ok(snapshot) => {
                debug!(base = %ticket.base, count = snapshot.rates.len(), "Rates refreshed");
                self.state.rates = snapshot.rates;
                self.state.updated = Some(match snapshot.date {
                    Some(date) => Timestamp::Provider(date),
                    None => Timestamp::Local(Local::now()),
                });
            }
            Err(e) => {
                error!(error = %e, base = %ticket.base, "Failed to fetch rates from all providers");
                self.state.rates.clear();
                self.state.updated = Some(Timestamp::Local(Local::now()));
            }
        }
        self.state.phase = Phase::Ready;
        true
    }

    /// Refetches rates for the current base. Failures leave an empty table.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let result = self.rate_provider.get_rates(ticket.base()).await;
        self.complete_refresh(ticket, result);
    }

    /// Changes the base currency and refreshes rates for it.
    pub async fn select_base(&mut self, code: &str) -> Result<()> {
        self.state.base_picker.select(code)?;
        if let Some(selected) = self.state.base_picker.selected() {
            self.state.base = selected.to_string();
        }
        self.refresh().await;
        Ok(())
    }

    pub fn set_search(&mut self, term: &str) {
        self.state.search = term.to_string();
    }

    pub fn select_from(&mut self, code: &str) -> Result<()> {
        self.state.from_picker.select(code)
    }

    pub fn select_to(&mut self, code: &str) -> Result<()> {
        self.state.to_picker.select(code)
    }

    /// Selects both conversion currencies, or neither if either is unknown.
    pub fn select_pair(&mut self, from: &str, to: &str) -> Result<()> {
        let from = self.state.from_picker.resolve(from)?;
        let to = self.state.to_picker.resolve(to)?;
        self.state.from_picker.select(&from)?;
        self.state.to_picker.select(&to)
    }

    /// Converts `amount_input` between the selected from/to currencies.
    ///
    /// Input is validated before any request is made. Conversion always goes
    /// to the conversion provider directly, without fallback.
    pub async fn convert(&self, amount_input: &str) -> Result<String, ConvertError> {
        let amount = parse_amount(amount_input)?;
        let (from, to) = match (
            self.state.from_picker.selected(),
            self.state.to_picker.selected(),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(ValidationError::MissingCurrency.into()),
        };

        match self.converter.convert(amount, from, to).await {
            Ok(Some(value)) => Ok(format!(
                "{} {} = {} {}",
                format_number(amount, &self.format),
                from,
                format_number(value, &self.format),
                to
            )),
            Ok(None) => Err(ConvertError::Unavailable),
            Err(e) => {
                error!(error = %e, %from, %to, "Conversion failed");
                Err(ConvertError::Failed(e))
            }
        }
    }
}

/// Parses a user supplied amount; it must be a finite number above zero.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount)
}
