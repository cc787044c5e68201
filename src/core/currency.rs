//! Exchange rate provider abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Currency code to human readable name, e.g. `USD -> United States Dollar`.
pub type SymbolTable = BTreeMap<String, String>;

/// Currency code to rate, relative to a base currency.
pub type RateTable = BTreeMap<String, f64>;

/// Normalized result of a rate listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    pub rates: RateTable,
    /// Provider supplied date of the rates, if any.
    pub date: Option<String>,
}

/// A source of currency symbols and latest rates.
///
/// Implementations normalize their own response shapes into
/// [`SymbolTable`] and [`RateSnapshot`].
#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn list_currencies(&self) -> Result<SymbolTable>;

    async fn get_rates(&self, base: &str) -> Result<RateSnapshot>;
}

/// Converts an amount between two currencies in one request.
#[async_trait]
pub trait ConversionProvider: Send + Sync {
    /// Returns `Ok(None)` when the response has no rate for `to`.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Option<f64>>;
}
