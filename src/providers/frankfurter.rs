use super::util::{endpoint, get_json};
use crate::core::{
    ConversionProvider, FetchError, RateProvider, RateSnapshot, RateTable, SymbolTable,
};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Primary provider backed by the Frankfurter API.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestResponse {
    date: Option<String>,
    rates: Option<RateTable>,
}

#[derive(Deserialize, Debug)]
struct ConversionResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    #[instrument(name = "FrankfurterCurrencies", skip(self))]
    async fn list_currencies(&self) -> Result<SymbolTable> {
        let url = endpoint(&self.base_url, "/currencies", &[])?;
        let symbols: SymbolTable = get_json(&url).await?;
        debug!(count = symbols.len(), "Received currencies");
        Ok(symbols)
    }

    #[instrument(name = "FrankfurterLatest", skip(self), fields(base = %base))]
    async fn get_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = endpoint(&self.base_url, "/latest", &[("from", base)])?;
        let data: LatestResponse = get_json(&url).await?;
        let rates = data.rates.ok_or_else(|| FetchError::Shape {
            url: url.to_string(),
            reason: "missing rates".to_string(),
        })?;
        Ok(RateSnapshot {
            rates,
            date: data.date,
        })
    }
}

#[async_trait]
impl ConversionProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterConvert", skip(self))]
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Option<f64>> {
        let amount = amount.to_string();
        let url = endpoint(
            &self.base_url,
            "/latest",
            &[("amount", amount.as_str()), ("from", from), ("to", to)],
        )?;
        let data: ConversionResponse = get_json(&url).await?;
        Ok(data.rates.and_then(|rates| rates.get(to).copied()))
    }
}
