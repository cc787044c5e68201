use super::util::{endpoint, get_json};
use crate::core::{FetchError, RateProvider, RateSnapshot, RateTable, SymbolTable};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Secondary provider backed by exchangerate.host.
pub struct ExchangeRateHostProvider {
    base_url: String,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateHostProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SymbolsResponse {
    symbols: Option<BTreeMap<String, SymbolEntry>>,
}

#[derive(Deserialize, Debug)]
struct SymbolEntry {
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LatestResponse {
    date: Option<String>,
    rates: Option<RateTable>,
}

fn missing(url: &reqwest::Url, field: &str) -> FetchError {
    FetchError::Shape {
        url: url.to_string(),
        reason: format!("missing {field}"),
    }
}

#[async_trait]
impl RateProvider for ExchangeRateHostProvider {
    fn name(&self) -> &str {
        "exchangerate.host"
    }

    #[instrument(name = "ExchangeRateHostSymbols", skip(self))]
    async fn list_currencies(&self) -> Result<SymbolTable> {
        let url = endpoint(&self.base_url, "/symbols", &[])?;
        let data: SymbolsResponse = get_json(&url).await?;
        let symbols = data.symbols.ok_or_else(|| missing(&url, "symbols"))?;

        let normalized: SymbolTable = symbols
            .into_iter()
            .map(|(code, entry)| {
                let name = entry
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| code.clone());
                (code, name)
            })
            .collect();
        debug!(count = normalized.len(), "Received symbols");
        Ok(normalized)
    }

    #[instrument(name = "ExchangeRateHostLatest", skip(self), fields(base = %base))]
    async fn get_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = endpoint(&self.base_url, "/latest", &[("base", base)])?;
        let data: LatestResponse = get_json(&url).await?;
        let rates = data.rates.ok_or_else(|| missing(&url, "rates"))?;
        Ok(RateSnapshot {
            rates,
            date: data.date,
        })
    }
}
