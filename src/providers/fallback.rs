use crate::core::{RateProvider, RateSnapshot, SymbolTable};
use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Tries an ordered list of providers; the first success wins.
pub struct FallbackProvider {
    providers: Vec<Box<dyn RateProvider>>,
}

impl FallbackProvider {
    pub fn new(providers: Vec<Box<dyn RateProvider>>) -> Self {
        FallbackProvider { providers }
    }
}

#[async_trait]
impl RateProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn list_currencies(&self) -> Result<SymbolTable> {
        for provider in &self.providers {
            match provider.list_currencies().await {
                Ok(symbols) => {
                    debug!(provider = provider.name(), "Currencies fetched");
                    return Ok(symbols);
                }
                Err(e) => warn!(
                    provider = provider.name(),
                    error = %e,
                    "Currency listing failed, trying next provider"
                ),
            }
        }
        bail!("Failed to fetch currencies from all providers")
    }

    async fn get_rates(&self, base: &str) -> Result<RateSnapshot> {
        for provider in &self.providers {
            match provider.get_rates(base).await {
                Ok(snapshot) => {
                    debug!(provider = provider.name(), %base, "Rates fetched");
                    return Ok(snapshot);
                }
                Err(e) => warn!(
                    provider = provider.name(),
                    %base,
                    error = %e,
                    "Rate listing failed, trying next provider"
                ),
            }
        }
        bail!("Failed to fetch rates for {} from all providers", base)
    }
}
