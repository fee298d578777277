//! Market-data provider registry with fallback and caching.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use dcf_core::{
    CashFlowProvider, CashFlowStatement, DataProvider, DcfError, Fundamentals,
    FundamentalsProvider, MarketDataCache, PeriodType, ReferenceRateProvider, Result, Symbol,
};
use dcf_valuation::ValuationEngine;

/// Registry for managing multiple market-data providers with automatic fallback.
///
/// The `MarketDataRegistry` holds an ordered list of providers per capability
/// (cash flows, fundamentals, reference rates) and tries them in order until
/// one succeeds. It implements the provider traits itself, so it can be handed
/// to a [`ValuationEngine`] directly.
///
/// # Example
///
/// ```rust,ignore
/// use dcf::{MarketDataRegistry, Symbol, ValuationAssumptions};
///
/// let engine = MarketDataRegistry::new().with_yahoo().into_engine();
/// let report = engine
///     .value(&Symbol::new("AAPL"), &ValuationAssumptions::default(), None)
///     .await?;
/// ```
#[derive(Default)]
pub struct MarketDataRegistry {
    cash_flow_providers: Vec<Arc<dyn CashFlowProvider>>,
    fundamentals_providers: Vec<Arc<dyn FundamentalsProvider>>,
    reference_rate_providers: Vec<Arc<dyn ReferenceRateProvider>>,
    cache: Option<Arc<dyn MarketDataCache>>,
}

impl std::fmt::Debug for MarketDataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataRegistry")
            .field(
                "cash_flow_providers",
                &self
                    .cash_flow_providers
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "fundamentals_providers",
                &self
                    .fundamentals_providers
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "reference_rate_providers",
                &self
                    .reference_rate_providers
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>(),
            )
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl MarketDataRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new registry with a cache.
    #[must_use]
    pub fn with_cache(cache: Arc<dyn MarketDataCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Default::default()
        }
    }

    /// Set the cache for this registry.
    #[must_use]
    pub fn set_cache(mut self, cache: Arc<dyn MarketDataCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a cash-flow provider.
    pub fn register_cash_flow(&mut self, provider: Arc<dyn CashFlowProvider>) {
        debug!(provider = provider.name(), "Registering cash-flow provider");
        self.cash_flow_providers.push(provider);
    }

    /// Register a fundamentals provider.
    pub fn register_fundamentals(&mut self, provider: Arc<dyn FundamentalsProvider>) {
        debug!(
            provider = provider.name(),
            "Registering fundamentals provider"
        );
        self.fundamentals_providers.push(provider);
    }

    /// Register a reference-rate provider.
    pub fn register_reference_rate(&mut self, provider: Arc<dyn ReferenceRateProvider>) {
        debug!(
            provider = provider.name(),
            "Registering reference-rate provider"
        );
        self.reference_rate_providers.push(provider);
    }

    /// Register one provider for all three capabilities.
    pub fn register<P>(&mut self, provider: Arc<P>)
    where
        P: CashFlowProvider + FundamentalsProvider + ReferenceRateProvider + 'static,
    {
        self.register_cash_flow(provider.clone());
        self.register_fundamentals(provider.clone());
        self.register_reference_rate(provider);
    }

    /// Wrap this registry in a [`ValuationEngine`] with default settings.
    #[must_use]
    pub fn into_engine(self) -> ValuationEngine {
        ValuationEngine::new(Arc::new(self))
    }

    // Builder methods for easy setup with specific providers

    /// Add the Yahoo Finance provider for all capabilities.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(mut self) -> Self {
        self.register(Arc::new(dcf_yahoo::YahooProvider::new()));
        self
    }
}

impl DataProvider for MarketDataRegistry {
    fn name(&self) -> &str {
        "registry"
    }

    fn description(&self) -> &str {
        "Ordered provider fallback with optional caching"
    }
}

#[async_trait]
impl CashFlowProvider for MarketDataRegistry {
    /// Fetch a cash-flow statement, trying providers in order until one
    /// returns a non-empty statement.
    ///
    /// If a cache is configured, it will be checked first and non-empty
    /// results will be cached. When every provider answers but none has data,
    /// the empty statement is returned uncached.
    async fn fetch_cash_flow_statement(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<CashFlowStatement> {
        if self.cash_flow_providers.is_empty() {
            return Err(DcfError::ProviderNotConfigured(
                "No cash-flow providers registered".to_string(),
            ));
        }

        // Check cache first
        if let Some(cache) = &self.cache {
            for provider in &self.cash_flow_providers {
                if let Ok(Some(cached)) = cache
                    .get_cash_flow(provider.name(), symbol, period_type)
                    .await
                {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        "Cache hit for cash flow"
                    );
                    return Ok(cached);
                }
            }
        }

        // Try each provider in order; an empty statement counts as a miss
        let mut last_error = None;
        let mut empty = None;
        for provider in &self.cash_flow_providers {
            debug!(
                provider = provider.name(),
                symbol = %symbol,
                period_type = %period_type,
                "Fetching cash-flow statement"
            );

            match provider.fetch_cash_flow_statement(symbol, period_type).await {
                Ok(statement) if statement.is_empty() => {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        period_type = %period_type,
                        "Empty cash-flow statement, trying next"
                    );
                    empty = Some(statement);
                }
                Ok(statement) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.put_cash_flow(provider.name(), &statement).await {
                            warn!(
                                provider = provider.name(),
                                error = %e,
                                "Failed to cache cash flow"
                            );
                        }
                    }
                    return Ok(statement);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        if let Some(statement) = empty {
            return Ok(statement);
        }
        Err(last_error
            .unwrap_or_else(|| DcfError::Other("All providers failed with no error".to_string())))
    }
}

#[async_trait]
impl FundamentalsProvider for MarketDataRegistry {
    /// Fetch fundamentals, trying providers in order until one succeeds.
    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals> {
        if self.fundamentals_providers.is_empty() {
            return Err(DcfError::ProviderNotConfigured(
                "No fundamentals providers registered".to_string(),
            ));
        }

        if let Some(cache) = &self.cache {
            for provider in &self.fundamentals_providers {
                if let Ok(Some(cached)) = cache.get_fundamentals(provider.name(), symbol).await {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        "Cache hit for fundamentals"
                    );
                    return Ok(cached);
                }
            }
        }

        let mut last_error = None;
        for provider in &self.fundamentals_providers {
            debug!(
                provider = provider.name(),
                symbol = %symbol,
                "Fetching fundamentals"
            );

            match provider.fetch_fundamentals(symbol).await {
                Ok(fundamentals) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.put_fundamentals(provider.name(), &fundamentals).await
                        {
                            warn!(
                                provider = provider.name(),
                                error = %e,
                                "Failed to cache fundamentals"
                            );
                        }
                    }
                    return Ok(fundamentals);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DcfError::Other("All providers failed with no error".to_string())))
    }
}

#[async_trait]
impl ReferenceRateProvider for MarketDataRegistry {
    /// Fetch a reference rate, trying providers in order until one succeeds.
    async fn fetch_reference_rate(&self, symbol: &Symbol) -> Result<f64> {
        if self.reference_rate_providers.is_empty() {
            return Err(DcfError::ProviderNotConfigured(
                "No reference-rate providers registered".to_string(),
            ));
        }

        if let Some(cache) = &self.cache {
            for provider in &self.reference_rate_providers {
                if let Ok(Some(cached)) = cache.get_reference_rate(provider.name(), symbol).await {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        "Cache hit for reference rate"
                    );
                    return Ok(cached);
                }
            }
        }

        let mut last_error = None;
        for provider in &self.reference_rate_providers {
            match provider.fetch_reference_rate(symbol).await {
                Ok(rate) => {
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache
                            .put_reference_rate(provider.name(), symbol, rate)
                            .await
                        {
                            warn!(
                                provider = provider.name(),
                                error = %e,
                                "Failed to cache reference rate"
                            );
                        }
                    }
                    return Ok(rate);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DcfError::Other("All providers failed with no error".to_string())))
    }
}
