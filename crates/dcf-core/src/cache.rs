//! Cache trait for storing fetched market data.
//!
//! This module defines the [`MarketDataCache`] trait that provides a unified
//! interface for caching cash-flow statements, fundamentals and reference rates.
//! A cache is an explicit object handed to a registry; nothing is cached globally.

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Result,
    frequency::PeriodType,
    types::{CashFlowStatement, Fundamentals, Symbol},
};

/// Trait for caching fetched market data.
///
/// Keys include the provider name so results from different providers never mix.
#[async_trait]
pub trait MarketDataCache: Send + Sync {
    /// Retrieves a cached cash-flow statement.
    ///
    /// Returns `Ok(Some(statement))` if cached, `Ok(None)` if not cached.
    async fn get_cash_flow(
        &self,
        provider: &str,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<Option<CashFlowStatement>>;

    /// Stores a cash-flow statement under its own symbol and period type.
    async fn put_cash_flow(&self, provider: &str, statement: &CashFlowStatement) -> Result<()>;

    /// Retrieves cached fundamentals.
    async fn get_fundamentals(&self, provider: &str, symbol: &Symbol)
    -> Result<Option<Fundamentals>>;

    /// Stores fundamentals under their own symbol.
    async fn put_fundamentals(&self, provider: &str, fundamentals: &Fundamentals) -> Result<()>;

    /// Retrieves a cached reference rate.
    async fn get_reference_rate(&self, provider: &str, symbol: &Symbol) -> Result<Option<f64>>;

    /// Stores a reference rate.
    async fn put_reference_rate(&self, provider: &str, symbol: &Symbol, rate: f64) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
