//! No-op cache implementation.

use async_trait::async_trait;
use dcf_core::{CashFlowStatement, Fundamentals, MarketDataCache, PeriodType, Result, Symbol};
use std::time::Duration;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// All `get_*` methods return `Ok(None)` and all `put_*` methods return `Ok(())`.
/// Useful for disabling caching or testing code paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataCache for NoopCache {
    async fn get_cash_flow(
        &self,
        _provider: &str,
        _symbol: &Symbol,
        _period_type: PeriodType,
    ) -> Result<Option<CashFlowStatement>> {
        trace!("NoopCache: get_cash_flow called, returning None");
        Ok(None)
    }

    async fn put_cash_flow(&self, _provider: &str, _statement: &CashFlowStatement) -> Result<()> {
        trace!("NoopCache: put_cash_flow called, doing nothing");
        Ok(())
    }

    async fn get_fundamentals(
        &self,
        _provider: &str,
        _symbol: &Symbol,
    ) -> Result<Option<Fundamentals>> {
        trace!("NoopCache: get_fundamentals called, returning None");
        Ok(None)
    }

    async fn put_fundamentals(&self, _provider: &str, _fundamentals: &Fundamentals) -> Result<()> {
        trace!("NoopCache: put_fundamentals called, doing nothing");
        Ok(())
    }

    async fn get_reference_rate(&self, _provider: &str, _symbol: &Symbol) -> Result<Option<f64>> {
        trace!("NoopCache: get_reference_rate called, returning None");
        Ok(None)
    }

    async fn put_reference_rate(&self, _provider: &str, _symbol: &Symbol, _rate: f64) -> Result<()> {
        trace!("NoopCache: put_reference_rate called, doing nothing");
        Ok(())
    }

    async fn invalidate_stale(&self, _ttl: Duration) -> Result<usize> {
        trace!("NoopCache: invalidate_stale called, returning 0");
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopCache: clear called, doing nothing");
        Ok(())
    }
}
