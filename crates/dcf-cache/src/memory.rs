//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use dcf_core::{CashFlowStatement, Fundamentals, MarketDataCache, PeriodType, Result, Symbol};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

/// Key for cash-flow statement entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CashFlowKey {
    provider: String,
    symbol: Symbol,
    period_type: PeriodType,
}

/// Key for per-symbol entries (fundamentals and reference rates).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SymbolKey {
    provider: String,
    symbol: Symbol,
}

impl SymbolKey {
    fn new(provider: &str, symbol: &Symbol) -> Self {
        Self {
            provider: provider.to_string(),
            symbol: symbol.clone(),
        }
    }
}

type Table<K, V> = RwLock<HashMap<K, CacheEntry<V>>>;

/// In-memory market-data cache.
///
/// Data is stored in `RwLock`-protected `HashMap`s and is lost when the cache
/// is dropped. With a TTL set, entries older than the TTL are reported as
/// misses on read; [`MarketDataCache::invalidate_stale`] removes them.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    ttl: Option<Duration>,
    cash_flows: Table<CashFlowKey, CashFlowStatement>,
    fundamentals: Table<SymbolKey, Fundamentals>,
    reference_rates: Table<SymbolKey, f64>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache without expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Total number of cached entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.cash_flows.read().await.len()
            + self.fundamentals.read().await.len()
            + self.reference_rates.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn lookup<K, V>(&self, table: &Table<K, V>, key: &K, kind: &str) -> Option<V>
    where
        K: Eq + Hash,
        V: Clone,
    {
        let cache = table.read().await;
        match cache.get(key) {
            Some(entry) if self.ttl.is_some_and(|ttl| entry.is_stale(ttl)) => {
                debug!("Stale cache entry for {}", kind);
                None
            }
            Some(entry) => {
                debug!("Cache hit for {}", kind);
                Some(entry.data.clone())
            }
            None => {
                debug!("Cache miss for {}", kind);
                None
            }
        }
    }
}

async fn retain_fresh<K, V>(table: &Table<K, V>, ttl: Duration) -> usize {
    let mut cache = table.write().await;
    let before = cache.len();
    cache.retain(|_, entry| !entry.is_stale(ttl));
    before - cache.len()
}

#[async_trait]
impl MarketDataCache for InMemoryCache {
    #[instrument(skip(self), fields(provider = %provider, symbol = %symbol))]
    async fn get_cash_flow(
        &self,
        provider: &str,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<Option<CashFlowStatement>> {
        let key = CashFlowKey {
            provider: provider.to_string(),
            symbol: symbol.clone(),
            period_type,
        };
        Ok(self.lookup(&self.cash_flows, &key, "cash flow").await)
    }

    #[instrument(skip(self, statement), fields(provider = %provider, symbol = %statement.symbol))]
    async fn put_cash_flow(&self, provider: &str, statement: &CashFlowStatement) -> Result<()> {
        let key = CashFlowKey {
            provider: provider.to_string(),
            symbol: statement.symbol.clone(),
            period_type: statement.period_type,
        };

        let mut cache = self.cash_flows.write().await;
        cache.insert(key, CacheEntry::new(statement.clone()));
        debug!("Cached {} cash-flow statement", statement.period_type);
        Ok(())
    }

    #[instrument(skip(self), fields(provider = %provider, symbol = %symbol))]
    async fn get_fundamentals(
        &self,
        provider: &str,
        symbol: &Symbol,
    ) -> Result<Option<Fundamentals>> {
        let key = SymbolKey::new(provider, symbol);
        Ok(self.lookup(&self.fundamentals, &key, "fundamentals").await)
    }

    #[instrument(skip(self, fundamentals), fields(provider = %provider, symbol = %fundamentals.symbol))]
    async fn put_fundamentals(&self, provider: &str, fundamentals: &Fundamentals) -> Result<()> {
        let key = SymbolKey::new(provider, &fundamentals.symbol);
        let mut cache = self.fundamentals.write().await;
        cache.insert(key, CacheEntry::new(fundamentals.clone()));
        debug!("Cached fundamentals");
        Ok(())
    }

    #[instrument(skip(self), fields(provider = %provider, symbol = %symbol))]
    async fn get_reference_rate(&self, provider: &str, symbol: &Symbol) -> Result<Option<f64>> {
        let key = SymbolKey::new(provider, symbol);
        Ok(self
            .lookup(&self.reference_rates, &key, "reference rate")
            .await)
    }

    #[instrument(skip(self), fields(provider = %provider, symbol = %symbol))]
    async fn put_reference_rate(&self, provider: &str, symbol: &Symbol, rate: f64) -> Result<()> {
        let key = SymbolKey::new(provider, symbol);
        let mut cache = self.reference_rates.write().await;
        cache.insert(key, CacheEntry::new(rate));
        debug!("Cached reference rate");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let total_removed = retain_fresh(&self.cash_flows, ttl).await
            + retain_fresh(&self.fundamentals, ttl).await
            + retain_fresh(&self.reference_rates, ttl).await;

        if total_removed > 0 {
            debug!("Invalidated {} stale cache entries", total_removed);
        }

        Ok(total_removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.cash_flows.write().await.clear();
        self.fundamentals.write().await.clear();
        self.reference_rates.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}
