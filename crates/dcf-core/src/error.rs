//! Error types for valuation operations.
//!
//! This module defines [`DcfError`] which covers both the transport failures of
//! market-data providers and the domain failures of the valuation itself.
//! [`ErrorCategory`] groups them into what a user can act on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while fetching data for, or computing, a valuation.
#[derive(Error, Debug)]
pub enum DcfError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No usable cash-flow or fundamentals data after all fallback attempts.
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        /// The symbol that was requested.
        symbol: String,
        /// What was missing.
        reason: String,
    },

    /// WACC is undefined because market cap plus total debt is not positive.
    #[error("Insufficient capital data for {0}: market cap plus total debt is zero")]
    InsufficientCapitalData(String),

    /// Share count is zero, negative or not a number.
    #[error("Invalid share count: {0}")]
    InvalidShareCount(f64),

    /// Discount rate does not exceed terminal growth.
    #[error(
        "Discount rate {discount_rate} must exceed terminal growth {terminal_growth}"
    )]
    InvalidDiscountAssumption {
        /// The discount rate that was supplied.
        discount_rate: f64,
        /// The terminal growth rate that was supplied.
        terminal_growth: f64,
    },

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested feature is not supported.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Coarse grouping of [`DcfError`] for user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The data needed for a valuation does not exist for this ticker.
    NoData,
    /// The data exists but the requested computation is not valid.
    InvalidComputation,
    /// The upstream provider or local plumbing failed.
    Upstream,
}

impl ErrorCategory {
    /// Returns the snake_case name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::InvalidComputation => "invalid_computation",
            Self::Upstream => "upstream",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DcfError {
    /// Shorthand for [`DcfError::DataUnavailable`].
    pub fn data_unavailable(symbol: impl ToString, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::SymbolNotFound(_) | Self::DataUnavailable { .. } => ErrorCategory::NoData,
            Self::InsufficientCapitalData(_)
            | Self::InvalidShareCount(_)
            | Self::InvalidDiscountAssumption { .. }
            | Self::InvalidParameter(_) => ErrorCategory::InvalidComputation,
            Self::Network(_)
            | Self::RateLimited { .. }
            | Self::Parse(_)
            | Self::Cache(_)
            | Self::ProviderNotConfigured(_)
            | Self::NotSupported(_)
            | Self::Other(_) => ErrorCategory::Upstream,
        }
    }

    /// Returns a short hint telling the user what to do about this error.
    #[must_use]
    pub const fn user_hint(&self) -> &'static str {
        match self {
            Self::InvalidDiscountAssumption { .. } => {
                "Adjust assumptions: the discount rate must be above terminal growth."
            }
            Self::InvalidParameter(_) => "Adjust assumptions and try again.",
            Self::InsufficientCapitalData(_) | Self::InvalidShareCount(_) => {
                "The company data does not support this computation; try another ticker."
            }
            _ => match self.category() {
                ErrorCategory::NoData => "No data for this ticker: check the symbol.",
                _ => "Data source unavailable: retry later.",
            },
        }
    }
}

/// Result type alias using [`DcfError`].
pub type Result<T> = std::result::Result<T, DcfError>;
