#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for DCF valuation.
//!
//! This crate provides the foundational abstractions shared by the valuation
//! engine and the market-data providers:
//!
//! - [`CashFlowProvider`](provider::CashFlowProvider) - Cash-flow statements
//! - [`FundamentalsProvider`](provider::FundamentalsProvider) - Company fundamentals
//! - [`ReferenceRateProvider`](provider::ReferenceRateProvider) - Risk-free rate proxies
//! - [`MarketDataCache`](cache::MarketDataCache) - Caching abstraction
//! - [`DcfError`](error::DcfError) - Error taxonomy for fetching and valuation

/// Cache trait for storing fetched market data.
pub mod cache;
/// Error types for data and valuation operations.
pub mod error;
/// Reporting period definitions.
pub mod frequency;
/// Provider traits for fetching market data.
pub mod provider;
/// Core data types (Symbol, statements, valuation value objects).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::MarketDataCache;
pub use error::{DcfError, ErrorCategory, Result};
pub use frequency::PeriodType;
pub use provider::{
    CashFlowProvider, DataProvider, FundamentalsProvider, MarketDataProvider,
    ReferenceRateProvider,
};
pub use types::{
    CashFlowStatement, FcfEntry, FcfSeries, Fundamentals, LineItemSeries, ProjectionSeries,
    Symbol, ValuationResult, WaccResult,
};
