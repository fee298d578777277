//! Provider traits for fetching the market data a valuation needs.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`CashFlowProvider`] - Cash-flow statement line items
//! - [`FundamentalsProvider`] - Beta, capital structure, tax rate, share count
//! - [`ReferenceRateProvider`] - Government bond yields used as the risk-free rate
//! - [`MarketDataProvider`] - Everything above, implemented automatically

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    frequency::PeriodType,
    types::{CashFlowStatement, Fundamentals, Symbol},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for cash-flow statements.
#[async_trait]
pub trait CashFlowProvider: DataProvider {
    /// Fetches the cash-flow statement of a symbol at the given granularity.
    ///
    /// Providers return whatever line items they have; an empty statement is
    /// not an error at this level.
    async fn fetch_cash_flow_statement(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<CashFlowStatement>;
}

/// Provider for company fundamentals.
#[async_trait]
pub trait FundamentalsProvider: DataProvider {
    /// Fetches the fundamentals of a symbol. Fields the provider lacks stay `None`.
    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals>;
}

/// Provider for reference interest rates.
#[async_trait]
pub trait ReferenceRateProvider: DataProvider {
    /// Fetches the latest yield of a reference instrument (e.g. `^TNX`) as a
    /// decimal fraction.
    async fn fetch_reference_rate(&self, symbol: &Symbol) -> Result<f64>;
}

/// Everything the valuation engine needs from the outside world.
///
/// Implemented for every type that implements the three capability traits.
pub trait MarketDataProvider: CashFlowProvider + FundamentalsProvider + ReferenceRateProvider {}

impl<T> MarketDataProvider for T where T: CashFlowProvider + FundamentalsProvider + ReferenceRateProvider
{}
