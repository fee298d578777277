//! Core data types for valuation.
//!
//! This module defines the inputs fetched from providers and the value objects
//! produced along the valuation pipeline:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`CashFlowStatement`] - Raw cash-flow line items keyed by period
//! - [`Fundamentals`] - Company fundamentals used by the WACC estimate
//! - [`FcfSeries`] - Free-cash-flow history, most recent first
//! - [`WaccResult`] - WACC and its components
//! - [`ProjectionSeries`] - Multi-stage FCF projection
//! - [`ValuationResult`] - Present value and fair value per share

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::frequency::PeriodType;

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single line item of a statement: period end date to reported value.
pub type LineItemSeries = BTreeMap<NaiveDate, Option<f64>>;

/// Raw cash-flow statement as reported by a provider.
///
/// Line items are keyed by their reported name (e.g. "Capital Expenditures").
/// A period can be present with an undefined value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Reporting granularity.
    pub period_type: PeriodType,
    line_items: BTreeMap<String, LineItemSeries>,
}

impl CashFlowStatement {
    /// Creates an empty statement.
    #[must_use]
    pub fn new(symbol: Symbol, period_type: PeriodType) -> Self {
        Self {
            symbol,
            period_type,
            line_items: BTreeMap::new(),
        }
    }

    /// Adds a whole line item, replacing any existing one with the same name.
    #[must_use]
    pub fn with_line_item(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = (NaiveDate, Option<f64>)>,
    ) -> Self {
        self.line_items
            .insert(name.into(), values.into_iter().collect());
        self
    }

    /// Records one value of a line item.
    pub fn insert(&mut self, name: impl Into<String>, period: NaiveDate, value: Option<f64>) {
        self.line_items
            .entry(name.into())
            .or_default()
            .insert(period, value);
    }

    /// Returns the line item with exactly this name.
    #[must_use]
    pub fn line_item(&self, name: &str) -> Option<&LineItemSeries> {
        self.line_items.get(name)
    }

    /// Returns the first line item matching one of `aliases`, ignoring case.
    ///
    /// Aliases are tried in order, so earlier names take precedence.
    #[must_use]
    pub fn find_line_item(&self, aliases: &[&str]) -> Option<(&str, &LineItemSeries)> {
        aliases.iter().find_map(|alias| {
            self.line_items
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(alias))
                .map(|(name, series)| (name.as_str(), series))
        })
    }

    /// Returns the names of all line items.
    pub fn line_item_names(&self) -> impl Iterator<Item = &str> {
        self.line_items.keys().map(String::as_str)
    }

    /// Returns true if no line item has any period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.values().all(BTreeMap::is_empty)
    }
}

/// Company fundamentals consumed by the WACC estimate and per-share conversion.
///
/// Every field is optional; absent values are resolved to defaults downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Beta coefficient.
    pub beta: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Interest expense (sign as reported).
    pub interest_expense: Option<f64>,
    /// Effective tax rate as a decimal.
    pub effective_tax_rate: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
}

impl Fundamentals {
    /// Creates fundamentals with every field absent.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            ..Default::default()
        }
    }
}

/// One period of free cash flow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FcfEntry {
    /// Period end date.
    pub period: NaiveDate,
    /// Operating cash flow plus (negative) capital expenditures.
    pub amount: f64,
}

/// Free-cash-flow history, most recent period first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FcfSeries {
    /// Granularity the series was extracted at.
    pub period_type: PeriodType,
    entries: Vec<FcfEntry>,
}

impl FcfSeries {
    /// Builds a series, ordering entries most recent first.
    #[must_use]
    pub fn from_entries(period_type: PeriodType, mut entries: Vec<FcfEntry>) -> Self {
        entries.sort_by(|a, b| b.period.cmp(&a.period));
        Self {
            period_type,
            entries,
        }
    }

    /// Keeps only the `n` most recent periods.
    #[must_use]
    pub fn truncate(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    /// Amount of the most recent period.
    #[must_use]
    pub fn most_recent(&self) -> Option<f64> {
        self.entries.first().map(|e| e.amount)
    }

    /// Mean amount over all periods.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f64 = self.entries.iter().map(|e| e.amount).sum();
        Some(total / self.entries.len() as f64)
    }

    /// Returns the number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &FcfEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for FcfSeries {
    type Item = FcfEntry;
    type IntoIter = std::vec::IntoIter<FcfEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// WACC and its components, all as decimal fractions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaccResult {
    /// Weighted average cost of capital.
    pub wacc: f64,
    /// CAPM cost of equity.
    pub cost_of_equity: f64,
    /// Pre-tax cost of debt.
    pub cost_of_debt: f64,
    /// Risk-free rate used in CAPM.
    pub risk_free_rate: f64,
    /// Beta used in CAPM.
    pub beta: f64,
    /// Expected market return used in CAPM.
    pub market_return: f64,
    /// Tax rate applied to the cost of debt.
    pub tax_rate: f64,
    /// Equity share of total capital.
    pub equity_weight: f64,
    /// Debt share of total capital.
    pub debt_weight: f64,
}

/// Projected free cash flows, earliest forecast year first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    base: f64,
    values: Vec<f64>,
}

impl ProjectionSeries {
    /// Creates a projection seeded from `base`.
    #[must_use]
    pub const fn new(base: f64, values: Vec<f64>) -> Self {
        Self { base, values }
    }

    /// The FCF value the projection was compounded from.
    #[must_use]
    pub const fn base(&self) -> f64 {
        self.base
    }

    /// Projected values, one per forecast year.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The final projected value, or the base when the horizon is empty.
    #[must_use]
    pub fn last_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(self.base)
    }

    /// Number of forecast years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the horizon is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the projection and returns the projected values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Outcome of discounting a projection and converting it to a per-share value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Total present value divided by the adjusted share count.
    pub fair_value_per_share: f64,
    /// Sum of discounted projections and discounted terminal value.
    pub total_present_value: f64,
    /// Undiscounted terminal value at the end of the forecast horizon.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub discounted_terminal_value: f64,
    /// Each projected year discounted to today.
    pub discounted_projections: Vec<f64>,
    /// Share count after compounding the buyback rate over the horizon.
    pub adjusted_shares_outstanding: f64,
}
