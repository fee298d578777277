#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Two-stage discounted cash flow valuation.
//!
//! The pipeline for one ticker is:
//!
//! 1. [`FreeCashFlowExtractor`] derives historical FCF, annual first with a
//!    quarterly fallback
//! 2. [`estimate_wacc`] blends CAPM cost of equity and after-tax cost of debt
//! 3. [`FcfProjector`] compounds the base FCF through two growth stages
//! 4. [`DcfValuator`] discounts the projection plus a Gordon-growth terminal
//!    value and divides by the buyback-adjusted share count
//!
//! [`ValuationEngine`] runs the whole pipeline against a
//! [`MarketDataProvider`](dcf_core::MarketDataProvider) and
//! [`ValuationEngine::value_batch`] runs it over a ticker list.

/// User-chosen growth, discount and buyback assumptions.
pub mod assumptions;
/// Batch valuation and tabular export.
pub mod batch;
/// Present value and per-share conversion.
pub mod dcf;
/// Per-ticker orchestration.
pub mod engine;
/// Free-cash-flow extraction.
pub mod fcf;
/// Multi-stage FCF projection.
pub mod projection;
/// Valuation report value object.
pub mod report;
/// WACC estimation.
pub mod wacc;

#[cfg(test)]
mod testing;

pub use assumptions::{BaseFcfMethod, DiscountRate, ValuationAssumptions};
pub use batch::{BatchEntry, BatchReport, SkipReason, parse_ticker_list};
pub use dcf::{DcfValuator, PresentValue, adjusted_share_count};
pub use engine::{DEFAULT_REFERENCE_RATE_SYMBOL, ValuationEngine, WaccEstimate};
pub use fcf::{
    CAPITAL_EXPENDITURE_ALIASES, DEFAULT_HISTORY_CAP, FreeCashFlowExtractor,
    OPERATING_CASH_FLOW_ALIASES,
};
pub use projection::{FcfProjector, GrowthStage};
pub use report::{ValuationReport, WaccSource};
pub use wacc::{
    CapitalWeights, FallbackField, ResolvedFundamentals, WaccDefaults, capital_weights,
    cost_of_equity, estimate_wacc, resolve_fundamentals,
};
