//! Structured valuation output handed to display and export code.

use dcf_core::{FcfSeries, Symbol, ValuationResult, WaccResult};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wacc::FallbackField;

/// Where the WACC of a report came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaccSource {
    /// Estimated from fundamentals during this valuation.
    Estimated,
    /// Supplied by the caller from an earlier estimate.
    Supplied,
}

/// Everything a report formatter needs about one valuation.
///
/// Formatters consume this value only; they never reach into the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// Valued ticker.
    pub ticker: Symbol,
    /// Fair value per share.
    pub fair_value_per_share: f64,
    /// WACC breakdown.
    pub wacc: WaccResult,
    /// Where `wacc` came from.
    pub wacc_source: WaccSource,
    /// WACC inputs that fell back to defaults (empty for a supplied WACC).
    pub fallbacks: Vec<FallbackField>,
    /// Discount rate actually applied.
    pub discount_rate: f64,
    /// Terminal growth rate applied.
    pub terminal_growth: f64,
    /// Annual buyback rate applied.
    pub buyback_rate: f64,
    /// Base FCF the projection was seeded from.
    pub base_fcf: f64,
    /// FCF history the base was picked from.
    pub fcf_history: FcfSeries,
    /// Projected FCF, earliest year first.
    pub projections: Vec<f64>,
    /// Present value and per-share breakdown.
    pub valuation: ValuationResult,
}

impl fmt::Display for ValuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = &self.wacc;
        writeln!(f, "DCF + WACC Valuation Report: {}", self.ticker)?;
        writeln!(f, "Fair Value per Share: ${:.2}", self.fair_value_per_share)?;
        writeln!(f, "WACC: {:.2}%", w.wacc * 100.0)?;
        writeln!(f, "Cost of Equity: {:.2}%", w.cost_of_equity * 100.0)?;
        writeln!(f, "Cost of Debt: {:.2}%", w.cost_of_debt * 100.0)?;
        writeln!(f, "Risk-Free Rate: {:.2}%", w.risk_free_rate * 100.0)?;
        writeln!(f, "Beta: {:.2}", w.beta)?;
        writeln!(f, "Market Return: {:.2}%", w.market_return * 100.0)?;
        writeln!(f, "Tax Rate: {:.2}%", w.tax_rate * 100.0)?;
        writeln!(f, "Discount Rate: {:.2}%", self.discount_rate * 100.0)?;
        writeln!(
            f,
            "Share Buyback Rate: {:.2}% per year",
            self.buyback_rate * 100.0
        )?;
        if !self.fallbacks.is_empty() {
            let fields: Vec<String> = self.fallbacks.iter().map(ToString::to_string).collect();
            writeln!(f, "Defaults used: {}", fields.join(", "))?;
        }
        writeln!(f, "Projected Free Cash Flows:")?;
        for (year, fcf) in self.projections.iter().enumerate() {
            writeln!(f, "  Year {}: ${:.0}", year + 1, fcf)?;
        }
        Ok(())
    }
}
