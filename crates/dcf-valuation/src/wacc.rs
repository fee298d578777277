//! WACC estimation from company fundamentals.
//!
//! Estimation is split in two steps. [`resolve_fundamentals`] substitutes
//! defaults for every missing input and records which ones it substituted;
//! [`estimate_wacc`] is then pure arithmetic on the resolved values. Missing
//! inputs never fail the estimate: an approximate WACC is preferred over none.
//! The only failure is a capital structure with no capital at all.

use dcf_core::{DcfError, Fundamentals, Result, Symbol, WaccResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default assumptions substituted for missing WACC inputs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaccDefaults {
    /// Long-run expected equity market return.
    pub market_return: f64,
    /// Risk-free rate used when the reference yield cannot be fetched.
    pub risk_free_rate: f64,
    /// Beta used when fundamentals carry none.
    pub beta: f64,
    /// Cost of debt used when it cannot be derived from interest expense.
    pub cost_of_debt: f64,
    /// Tax rate used when fundamentals carry none.
    pub tax_rate: f64,
}

impl Default for WaccDefaults {
    fn default() -> Self {
        Self {
            market_return: 0.08,
            risk_free_rate: 0.04,
            beta: 1.0,
            cost_of_debt: 0.03,
            tax_rate: 0.21,
        }
    }
}

/// An input that was missing and replaced by a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallbackField {
    /// Reference yield could not be fetched.
    RiskFreeRate,
    /// Beta was absent.
    Beta,
    /// Market capitalization was absent; treated as zero.
    MarketCap,
    /// Total debt was absent; treated as zero.
    TotalDebt,
    /// Interest expense or debt was unusable for a cost of debt.
    CostOfDebt,
    /// Effective tax rate was absent or zero.
    TaxRate,
}

impl fmt::Display for FallbackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RiskFreeRate => "risk_free_rate",
            Self::Beta => "beta",
            Self::MarketCap => "market_cap",
            Self::TotalDebt => "total_debt",
            Self::CostOfDebt => "cost_of_debt",
            Self::TaxRate => "tax_rate",
        };
        f.write_str(name)
    }
}

/// WACC inputs after default substitution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFundamentals {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Expected market return.
    pub market_return: f64,
    /// Beta.
    pub beta: f64,
    /// Market capitalization (equity value).
    pub market_cap: f64,
    /// Total debt (debt value).
    pub total_debt: f64,
    /// Pre-tax cost of debt.
    pub cost_of_debt: f64,
    /// Tax rate.
    pub tax_rate: f64,
    /// Inputs that used a default, in resolution order.
    pub fallbacks: Vec<FallbackField>,
}

impl ResolvedFundamentals {
    /// Returns true if no input needed a default.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }

    /// Returns true if `field` used a default.
    #[must_use]
    pub fn used_fallback(&self, field: FallbackField) -> bool {
        self.fallbacks.contains(&field)
    }
}

/// Equity and debt shares of total capital.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapitalWeights {
    /// `equity / (equity + debt)`.
    pub equity: f64,
    /// `debt / (equity + debt)`.
    pub debt: f64,
}

/// Substitutes defaults for missing inputs.
///
/// `risk_free_rate` is the fetched reference yield as a decimal, or `None` if
/// the fetch failed. Zero interest expense and a zero tax rate count as missing.
#[must_use]
pub fn resolve_fundamentals(
    fundamentals: &Fundamentals,
    risk_free_rate: Option<f64>,
    defaults: &WaccDefaults,
) -> ResolvedFundamentals {
    let mut fallbacks = Vec::new();
    let mut or_default = |value: Option<f64>, default: f64, field: FallbackField| match value {
        Some(v) => v,
        None => {
            fallbacks.push(field);
            default
        }
    };

    let risk_free_rate = or_default(
        finite(risk_free_rate),
        defaults.risk_free_rate,
        FallbackField::RiskFreeRate,
    );
    let beta = or_default(
        finite(fundamentals.beta),
        defaults.beta,
        FallbackField::Beta,
    );
    let market_cap = or_default(
        finite(fundamentals.market_cap),
        0.0,
        FallbackField::MarketCap,
    );
    let total_debt = or_default(
        finite(fundamentals.total_debt),
        0.0,
        FallbackField::TotalDebt,
    );
    let derived_cost_of_debt = finite(fundamentals.interest_expense)
        .filter(|interest| *interest != 0.0)
        .filter(|_| total_debt > 0.0)
        .map(|interest| interest.abs() / total_debt);
    let cost_of_debt = or_default(
        derived_cost_of_debt,
        defaults.cost_of_debt,
        FallbackField::CostOfDebt,
    );
    let tax_rate = or_default(
        finite(fundamentals.effective_tax_rate).filter(|rate| *rate != 0.0),
        defaults.tax_rate,
        FallbackField::TaxRate,
    );

    for field in &fallbacks {
        debug!(symbol = %fundamentals.symbol, field = %field, "Using default for missing input");
    }

    ResolvedFundamentals {
        symbol: fundamentals.symbol.clone(),
        risk_free_rate,
        market_return: defaults.market_return,
        beta,
        market_cap,
        total_debt,
        cost_of_debt,
        tax_rate,
        fallbacks,
    }
}

/// CAPM cost of equity: `rf + beta * (market_return - rf)`.
#[must_use]
pub fn cost_of_equity(risk_free_rate: f64, beta: f64, market_return: f64) -> f64 {
    risk_free_rate + beta * (market_return - risk_free_rate)
}

/// Splits total capital into equity and debt weights.
///
/// # Errors
///
/// [`DcfError::InsufficientCapitalData`] if `market_cap + total_debt` is not positive.
pub fn capital_weights(symbol: &Symbol, market_cap: f64, total_debt: f64) -> Result<CapitalWeights> {
    let total = market_cap + total_debt;
    if !total.is_finite() || total <= 0.0 {
        return Err(DcfError::InsufficientCapitalData(symbol.to_string()));
    }
    Ok(CapitalWeights {
        equity: market_cap / total,
        debt: total_debt / total,
    })
}

/// Blends cost of equity and after-tax cost of debt by capital weights.
///
/// # Errors
///
/// [`DcfError::InsufficientCapitalData`] if the company has no capital.
pub fn estimate_wacc(resolved: &ResolvedFundamentals) -> Result<WaccResult> {
    let weights = capital_weights(&resolved.symbol, resolved.market_cap, resolved.total_debt)?;
    let cost_of_equity = cost_of_equity(
        resolved.risk_free_rate,
        resolved.beta,
        resolved.market_return,
    );
    let wacc = weights.equity * cost_of_equity
        + weights.debt * resolved.cost_of_debt * (1.0 - resolved.tax_rate);

    debug!(
        symbol = %resolved.symbol,
        wacc,
        cost_of_equity,
        cost_of_debt = resolved.cost_of_debt,
        "Estimated WACC"
    );

    Ok(WaccResult {
        wacc,
        cost_of_equity,
        cost_of_debt: resolved.cost_of_debt,
        risk_free_rate: resolved.risk_free_rate,
        beta: resolved.beta,
        market_return: resolved.market_return,
        tax_rate: resolved.tax_rate,
        equity_weight: weights.equity,
        debt_weight: weights.debt,
    })
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn fundamentals() -> Fundamentals {
        Fundamentals {
            symbol: Symbol::new("ACME"),
            beta: Some(1.2),
            market_cap: Some(800.0),
            total_debt: Some(200.0),
            interest_expense: Some(-10.0),
            effective_tax_rate: Some(0.25),
            shares_outstanding: Some(10.0),
        }
    }

    #[test]
    fn test_complete_fundamentals() {
        let resolved = resolve_fundamentals(&fundamentals(), Some(0.045), &WaccDefaults::default());
        assert!(resolved.is_complete());
        assert!((resolved.cost_of_debt - 0.05).abs() < EPS);

        let wacc = estimate_wacc(&resolved).unwrap();
        // 0.045 + 1.2 * (0.08 - 0.045) = 0.087
        assert!((wacc.cost_of_equity - 0.087).abs() < EPS);
        // 0.8 * 0.087 + 0.2 * 0.05 * 0.75 = 0.0771
        assert!((wacc.wacc - 0.0771).abs() < EPS);
        assert!((wacc.equity_weight - 0.8).abs() < EPS);
        assert!((wacc.debt_weight - 0.2).abs() < EPS);
        assert_eq!(wacc.market_return, 0.08);
        assert_eq!(wacc.tax_rate, 0.25);
    }

    #[test]
    fn test_missing_fields_use_defaults_and_are_reported() {
        let sparse = Fundamentals {
            symbol: Symbol::new("ACME"),
            market_cap: Some(500.0),
            ..Default::default()
        };

        let resolved = resolve_fundamentals(&sparse, None, &WaccDefaults::default());
        assert_eq!(
            resolved.fallbacks,
            vec![
                FallbackField::RiskFreeRate,
                FallbackField::Beta,
                FallbackField::TotalDebt,
                FallbackField::CostOfDebt,
                FallbackField::TaxRate,
            ]
        );
        assert!(!resolved.used_fallback(FallbackField::MarketCap));

        let wacc = estimate_wacc(&resolved).unwrap();
        assert_eq!(wacc.risk_free_rate, 0.04);
        assert_eq!(wacc.beta, 1.0);
        assert_eq!(wacc.cost_of_debt, 0.03);
        assert_eq!(wacc.tax_rate, 0.21);
        // All equity: WACC is the cost of equity, which with beta 1 is the market return.
        assert!((wacc.wacc - 0.08).abs() < EPS);
    }

    #[test]
    fn test_zero_interest_and_zero_tax_count_as_missing() {
        let f = Fundamentals {
            interest_expense: Some(0.0),
            effective_tax_rate: Some(0.0),
            ..fundamentals()
        };
        let resolved = resolve_fundamentals(&f, Some(0.04), &WaccDefaults::default());
        assert_eq!(
            resolved.fallbacks,
            vec![FallbackField::CostOfDebt, FallbackField::TaxRate]
        );
        assert_eq!(resolved.cost_of_debt, 0.03);
        assert_eq!(resolved.tax_rate, 0.21);
    }

    #[test]
    fn test_interest_without_debt_uses_default_cost_of_debt() {
        let f = Fundamentals {
            total_debt: Some(0.0),
            ..fundamentals()
        };
        let resolved = resolve_fundamentals(&f, Some(0.04), &WaccDefaults::default());
        assert!(resolved.used_fallback(FallbackField::CostOfDebt));
        assert!(!resolved.used_fallback(FallbackField::TotalDebt));
    }

    #[test]
    fn test_zero_capital_is_insufficient() {
        let f = Fundamentals::new(Symbol::new("SHELL"));
        let resolved = resolve_fundamentals(&f, Some(0.04), &WaccDefaults::default());
        let err = estimate_wacc(&resolved).unwrap_err();
        assert!(matches!(err, DcfError::InsufficientCapitalData(ref s) if s == "SHELL"));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let symbol = Symbol::new("ACME");
        for (equity, debt) in [
            (1.0, 0.0),
            (0.0, 1.0),
            (3.0e12, 1.1e11),
            (1.0e-3, 7.5e9),
            (42.0, 42.0),
        ] {
            let w = capital_weights(&symbol, equity, debt).unwrap();
            assert!((w.equity + w.debt - 1.0).abs() < 1e-9, "{equity} / {debt}");
        }
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = WaccDefaults {
            market_return: 0.10,
            risk_free_rate: 0.02,
            ..Default::default()
        };
        let f = Fundamentals {
            beta: None,
            ..fundamentals()
        };
        let resolved = resolve_fundamentals(&f, None, &defaults);
        let wacc = estimate_wacc(&resolved).unwrap();
        assert!((wacc.cost_of_equity - 0.10).abs() < EPS);
    }
}
