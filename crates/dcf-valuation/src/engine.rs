//! Per-ticker valuation pipeline.

use std::fmt;
use std::sync::Arc;

use dcf_core::{
    DataProvider, DcfError, FundamentalsProvider, MarketDataProvider, ReferenceRateProvider,
    Result, Symbol, WaccResult,
};
use tracing::{debug, instrument, warn};

use crate::assumptions::{DiscountRate, ValuationAssumptions};
use crate::dcf::DcfValuator;
use crate::fcf::{DEFAULT_HISTORY_CAP, FreeCashFlowExtractor};
use crate::projection::FcfProjector;
use crate::report::{ValuationReport, WaccSource};
use crate::wacc::{ResolvedFundamentals, WaccDefaults, estimate_wacc, resolve_fundamentals};

/// Reference instrument for the risk-free rate: the 10-year US Treasury yield.
pub const DEFAULT_REFERENCE_RATE_SYMBOL: &str = "^TNX";

/// A WACC estimate together with the resolved inputs it was computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct WaccEstimate {
    /// The estimate.
    pub wacc: WaccResult,
    /// Inputs after default substitution.
    pub resolved: ResolvedFundamentals,
}

/// Values tickers against a market-data provider.
///
/// The engine holds no per-request state: every call fetches fresh data, and a
/// WACC from an earlier call is only reused when the caller passes it back in.
/// One engine can serve any number of sequential or concurrent calls.
#[derive(Clone)]
pub struct ValuationEngine {
    provider: Arc<dyn MarketDataProvider>,
    wacc_defaults: WaccDefaults,
    reference_rate_symbol: Symbol,
    history_cap: usize,
    extractor: FreeCashFlowExtractor,
    projector: FcfProjector,
}

impl fmt::Debug for ValuationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuationEngine")
            .field("provider", &self.provider.name())
            .field("wacc_defaults", &self.wacc_defaults)
            .field("reference_rate_symbol", &self.reference_rate_symbol)
            .field("history_cap", &self.history_cap)
            .finish()
    }
}

impl ValuationEngine {
    /// Creates an engine with default WACC assumptions.
    #[must_use]
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            wacc_defaults: WaccDefaults::default(),
            reference_rate_symbol: Symbol::new(DEFAULT_REFERENCE_RATE_SYMBOL),
            history_cap: DEFAULT_HISTORY_CAP,
            extractor: FreeCashFlowExtractor::new(),
            projector: FcfProjector::new(),
        }
    }

    /// Sets the defaults substituted for missing WACC inputs.
    #[must_use]
    pub const fn with_wacc_defaults(mut self, defaults: WaccDefaults) -> Self {
        self.wacc_defaults = defaults;
        self
    }

    /// Sets the instrument whose yield is used as the risk-free rate.
    #[must_use]
    pub fn with_reference_rate_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.reference_rate_symbol = symbol.into();
        self
    }

    /// Sets how many recent FCF periods are kept.
    #[must_use]
    pub const fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    /// The WACC defaults in use.
    #[must_use]
    pub const fn wacc_defaults(&self) -> &WaccDefaults {
        &self.wacc_defaults
    }

    /// Fetches the reference yield, or `None` if it cannot be fetched.
    async fn fetch_risk_free_rate(&self) -> Option<f64> {
        match self
            .provider
            .fetch_reference_rate(&self.reference_rate_symbol)
            .await
        {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    reference = %self.reference_rate_symbol,
                    error = %e,
                    "Reference rate unavailable, using default risk-free rate"
                );
                None
            }
        }
    }

    /// Estimates the WACC of a ticker on its own.
    ///
    /// # Errors
    ///
    /// Provider errors from the fundamentals fetch, and
    /// [`DcfError::InsufficientCapitalData`] for a company with no capital.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub async fn estimate_wacc(&self, symbol: &Symbol) -> Result<WaccEstimate> {
        let fundamentals = self.provider.fetch_fundamentals(symbol).await?;
        let risk_free_rate = self.fetch_risk_free_rate().await;
        let resolved = resolve_fundamentals(&fundamentals, risk_free_rate, &self.wacc_defaults);
        let wacc = estimate_wacc(&resolved)?;
        Ok(WaccEstimate { wacc, resolved })
    }

    /// Values one ticker.
    ///
    /// `prior_wacc` replaces the WACC estimate when given (e.g. a WACC the user
    /// computed earlier in the session); fundamentals are still fetched for the
    /// share count.
    ///
    /// # Errors
    ///
    /// - [`DcfError::InvalidParameter`] / [`DcfError::InvalidDiscountAssumption`]
    ///   for unusable assumptions, before anything is fetched
    /// - [`DcfError::DataUnavailable`] when no FCF history or share count exists
    /// - [`DcfError::InsufficientCapitalData`] when the WACC is undefined
    /// - [`DcfError::InvalidShareCount`] for a non-positive share count
    /// - any provider error
    #[instrument(skip(self, assumptions, prior_wacc), fields(symbol = %symbol))]
    pub async fn value(
        &self,
        symbol: &Symbol,
        assumptions: &ValuationAssumptions,
        prior_wacc: Option<&WaccResult>,
    ) -> Result<ValuationReport> {
        assumptions.validate()?;

        let history = self
            .extractor
            .fetch_with_fallback(self.provider.as_ref(), symbol, self.history_cap)
            .await?;
        let base_fcf = assumptions
            .base_fcf
            .select(&history)
            .ok_or_else(|| DcfError::data_unavailable(symbol, "empty FCF history"))?;
        debug!(
            periods = history.len(),
            period_type = %history.period_type,
            base_fcf,
            "Selected base FCF"
        );

        let fundamentals = self.provider.fetch_fundamentals(symbol).await?;

        let (wacc, wacc_source, fallbacks) = match prior_wacc {
            Some(wacc) => {
                debug!(wacc = wacc.wacc, "Using supplied WACC");
                (*wacc, WaccSource::Supplied, Vec::new())
            }
            None => {
                let risk_free_rate = self.fetch_risk_free_rate().await;
                let resolved =
                    resolve_fundamentals(&fundamentals, risk_free_rate, &self.wacc_defaults);
                (
                    estimate_wacc(&resolved)?,
                    WaccSource::Estimated,
                    resolved.fallbacks,
                )
            }
        };

        let discount_rate = match assumptions.discount_rate {
            DiscountRate::Fixed(rate) => rate,
            DiscountRate::Wacc => wacc.wacc,
        };
        let valuator = DcfValuator::new(discount_rate, assumptions.terminal_growth)?;

        let projection = self.projector.project(base_fcf, &assumptions.stages());

        let shares_outstanding = fundamentals
            .shares_outstanding
            .ok_or_else(|| DcfError::data_unavailable(symbol, "shares outstanding unknown"))?;
        let valuation = valuator.value(&projection, shares_outstanding, assumptions.buyback_rate)?;

        debug!(
            fair_value_per_share = valuation.fair_value_per_share,
            discount_rate,
            "Valuation complete"
        );

        Ok(ValuationReport {
            ticker: symbol.clone(),
            fair_value_per_share: valuation.fair_value_per_share,
            wacc,
            wacc_source,
            fallbacks,
            discount_rate,
            terminal_growth: assumptions.terminal_growth,
            buyback_rate: assumptions.buyback_rate,
            base_fcf,
            fcf_history: history,
            projections: projection.into_values(),
            valuation,
        })
    }
}
