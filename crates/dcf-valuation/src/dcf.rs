//! Discounting projections to present value and converting to a per-share value.

use dcf_core::{DcfError, ProjectionSeries, Result, ValuationResult};
use tracing::debug;

/// Present value of a projection before per-share conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentValue {
    /// Each projected year discounted by `(1 + r)^i`, `i` starting at 1.
    pub discounted_projections: Vec<f64>,
    /// Gordon-growth terminal value on the last projected year.
    pub terminal_value: f64,
    /// Terminal value discounted by `(1 + r)^N`.
    pub discounted_terminal_value: f64,
    /// Sum of all discounted values.
    pub total: f64,
}

/// Discounts projected free cash flows plus a terminal value.
///
/// The terminal value is realized at the end of the explicit horizon, so it is
/// discounted by the same `N` years as the final projected year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DcfValuator {
    discount_rate: f64,
    terminal_growth: f64,
}

impl DcfValuator {
    /// Creates a valuator.
    ///
    /// # Errors
    ///
    /// [`DcfError::InvalidDiscountAssumption`] unless `discount_rate > terminal_growth`,
    /// and [`DcfError::InvalidParameter`] for non-finite rates.
    pub fn new(discount_rate: f64, terminal_growth: f64) -> Result<Self> {
        if !discount_rate.is_finite() || !terminal_growth.is_finite() {
            return Err(DcfError::InvalidParameter(format!(
                "discount rate {discount_rate} and terminal growth {terminal_growth} must be finite"
            )));
        }
        if discount_rate <= terminal_growth {
            return Err(DcfError::InvalidDiscountAssumption {
                discount_rate,
                terminal_growth,
            });
        }
        Ok(Self {
            discount_rate,
            terminal_growth,
        })
    }

    /// The discount rate.
    #[must_use]
    pub const fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// The terminal growth rate.
    #[must_use]
    pub const fn terminal_growth(&self) -> f64 {
        self.terminal_growth
    }

    /// `last * (1 + g) / (r - g)`.
    #[must_use]
    pub fn terminal_value(&self, last_value: f64) -> f64 {
        last_value * (1.0 + self.terminal_growth) / (self.discount_rate - self.terminal_growth)
    }

    /// Discounts the projection and its terminal value to today.
    #[must_use]
    pub fn present_value(&self, projection: &ProjectionSeries) -> PresentValue {
        let factor = 1.0 + self.discount_rate;

        let discounted_projections: Vec<f64> = projection
            .values()
            .iter()
            .zip(1..)
            .map(|(fcf, year)| fcf / factor.powi(year))
            .collect();

        let terminal_value = self.terminal_value(projection.last_value());
        let discounted_terminal_value = terminal_value / factor.powi(horizon(projection));
        let total = discounted_projections.iter().sum::<f64>() + discounted_terminal_value;

        PresentValue {
            discounted_projections,
            terminal_value,
            discounted_terminal_value,
            total,
        }
    }

    /// Values the projection per share.
    ///
    /// The share count shrinks by `buyback_rate` every projected year:
    /// `adjusted = shares * (1 - buyback_rate)^N`.
    ///
    /// # Errors
    ///
    /// [`DcfError::InvalidShareCount`] if `shares_outstanding` or the adjusted
    /// count is not a positive number.
    pub fn value(
        &self,
        projection: &ProjectionSeries,
        shares_outstanding: f64,
        buyback_rate: f64,
    ) -> Result<ValuationResult> {
        if !shares_outstanding.is_finite() || shares_outstanding <= 0.0 {
            return Err(DcfError::InvalidShareCount(shares_outstanding));
        }

        let adjusted_shares_outstanding =
            adjusted_share_count(shares_outstanding, buyback_rate, horizon(projection));
        if !adjusted_shares_outstanding.is_finite() || adjusted_shares_outstanding <= 0.0 {
            return Err(DcfError::InvalidShareCount(adjusted_shares_outstanding));
        }

        let pv = self.present_value(projection);
        let fair_value_per_share = pv.total / adjusted_shares_outstanding;

        debug!(
            total_present_value = pv.total,
            terminal_value = pv.terminal_value,
            adjusted_shares_outstanding,
            fair_value_per_share,
            "Discounted projection"
        );

        Ok(ValuationResult {
            fair_value_per_share,
            total_present_value: pv.total,
            terminal_value: pv.terminal_value,
            discounted_terminal_value: pv.discounted_terminal_value,
            discounted_projections: pv.discounted_projections,
            adjusted_shares_outstanding,
        })
    }
}

/// `shares * (1 - buyback_rate)^years`.
#[must_use]
pub fn adjusted_share_count(shares_outstanding: f64, buyback_rate: f64, years: i32) -> f64 {
    shares_outstanding * (1.0 - buyback_rate).powi(years)
}

fn horizon(projection: &ProjectionSeries) -> i32 {
    i32::try_from(projection.len()).unwrap_or(i32::MAX)
}
