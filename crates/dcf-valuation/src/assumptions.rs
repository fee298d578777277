//! User-chosen valuation assumptions.

use dcf_core::{DcfError, FcfSeries, Result};
use serde::{Deserialize, Serialize};

use crate::fcf::DEFAULT_HISTORY_CAP;
use crate::projection::GrowthStage;

/// Where the discount rate comes from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DiscountRate {
    /// A rate chosen by the user.
    Fixed(f64),
    /// The WACC estimated (or supplied) for the ticker.
    Wacc,
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::Fixed(0.08)
    }
}

/// How the base FCF value is picked from the history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseFcfMethod {
    /// The most recent period.
    #[default]
    MostRecent,
    /// The mean of the latest `periods` periods.
    Average {
        /// Number of periods averaged.
        periods: usize,
    },
}

impl BaseFcfMethod {
    /// Averages the usual five latest periods.
    #[must_use]
    pub const fn average() -> Self {
        Self::Average {
            periods: DEFAULT_HISTORY_CAP,
        }
    }

    /// Picks the base value from a history, or `None` if the history is empty.
    #[must_use]
    pub fn select(&self, history: &FcfSeries) -> Option<f64> {
        match *self {
            Self::MostRecent => history.most_recent(),
            Self::Average { periods } => history.clone().truncate(periods).average(),
        }
    }
}

/// Growth, discount and buyback assumptions for one valuation.
///
/// Defaults are 5% growth for 5 years, then 3% for 5 years, 2% terminal growth,
/// a fixed 8% discount rate and no buybacks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationAssumptions {
    /// First growth stage.
    pub stage1: GrowthStage,
    /// Second growth stage.
    pub stage2: GrowthStage,
    /// Perpetual growth after the explicit horizon.
    pub terminal_growth: f64,
    /// Discount rate source.
    pub discount_rate: DiscountRate,
    /// Annual proportional reduction in shares outstanding.
    pub buyback_rate: f64,
    /// Base FCF selection.
    pub base_fcf: BaseFcfMethod,
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self {
            stage1: GrowthStage::new(0.05, 5),
            stage2: GrowthStage::new(0.03, 5),
            terminal_growth: 0.02,
            discount_rate: DiscountRate::default(),
            buyback_rate: 0.0,
            base_fcf: BaseFcfMethod::default(),
        }
    }
}

impl ValuationAssumptions {
    /// Creates the default assumptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assumptions used for batch reports: default growth, discounted at WACC, no buybacks.
    #[must_use]
    pub fn batch() -> Self {
        Self::default().with_discount_rate(DiscountRate::Wacc)
    }

    /// Builds assumptions from signed year counts, as entered in a form.
    ///
    /// # Errors
    ///
    /// [`DcfError::InvalidParameter`] if a year count is negative or too large.
    pub fn try_from_signed_years(stage1_years: i64, stage2_years: i64) -> Result<Self> {
        let years = |n: i64, stage: u8| {
            u32::try_from(n).map_err(|_| {
                DcfError::InvalidParameter(format!(
                    "stage {stage} years must be a non-negative integer, got {n}"
                ))
            })
        };
        let defaults = Self::default();
        Ok(defaults
            .with_stage1(defaults.stage1.growth, years(stage1_years, 1)?)
            .with_stage2(defaults.stage2.growth, years(stage2_years, 2)?))
    }

    /// Sets the first growth stage.
    #[must_use]
    pub const fn with_stage1(mut self, growth: f64, years: u32) -> Self {
        self.stage1 = GrowthStage::new(growth, years);
        self
    }

    /// Sets the second growth stage.
    #[must_use]
    pub const fn with_stage2(mut self, growth: f64, years: u32) -> Self {
        self.stage2 = GrowthStage::new(growth, years);
        self
    }

    /// Sets the terminal growth rate.
    #[must_use]
    pub const fn with_terminal_growth(mut self, terminal_growth: f64) -> Self {
        self.terminal_growth = terminal_growth;
        self
    }

    /// Sets the discount rate source.
    #[must_use]
    pub const fn with_discount_rate(mut self, discount_rate: DiscountRate) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Sets the annual buyback rate.
    #[must_use]
    pub const fn with_buyback_rate(mut self, buyback_rate: f64) -> Self {
        self.buyback_rate = buyback_rate;
        self
    }

    /// Sets the base FCF selection.
    #[must_use]
    pub const fn with_base_fcf(mut self, base_fcf: BaseFcfMethod) -> Self {
        self.base_fcf = base_fcf;
        self
    }

    /// Both growth stages, in order.
    #[must_use]
    pub const fn stages(&self) -> [GrowthStage; 2] {
        [self.stage1, self.stage2]
    }

    /// Total number of projected years.
    #[must_use]
    pub const fn horizon(&self) -> u32 {
        self.stage1.years.saturating_add(self.stage2.years)
    }

    /// Checks the assumptions before any data is fetched.
    ///
    /// # Errors
    ///
    /// [`DcfError::InvalidParameter`] for non-finite rates, a buyback rate of
    /// 100% or more, or an empty averaging window;
    /// [`DcfError::InvalidDiscountAssumption`] if a fixed discount rate does not
    /// exceed terminal growth.
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("stage 1 growth", self.stage1.growth),
            ("stage 2 growth", self.stage2.growth),
            ("terminal growth", self.terminal_growth),
            ("buyback rate", self.buyback_rate),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DcfError::InvalidParameter(format!(
                "{name} must be a finite decimal, got {value}"
            )));
        }

        if self.buyback_rate >= 1.0 {
            return Err(DcfError::InvalidParameter(format!(
                "buyback rate must be below 1.0, got {}",
                self.buyback_rate
            )));
        }

        if let BaseFcfMethod::Average { periods: 0 } = self.base_fcf {
            return Err(DcfError::InvalidParameter(
                "FCF average needs at least one period".to_string(),
            ));
        }

        if let DiscountRate::Fixed(rate) = self.discount_rate {
            if !rate.is_finite() {
                return Err(DcfError::InvalidParameter(format!(
                    "discount rate must be a finite decimal, got {rate}"
                )));
            }
            if rate <= self.terminal_growth {
                return Err(DcfError::InvalidDiscountAssumption {
                    discount_rate: rate,
                    terminal_growth: self.terminal_growth,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let a = ValuationAssumptions::default();
        assert_eq!(a.stage1, GrowthStage::new(0.05, 5));
        assert_eq!(a.stage2, GrowthStage::new(0.03, 5));
        assert_eq!(a.terminal_growth, 0.02);
        assert_eq!(a.discount_rate, DiscountRate::Fixed(0.08));
        assert_eq!(a.buyback_rate, 0.0);
        assert_eq!(a.horizon(), 10);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_batch_profile_discounts_at_wacc() {
        let a = ValuationAssumptions::batch();
        assert_eq!(a.discount_rate, DiscountRate::Wacc);
        assert_eq!(a.buyback_rate, 0.0);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_negative_years_rejected() {
        assert!(matches!(
            ValuationAssumptions::try_from_signed_years(-1, 5),
            Err(DcfError::InvalidParameter(_))
        ));
        let a = ValuationAssumptions::try_from_signed_years(3, 0).unwrap();
        assert_eq!(a.horizon(), 3);
    }

    #[test]
    fn test_fixed_discount_below_terminal_growth_rejected() {
        let a = ValuationAssumptions::default()
            .with_discount_rate(DiscountRate::Fixed(0.02))
            .with_terminal_growth(0.03);
        assert!(matches!(
            a.validate(),
            Err(DcfError::InvalidDiscountAssumption { .. })
        ));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let nan_growth = ValuationAssumptions::default().with_stage1(f64::NAN, 5);
        assert!(matches!(
            nan_growth.validate(),
            Err(DcfError::InvalidParameter(_))
        ));

        let full_buyback = ValuationAssumptions::default().with_buyback_rate(1.0);
        assert!(matches!(
            full_buyback.validate(),
            Err(DcfError::InvalidParameter(_))
        ));

        let empty_window =
            ValuationAssumptions::default().with_base_fcf(BaseFcfMethod::Average { periods: 0 });
        assert!(empty_window.validate().is_err());
    }

    #[test]
    fn test_base_fcf_selection() {
        use chrono::NaiveDate;
        use dcf_core::{FcfEntry, PeriodType};

        let history = FcfSeries::from_entries(
            PeriodType::Annual,
            (2017..=2023)
                .map(|year| FcfEntry {
                    period: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                    amount: f64::from(year - 2016),
                })
                .collect(),
        );

        assert_eq!(BaseFcfMethod::MostRecent.select(&history), Some(7.0));
        // Latest five: 7, 6, 5, 4, 3.
        assert_eq!(BaseFcfMethod::average().select(&history), Some(5.0));
        assert_eq!(BaseFcfMethod::MostRecent.select(&FcfSeries::default()), None);
    }

    #[test]
    fn test_deserialize_partial_json_fills_defaults() {
        let a: ValuationAssumptions =
            serde_json::from_str(r#"{"buyback_rate": 0.02, "discount_rate": "Wacc"}"#).unwrap();
        assert_eq!(a.buyback_rate, 0.02);
        assert_eq!(a.discount_rate, DiscountRate::Wacc);
        assert_eq!(a.stage1, GrowthStage::new(0.05, 5));
    }
}
