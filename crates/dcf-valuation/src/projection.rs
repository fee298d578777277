//! Multi-stage free-cash-flow projection.

use dcf_core::ProjectionSeries;
use serde::{Deserialize, Serialize};

/// One growth stage: a constant annual growth rate held for a number of years.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    /// Annual growth as a decimal; may be negative.
    pub growth: f64,
    /// Number of years the rate applies.
    pub years: u32,
}

impl GrowthStage {
    /// Creates a stage.
    #[must_use]
    pub const fn new(growth: f64, years: u32) -> Self {
        Self { growth, years }
    }
}

/// Compounds a base FCF value forward through consecutive growth stages.
///
/// Every year of every stage appends one value, so the output length is the
/// sum of the stage year counts. Zero-year stages contribute nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FcfProjector;

impl FcfProjector {
    /// Creates a new projector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Projects `base` through `stages` in order.
    #[must_use]
    pub fn project(&self, base: f64, stages: &[GrowthStage]) -> ProjectionSeries {
        let horizon = stages.iter().map(|s| s.years as usize).sum();
        let mut values = Vec::with_capacity(horizon);
        let mut fcf = base;

        for stage in stages {
            for _ in 0..stage.years {
                fcf *= 1.0 + stage.growth;
                values.push(fcf);
            }
        }

        ProjectionSeries::new(base, values)
    }

    /// Projects `base` through the usual two stages.
    #[must_use]
    pub fn project_two_stage(
        &self,
        base: f64,
        stage1: GrowthStage,
        stage2: GrowthStage,
    ) -> ProjectionSeries {
        self.project(base, &[stage1, stage2])
    }
}
