//! Sequential valuation of ticker lists.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use dcf_core::{DcfError, ErrorCategory, Result, Symbol};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::assumptions::ValuationAssumptions;
use crate::engine::ValuationEngine;
use crate::report::ValuationReport;

/// Parses a comma-separated ticker list.
///
/// Entries are trimmed and uppercased; empty entries are dropped and duplicates
/// keep their first position.
#[must_use]
pub fn parse_ticker_list(input: &str) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(Symbol::new)
        .filter(|symbol| !symbol.is_empty())
        .filter(|symbol| seen.insert(symbol.clone()))
        .collect()
}

/// Why a ticker was left out of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    /// Coarse error group.
    pub category: ErrorCategory,
    /// The error message.
    pub message: String,
    /// What the user can do about it.
    pub hint: String,
}

impl From<&DcfError> for SkipReason {
    fn from(error: &DcfError) -> Self {
        Self {
            category: error.category(),
            message: error.to_string(),
            hint: error.user_hint().to_string(),
        }
    }
}

/// Outcome of one ticker in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Ticker as requested.
    pub symbol: Symbol,
    /// The report, or why there is none.
    pub outcome: std::result::Result<ValuationReport, SkipReason>,
}

/// Results of a batch run, in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// All entries in input order.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Successful valuations in input order.
    pub fn valuations(&self) -> impl Iterator<Item = &ValuationReport> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    /// Skipped tickers with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&Symbol, &SkipReason)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|reason| (&e.symbol, reason)))
    }

    /// Number of tickers in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch had no tickers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One row per ticker.
    ///
    /// Columns: `ticker`, `status` (`valued` or `skipped`), `fair_value_per_share`,
    /// `wacc`, `discount_rate`, `base_fcf`, `terminal_value`, `skip_category`,
    /// `skip_reason`. Numeric columns are null for skipped tickers.
    ///
    /// # Errors
    ///
    /// [`DcfError::Other`] if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let n = self.entries.len();
        let mut tickers = Vec::with_capacity(n);
        let mut statuses = Vec::with_capacity(n);
        let mut fair_values = Vec::with_capacity(n);
        let mut waccs = Vec::with_capacity(n);
        let mut discount_rates = Vec::with_capacity(n);
        let mut base_fcfs = Vec::with_capacity(n);
        let mut terminal_values = Vec::with_capacity(n);
        let mut categories: Vec<Option<&str>> = Vec::with_capacity(n);
        let mut reasons: Vec<Option<&str>> = Vec::with_capacity(n);

        for entry in &self.entries {
            tickers.push(entry.symbol.as_str());
            match &entry.outcome {
                Ok(report) => {
                    statuses.push("valued");
                    fair_values.push(Some(report.fair_value_per_share));
                    waccs.push(Some(report.wacc.wacc));
                    discount_rates.push(Some(report.discount_rate));
                    base_fcfs.push(Some(report.base_fcf));
                    terminal_values.push(Some(report.valuation.terminal_value));
                    categories.push(None);
                    reasons.push(None);
                }
                Err(reason) => {
                    statuses.push("skipped");
                    fair_values.push(None);
                    waccs.push(None);
                    discount_rates.push(None);
                    base_fcfs.push(None);
                    terminal_values.push(None);
                    categories.push(Some(reason.category.as_str()));
                    reasons.push(Some(reason.message.as_str()));
                }
            }
        }

        DataFrame::new(vec![
            Column::new("ticker".into(), tickers),
            Column::new("status".into(), statuses),
            Column::new("fair_value_per_share".into(), fair_values),
            Column::new("wacc".into(), waccs),
            Column::new("discount_rate".into(), discount_rates),
            Column::new("base_fcf".into(), base_fcfs),
            Column::new("terminal_value".into(), terminal_values),
            Column::new("skip_category".into(), categories),
            Column::new("skip_reason".into(), reasons),
        ])
        .map_err(|e| DcfError::Other(e.to_string()))
    }

    /// Writes [`Self::to_dataframe`] to a Parquet file.
    ///
    /// # Errors
    ///
    /// [`DcfError::Other`] if the file cannot be created or written.
    pub fn write_parquet(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let file = File::create(path.as_ref()).map_err(|e| DcfError::Other(e.to_string()))?;
        ParquetWriter::new(file)
            .finish(&mut df)
            .map_err(|e| DcfError::Other(e.to_string()))?;
        Ok(())
    }
}

impl ValuationEngine {
    /// Values each ticker in order, skipping the ones that fail.
    ///
    /// A failure never aborts the batch; it is recorded as a [`SkipReason`].
    #[instrument(skip(self, symbols, assumptions), fields(count = symbols.len()))]
    pub async fn value_batch(
        &self,
        symbols: &[Symbol],
        assumptions: &ValuationAssumptions,
    ) -> BatchReport {
        let mut entries = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let outcome = match self.value(symbol, assumptions, None).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Skipping ticker");
                    Err(SkipReason::from(&e))
                }
            };
            entries.push(BatchEntry {
                symbol: symbol.clone(),
                outcome,
            });
        }

        let report = BatchReport { entries };
        info!(
            valued = report.valuations().count(),
            skipped = report.skipped().count(),
            "Batch complete"
        );
        report
    }
}
