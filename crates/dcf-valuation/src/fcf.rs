//! Free-cash-flow extraction from cash-flow statements.

use dcf_core::{
    CashFlowProvider, CashFlowStatement, DcfError, FcfEntry, FcfSeries, PeriodType, Result, Symbol,
};
use tracing::debug;

/// Names under which providers report operating cash flow, in priority order.
pub const OPERATING_CASH_FLOW_ALIASES: &[&str] = &[
    "Total Cash From Operating Activities",
    "Operating Cash Flow",
    "Cash Flow From Continuing Operating Activities",
];

/// Names under which providers report capital expenditures, in priority order.
pub const CAPITAL_EXPENDITURE_ALIASES: &[&str] = &["Capital Expenditures", "Capital Expenditure"];

/// Number of periods kept by the annual/quarterly fallback strategy.
pub const DEFAULT_HISTORY_CAP: usize = 5;

/// Derives free cash flow from raw cash-flow line items.
///
/// `fcf[t] = operating_cash_flow[t] + capital_expenditures[t]`; capex is
/// reported as a negative number so the addition nets it out. Periods where
/// either side is missing or non-finite are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeCashFlowExtractor;

impl FreeCashFlowExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the full FCF series from one statement, most recent first.
    ///
    /// # Errors
    ///
    /// [`DcfError::DataUnavailable`] if the statement is empty, lacks one of the
    /// required line items, or has no period where both are defined.
    pub fn extract(&self, statement: &CashFlowStatement) -> Result<FcfSeries> {
        let symbol = &statement.symbol;

        if statement.is_empty() {
            return Err(DcfError::data_unavailable(
                symbol,
                format!("{} cash-flow statement is empty", statement.period_type),
            ));
        }

        let (cfo_name, cfo) = statement
            .find_line_item(OPERATING_CASH_FLOW_ALIASES)
            .ok_or_else(|| {
                DcfError::data_unavailable(
                    symbol,
                    format!(
                        "{} cash-flow statement has no operating cash flow",
                        statement.period_type
                    ),
                )
            })?;

        let (capex_name, capex) = statement
            .find_line_item(CAPITAL_EXPENDITURE_ALIASES)
            .ok_or_else(|| {
                DcfError::data_unavailable(
                    symbol,
                    format!(
                        "{} cash-flow statement has no capital expenditures",
                        statement.period_type
                    ),
                )
            })?;

        debug!(
            symbol = %symbol,
            operating = cfo_name,
            capex = capex_name,
            "Matched cash-flow line items"
        );

        let entries: Vec<FcfEntry> = cfo
            .iter()
            .filter_map(|(period, cfo)| {
                let cfo = finite(*cfo)?;
                let capex = finite(*capex.get(period)?)?;
                Some(FcfEntry {
                    period: *period,
                    amount: cfo + capex,
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(DcfError::data_unavailable(
                symbol,
                format!(
                    "no {} period has both operating cash flow and capital expenditures",
                    statement.period_type
                ),
            ));
        }

        Ok(FcfSeries::from_entries(statement.period_type, entries))
    }

    /// Fetches and extracts FCF, trying annual then quarterly statements.
    ///
    /// The first granularity that yields data wins, capped to the `cap` most
    /// recent periods. Quarterly data is only requested when the annual
    /// statement is empty or lacks usable line items; any other failure is
    /// returned as is.
    ///
    /// # Errors
    ///
    /// [`DcfError::DataUnavailable`] when no statement has usable line items,
    /// or the provider's own error from the first failed fetch.
    pub async fn fetch_with_fallback<P>(
        &self,
        provider: &P,
        symbol: &Symbol,
        cap: usize,
    ) -> Result<FcfSeries>
    where
        P: CashFlowProvider + ?Sized,
    {
        let mut last_error = None;
        for period_type in PeriodType::FALLBACK_ORDER {
            let statement = provider.fetch_cash_flow_statement(symbol, period_type).await?;
            match self.extract(&statement) {
                Ok(series) => return Ok(series.truncate(cap)),
                Err(e) => {
                    debug!(
                        provider = provider.name(),
                        symbol = %symbol,
                        period_type = %period_type,
                        error = %e,
                        "No FCF at this granularity"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DcfError::data_unavailable(symbol, "no cash-flow data")))
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use dcf_core::DataProvider;

    fn date(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 12, 31).unwrap()
    }

    fn statement(period_type: PeriodType) -> CashFlowStatement {
        CashFlowStatement::new(Symbol::new("ACME"), period_type)
    }

    #[test]
    fn test_extract_nets_capex_and_sorts_most_recent_first() {
        let stmt = statement(PeriodType::Annual)
            .with_line_item(
                "Total Cash From Operating Activities",
                [
                    (date(2021), Some(100.0)),
                    (date(2023), Some(140.0)),
                    (date(2022), Some(120.0)),
                ],
            )
            .with_line_item(
                "Capital Expenditures",
                [
                    (date(2021), Some(-30.0)),
                    (date(2022), Some(-35.0)),
                    (date(2023), Some(-40.0)),
                ],
            );

        let series = FreeCashFlowExtractor::new().extract(&stmt).unwrap();
        let amounts: Vec<(NaiveDate, f64)> = series.iter().map(|e| (e.period, e.amount)).collect();
        assert_eq!(
            amounts,
            vec![(date(2023), 100.0), (date(2022), 85.0), (date(2021), 70.0)]
        );
        assert_eq!(series.period_type, PeriodType::Annual);
    }

    #[test]
    fn test_extract_drops_undefined_and_unaligned_periods() {
        let stmt = statement(PeriodType::Annual)
            .with_line_item(
                "Operating Cash Flow",
                [
                    (date(2020), Some(50.0)),
                    (date(2021), None),
                    (date(2022), Some(f64::NAN)),
                    (date(2023), Some(80.0)),
                ],
            )
            .with_line_item(
                "Capital Expenditure",
                [
                    (date(2021), Some(-10.0)),
                    (date(2022), Some(-10.0)),
                    (date(2023), Some(-20.0)),
                ],
            );

        let series = FreeCashFlowExtractor::new().extract(&stmt).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.most_recent(), Some(60.0));
    }

    #[test]
    fn test_extract_missing_line_item_is_data_unavailable() {
        let stmt = statement(PeriodType::Annual)
            .with_line_item("Operating Cash Flow", [(date(2023), Some(80.0))]);

        let err = FreeCashFlowExtractor::new().extract(&stmt).unwrap_err();
        assert!(matches!(err, DcfError::DataUnavailable { .. }));
        assert!(err.to_string().contains("capital expenditures"));
    }

    #[test]
    fn test_extract_empty_statement_is_data_unavailable() {
        let err = FreeCashFlowExtractor::new()
            .extract(&statement(PeriodType::Quarterly))
            .unwrap_err();
        assert!(matches!(err, DcfError::DataUnavailable { .. }));
    }

    /// Serves fixed statements; the optional period type is rate limited.
    #[derive(Debug)]
    struct Statements(Vec<CashFlowStatement>, Option<PeriodType>);

    impl DataProvider for Statements {
        fn name(&self) -> &str {
            "statements"
        }

        fn description(&self) -> &str {
            "fixed statements"
        }
    }

    #[async_trait]
    impl CashFlowProvider for Statements {
        async fn fetch_cash_flow_statement(
            &self,
            symbol: &Symbol,
            period_type: PeriodType,
        ) -> Result<CashFlowStatement> {
            if self.1 == Some(period_type) {
                return Err(DcfError::RateLimited {
                    provider: self.name().to_string(),
                    retry_after: None,
                });
            }
            self.0
                .iter()
                .find(|s| s.period_type == period_type)
                .cloned()
                .ok_or_else(|| DcfError::SymbolNotFound(symbol.to_string()))
        }
    }

    #[tokio::test]
    async fn test_fallback_uses_quarterly_and_caps_history() {
        let annual = statement(PeriodType::Annual);
        let quarterly = (1..=8).fold(statement(PeriodType::Quarterly), |mut stmt, i| {
            let period = NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .checked_add_months(chrono::Months::new(i * 3))
                .unwrap();
            stmt.insert("Operating Cash Flow", period, Some(f64::from(i) * 10.0));
            stmt.insert("Capital Expenditure", period, Some(-1.0));
            stmt
        });
        let provider = Statements(vec![annual, quarterly], None);

        let series = FreeCashFlowExtractor::new()
            .fetch_with_fallback(&provider, &Symbol::new("acme"), DEFAULT_HISTORY_CAP)
            .await
            .unwrap();

        assert_eq!(series.period_type, PeriodType::Quarterly);
        assert_eq!(series.len(), DEFAULT_HISTORY_CAP);
        assert_eq!(series.most_recent(), Some(79.0));
    }

    #[tokio::test]
    async fn test_fallback_prefers_annual() {
        let annual = statement(PeriodType::Annual)
            .with_line_item("Operating Cash Flow", [(date(2023), Some(10.0))])
            .with_line_item("Capital Expenditure", [(date(2023), Some(-4.0))]);
        let provider = Statements(vec![annual], None);

        let series = FreeCashFlowExtractor::new()
            .fetch_with_fallback(&provider, &Symbol::new("ACME"), DEFAULT_HISTORY_CAP)
            .await
            .unwrap();
        assert_eq!(series.period_type, PeriodType::Annual);
        assert_eq!(series.most_recent(), Some(6.0));
    }

    #[tokio::test]
    async fn test_fallback_reports_last_error_when_nothing_available() {
        let provider = Statements(
            vec![
                statement(PeriodType::Annual),
                statement(PeriodType::Quarterly),
            ],
            None,
        );

        let err = FreeCashFlowExtractor::new()
            .fetch_with_fallback(&provider, &Symbol::new("ACME"), DEFAULT_HISTORY_CAP)
            .await
            .unwrap_err();
        assert!(matches!(err, DcfError::DataUnavailable { .. }));
        assert!(err.to_string().contains("quarterly"));
    }

    #[tokio::test]
    async fn test_fallback_does_not_mask_upstream_errors() {
        let quarterly = statement(PeriodType::Quarterly)
            .with_line_item("Operating Cash Flow", [(date(2023), Some(30.0))])
            .with_line_item("Capital Expenditure", [(date(2023), Some(-5.0))]);
        let provider = Statements(vec![quarterly], Some(PeriodType::Annual));

        let err = FreeCashFlowExtractor::new()
            .fetch_with_fallback(&provider, &Symbol::new("ACME"), DEFAULT_HISTORY_CAP)
            .await
            .unwrap_err();
        assert!(matches!(err, DcfError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_fallback_surfaces_quarterly_fetch_error() {
        let provider = Statements(
            vec![statement(PeriodType::Annual)],
            Some(PeriodType::Quarterly),
        );

        let err = FreeCashFlowExtractor::new()
            .fetch_with_fallback(&provider, &Symbol::new("ACME"), DEFAULT_HISTORY_CAP)
            .await
            .unwrap_err();
        assert!(matches!(err, DcfError::RateLimited { .. }));
    }
}
