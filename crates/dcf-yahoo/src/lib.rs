#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance market-data provider.
//!
//! This crate provides a Yahoo Finance provider that implements the
//! [`CashFlowProvider`], [`FundamentalsProvider`] and [`ReferenceRateProvider`]
//! traits from `dcf-core`.
//!
//! # Features
//!
//! - Cash-flow line items from the fundamentals-timeseries API
//! - Beta, capital structure and tax data from the quote summary API
//! - Treasury yields from the chart API
//! - Built-in rate limiting (1 request per second by default)
//!
//! # Example
//!
//! ```no_run
//! use dcf_yahoo::YahooProvider;
//! use dcf_core::{CashFlowProvider, PeriodType, Symbol};
//!
//! # async fn example() -> dcf_core::Result<()> {
//! let provider = YahooProvider::new();
//! let statement = provider
//!     .fetch_cash_flow_statement(&Symbol::new("AAPL"), PeriodType::Annual)
//!     .await?;
//! println!("{:?}", statement.line_item_names().collect::<Vec<_>>());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use dcf_core::{
    CashFlowProvider, CashFlowStatement, DataProvider, DcfError, Fundamentals,
    FundamentalsProvider, PeriodType, ReferenceRateProvider, Result, Symbol,
};
use polars::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Yahoo Finance chart API base URL.
const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance quote summary API base URL.
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance fundamentals time series API base URL.
const TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Earliest timestamp requested from the time series API (1985-08-23).
const TIMESERIES_START: i64 = 493_590_046;

/// Cash-flow series requested from the time series API, with the line item
/// name each one is stored under.
const CASH_FLOW_SERIES: &[(&str, &str)] = &[
    ("OperatingCashFlow", "Operating Cash Flow"),
    ("CapitalExpenditure", "Capital Expenditure"),
];

/// Default rate limit delay in milliseconds.
const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance market-data provider.
///
/// Implements [`DataProvider`], [`CashFlowProvider`], [`FundamentalsProvider`]
/// and [`ReferenceRateProvider`].
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    rate_limit_ms: u64,
    last_request_time: AtomicU64,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    ///
    /// Uses built-in rate limiting of 1 request per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(DEFAULT_RATE_LIMIT_MS))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Uses the provided client for all HTTP requests. Rate limiting
    /// is still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Create a new Yahoo Finance provider with custom rate limiting.
    #[must_use]
    pub fn with_rate_limit(rate_limit: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to configure HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            rate_limit_ms: u64::try_from(rate_limit.as_millis()).unwrap_or(u64::MAX),
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Apply rate limiting before making a request.
    async fn apply_rate_limit(&self) {
        let last = self.last_request_time.load(Ordering::Relaxed);
        let elapsed = now_millis().saturating_sub(last);

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(now_millis(), Ordering::Relaxed);
    }

    /// Rate-limited GET of a JSON document.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &Symbol) -> Result<T> {
        self.apply_rate_limit().await;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DcfError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DcfError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DcfError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(DcfError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DcfError::Parse(e.to_string()))
    }

    /// Build the time series URL for the cash-flow line items of a symbol.
    fn build_timeseries_url(symbol: &Symbol, period_type: PeriodType, end_ts: i64) -> String {
        let prefix = period_type.as_str();
        let types: Vec<String> = CASH_FLOW_SERIES
            .iter()
            .map(|(series, _)| format!("{prefix}{series}"))
            .collect();

        format!(
            "{}/{}?symbol={}&type={}&period1={}&period2={}",
            TIMESERIES_URL,
            encode_symbol(symbol),
            encode_symbol(symbol),
            types.join(","),
            TIMESERIES_START,
            end_ts
        )
    }

    fn build_quote_summary_url(symbol: &Symbol) -> String {
        format!(
            "{}/{}?modules=summaryDetail,defaultKeyStatistics,financialData,incomeStatementHistory",
            QUOTE_SUMMARY_URL,
            encode_symbol(symbol)
        )
    }

    fn build_chart_url(symbol: &Symbol) -> String {
        format!(
            "{}/{}?range=5d&interval=1d",
            CHART_API_URL,
            encode_symbol(symbol)
        )
    }

    /// Parse a time series response into a cash-flow statement.
    fn parse_timeseries_response(
        symbol: &Symbol,
        period_type: PeriodType,
        response: TimeseriesResponse,
    ) -> Result<CashFlowStatement> {
        if let Some(error) = response.timeseries.error {
            return Err(api_error(symbol, error));
        }

        let prefix = period_type.as_str();
        let mut statement = CashFlowStatement::new(symbol.clone(), period_type);

        for result in response.timeseries.result.unwrap_or_default() {
            let Some(series_type) = result.meta.series_type.first() else {
                continue;
            };
            let Some(line_item) = series_type
                .strip_prefix(prefix)
                .and_then(|series| {
                    CASH_FLOW_SERIES
                        .iter()
                        .find(|(name, _)| *name == series)
                })
                .map(|(_, line_item)| *line_item)
            else {
                debug!(series = %series_type, "Ignoring unexpected series");
                continue;
            };

            let points = result
                .values
                .get(series_type)
                .cloned()
                .unwrap_or_default();
            let points: Vec<Option<TimeseriesPoint>> = serde_json::from_value(points)
                .map_err(|e| DcfError::Parse(format!("{series_type}: {e}")))?;

            for point in points.into_iter().flatten() {
                let period = NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d")
                    .map_err(|e| DcfError::Parse(format!("{}: {e}", point.as_of_date)))?;
                let value = point.reported_value.and_then(|v| v.raw);
                statement.insert(line_item, period, value);
            }
        }

        debug!(
            symbol = %symbol,
            period_type = %period_type,
            line_items = statement.line_item_names().count(),
            "Parsed cash-flow statement"
        );

        Ok(statement)
    }

    /// Parse a quote summary response into fundamentals.
    fn parse_quote_summary(symbol: &Symbol, response: QuoteSummaryResponse) -> Result<Fundamentals> {
        if let Some(error) = response.quote_summary.error {
            return Err(api_error(symbol, error));
        }

        let data = response
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DcfError::SymbolNotFound(symbol.to_string()))?;

        let summary = data.summary_detail.unwrap_or_default();
        let statistics = data.default_key_statistics.unwrap_or_default();
        let financial = data.financial_data.unwrap_or_default();
        let income = data
            .income_statement_history
            .and_then(|h| h.income_statement_history.into_iter().next())
            .unwrap_or_default();

        let income_tax = raw(income.income_tax_expense);
        let pre_tax_income = raw(income.income_before_tax);
        let effective_tax_rate = match (income_tax, pre_tax_income) {
            (Some(tax), Some(pre_tax)) if pre_tax != 0.0 => Some(tax / pre_tax),
            _ => None,
        };

        Ok(Fundamentals {
            symbol: symbol.clone(),
            beta: raw(summary.beta).or_else(|| raw(statistics.beta)),
            market_cap: raw(summary.market_cap),
            total_debt: raw(financial.total_debt),
            interest_expense: raw(income.interest_expense),
            effective_tax_rate,
            shares_outstanding: raw(statistics.shares_outstanding),
        })
    }

    /// Parse a chart response into a frame of daily closes.
    fn parse_chart_response(symbol: &Symbol, response: ChartResponse) -> Result<DataFrame> {
        if let Some(error) = response.chart.error {
            return Err(api_error(symbol, error));
        }

        let result = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DcfError::SymbolNotFound(symbol.to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        if timestamps.is_empty() {
            return Err(DcfError::data_unavailable(symbol, "no recent quotes"));
        }

        let closes: Vec<Option<f64>> = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or_else(|| DcfError::Parse("Missing quote data".to_string()))?;

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let dates: Vec<i32> = timestamps
            .iter()
            .map(|&ts| {
                Utc.timestamp_opt(ts, 0)
                    .single()
                    .map_or(epoch, |dt| dt.date_naive())
            })
            .map(|d| i32::try_from((d - epoch).num_days()).unwrap_or_default())
            .collect();

        if closes.len() != dates.len() {
            return Err(DcfError::Parse(format!(
                "{} timestamps but {} closes",
                dates.len(),
                closes.len()
            )));
        }

        let date_col = Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| DcfError::Other(e.to_string()))?;

        DataFrame::new(vec![date_col, Column::new("close".into(), closes)])
            .map_err(|e| DcfError::Other(e.to_string()))
    }

    /// Latest non-null close of a yield index, converted from percent to decimal.
    fn latest_yield(symbol: &Symbol, closes: &DataFrame) -> Result<f64> {
        let close = closes
            .column("close")
            .and_then(|c| c.as_materialized_series().f64())
            .map_err(|e| DcfError::Other(e.to_string()))?;

        close
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .last()
            .map(|percent| percent / 100.0)
            .ok_or_else(|| DcfError::data_unavailable(symbol, "no non-null close in window"))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Yahoo Finance data provider for cash flows, fundamentals and Treasury yields"
    }
}

#[async_trait]
impl CashFlowProvider for YahooProvider {
    async fn fetch_cash_flow_statement(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<CashFlowStatement> {
        let url = Self::build_timeseries_url(symbol, period_type, Utc::now().timestamp());
        let response: TimeseriesResponse = self.get_json(&url, symbol).await?;
        Self::parse_timeseries_response(symbol, period_type, response)
    }
}

#[async_trait]
impl FundamentalsProvider for YahooProvider {
    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals> {
        let url = Self::build_quote_summary_url(symbol);
        let response: QuoteSummaryResponse = self.get_json(&url, symbol).await?;
        Self::parse_quote_summary(symbol, response)
    }
}

#[async_trait]
impl ReferenceRateProvider for YahooProvider {
    async fn fetch_reference_rate(&self, symbol: &Symbol) -> Result<f64> {
        let url = Self::build_chart_url(symbol);
        let response: ChartResponse = self.get_json(&url, symbol).await?;
        let closes = Self::parse_chart_response(symbol, response)?;
        let rate = Self::latest_yield(symbol, &closes)?;
        debug!(symbol = %symbol, rate, "Fetched reference yield");
        Ok(rate)
    }
}

fn now_millis() -> u64 {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Index symbols such as `^TNX` must be percent-encoded in the path.
fn encode_symbol(symbol: &Symbol) -> String {
    symbol.as_str().replace('^', "%5E")
}

fn api_error(symbol: &Symbol, error: ApiError) -> DcfError {
    if error.code == "Not Found" {
        return DcfError::SymbolNotFound(symbol.to_string());
    }
    DcfError::Other(format!("{}: {}", error.code, error.description))
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

/// A formatted number; only the raw value is used.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

/// Time series API response.
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesResult,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    result: Option<Vec<TimeseriesSeries>>,
    error: Option<ApiError>,
}

/// One series; its points sit under a key named after the series type.
#[derive(Debug, Deserialize)]
struct TimeseriesSeries {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    values: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    series_type: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeseriesPoint {
    as_of_date: String,
    reported_value: Option<RawValue>,
}

/// Quote Summary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    summary_detail: Option<SummaryDetail>,
    default_key_statistics: Option<KeyStatistics>,
    financial_data: Option<FinancialData>,
    income_statement_history: Option<IncomeStatementHistory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    beta: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    beta: Option<RawValue>,
    shares_outstanding: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    total_debt: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementHistory {
    #[serde(default)]
    income_statement_history: Vec<IncomeStatement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatement {
    interest_expense: Option<RawValue>,
    income_tax_expense: Option<RawValue>,
    income_before_tax: Option<RawValue>,
}

/// Chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESERIES_FIXTURE: &str = r#"{
        "timeseries": {
            "result": [
                {
                    "meta": {"symbol": ["AAPL"], "type": ["annualOperatingCashFlow"]},
                    "timestamp": [1664496000, 1696032000],
                    "annualOperatingCashFlow": [
                        {"asOfDate": "2022-09-30", "periodType": "12M",
                         "reportedValue": {"raw": 122151000000.0, "fmt": "122.15B"}},
                        {"asOfDate": "2023-09-30", "periodType": "12M",
                         "reportedValue": {"raw": 110543000000.0, "fmt": "110.54B"}}
                    ]
                },
                {
                    "meta": {"symbol": ["AAPL"], "type": ["annualCapitalExpenditure"]},
                    "timestamp": [1664496000, 1696032000],
                    "annualCapitalExpenditure": [
                        null,
                        {"asOfDate": "2023-09-30", "periodType": "12M",
                         "reportedValue": {"raw": -10959000000.0, "fmt": "-10.96B"}}
                    ]
                }
            ],
            "error": null
        }
    }"#;

    const QUOTE_SUMMARY_FIXTURE: &str = r#"{
        "quoteSummary": {
            "result": [{
                "summaryDetail": {
                    "beta": {"raw": 1.29, "fmt": "1.29"},
                    "marketCap": {"raw": 2950000000000, "fmt": "2.95T"}
                },
                "defaultKeyStatistics": {
                    "sharesOutstanding": {"raw": 15550100000, "fmt": "15.55B"}
                },
                "financialData": {
                    "totalDebt": {"raw": 111088000000, "fmt": "111.09B"}
                },
                "incomeStatementHistory": {
                    "incomeStatementHistory": [
                        {
                            "interestExpense": {"raw": -3933000000, "fmt": "-3.93B"},
                            "incomeTaxExpense": {"raw": 16741000000, "fmt": "16.74B"},
                            "incomeBeforeTax": {"raw": 113736000000, "fmt": "113.74B"}
                        },
                        {
                            "interestExpense": {},
                            "incomeTaxExpense": {"raw": 1.0},
                            "incomeBeforeTax": {"raw": 2.0}
                        }
                    ]
                }
            }],
            "error": null
        }
    }"#;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^TNX"},
                "timestamp": [1728907200, 1728993600, 1729080000],
                "indicators": {"quote": [{"close": [4.075, 4.034, null]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_build_urls() {
        let symbol = Symbol::new("^tnx");
        let chart = YahooProvider::build_chart_url(&symbol);
        assert!(chart.contains("/%5ETNX?"));
        assert!(chart.contains("range=5d"));

        let series = YahooProvider::build_timeseries_url(
            &Symbol::new("AAPL"),
            PeriodType::Quarterly,
            1_700_000_000,
        );
        assert!(series.contains("type=quarterlyOperatingCashFlow,quarterlyCapitalExpenditure"));
        assert!(series.contains("period2=1700000000"));

        let summary = YahooProvider::build_quote_summary_url(&Symbol::new("AAPL"));
        assert!(summary.contains("incomeStatementHistory"));
    }

    #[test]
    fn test_parse_timeseries() {
        let response: TimeseriesResponse = serde_json::from_str(TIMESERIES_FIXTURE).unwrap();
        let statement = YahooProvider::parse_timeseries_response(
            &Symbol::new("AAPL"),
            PeriodType::Annual,
            response,
        )
        .unwrap();

        let fy2023 = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        let fy2022 = NaiveDate::from_ymd_opt(2022, 9, 30).unwrap();

        let cfo = statement.line_item("Operating Cash Flow").unwrap();
        assert_eq!(cfo.len(), 2);
        assert_eq!(cfo[&fy2023], Some(110_543_000_000.0));

        let capex = statement.line_item("Capital Expenditure").unwrap();
        assert_eq!(capex[&fy2023], Some(-10_959_000_000.0));
        assert!(!capex.contains_key(&fy2022));
    }

    #[test]
    fn test_parse_timeseries_ignores_other_granularity() {
        let response: TimeseriesResponse = serde_json::from_str(TIMESERIES_FIXTURE).unwrap();
        let statement = YahooProvider::parse_timeseries_response(
            &Symbol::new("AAPL"),
            PeriodType::Quarterly,
            response,
        )
        .unwrap();
        assert!(statement.is_empty());
    }

    #[test]
    fn test_parse_quote_summary() {
        let response: QuoteSummaryResponse = serde_json::from_str(QUOTE_SUMMARY_FIXTURE).unwrap();
        let f = YahooProvider::parse_quote_summary(&Symbol::new("aapl"), response).unwrap();

        assert_eq!(f.symbol.as_str(), "AAPL");
        assert_eq!(f.beta, Some(1.29));
        assert_eq!(f.market_cap, Some(2.95e12));
        assert_eq!(f.total_debt, Some(111_088_000_000.0));
        assert_eq!(f.interest_expense, Some(-3_933_000_000.0));
        assert_eq!(f.shares_outstanding, Some(15_550_100_000.0));
        let tax = f.effective_tax_rate.unwrap();
        assert!((tax - 16_741.0 / 113_736.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_quote_summary_not_found() {
        let response: QuoteSummaryResponse = serde_json::from_str(
            r#"{"quoteSummary": {"result": null,
                "error": {"code": "Not Found", "description": "Quote not found for ticker symbol: ZZZZ"}}}"#,
        )
        .unwrap();
        let err = YahooProvider::parse_quote_summary(&Symbol::new("ZZZZ"), response).unwrap_err();
        assert!(matches!(err, DcfError::SymbolNotFound(_)));
    }

    #[test]
    fn test_parse_chart_and_latest_yield() {
        let symbol = Symbol::new("^TNX");
        let response: ChartResponse = serde_json::from_str(CHART_FIXTURE).unwrap();
        let df = YahooProvider::parse_chart_response(&symbol, response).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let rate = YahooProvider::latest_yield(&symbol, &df).unwrap();
        assert!((rate - 0.04034).abs() < 1e-12);
    }

    #[test]
    fn test_latest_yield_all_null() {
        let symbol = Symbol::new("^TNX");
        let df = DataFrame::new(vec![Column::new(
            "close".into(),
            vec![None::<f64>, None],
        )])
        .unwrap();
        let err = YahooProvider::latest_yield(&symbol, &df).unwrap_err();
        assert!(matches!(err, DcfError::DataUnavailable { .. }));
    }

    #[test]
    fn test_provider_info() {
        let provider = YahooProvider::default();
        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(provider.description().contains("cash flows"));
    }
}
