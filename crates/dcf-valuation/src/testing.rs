//! In-memory market data for engine and batch tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dcf_core::{
    CashFlowProvider, CashFlowStatement, DataProvider, DcfError, Fundamentals,
    FundamentalsProvider, PeriodType, ReferenceRateProvider, Result, Symbol,
};

/// One company known to [`MockMarketData`].
#[derive(Clone, Debug)]
pub(crate) struct MockCompany {
    /// Annual statement; `None` serves empty statements.
    pub(crate) statement: Option<CashFlowStatement>,
    pub(crate) fundamentals: Fundamentals,
}

/// A company with annual FCF `fcf` (most recent first, one per year back from
/// 2023) and a plausible capital structure.
pub(crate) fn company(symbol: &str, fcf: &[f64], shares_outstanding: f64) -> MockCompany {
    let symbol = Symbol::new(symbol);
    let mut statement = CashFlowStatement::new(symbol.clone(), PeriodType::Annual);
    for (year, amount) in (0..).map(|back| 2023 - back).zip(fcf) {
        let period = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        statement.insert("Operating Cash Flow", period, Some(amount + 10.0));
        statement.insert("Capital Expenditure", period, Some(-10.0));
    }

    MockCompany {
        statement: Some(statement),
        fundamentals: Fundamentals {
            symbol,
            beta: Some(1.1),
            market_cap: Some(1_000.0),
            total_debt: Some(100.0),
            interest_expense: Some(-5.0),
            effective_tax_rate: Some(0.2),
            shares_outstanding: Some(shares_outstanding),
        },
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MockMarketData {
    companies: HashMap<Symbol, MockCompany>,
    reference_rate: Option<f64>,
    cash_flow_calls: Arc<AtomicUsize>,
    reference_rate_calls: Arc<AtomicUsize>,
}

impl MockMarketData {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_company(mut self, company: MockCompany) -> Self {
        self.companies
            .insert(company.fundamentals.symbol.clone(), company);
        self
    }

    pub(crate) const fn with_reference_rate(mut self, rate: f64) -> Self {
        self.reference_rate = Some(rate);
        self
    }

    pub(crate) fn cash_flow_calls(&self) -> usize {
        self.cash_flow_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reference_rate_calls(&self) -> usize {
        self.reference_rate_calls.load(Ordering::SeqCst)
    }

    fn company(&self, symbol: &Symbol) -> Result<&MockCompany> {
        self.companies
            .get(symbol)
            .ok_or_else(|| DcfError::SymbolNotFound(symbol.to_string()))
    }
}

impl DataProvider for MockMarketData {
    fn name(&self) -> &str {
        "mock"
    }

    fn description(&self) -> &str {
        "In-memory market data"
    }
}

#[async_trait]
impl CashFlowProvider for MockMarketData {
    async fn fetch_cash_flow_statement(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<CashFlowStatement> {
        self.cash_flow_calls.fetch_add(1, Ordering::SeqCst);
        let company = self.company(symbol)?;
        Ok(company
            .statement
            .as_ref()
            .filter(|s| s.period_type == period_type)
            .cloned()
            .unwrap_or_else(|| CashFlowStatement::new(symbol.clone(), period_type)))
    }
}

#[async_trait]
impl FundamentalsProvider for MockMarketData {
    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals> {
        Ok(self.company(symbol)?.fundamentals.clone())
    }
}

#[async_trait]
impl ReferenceRateProvider for MockMarketData {
    async fn fetch_reference_rate(&self, symbol: &Symbol) -> Result<f64> {
        self.reference_rate_calls.fetch_add(1, Ordering::SeqCst);
        self.reference_rate
            .ok_or_else(|| DcfError::Network(format!("{symbol} unreachable")))
    }
}
