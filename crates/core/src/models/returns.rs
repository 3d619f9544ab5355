use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gain over invested capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteReturn {
    /// `current_value - invested_value`
    pub amount: f64,

    /// `amount / invested_value × 100`, 0 when nothing was invested
    pub percent: f64,
}

/// Output of the XIRR solver with convergence details.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrOutcome {
    /// Annualized rate in percent (10.0 = 10%)
    pub rate_percent: f64,

    /// `false` when the solver stopped on the iteration cap or a flat
    /// derivative; the rate is then a best estimate, not an exact root
    pub converged: bool,

    pub iterations: usize,
}

/// Volatility-based risk figures for a return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Sample standard deviation of the periodic returns, in percent
    pub volatility: f64,

    /// `(portfolio_return - risk_free_rate) / volatility`
    pub sharpe_ratio: f64,
}

/// Performance of a single asset or a whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Date the summary was computed for
    pub as_of: NaiveDate,

    /// Date of the earliest cash flow, if any
    pub inception_date: Option<NaiveDate>,

    /// Total capital paid in
    pub invested_value: f64,

    pub current_value: f64,

    pub absolute_return: AbsoluteReturn,

    /// Annualized money-weighted return in percent; `None` when undefined
    pub xirr: Option<f64>,

    /// Compound annual growth from invested to current value over the
    /// holding period, in percent
    pub cagr: f64,

    /// Years between inception and `as_of`
    pub holding_period_years: f64,
}
