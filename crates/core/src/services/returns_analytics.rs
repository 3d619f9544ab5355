use chrono::NaiveDate;

use crate::models::cash_flow::CashFlow;
use crate::models::returns::{AbsoluteReturn, PerformanceSummary, RiskMetrics};
use crate::services::finite_or_zero;
use crate::services::irr_solver::DAYS_PER_YEAR;

/// Closed-form return metrics.
///
/// Every method is total: degenerate inputs give 0 instead of `NaN` or
/// infinity, so results can be displayed without further checks.
#[derive(Debug, Clone, Default)]
pub struct ReturnsAnalytics;

impl ReturnsAnalytics {
    pub fn new() -> Self {
        Self
    }

    /// Gain over invested capital, absolute and in percent.
    pub fn absolute_return(&self, current_value: f64, invested_value: f64) -> AbsoluteReturn {
        let amount = finite_or_zero(current_value - invested_value);
        let percent = if invested_value == 0.0 {
            0.0
        } else {
            finite_or_zero(amount / invested_value * 100.0)
        };
        AbsoluteReturn { amount, percent }
    }

    /// Compound annual growth rate in percent.
    ///
    /// `((final / initial)^(1 / years) - 1) × 100`; 0 when `years <= 0` or
    /// `initial <= 0`.
    pub fn cagr(&self, initial: f64, final_value: f64, years: f64) -> f64 {
        if years <= 0.0 || initial <= 0.0 || !years.is_finite() {
            return 0.0;
        }
        let growth = (final_value / initial).powf(1.0 / years) - 1.0;
        finite_or_zero(growth * 100.0)
    }

    /// Simplified Sharpe ratio: excess return per unit of volatility.
    ///
    /// All three inputs share a unit (percent). 0 when volatility is 0.
    pub fn sharpe_ratio(&self, portfolio_return: f64, risk_free_rate: f64, volatility: f64) -> f64 {
        if volatility == 0.0 {
            return 0.0;
        }
        finite_or_zero((portfolio_return - risk_free_rate) / volatility)
    }

    /// Sample standard deviation (n - 1 denominator); 0 below two points.
    pub fn volatility(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        finite_or_zero(variance.sqrt())
    }

    /// Percent change between consecutive valuations.
    ///
    /// Pairs whose earlier value is not positive are skipped.
    pub fn periodic_returns(&self, values: &[f64]) -> Vec<f64> {
        values
            .windows(2)
            .filter(|pair| pair[0] > 0.0)
            .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
            .filter(|r| r.is_finite())
            .collect()
    }

    /// Year fraction between two dates; 0 when `to` is not after `from`.
    pub fn years_between(&self, from: NaiveDate, to: NaiveDate) -> f64 {
        let days = (to - from).num_days();
        if days <= 0 {
            0.0
        } else {
            days as f64 / DAYS_PER_YEAR
        }
    }

    /// Volatility and Sharpe ratio for a series of periodic returns.
    pub fn risk_metrics(
        &self,
        returns: &[f64],
        portfolio_return: f64,
        risk_free_rate: f64,
    ) -> RiskMetrics {
        let volatility = self.volatility(returns);
        RiskMetrics {
            volatility,
            sharpe_ratio: self.sharpe_ratio(portfolio_return, risk_free_rate, volatility),
        }
    }

    /// Summarize a cash-flow sequence that ends with a terminal valuation.
    ///
    /// Gain counts everything received back (redemptions, dividends and the
    /// terminal value) against everything paid in.
    pub fn summarize(
        &self,
        flows: &[CashFlow],
        current_value: f64,
        as_of: NaiveDate,
        xirr: Option<f64>,
    ) -> PerformanceSummary {
        let invested_value: f64 = flows
            .iter()
            .filter(|cf| cf.amount < 0.0)
            .map(|cf| -cf.amount)
            .sum();
        let received: f64 = flows
            .iter()
            .filter(|cf| cf.amount > 0.0)
            .map(|cf| cf.amount)
            .sum();

        let inception_date = flows
            .iter()
            .filter(|cf| cf.amount < 0.0)
            .map(|cf| cf.date)
            .min();
        let holding_period_years = inception_date
            .map(|start| self.years_between(start, as_of))
            .unwrap_or(0.0);

        PerformanceSummary {
            as_of,
            inception_date,
            invested_value,
            current_value,
            absolute_return: self.absolute_return(received, invested_value),
            xirr: xirr.filter(|r| r.is_finite()),
            cagr: self.cagr(invested_value, received, holding_period_years),
            holding_period_years,
        }
    }
}
