pub mod errors;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use models::{
    allocation::{CategoryAllocation, DiversificationScore, RebalancingReport, TargetAllocation},
    asset::Asset,
    cash_flow::CashFlow,
    goal::{Goal, GoalProjection},
    returns::{IrrOutcome, PerformanceSummary, RiskMetrics},
    settings::AnalyticsSettings,
    transaction::Transaction,
};
use services::{
    allocation_rebalancer::AllocationRebalancer, cash_flow_builder::CashFlowBuilder,
    goal_funding::GoalFundingCalculator, irr_solver::IrrSolver,
    returns_analytics::ReturnsAnalytics,
};

use errors::CoreError;

/// Main entry point for the portfolio analytics engine.
///
/// Holds validated settings and the components built from them. It never
/// stores portfolio data: every query takes the caller's snapshot and
/// returns a fresh result, so one instance can be shared across threads.
#[must_use]
#[derive(Clone)]
pub struct PortfolioAnalytics {
    settings: AnalyticsSettings,
    cash_flow_builder: CashFlowBuilder,
    irr_solver: IrrSolver,
    returns: ReturnsAnalytics,
    rebalancer: AllocationRebalancer,
    goal_calculator: GoalFundingCalculator,
}

impl std::fmt::Debug for PortfolioAnalytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioAnalytics")
            .field("settings", &self.settings)
            .finish()
    }
}

impl PortfolioAnalytics {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::build(AnalyticsSettings::default())
    }

    /// Create an engine with custom settings. Settings are validated first.
    pub fn with_settings(settings: AnalyticsSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    /// Create an engine from a JSON settings document.
    /// Missing fields fall back to their defaults.
    pub fn from_settings_json(json: &str) -> Result<Self, CoreError> {
        let settings: AnalyticsSettings = serde_json::from_str(json)?;
        Self::with_settings(settings)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// Export the current settings as pretty-printed JSON.
    pub fn settings_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.settings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Set the rebalancing deviation threshold (percentage points).
    pub fn set_rebalance_threshold(&mut self, threshold_pct: f64) -> Result<(), CoreError> {
        self.update_settings(|s| s.rebalance_threshold_pct = threshold_pct)
    }

    /// Set the annual risk-free rate (percent) used by the Sharpe ratio.
    pub fn set_risk_free_rate(&mut self, rate_pct: f64) -> Result<(), CoreError> {
        self.update_settings(|s| s.risk_free_rate_pct = rate_pct)
    }

    /// Set how far out goal completion is projected before it is reported
    /// as beyond the horizon.
    pub fn set_projection_horizon(&mut self, months: u32) -> Result<(), CoreError> {
        self.update_settings(|s| s.goal_projection_horizon_months = months)
    }

    /// Set the annual inflation rate (percent) for inflation-adjusted goals.
    pub fn set_inflation_rate(&mut self, rate_pct: f64) -> Result<(), CoreError> {
        self.update_settings(|s| s.inflation_rate_pct = rate_pct)
    }

    // ── Cash Flows & XIRR ───────────────────────────────────────────

    /// Date-ordered cash flows for one asset, ending with its current value.
    #[must_use]
    pub fn asset_cash_flows(
        &self,
        asset: &Asset,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<CashFlow> {
        self.cash_flow_builder
            .asset_cash_flows(asset, transactions, as_of)
    }

    /// Date-ordered cash flows for the whole portfolio.
    #[must_use]
    pub fn portfolio_cash_flows(
        &self,
        assets: &[Asset],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<CashFlow> {
        self.cash_flow_builder
            .portfolio_cash_flows(assets, transactions, as_of)
    }

    /// XIRR of an arbitrary cash-flow sequence, in percent.
    #[must_use]
    pub fn xirr(&self, cash_flows: &[CashFlow]) -> Option<f64> {
        self.irr_solver
            .solve(cash_flows, self.settings.irr_initial_guess)
    }

    /// XIRR with convergence details.
    #[must_use]
    pub fn xirr_detailed(&self, cash_flows: &[CashFlow]) -> Option<IrrOutcome> {
        self.irr_solver
            .solve_detailed(cash_flows, self.settings.irr_initial_guess)
    }

    /// XIRR of a single asset, in percent.
    #[must_use]
    pub fn asset_xirr(
        &self,
        asset: &Asset,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Option<f64> {
        self.xirr(&self.asset_cash_flows(asset, transactions, as_of))
    }

    /// XIRR of the whole portfolio, in percent.
    #[must_use]
    pub fn portfolio_xirr(
        &self,
        assets: &[Asset],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Option<f64> {
        self.xirr(&self.portfolio_cash_flows(assets, transactions, as_of))
    }

    // ── Returns ─────────────────────────────────────────────────────

    /// Invested value, gain, XIRR and CAGR for one asset.
    #[must_use]
    pub fn asset_performance(
        &self,
        asset: &Asset,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> PerformanceSummary {
        let flows = self.asset_cash_flows(asset, transactions, as_of);
        let xirr = self.xirr(&flows);
        self.returns
            .summarize(&flows, asset.current_value, as_of, xirr)
    }

    /// Invested value, gain, XIRR and CAGR for the whole portfolio.
    #[must_use]
    pub fn portfolio_performance(
        &self,
        assets: &[Asset],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> PerformanceSummary {
        let flows = self.portfolio_cash_flows(assets, transactions, as_of);
        let xirr = self.xirr(&flows);
        let current_value: f64 = assets.iter().map(|a| a.current_value).sum();
        self.returns
            .summarize(&flows, current_value, as_of, xirr)
    }

    /// Volatility and Sharpe ratio from a history of portfolio valuations.
    ///
    /// Simplified Sharpe: the annual `portfolio_return` (percent, e.g. the
    /// XIRR) minus the configured risk-free rate, over the volatility of the
    /// period-to-period returns of `valuations`.
    #[must_use]
    pub fn risk_metrics(&self, valuations: &[f64], portfolio_return: f64) -> RiskMetrics {
        let returns = self.returns.periodic_returns(valuations);
        self.returns
            .risk_metrics(&returns, portfolio_return, self.settings.risk_free_rate_pct)
    }

    /// Direct access to the closed-form return metrics.
    #[must_use]
    pub fn returns(&self) -> &ReturnsAnalytics {
        &self.returns
    }

    // ── Allocation & Rebalancing ────────────────────────────────────

    /// Current value and share per category, largest first.
    #[must_use]
    pub fn current_allocation(&self, assets: &[Asset]) -> Vec<CategoryAllocation> {
        self.rebalancer.current_allocation(assets)
    }

    /// Rebalancing report using the configured threshold.
    #[must_use]
    pub fn rebalance(&self, assets: &[Asset], targets: &[TargetAllocation]) -> RebalancingReport {
        self.rebalancer
            .rebalance(assets, targets, self.settings.rebalance_threshold_pct)
    }

    /// Rebalancing report with an explicit threshold (percentage points).
    #[must_use]
    pub fn rebalance_with_threshold(
        &self,
        assets: &[Asset],
        targets: &[TargetAllocation],
        threshold_pct: f64,
    ) -> RebalancingReport {
        self.rebalancer.rebalance(assets, targets, threshold_pct)
    }

    /// Check a target allocation set (range, duplicates, 100% total).
    pub fn validate_targets(&self, targets: &[TargetAllocation]) -> Result<(), CoreError> {
        self.rebalancer.validate_targets(targets)
    }

    /// Diversification score with recommendations.
    #[must_use]
    pub fn diversification_score(&self, assets: &[Asset]) -> DiversificationScore {
        self.rebalancer.diversification_score(assets)
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Funding projection for one goal.
    #[must_use]
    pub fn evaluate_goal(&self, goal: &Goal, as_of: NaiveDate) -> GoalProjection {
        self.goal_calculator.evaluate(goal, as_of)
    }

    /// Funding projections for several goals, in input order.
    #[must_use]
    pub fn evaluate_goals(&self, goals: &[Goal], as_of: NaiveDate) -> Vec<GoalProjection> {
        self.goal_calculator.evaluate_all(goals, as_of)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Apply a change to a copy of the settings; commit only if it validates.
    fn update_settings(
        &mut self,
        change: impl FnOnce(&mut AnalyticsSettings),
    ) -> Result<(), CoreError> {
        let mut updated = self.settings.clone();
        change(&mut updated);
        updated.validate()?;
        *self = Self::build(updated);
        Ok(())
    }

    fn build(settings: AnalyticsSettings) -> Self {
        let cash_flow_builder = CashFlowBuilder::new();
        let irr_solver = IrrSolver::with_limits(settings.irr_max_iterations, settings.irr_tolerance);
        let returns = ReturnsAnalytics::new();
        let rebalancer = AllocationRebalancer::with_policy(settings.diversification.clone());
        let goal_calculator = GoalFundingCalculator::with_config(
            settings.goal_projection_horizon_months,
            settings.inflation_rate_pct,
        );

        Self {
            settings,
            cash_flow_builder,
            irr_solver,
            returns,
            rebalancer,
            goal_calculator,
        }
    }
}

impl Default for PortfolioAnalytics {
    fn default() -> Self {
        Self::new()
    }
}
