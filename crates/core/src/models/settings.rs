use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Tunable knobs for the analytics engine.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Deviation (percentage points) above which a category needs rebalancing.
    /// Twice this value marks a high-priority deviation.
    pub rebalance_threshold_pct: f64,

    /// Annual risk-free rate in percent, used by the Sharpe ratio.
    pub risk_free_rate_pct: f64,

    /// Starting rate for the XIRR solver, as a fraction (0.10 = 10%).
    pub irr_initial_guess: f64,

    /// Newton-Raphson iteration cap.
    pub irr_max_iterations: usize,

    /// Convergence tolerance on both the NPV and the step size.
    pub irr_tolerance: f64,

    /// Completion projections further out than this are reported as
    /// beyond the horizon.
    pub goal_projection_horizon_months: u32,

    /// Annual inflation in percent, applied to inflation-adjusted goals.
    pub inflation_rate_pct: f64,

    pub diversification: DiversificationPolicy,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            rebalance_threshold_pct: 5.0,
            risk_free_rate_pct: 6.0,
            irr_initial_guess: 0.10,
            irr_max_iterations: 100,
            irr_tolerance: 1e-6,
            goal_projection_horizon_months: 120,
            inflation_rate_pct: 6.0,
            diversification: DiversificationPolicy::default(),
        }
    }
}

impl AnalyticsSettings {
    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.rebalance_threshold_pct.is_finite()
            || self.rebalance_threshold_pct <= 0.0
            || self.rebalance_threshold_pct > 100.0
        {
            return Err(CoreError::InvalidSettings(format!(
                "rebalance_threshold_pct must be in (0, 100], got {}",
                self.rebalance_threshold_pct
            )));
        }
        if !self.risk_free_rate_pct.is_finite() {
            return Err(CoreError::InvalidSettings(
                "risk_free_rate_pct must be a finite number".into(),
            ));
        }
        if !self.irr_initial_guess.is_finite() || self.irr_initial_guess <= -1.0 {
            return Err(CoreError::InvalidSettings(format!(
                "irr_initial_guess must be greater than -1, got {}",
                self.irr_initial_guess
            )));
        }
        if self.irr_max_iterations == 0 {
            return Err(CoreError::InvalidSettings(
                "irr_max_iterations must be at least 1".into(),
            ));
        }
        if !self.irr_tolerance.is_finite() || self.irr_tolerance <= 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "irr_tolerance must be positive, got {}",
                self.irr_tolerance
            )));
        }
        if self.goal_projection_horizon_months == 0 {
            return Err(CoreError::InvalidSettings(
                "goal_projection_horizon_months must be at least 1".into(),
            ));
        }
        if !self.inflation_rate_pct.is_finite() || self.inflation_rate_pct <= -100.0 {
            return Err(CoreError::InvalidSettings(format!(
                "inflation_rate_pct must be greater than -100, got {}",
                self.inflation_rate_pct
            )));
        }
        self.diversification.validate()
    }
}

/// Points awarded for hitting the best, middle, or worst tier of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPoints {
    pub best: u8,
    pub middle: u8,
    pub worst: u8,
}

impl TierPoints {
    pub const fn new(best: u8, middle: u8, worst: u8) -> Self {
        Self {
            best,
            middle,
            worst,
        }
    }
}

/// Breakpoints for the additive diversification score.
///
/// The defaults are product heuristics; they add up to a maximum of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversificationPolicy {
    /// Categories needed for the best tier (default 5)
    pub broad_category_count: usize,
    /// Categories needed for the middle tier (default 3)
    pub moderate_category_count: usize,
    pub category_count_points: TierPoints,

    /// Largest category share must stay below this for the best tier (default 50%)
    pub category_share_limit_pct: f64,
    /// ...and below this for the middle tier (default 70%)
    pub category_share_ceiling_pct: f64,
    pub category_share_points: TierPoints,

    /// Inclusive equity band for the best tier (default 40–80%)
    pub equity_healthy_band: (f64, f64),
    /// Inclusive equity band for the middle tier (default 30–90%)
    pub equity_acceptable_band: (f64, f64),
    pub equity_points: TierPoints,

    /// Largest single asset must stay below this for the best tier (default 20%)
    pub single_asset_limit_pct: f64,
    /// ...and below this for the middle tier (default 30%)
    pub single_asset_ceiling_pct: f64,
    pub single_asset_points: TierPoints,
}

impl Default for DiversificationPolicy {
    fn default() -> Self {
        Self {
            broad_category_count: 5,
            moderate_category_count: 3,
            category_count_points: TierPoints::new(30, 20, 10),
            category_share_limit_pct: 50.0,
            category_share_ceiling_pct: 70.0,
            category_share_points: TierPoints::new(25, 15, 5),
            equity_healthy_band: (40.0, 80.0),
            equity_acceptable_band: (30.0, 90.0),
            equity_points: TierPoints::new(25, 15, 5),
            single_asset_limit_pct: 20.0,
            single_asset_ceiling_pct: 30.0,
            single_asset_points: TierPoints::new(20, 10, 0),
        }
    }
}

impl DiversificationPolicy {
    /// Highest score the policy can award.
    pub fn max_score(&self) -> u32 {
        [
            self.category_count_points,
            self.category_share_points,
            self.equity_points,
            self.single_asset_points,
        ]
        .iter()
        .map(|p| u32::from(p.best))
        .sum()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.moderate_category_count > self.broad_category_count {
            return Err(CoreError::InvalidSettings(
                "moderate_category_count must not exceed broad_category_count".into(),
            ));
        }
        if self.category_share_limit_pct > self.category_share_ceiling_pct {
            return Err(CoreError::InvalidSettings(
                "category_share_limit_pct must not exceed category_share_ceiling_pct".into(),
            ));
        }
        if self.single_asset_limit_pct > self.single_asset_ceiling_pct {
            return Err(CoreError::InvalidSettings(
                "single_asset_limit_pct must not exceed single_asset_ceiling_pct".into(),
            ));
        }
        let (healthy_lo, healthy_hi) = self.equity_healthy_band;
        let (acceptable_lo, acceptable_hi) = self.equity_acceptable_band;
        if healthy_lo > healthy_hi || acceptable_lo > healthy_lo || acceptable_hi < healthy_hi {
            return Err(CoreError::InvalidSettings(
                "equity_acceptable_band must contain equity_healthy_band".into(),
            ));
        }
        if self.max_score() > 100 {
            return Err(CoreError::InvalidSettings(format!(
                "diversification points add up to {}, which exceeds 100",
                self.max_score()
            )));
        }
        Ok(())
    }
}
