use chrono::{Months, NaiveDate};
use log::debug;

use crate::models::goal::{CompletionProjection, Goal, GoalProjection, GoalStatus};
use crate::services::finite_or_zero;
use crate::services::irr_solver::DAYS_PER_YEAR;

/// Month length used when converting day counts to months.
pub const DAYS_PER_MONTH: i64 = 30;

pub const DEFAULT_HORIZON_MONTHS: u32 = 120;

/// Monthly rates closer to zero than this use straight-line math.
const ZERO_RATE_EPSILON: f64 = 1e-9;

/// Slack when comparing a projected completion against the months remaining.
const MONTH_TOLERANCE: f64 = 1e-6;

/// Compound-growth funding math for savings goals.
///
/// Monthly compounding at `expected_return_rate / 12`. Contributions are paid
/// at the end of each month (ordinary annuity).
#[derive(Debug, Clone)]
pub struct GoalFundingCalculator {
    horizon_months: u32,
    inflation_rate_pct: f64,
}

impl GoalFundingCalculator {
    pub fn new() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            inflation_rate_pct: 6.0,
        }
    }

    pub fn with_config(horizon_months: u32, inflation_rate_pct: f64) -> Self {
        Self {
            horizon_months: horizon_months.max(1),
            inflation_rate_pct,
        }
    }

    /// Evaluate a goal as of `as_of`.
    ///
    /// Status follows:
    /// - `Completed` once the saved amount covers the (effective) target
    /// - `Overdue` when the target date has passed without completion
    /// - otherwise `Ahead` / `OnTrack` / `Behind`, comparing when the current
    ///   contribution would finish against the months remaining
    pub fn evaluate(&self, goal: &Goal, as_of: NaiveDate) -> GoalProjection {
        let months_remaining = self.months_remaining(goal.target_date, as_of);
        let n = f64::from(months_remaining);
        let monthly_rate = finite_or_zero(goal.expected_return_rate) / 100.0 / 12.0;
        let current = finite_or_zero(goal.current_amount).max(0.0);
        let contribution = finite_or_zero(goal.monthly_contribution).max(0.0);

        let effective_target = self.effective_target(goal, as_of);
        let progress_pct = if effective_target <= 0.0 {
            100.0
        } else {
            finite_or_zero(current / effective_target * 100.0).min(100.0)
        };

        let future_value_of_current = finite_or_zero(current * (1.0 + monthly_rate).powf(n));
        let remaining_amount = (effective_target - future_value_of_current).max(0.0);
        let required_monthly_contribution =
            self.required_monthly_contribution(remaining_amount, monthly_rate, months_remaining);

        let months_to_complete =
            self.months_to_complete(effective_target, current, contribution, monthly_rate);

        let status = if progress_pct >= 100.0 {
            GoalStatus::Completed
        } else if as_of > goal.target_date {
            GoalStatus::Overdue
        } else {
            match months_to_complete {
                Some(m) if m <= n - 1.0 => GoalStatus::Ahead,
                Some(m) if m <= n + MONTH_TOLERANCE => GoalStatus::OnTrack,
                _ => GoalStatus::Behind,
            }
        };

        let projected_completion = match months_to_complete {
            None => CompletionProjection::Unreachable,
            Some(m) if m > f64::from(self.horizon_months) => CompletionProjection::BeyondHorizon,
            Some(m) => {
                // Within the horizon, so the rounded count fits in u32.
                let months = m.ceil().max(0.0) as u32;
                CompletionProjection::Within {
                    months,
                    date: as_of
                        .checked_add_months(Months::new(months))
                        .unwrap_or(as_of),
                }
            }
        };

        debug!(
            "Goal '{}': {} ({:.1}% saved, {} months left, required {:.2}/month)",
            goal.name, status, progress_pct, months_remaining, required_monthly_contribution
        );

        GoalProjection {
            goal_id: goal.id,
            as_of,
            status,
            progress_pct,
            effective_target,
            months_remaining,
            future_value_of_current,
            remaining_amount,
            required_monthly_contribution,
            contribution_gap: (required_monthly_contribution - contribution).max(0.0),
            projected_completion,
        }
    }

    /// Evaluate several goals against the same date, preserving order.
    pub fn evaluate_all(&self, goals: &[Goal], as_of: NaiveDate) -> Vec<GoalProjection> {
        goals.iter().map(|goal| self.evaluate(goal, as_of)).collect()
    }

    /// `ceil(days_remaining / 30)`, never less than 1.
    pub fn months_remaining(&self, target_date: NaiveDate, as_of: NaiveDate) -> u32 {
        let days = (target_date - as_of).num_days();
        if days <= 0 {
            return 1;
        }
        let months = (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
        u32::try_from(months).unwrap_or(u32::MAX).max(1)
    }

    /// Monthly payment that grows to `remaining` after `months` payments.
    ///
    /// `remaining × r / ((1 + r)^n - 1)`, or `remaining / n` at a zero rate.
    pub fn required_monthly_contribution(&self, remaining: f64, monthly_rate: f64, months: u32) -> f64 {
        if remaining <= 0.0 {
            return 0.0;
        }
        let n = f64::from(months.max(1));
        if monthly_rate.abs() < ZERO_RATE_EPSILON {
            return finite_or_zero(remaining / n);
        }
        let growth = (1.0 + monthly_rate).powf(n) - 1.0;
        if growth == 0.0 {
            return finite_or_zero(remaining / n);
        }
        finite_or_zero(remaining * monthly_rate / growth)
    }

    /// Months until `current` plus `contribution` per month reaches `target`.
    ///
    /// Inverts `current × (1+r)^m + c × ((1+r)^m - 1) / r = target`:
    ///
    /// ```text
    /// m = ln((target·r + c) / (current·r + c)) / ln(1 + r)
    /// ```
    ///
    /// which for an empty balance is `ln(1 + target·r / c) / ln(1 + r)`.
    /// `None` when the target is never reached.
    pub fn months_to_complete(
        &self,
        target: f64,
        current: f64,
        contribution: f64,
        monthly_rate: f64,
    ) -> Option<f64> {
        if current >= target {
            return Some(0.0);
        }

        if monthly_rate.abs() < ZERO_RATE_EPSILON {
            if contribution <= 0.0 {
                return None;
            }
            let months = (target - current) / contribution;
            return months.is_finite().then_some(months);
        }

        if 1.0 + monthly_rate <= 0.0 {
            return None;
        }

        let numerator = target * monthly_rate + contribution;
        let denominator = current * monthly_rate + contribution;
        if numerator <= 0.0 || denominator <= 0.0 {
            return None;
        }

        let months = (numerator / denominator).ln() / (1.0 + monthly_rate).ln();
        (months.is_finite() && months >= 0.0).then_some(months)
    }

    /// Target grown by inflation until the target date, when requested.
    fn effective_target(&self, goal: &Goal, as_of: NaiveDate) -> f64 {
        let target = finite_or_zero(goal.target_amount);
        if !goal.is_inflation_adjusted {
            return target;
        }
        let days = (goal.target_date - as_of).num_days();
        if days <= 0 {
            return target;
        }
        let years = days as f64 / DAYS_PER_YEAR;
        let adjusted = target * (1.0 + self.inflation_rate_pct / 100.0).powf(years);
        if adjusted.is_finite() {
            adjusted
        } else {
            target
        }
    }
}

impl Default for GoalFundingCalculator {
    fn default() -> Self {
        Self::new()
    }
}
