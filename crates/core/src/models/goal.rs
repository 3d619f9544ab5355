use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal as tracked by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,

    /// Amount to accumulate, in today's money if `is_inflation_adjusted`
    pub target_amount: f64,

    /// Amount saved so far
    pub current_amount: f64,

    pub target_date: NaiveDate,

    /// What the user currently puts aside each month
    pub monthly_contribution: f64,

    /// Expected annual return of the savings, in percent (12.0 = 12%)
    pub expected_return_rate: f64,

    /// Grow the target with inflation until the target date
    #[serde(default)]
    pub is_inflation_adjusted: bool,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: f64, target_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            target_date,
            monthly_contribution: 0.0,
            expected_return_rate: 0.0,
            is_inflation_adjusted: false,
        }
    }

    pub fn with_current_amount(mut self, current_amount: f64) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn with_monthly_contribution(mut self, monthly_contribution: f64) -> Self {
        self.monthly_contribution = monthly_contribution;
        self
    }

    pub fn with_expected_return(mut self, expected_return_rate: f64) -> Self {
        self.expected_return_rate = expected_return_rate;
        self
    }

    pub fn inflation_adjusted(mut self) -> Self {
        self.is_inflation_adjusted = true;
        self
    }
}

/// Where a goal stands on a given evaluation date.
///
/// Recomputed from scratch on every evaluation; nothing is carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Current contributions finish at least a month before the target date
    Ahead,
    /// Current contributions finish by the target date
    OnTrack,
    /// Current contributions finish after the target date, or never
    Behind,
    /// Saved amount already covers the target
    Completed,
    /// Target date has passed and the goal is not complete
    Overdue,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Ahead => write!(f, "Ahead"),
            GoalStatus::OnTrack => write!(f, "On track"),
            GoalStatus::Behind => write!(f, "Behind"),
            GoalStatus::Completed => write!(f, "Completed"),
            GoalStatus::Overdue => write!(f, "Overdue"),
        }
    }
}

/// When the goal completes at the current contribution rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionProjection {
    /// Completes after `months` more months, around `date`
    Within { months: u32, date: NaiveDate },
    /// Completes, but later than the configured projection horizon
    BeyondHorizon,
    /// Never completes at the current rate (e.g. nothing saved, nothing contributed)
    Unreachable,
}

/// Full funding picture for one goal on one evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    pub goal_id: Uuid,
    pub as_of: NaiveDate,
    pub status: GoalStatus,

    /// `current_amount / effective_target × 100`, capped at 100
    pub progress_pct: f64,

    /// Target after optional inflation adjustment
    pub effective_target: f64,

    /// `ceil(days_remaining / 30)`, at least 1
    pub months_remaining: u32,

    /// Current balance compounded to the target date
    pub future_value_of_current: f64,

    /// What contributions still have to cover
    pub remaining_amount: f64,

    pub required_monthly_contribution: f64,

    /// How much more per month is needed than is contributed today
    pub contribution_gap: f64,

    pub projected_completion: CompletionProjection,
}
