use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::AssetCategory;

/// Desired share of the portfolio for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub category: AssetCategory,

    /// Target share of total portfolio value, 0–100
    pub target_percentage: f64,
}

impl TargetAllocation {
    pub fn new(category: AssetCategory, target_percentage: f64) -> Self {
        Self {
            category,
            target_percentage,
        }
    }
}

/// Current share of the portfolio held in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: AssetCategory,

    /// Summed current value of the category's assets
    pub value: f64,

    /// Share of total portfolio value, 0–100
    pub percentage: f64,

    /// Number of assets in the category
    pub asset_count: usize,
}

/// What to do with a category to move it toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceAction {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RebalanceAction::Buy => write!(f, "Buy"),
            RebalanceAction::Sell => write!(f, "Sell"),
            RebalanceAction::Hold => write!(f, "Hold"),
        }
    }
}

/// How urgently a category needs rebalancing.
///
/// Ordering is by urgency: `High < Medium < Low`, so an ascending sort puts
/// the most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalancePriority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for RebalancePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RebalancePriority::High => write!(f, "High"),
            RebalancePriority::Medium => write!(f, "Medium"),
            RebalancePriority::Low => write!(f, "Low"),
        }
    }
}

/// Current vs. target comparison for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingTarget {
    pub category: AssetCategory,
    pub target_percentage: f64,
    pub current_percentage: f64,
    pub target_value: f64,
    pub current_value: f64,

    /// `target_value - current_value`; positive means under-allocated
    pub difference: f64,

    pub action: RebalanceAction,
    pub priority: RebalancePriority,
}

/// Lightweight pointer to the asset a suggestion refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: Uuid,
    pub name: String,
}

/// A concrete buy/sell recommendation for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingSuggestion {
    /// Representative asset to trade; `None` when the category holds nothing yet
    pub asset: Option<AssetRef>,

    pub category: AssetCategory,
    pub action: RebalanceAction,

    /// Money to move (always positive)
    pub amount: f64,

    pub reason: String,
    pub priority: RebalancePriority,

    /// `amount` as a percentage of total portfolio value
    pub impact_percentage: f64,
}

/// Result of one rebalancing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingReport {
    /// One entry per requested target, in request order
    pub targets: Vec<RebalancingTarget>,

    /// Sorted by priority, then impact (largest first)
    pub suggestions: Vec<RebalancingSuggestion>,

    pub is_rebalance_needed: bool,
    pub total_value: f64,
}

/// Qualitative reading of a diversification score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversificationRating {
    Excellent,
    Good,
    Fair,
    Poor,
    /// Nothing to score (no assets or zero total value)
    InsufficientData,
}

impl std::fmt::Display for DiversificationRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiversificationRating::Excellent => write!(f, "Excellent"),
            DiversificationRating::Good => write!(f, "Good"),
            DiversificationRating::Fair => write!(f, "Fair"),
            DiversificationRating::Poor => write!(f, "Poor"),
            DiversificationRating::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// Heuristic 0–100 diversification index with actionable advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationScore {
    pub score: u8,
    pub analysis: DiversificationRating,

    /// One entry per missed scoring tier, in criterion order
    pub recommendations: Vec<String>,
}
