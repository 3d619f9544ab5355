use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::errors::CoreError;
use crate::models::allocation::{
    AssetRef, CategoryAllocation, DiversificationRating, DiversificationScore, RebalanceAction,
    RebalancePriority, RebalancingReport, RebalancingSuggestion, RebalancingTarget,
    TargetAllocation,
};
use crate::models::asset::{Asset, AssetCategory};
use crate::models::settings::DiversificationPolicy;
use crate::services::finite_or_zero;

pub const DEFAULT_THRESHOLD_PCT: f64 = 5.0;

/// Allowed slack when checking that targets add up to 100%.
const TARGET_SUM_TOLERANCE: f64 = 0.01;

/// Compares current against target category allocation and scores
/// diversification.
///
/// Holds only the (immutable) diversification policy; every call is a pure
/// function of its arguments.
#[derive(Debug, Clone, Default)]
pub struct AllocationRebalancer {
    policy: DiversificationPolicy,
}

impl AllocationRebalancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DiversificationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DiversificationPolicy {
        &self.policy
    }

    /// Value and share held in each category, largest first.
    pub fn current_allocation(&self, assets: &[Asset]) -> Vec<CategoryAllocation> {
        let total = total_value(assets);
        let mut allocations: Vec<CategoryAllocation> = group_by_category(assets)
            .into_iter()
            .map(|(category, (value, asset_count))| CategoryAllocation {
                category,
                value,
                percentage: share_of(value, total),
                asset_count,
            })
            .collect();

        allocations.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        allocations
    }

    /// Turn the gap between current and target allocation into suggestions.
    ///
    /// A category whose share deviates from its target by more than
    /// `threshold_pct` points is medium priority, by more than twice that it
    /// is high priority. Everything else is held.
    pub fn rebalance(
        &self,
        assets: &[Asset],
        targets: &[TargetAllocation],
        threshold_pct: f64,
    ) -> RebalancingReport {
        let total = total_value(assets);

        if total <= 0.0 {
            debug!("Rebalance skipped: portfolio has no value");
            return RebalancingReport {
                targets: targets.iter().map(hold_target).collect(),
                suggestions: Vec::new(),
                is_rebalance_needed: false,
                total_value: 0.0,
            };
        }

        // 1. Current allocation per category
        let by_category = group_by_category(assets);

        // 2. Compare each target against what is held
        let rebalancing_targets: Vec<RebalancingTarget> = targets
            .iter()
            .map(|target| {
                let current_value = by_category
                    .get(&target.category)
                    .map(|(value, _)| *value)
                    .unwrap_or(0.0);
                let current_percentage = share_of(current_value, total);
                let target_value = finite_or_zero(total * target.target_percentage / 100.0);
                let difference = target_value - current_value;
                let deviation = (current_percentage - target.target_percentage).abs();

                let priority = classify(deviation, threshold_pct);
                let action = match priority {
                    RebalancePriority::Low => RebalanceAction::Hold,
                    _ if difference > 0.0 => RebalanceAction::Buy,
                    _ => RebalanceAction::Sell,
                };

                RebalancingTarget {
                    category: target.category,
                    target_percentage: target.target_percentage,
                    current_percentage,
                    target_value,
                    current_value,
                    difference,
                    action,
                    priority,
                }
            })
            .collect();

        // 3. One suggestion per category that needs action
        let mut suggestions: Vec<RebalancingSuggestion> = rebalancing_targets
            .iter()
            .filter(|t| t.action != RebalanceAction::Hold)
            .map(|t| self.suggest(t, assets, total))
            .collect();

        // 4. Most urgent first, then largest impact
        suggestions.sort_by(|a, b| {
            a.priority.cmp(&b.priority).then_with(|| {
                b.impact_percentage
                    .partial_cmp(&a.impact_percentage)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        let is_rebalance_needed = rebalancing_targets
            .iter()
            .any(|t| t.priority != RebalancePriority::Low);

        debug!(
            "Rebalance: total value {:.2}, {} targets, {} suggestions",
            total,
            rebalancing_targets.len(),
            suggestions.len()
        );

        RebalancingReport {
            targets: rebalancing_targets,
            suggestions,
            is_rebalance_needed,
            total_value: total,
        }
    }

    /// Check a target allocation set before it is stored.
    ///
    /// Rules:
    /// - At least one target
    /// - Each percentage within 0–100
    /// - No category listed twice
    /// - Percentages add up to 100
    pub fn validate_targets(&self, targets: &[TargetAllocation]) -> Result<(), CoreError> {
        if targets.is_empty() {
            return Err(CoreError::ValidationError(
                "At least one target allocation is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for target in targets {
            if !target.target_percentage.is_finite()
                || !(0.0..=100.0).contains(&target.target_percentage)
            {
                return Err(CoreError::ValidationError(format!(
                    "Target for {} must be between 0 and 100, got {}",
                    target.category, target.target_percentage
                )));
            }
            if !seen.insert(target.category) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate target for {}",
                    target.category
                )));
            }
        }

        let sum: f64 = targets.iter().map(|t| t.target_percentage).sum();
        if (sum - 100.0).abs() > TARGET_SUM_TOLERANCE {
            return Err(CoreError::ValidationError(format!(
                "Target allocations must add up to 100%, got {sum:.2}%"
            )));
        }

        Ok(())
    }

    /// Additive 0–100 score over category spread, category concentration,
    /// equity share and single-asset concentration.
    pub fn diversification_score(&self, assets: &[Asset]) -> DiversificationScore {
        let total = total_value(assets);
        if total <= 0.0 {
            return DiversificationScore {
                score: 0,
                analysis: DiversificationRating::InsufficientData,
                recommendations: vec![
                    "Add assets with a current value to analyze diversification".into(),
                ],
            };
        }

        let policy = &self.policy;
        let by_category = group_by_category(assets);
        let mut score: u32 = 0;
        let mut recommendations = Vec::new();

        // Category spread
        let category_count = by_category.values().filter(|(value, _)| *value > 0.0).count();
        if category_count >= policy.broad_category_count {
            score += u32::from(policy.category_count_points.best);
        } else {
            score += if category_count >= policy.moderate_category_count {
                u32::from(policy.category_count_points.middle)
            } else {
                u32::from(policy.category_count_points.worst)
            };
            recommendations.push(format!(
                "Diversify across more categories: holdings span {category_count} of the {} recommended",
                policy.broad_category_count
            ));
        }

        // Largest category
        if let Some((category, value)) = by_category
            .iter()
            .map(|(category, (value, _))| (*category, *value))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        {
            let share = share_of(value, total);
            if share < policy.category_share_limit_pct {
                score += u32::from(policy.category_share_points.best);
            } else {
                score += if share < policy.category_share_ceiling_pct {
                    u32::from(policy.category_share_points.middle)
                } else {
                    u32::from(policy.category_share_points.worst)
                };
                recommendations.push(format!(
                    "Reduce concentration in {category}: it makes up {share:.1}% of the portfolio, keep any category below {:.0}%",
                    policy.category_share_limit_pct
                ));
            }
        }

        // Equity share
        let equity_value: f64 = by_category
            .iter()
            .filter(|(category, _)| category.is_equity())
            .map(|(_, (value, _))| *value)
            .sum();
        let equity_share = share_of(equity_value, total);
        let (healthy_lo, healthy_hi) = policy.equity_healthy_band;
        let (acceptable_lo, acceptable_hi) = policy.equity_acceptable_band;
        if (healthy_lo..=healthy_hi).contains(&equity_share) {
            score += u32::from(policy.equity_points.best);
        } else {
            score += if (acceptable_lo..=acceptable_hi).contains(&equity_share) {
                u32::from(policy.equity_points.middle)
            } else {
                u32::from(policy.equity_points.worst)
            };
            let direction = if equity_share < healthy_lo {
                "Increase"
            } else {
                "Reduce"
            };
            recommendations.push(format!(
                "{direction} equity exposure (stocks and mutual funds) from {equity_share:.1}% toward the {healthy_lo:.0}% to {healthy_hi:.0}% range"
            ));
        }

        // Largest single asset
        if let Some(largest) = assets.iter().max_by(|a, b| {
            a.current_value
                .partial_cmp(&b.current_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            let share = share_of(largest.current_value.max(0.0), total);
            if share < policy.single_asset_limit_pct {
                score += u32::from(policy.single_asset_points.best);
            } else {
                score += if share < policy.single_asset_ceiling_pct {
                    u32::from(policy.single_asset_points.middle)
                } else {
                    u32::from(policy.single_asset_points.worst)
                };
                recommendations.push(format!(
                    "Reduce reliance on {}: a single holding makes up {share:.1}% of the portfolio, keep each below {:.0}%",
                    largest.name, policy.single_asset_limit_pct
                ));
            }
        }

        let score = score.min(100) as u8;
        DiversificationScore {
            score,
            analysis: rating_for(score),
            recommendations,
        }
    }

    fn suggest(
        &self,
        target: &RebalancingTarget,
        assets: &[Asset],
        total: f64,
    ) -> RebalancingSuggestion {
        let amount = target.difference.abs();
        let representative = pick_representative(
            assets.iter().filter(|a| a.category == target.category),
            target.action,
        );

        let gap = format!(
            "{} is at {:.1}% against a {:.1}% target.",
            target.category, target.current_percentage, target.target_percentage
        );
        let reason = match (target.action, representative) {
            (RebalanceAction::Buy, Some(asset)) => format!(
                "{gap} Add {amount:.2}, preferably to {}, the category's strongest performer.",
                asset.name
            ),
            (RebalanceAction::Buy, None) => {
                format!("{gap} Add {amount:.2} to open a position in this category.")
            }
            (_, Some(asset)) => format!(
                "{gap} Reduce by {amount:.2}, starting with {}, the category's weakest performer.",
                asset.name
            ),
            (_, None) => format!("{gap} Reduce the category by {amount:.2}."),
        };

        RebalancingSuggestion {
            asset: representative.map(|a| AssetRef {
                id: a.id,
                name: a.name.clone(),
            }),
            category: target.category,
            action: target.action,
            amount,
            reason,
            priority: target.priority,
            impact_percentage: share_of(amount, total),
        }
    }
}

fn classify(deviation: f64, threshold_pct: f64) -> RebalancePriority {
    if deviation > threshold_pct * 2.0 {
        RebalancePriority::High
    } else if deviation > threshold_pct {
        RebalancePriority::Medium
    } else {
        RebalancePriority::Low
    }
}

fn rating_for(score: u8) -> DiversificationRating {
    if score >= 80 {
        DiversificationRating::Excellent
    } else if score >= 60 {
        DiversificationRating::Good
    } else if score >= 40 {
        DiversificationRating::Fair
    } else {
        DiversificationRating::Poor
    }
}

/// Best performer when buying, worst when selling. Ties keep the earliest
/// asset so the choice is deterministic.
fn pick_representative<'a>(
    candidates: impl Iterator<Item = &'a Asset>,
    action: RebalanceAction,
) -> Option<&'a Asset> {
    let mut chosen: Option<(&Asset, f64)> = None;
    for asset in candidates {
        if action == RebalanceAction::Sell && asset.current_value <= 0.0 {
            continue;
        }
        let perf = asset.performance().unwrap_or(0.0);
        let better = match chosen {
            None => true,
            Some((_, current)) => match action {
                RebalanceAction::Buy => perf > current,
                RebalanceAction::Sell => perf < current,
                RebalanceAction::Hold => false,
            },
        };
        if better {
            chosen = Some((asset, perf));
        }
    }
    chosen.map(|(asset, _)| asset)
}

fn hold_target(target: &TargetAllocation) -> RebalancingTarget {
    RebalancingTarget {
        category: target.category,
        target_percentage: target.target_percentage,
        current_percentage: 0.0,
        target_value: 0.0,
        current_value: 0.0,
        difference: 0.0,
        action: RebalanceAction::Hold,
        priority: RebalancePriority::Low,
    }
}

/// `(value, asset count)` per category, negative values counted as zero.
fn group_by_category(assets: &[Asset]) -> BTreeMap<AssetCategory, (f64, usize)> {
    let mut grouped: BTreeMap<AssetCategory, (f64, usize)> = BTreeMap::new();
    for asset in assets {
        let entry = grouped.entry(asset.category).or_insert((0.0, 0));
        entry.0 += asset.current_value.max(0.0);
        entry.1 += 1;
    }
    grouped
}

fn total_value(assets: &[Asset]) -> f64 {
    finite_or_zero(assets.iter().map(|a| a.current_value.max(0.0)).sum())
}

fn share_of(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        finite_or_zero(value / total * 100.0)
    }
}
