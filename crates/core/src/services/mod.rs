pub mod allocation_rebalancer;
pub mod cash_flow_builder;
pub mod goal_funding;
pub mod irr_solver;
pub mod returns_analytics;

/// Replace `NaN` and infinities with 0 so they never reach the caller.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
