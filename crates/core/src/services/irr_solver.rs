//! Annualized internal rate of return for irregularly dated cash flows (XIRR).
//!
//! Solves for the rate `r` that zeroes the net present value:
//!
//! ```text
//! f(r)  = Σ CF_i / (1 + r)^t_i                    = 0
//! f'(r) = Σ -t_i × CF_i / (1 + r)^(t_i + 1)
//!
//! r_next = r - f(r) / f'(r)                        (Newton-Raphson)
//! ```
//!
//! `t_i` is the distance in years (days / 365.25) from the earliest flow.
//!
//! When the iteration cap is hit or the derivative goes flat, the current
//! estimate is returned and flagged as not converged. An approximate rate is
//! more useful on a dashboard than no rate at all.

use log::{debug, warn};

use crate::models::cash_flow::{has_sign_change, CashFlow};
use crate::models::returns::IrrOutcome;

/// Average year length used to turn day counts into year fractions.
pub const DAYS_PER_YEAR: f64 = 365.25;

pub const DEFAULT_INITIAL_GUESS: f64 = 0.10;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Iterates never go below this: `(1 + r)^t` is undefined for `r <= -1`.
const MIN_RATE: f64 = -0.9999;

/// Newton-Raphson XIRR solver. Stateless apart from its limits.
#[derive(Debug, Clone)]
pub struct IrrSolver {
    max_iterations: usize,
    tolerance: f64,
}

impl IrrSolver {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_limits(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            tolerance,
        }
    }

    /// Annualized rate in percent, or `None` when no rate can be derived.
    ///
    /// `initial_guess` is a fraction (0.10 = 10%). Flows do not need to be
    /// sorted; times are measured from the earliest date.
    pub fn solve(&self, cash_flows: &[CashFlow], initial_guess: f64) -> Option<f64> {
        self.solve_detailed(cash_flows, initial_guess)
            .map(|outcome| outcome.rate_percent)
    }

    /// Like [`solve`](Self::solve), but also reports whether the solver
    /// converged and how many iterations it took.
    ///
    /// Returns `None` for fewer than two flows, for sequences without a sign
    /// change, or when the estimate is not a finite number.
    pub fn solve_detailed(&self, cash_flows: &[CashFlow], initial_guess: f64) -> Option<IrrOutcome> {
        if cash_flows.len() < 2 {
            debug!("XIRR: need at least 2 cash flows, got {}", cash_flows.len());
            return None;
        }
        if !has_sign_change(cash_flows) {
            debug!("XIRR: cash flows have no sign change, no rate exists");
            return None;
        }

        let origin = cash_flows.iter().map(|cf| cf.date).min()?;
        let series: Vec<(f64, f64)> = cash_flows
            .iter()
            .map(|cf| {
                let years = (cf.date - origin).num_days() as f64 / DAYS_PER_YEAR;
                (cf.amount, years)
            })
            .collect();

        let mut rate = if initial_guess.is_finite() && initial_guess > MIN_RATE {
            initial_guess
        } else {
            DEFAULT_INITIAL_GUESS
        };

        for iteration in 0..self.max_iterations {
            let (npv, dnpv) = npv_and_derivative(&series, rate);

            if !npv.is_finite() || !dnpv.is_finite() {
                warn!("XIRR: NPV overflowed at rate {rate}, returning last estimate");
                return outcome(rate, false, iteration);
            }

            if npv.abs() < self.tolerance {
                return outcome(rate, true, iteration);
            }

            if dnpv.abs() < self.tolerance {
                warn!("XIRR: derivative vanished at rate {rate}, returning best estimate");
                return outcome(rate, false, iteration);
            }

            let next = (rate - npv / dnpv).max(MIN_RATE);

            if (next - rate).abs() < self.tolerance {
                // A step pinned at the lower bound is not a root.
                return outcome(next, next > MIN_RATE, iteration + 1);
            }

            rate = next;
        }

        warn!(
            "XIRR: no convergence after {} iterations, returning best estimate {rate}",
            self.max_iterations
        );
        outcome(rate, false, self.max_iterations)
    }
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// NPV and its analytic derivative at `rate` for `(amount, years)` pairs.
fn npv_and_derivative(series: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (amount, years) in series {
        let discount = base.powf(*years);
        npv += amount / discount;
        dnpv -= years * amount / (discount * base);
    }

    (npv, dnpv)
}

fn outcome(rate: f64, converged: bool, iterations: usize) -> Option<IrrOutcome> {
    let rate_percent = rate * 100.0;
    rate_percent.is_finite().then_some(IrrOutcome {
        rate_percent,
        converged,
        iterations,
    })
}
