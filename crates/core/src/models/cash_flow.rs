use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated, signed amount of money.
///
/// Negative = capital paid in (purchase, SIP installment).
/// Positive = capital received or still held (redemption, current value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    /// A capital outflow from the investor (stored negative).
    pub fn investment(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, -amount.abs())
    }

    /// A capital inflow to the investor (stored positive).
    pub fn proceeds(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, amount.abs())
    }
}

/// Whether a sequence contains at least one positive and one negative flow.
/// Sequences without a sign change have no finite rate of return.
pub fn has_sign_change(flows: &[CashFlow]) -> bool {
    let has_negative = flows.iter().any(|cf| cf.amount < 0.0);
    let has_positive = flows.iter().any(|cf| cf.amount > 0.0);
    has_negative && has_positive
}
