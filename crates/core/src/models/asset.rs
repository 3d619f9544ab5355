use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category of a tracked asset.
///
/// The set is closed: it drives allocation targets, the equity/debt split
/// used by the diversification score, and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Listed equities
    Stocks,
    /// Mutual fund units (treated as equity exposure)
    MutualFunds,
    /// Bank fixed deposits
    FixedDeposit,
    /// Physical or paper gold
    Gold,
    /// Cash and savings balances
    Cash,
    /// Anything that does not fit another category
    Other,
    /// Employees' Provident Fund
    Epf,
}

impl AssetCategory {
    /// Every category, in declaration order.
    pub const ALL: [AssetCategory; 7] = [
        AssetCategory::Stocks,
        AssetCategory::MutualFunds,
        AssetCategory::FixedDeposit,
        AssetCategory::Gold,
        AssetCategory::Cash,
        AssetCategory::Other,
        AssetCategory::Epf,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Stocks => "Stocks",
            AssetCategory::MutualFunds => "Mutual Funds",
            AssetCategory::FixedDeposit => "Fixed Deposit",
            AssetCategory::Gold => "Gold",
            AssetCategory::Cash => "Cash",
            AssetCategory::Other => "Other",
            AssetCategory::Epf => "EPF",
        }
    }

    /// Whether holdings in this category count towards equity exposure.
    pub fn is_equity(&self) -> bool {
        matches!(self, AssetCategory::Stocks | AssetCategory::MutualFunds)
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One installment of a systematic investment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipContribution {
    pub date: NaiveDate,

    /// Amount invested (always positive)
    pub amount: f64,
}

/// A snapshot of a held asset, as supplied by the application.
///
/// The engine only ever reads assets; creation and edits belong to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier
    pub id: Uuid,

    /// Display name (e.g., "Nifty 50 Index Fund")
    pub name: String,

    pub category: AssetCategory,

    /// Market value today (non-negative)
    pub current_value: f64,

    /// Total amount originally paid, if known
    #[serde(default)]
    pub purchase_value: Option<f64>,

    /// Date of the original purchase, if known
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,

    /// SIP installments, oldest first
    #[serde(default)]
    pub sip_contributions: Vec<SipContribution>,
}

impl Asset {
    pub fn new(name: impl Into<String>, category: AssetCategory, current_value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            current_value,
            purchase_value: None,
            purchase_date: None,
            sip_contributions: Vec::new(),
        }
    }

    /// Attach the original purchase value and date.
    pub fn with_purchase(mut self, purchase_value: f64, purchase_date: NaiveDate) -> Self {
        self.purchase_value = Some(purchase_value);
        self.purchase_date = Some(purchase_date);
        self
    }

    /// Append one SIP installment.
    pub fn with_sip(mut self, date: NaiveDate, amount: f64) -> Self {
        self.sip_contributions.push(SipContribution { date, amount });
        self
    }

    /// Relative gain since purchase: `(current - purchase) / purchase`.
    ///
    /// `None` when no positive purchase value is recorded.
    pub fn performance(&self) -> Option<f64> {
        match self.purchase_value {
            Some(purchase) if purchase > 0.0 => {
                let perf = (self.current_value - purchase) / purchase;
                perf.is_finite().then_some(perf)
            }
            _ => None,
        }
    }
}
