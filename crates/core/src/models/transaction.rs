use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of money movement recorded by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Lump-sum purchase of an asset
    Purchase,
    /// Systematic investment plan installment
    Sip,
    /// Sale or redemption of (part of) an asset
    Redemption,
    /// Dividend or interest paid out by an asset
    Dividend,
    /// Ordinary household income, not tied to an investment
    Income,
    /// Ordinary household spending, not tied to an investment
    Expense,
}

impl TransactionType {
    /// Capital flowing into an investment.
    pub fn is_contribution(&self) -> bool {
        matches!(self, TransactionType::Purchase | TransactionType::Sip)
    }

    /// Capital flowing back out of an investment.
    pub fn is_distribution(&self) -> bool {
        matches!(self, TransactionType::Redemption | TransactionType::Dividend)
    }

    /// Whether this type contributes to investment cash flows at all.
    pub fn is_investment(&self) -> bool {
        self.is_contribution() || self.is_distribution()
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Purchase => write!(f, "Purchase"),
            TransactionType::Sip => write!(f, "SIP"),
            TransactionType::Redemption => write!(f, "Redemption"),
            TransactionType::Dividend => write!(f, "Dividend"),
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single recorded transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,

    /// The asset this transaction belongs to, if any
    #[serde(default)]
    pub asset_id: Option<Uuid>,

    pub transaction_type: TransactionType,

    /// Amount of money moved (always positive; direction comes from the type)
    pub amount: f64,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        asset_id: Option<Uuid>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id,
            transaction_type,
            amount,
            date,
            description: None,
        }
    }

    /// Shorthand for a transaction recorded against an asset.
    pub fn for_asset(
        transaction_type: TransactionType,
        asset_id: Uuid,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self::new(transaction_type, Some(asset_id), amount, date)
    }

    /// Whether this transaction moves capital in or out of `asset_id`.
    pub fn is_investment_in(&self, asset_id: Uuid) -> bool {
        self.asset_id == Some(asset_id) && self.transaction_type.is_investment()
    }
}
