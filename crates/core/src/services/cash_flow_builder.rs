use chrono::NaiveDate;
use log::debug;

use crate::models::asset::Asset;
use crate::models::cash_flow::CashFlow;
use crate::models::transaction::Transaction;

/// Projects asset and transaction records into date-ordered cash flows.
///
/// Pure business logic with no I/O and nothing cached.
#[derive(Debug, Clone, Default)]
pub struct CashFlowBuilder;

impl CashFlowBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Cash flows for a single asset, ending with its current value on `as_of`.
    ///
    /// Purchases, SIP transactions and the asset's own SIP installments are
    /// negative flows; redemptions and dividends are positive. Records dated
    /// after `as_of` are ignored.
    pub fn asset_cash_flows(
        &self,
        asset: &Asset,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<CashFlow> {
        let mut flows = self.investment_flows(asset, transactions, as_of);
        flows.push(CashFlow::proceeds(as_of, asset.current_value));
        sort_by_date(&mut flows);
        debug!(
            "Built {} cash flows for asset '{}' as of {}",
            flows.len(),
            asset.name,
            as_of
        );
        flows
    }

    /// Cash flows for the whole portfolio.
    ///
    /// Investment flows of every asset are merged; the single terminal flow
    /// on `as_of` is the summed current value of all assets.
    pub fn portfolio_cash_flows(
        &self,
        assets: &[Asset],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<CashFlow> {
        let mut flows: Vec<CashFlow> = assets
            .iter()
            .flat_map(|asset| self.investment_flows(asset, transactions, as_of))
            .collect();

        let total_value: f64 = assets.iter().map(|a| a.current_value).sum();
        flows.push(CashFlow::proceeds(as_of, total_value));
        sort_by_date(&mut flows);
        debug!(
            "Built {} portfolio cash flows across {} assets (total value {:.2})",
            flows.len(),
            assets.len(),
            total_value
        );
        flows
    }

    /// Total capital paid in: the magnitude of every negative flow.
    pub fn invested_amount(&self, flows: &[CashFlow]) -> f64 {
        flows
            .iter()
            .filter(|cf| cf.amount < 0.0)
            .map(|cf| -cf.amount)
            .sum()
    }

    /// Every capital movement of `asset` up to `as_of`, without the terminal
    /// valuation. Falls back to the purchase pair when nothing else is recorded.
    fn investment_flows(
        &self,
        asset: &Asset,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<CashFlow> {
        let mut flows: Vec<CashFlow> = transactions
            .iter()
            .filter(|t| t.is_investment_in(asset.id) && t.date <= as_of)
            .map(|t| {
                if t.transaction_type.is_contribution() {
                    CashFlow::investment(t.date, t.amount)
                } else {
                    CashFlow::proceeds(t.date, t.amount)
                }
            })
            .collect();

        flows.extend(
            asset
                .sip_contributions
                .iter()
                .filter(|sip| sip.date <= as_of)
                .map(|sip| CashFlow::investment(sip.date, sip.amount)),
        );

        if flows.is_empty() {
            if let (Some(value), Some(date)) = (asset.purchase_value, asset.purchase_date) {
                if value > 0.0 && date <= as_of {
                    flows.push(CashFlow::investment(date, value));
                }
            }
        }

        flows
    }
}

/// Stable sort keeps same-day flows in the order they were recorded.
fn sort_by_date(flows: &mut [CashFlow]) {
    flows.sort_by_key(|cf| cf.date);
}
