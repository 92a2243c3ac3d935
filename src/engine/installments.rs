//! Installment simulator
//!
//! The quoted price carries the anchor tier's fee. Every other payment
//! option is derived from the cash price recovered by stripping that fee.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::pricing::{gross_up, strip_fee};
use crate::entities::card_rate::{anchor_fee, CardRateTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub installments: u32,
    pub fee_percent: f64,
    /// Amount charged over all installments
    pub total: f64,
    pub installment_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentTable {
    pub sales_price: f64,
    pub anchor_fee: f64,
    pub cash_price: f64,
    pub rows: Vec<InstallmentRow>,
}

/// Build the installment table for an anchor sales price
///
/// Rows are ordered by installment count. Tiers whose fee would consume
/// the whole amount are left out.
pub fn simulate(sales_price: f64, tiers: &[CardRateTier]) -> InstallmentTable {
    let anchor = anchor_fee(tiers);
    let cash_price = strip_fee(sales_price, anchor);

    let mut sorted: Vec<&CardRateTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.installments);

    let rows = sorted
        .into_iter()
        .filter(|t| {
            let usable = t.installments > 0 && t.fee_percent < 100.0;
            if !usable {
                warn!(installments = t.installments, fee = t.fee_percent, "skipping card tier");
            }
            usable
        })
        .map(|t| {
            let total = gross_up(cash_price, t.fee_percent);
            InstallmentRow {
                installments: t.installments,
                fee_percent: t.fee_percent,
                total,
                installment_value: total / t.installments as f64,
            }
        })
        .collect();

    InstallmentTable {
        sales_price,
        anchor_fee: anchor,
        cash_price,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::card_rate::ANCHOR_INSTALLMENTS;
    use proptest::prelude::*;

    fn default_tiers() -> Vec<CardRateTier> {
        [(1, 3.5), (2, 4.5), (3, 5.0), (4, 6.0), (5, 7.5), (6, 9.0), (10, 12.5), (12, 14.0)]
            .into_iter()
            .map(|(n, r)| CardRateTier::new(n, r))
            .collect()
    }

    #[test]
    fn test_anchor_only_table() {
        let tiers = vec![CardRateTier::new(12, 14.0)];
        let sales = 1000.0 / 0.86;
        let table = simulate(sales, &tiers);
        assert!((table.cash_price - 1000.0).abs() < 1e-9);
        assert_eq!(table.rows.len(), 1);
        assert!((table.rows[0].total - sales).abs() < 1e-9);
    }

    #[test]
    fn test_rows_sorted_and_divided() {
        let mut tiers = default_tiers();
        tiers.reverse();
        let table = simulate(1200.0, &tiers);
        let counts: Vec<u32> = table.rows.iter().map(|r| r.installments).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6, 10, 12]);

        let six = &table.rows[5];
        assert!((six.installment_value * 6.0 - six.total).abs() < 1e-9);
        // lower fee tiers cost the client less than the anchor
        assert!(table.rows[0].total < 1200.0);
    }

    #[test]
    fn test_empty_table_is_cash_only() {
        let table = simulate(500.0, &[]);
        assert_eq!(table.cash_price, 500.0);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_unusable_tier_skipped() {
        let tiers = vec![CardRateTier::new(0, 5.0), CardRateTier::new(3, 100.0)];
        assert!(simulate(100.0, &tiers).rows.is_empty());
    }

    proptest! {
        #[test]
        fn anchor_tier_round_trips(price in 1.0f64..1.0e6, fee in 0.0f64..60.0) {
            let tiers = vec![CardRateTier::new(1, 2.0), CardRateTier::new(ANCHOR_INSTALLMENTS, fee)];
            let table = simulate(price, &tiers);
            let anchor = table.rows.iter().find(|r| r.installments == ANCHOR_INSTALLMENTS).unwrap();
            prop_assert!((anchor.total - price).abs() < 1e-6 * price);
        }
    }
}
