//! Sale price, fee gross-up and profitability

use serde::{Deserialize, Serialize};

/// Fee, profit and return figures for a given price and cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub fee_amount: f64,
    pub net_revenue: f64,
    pub profit: f64,
    pub realized_margin: f64,
    pub roi: f64,
}

/// Settle a sale: deduct the card fee and measure profit against cost
pub fn settle(total_cost: f64, sales_price: f64, fee_percent: f64) -> Settlement {
    let fee_amount = sales_price * fee_percent / 100.0;
    let net_revenue = sales_price - fee_amount;
    let profit = net_revenue - total_cost;
    Settlement {
        fee_amount,
        net_revenue,
        profit,
        realized_margin: if sales_price > 0.0 {
            profit / sales_price * 100.0
        } else {
            0.0
        },
        roi: if total_cost > 0.0 {
            profit / total_cost * 100.0
        } else {
            0.0
        },
    }
}

/// Inflate a price so that after `fee_percent` is deducted `price` remains
pub fn gross_up(price: f64, fee_percent: f64) -> f64 {
    if fee_percent > 0.0 {
        price / (1.0 - fee_percent / 100.0)
    } else {
        price
    }
}

/// Remove a fee that was grossed up into `price`
pub fn strip_fee(price: f64, fee_percent: f64) -> f64 {
    price * (1.0 - fee_percent / 100.0)
}

/// Full price derivation from cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total_cost: f64,
    pub base_price: f64,
    /// Anchor fee percent used for the gross-up
    pub fee_percent: f64,
    pub sales_price: f64,
    #[serde(flatten)]
    pub settlement: Settlement,
}

/// Price a total cost at a markup and anchor fee
pub fn price(total_cost: f64, margin_percent: f64, fee_percent: f64) -> PriceBreakdown {
    let base_price = total_cost * (1.0 + margin_percent / 100.0);
    let sales_price = gross_up(base_price, fee_percent);
    PriceBreakdown {
        total_cost,
        base_price,
        fee_percent,
        sales_price,
        settlement: settle(total_cost, sales_price, fee_percent),
    }
}

/// Rating of a realized margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginHealth {
    Loss,
    Low,
    Healthy,
    Excellent,
}

impl MarginHealth {
    pub fn rate(realized_margin: f64) -> Self {
        if realized_margin <= 0.0 {
            MarginHealth::Loss
        } else if realized_margin < 10.0 {
            MarginHealth::Low
        } else if realized_margin < 25.0 {
            MarginHealth::Healthy
        } else {
            MarginHealth::Excellent
        }
    }
}

impl std::fmt::Display for MarginHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarginHealth::Loss => write!(f, "loss"),
            MarginHealth::Low => write!(f, "low"),
            MarginHealth::Healthy => write!(f, "healthy"),
            MarginHealth::Excellent => write!(f, "excellent"),
        }
    }
}
