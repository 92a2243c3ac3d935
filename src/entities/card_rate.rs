//! Card-rate tier entity type - processing fee per installment count

use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Installment count whose fee anchors the quoted price
pub const ANCHOR_INSTALLMENTS: u32 = 12;

/// A CardRateTier entity - card fee charged for paying in N installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRateTier {
    pub id: EntityId,
    pub installments: u32,
    /// Fee as a percentage of the charged amount
    pub fee_percent: f64,
}

impl crate::core::entity::Entity for CardRateTier {
    const PREFIX: &'static str = "RATE";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        "card rate"
    }
}

impl CardRateTier {
    pub fn new(installments: u32, fee_percent: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Rate),
            installments,
            fee_percent,
        }
    }
}

/// Fee of the anchor tier, or 0 when the table has no such tier
pub fn anchor_fee(tiers: &[CardRateTier]) -> f64 {
    tiers
        .iter()
        .find(|t| t.installments == ANCHOR_INSTALLMENTS)
        .map(|t| t.fee_percent)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_fee_found() {
        let tiers = vec![CardRateTier::new(1, 3.5), CardRateTier::new(12, 14.0)];
        assert_eq!(anchor_fee(&tiers), 14.0);
    }

    #[test]
    fn test_anchor_fee_missing_is_zero() {
        assert_eq!(anchor_fee(&[]), 0.0);
        assert_eq!(anchor_fee(&[CardRateTier::new(10, 12.5)]), 0.0);
    }
}
