//! Fixed cost and additional service entity types

use serde::{Deserialize, Serialize};

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// How a fixed monthly cost is allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostClass {
    /// Shop-floor wages; drives the direct labor rate
    Direct,
    /// Overhead wages and services
    Indirect,
    /// Rent, utilities and other expenses
    Expense,
}

impl std::fmt::Display for CostClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostClass::Direct => write!(f, "direct"),
            CostClass::Indirect => write!(f, "indirect"),
            CostClass::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for CostClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(CostClass::Direct),
            "indirect" => Ok(CostClass::Indirect),
            "expense" => Ok(CostClass::Expense),
            _ => Err(format!(
                "Invalid cost class: {}. Use direct, indirect, or expense",
                s
            )),
        }
    }
}

/// A FixedCostLine entity - one recurring monthly cost of the workshop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostLine {
    pub id: EntityId,
    pub description: String,
    pub class: CostClass,
    /// Monthly amount
    pub value: f64,
}

impl_entity!(FixedCostLine, "FCST", description);

impl FixedCostLine {
    pub fn new(description: impl Into<String>, class: CostClass, value: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Fcst),
            description: description.into(),
            class,
            value,
        }
    }
}

/// An AdditionalServiceLine entity - flat-priced extras (freight, installation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalServiceLine {
    pub id: EntityId,
    pub description: String,
    pub value: f64,
}

impl_entity!(AdditionalServiceLine, "SVC", description);

impl AdditionalServiceLine {
    pub fn new(description: impl Into<String>, value: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Svc),
            description: description.into(),
            value,
        }
    }
}
