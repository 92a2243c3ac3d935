//! Hardware line types - components fitted to the job

use serde::{Deserialize, Serialize};

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::material::{MaterialCatalogEntry, Unit};

/// A hardware line copied from the catalog
///
/// Price, unit and install minutes are a snapshot taken at add-time;
/// later catalog edits do not flow through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHardwareLine {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub unit: Unit,

    pub unit_price: f64,

    pub quantity: f64,

    /// Install time per unit
    #[serde(default)]
    pub install_minutes: f64,

    /// Linear meterage, for rod or rail stock sold by the meter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meterage: Option<f64>,
}

impl_entity!(ProjectHardwareLine, "HW", name);

impl ProjectHardwareLine {
    /// Copy a catalog entry into a new project line
    pub fn from_catalog(entry: &MaterialCatalogEntry, quantity: f64, meterage: Option<f64>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Hw),
            name: entry.name.clone(),
            unit: entry.unit,
            unit_price: entry.unit_price,
            quantity,
            install_minutes: entry.install_minutes.unwrap_or(0.0),
            meterage,
        }
    }
}

/// A manually entered hardware line (standard bundles fitted to every job)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedHardwareLine {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub unit: Unit,

    #[serde(default)]
    pub unit_price: f64,

    #[serde(default)]
    pub quantity: f64,

    #[serde(default)]
    pub install_minutes: f64,
}

impl_entity!(FixedHardwareLine, "FHW", name);

impl FixedHardwareLine {
    pub fn new(
        name: impl Into<String>,
        unit: Unit,
        unit_price: f64,
        quantity: f64,
        install_minutes: f64,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Fhw),
            name: name.into(),
            unit,
            unit_price,
            quantity,
            install_minutes,
        }
    }
}

/// Borrowed view over either kind of hardware line
///
/// Labor, pricing and the BOM cascade treat both kinds identically.
#[derive(Debug, Clone, Copy)]
pub struct HardwareRef<'a> {
    pub name: &'a str,
    pub unit: Unit,
    pub unit_price: f64,
    pub quantity: f64,
    pub install_minutes: f64,
}

impl HardwareRef<'_> {
    pub fn value(&self) -> f64 {
        self.unit_price * self.quantity
    }

    pub fn minutes(&self) -> f64 {
        self.install_minutes * self.quantity
    }
}

impl<'a> From<&'a ProjectHardwareLine> for HardwareRef<'a> {
    fn from(line: &'a ProjectHardwareLine) -> Self {
        Self {
            name: &line.name,
            unit: line.unit,
            unit_price: line.unit_price,
            quantity: line.quantity,
            install_minutes: line.install_minutes,
        }
    }
}

impl<'a> From<&'a FixedHardwareLine> for HardwareRef<'a> {
    fn from(line: &'a FixedHardwareLine) -> Self {
        Self {
            name: &line.name,
            unit: line.unit,
            unit_price: line.unit_price,
            quantity: line.quantity,
            install_minutes: line.install_minutes,
        }
    }
}
