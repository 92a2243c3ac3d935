//! Catalog entry type - raw materials and hardware the workshop buys

use serde::{Deserialize, Serialize};

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Unit of measure for a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Unit {
    /// Linear meter (priced by length)
    #[serde(rename = "m")]
    LinearMeter,
    /// Square meter (priced by area)
    #[serde(rename = "m2")]
    SquareMeter,
    #[default]
    Unit,
    Pair,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "l")]
    Liter,
    Box,
    Set,
}

impl Unit {
    /// Whether costing for this unit is length-based
    pub fn is_linear(&self) -> bool {
        matches!(self, Unit::LinearMeter)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::LinearMeter => write!(f, "m"),
            Unit::SquareMeter => write!(f, "m2"),
            Unit::Unit => write!(f, "unit"),
            Unit::Pair => write!(f, "pair"),
            Unit::Kilogram => write!(f, "kg"),
            Unit::Liter => write!(f, "l"),
            Unit::Box => write!(f, "box"),
            Unit::Set => write!(f, "set"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "meter" | "linear-meter" => Ok(Unit::LinearMeter),
            "m2" | "sqm" | "square-meter" => Ok(Unit::SquareMeter),
            "unit" | "un" | "pc" => Ok(Unit::Unit),
            "pair" => Ok(Unit::Pair),
            "kg" | "kilogram" => Ok(Unit::Kilogram),
            "l" | "liter" | "litre" => Ok(Unit::Liter),
            "box" => Ok(Unit::Box),
            "set" => Ok(Unit::Set),
            _ => Err(format!(
                "Invalid unit: {}. Use m, m2, unit, pair, kg, l, box, or set",
                s
            )),
        }
    }
}

/// Whether a catalog entry is cut stock or a bought-in component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum MaterialKind {
    /// Sheet, bar or glass stock that pieces are cut from
    #[default]
    RawMaterial,
    /// Hardware, paint, edge band and other consumables
    Hardware,
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialKind::RawMaterial => write!(f, "raw_material"),
            MaterialKind::Hardware => write!(f, "hardware"),
        }
    }
}

impl std::str::FromStr for MaterialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "raw_material" | "raw" | "material" => Ok(MaterialKind::RawMaterial),
            "hardware" | "component" => Ok(MaterialKind::Hardware),
            _ => Err(format!(
                "Invalid kind: {}. Use raw_material or hardware",
                s
            )),
        }
    }
}

/// A catalog entry - something the workshop buys at a unit price
///
/// Pieces refer to raw materials by exact name; hardware lines copy price,
/// unit and install minutes at add-time and keep no live link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalogEntry {
    pub id: EntityId,

    pub name: String,

    #[serde(default)]
    pub unit: Unit,

    /// Price per unit of measure
    pub unit_price: f64,

    #[serde(default)]
    pub kind: MaterialKind,

    /// Install time per unit, copied onto hardware lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_minutes: Option<f64>,
}

impl_entity!(MaterialCatalogEntry, "MAT", name);

impl MaterialCatalogEntry {
    pub fn new(name: impl Into<String>, unit: Unit, unit_price: f64, kind: MaterialKind) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Mat),
            name: name.into(),
            unit,
            unit_price,
            kind,
            install_minutes: None,
        }
    }

    pub fn raw(name: impl Into<String>, unit: Unit, unit_price: f64) -> Self {
        Self::new(name, unit, unit_price, MaterialKind::RawMaterial)
    }

    pub fn hardware(name: impl Into<String>, unit: Unit, unit_price: f64) -> Self {
        Self::new(name, unit, unit_price, MaterialKind::Hardware)
    }

    pub fn with_install_minutes(mut self, minutes: f64) -> Self {
        self.install_minutes = Some(minutes);
        self
    }
}
