//! Bill of materials with cascaded hardware
//!
//! Hardware implies other hardware: a hanger rod needs brackets, brackets
//! and slides need screws, every fastener hole gets a cap. Generated rows
//! are added next to manually entered lines and never replace them, so a
//! manual "hole cap" line and the generated one both appear.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::classify::{
    hardware_tags, HardwareTag, NamePattern, HANGER_BRACKET, HOLE_CAP, SMALL_SCREW,
};
use crate::engine::materials::{edge_band_usage, find_material, PriceSource};
use crate::entities::hardware::HardwareRef;
use crate::entities::material::{MaterialCatalogEntry, Unit};
use crate::entities::piece::Piece;

pub const DEFAULT_BRACKET_PRICE: f64 = 1.00;
pub const DEFAULT_SCREW_PRICE: f64 = 0.04;
pub const DEFAULT_HOLE_CAP_PRICE: f64 = 0.06;

pub const GENERATED_BRACKET: &str = "Hanger bracket";
pub const GENERATED_SCREW: &str = "Screw 3.5x14";
pub const GENERATED_HOLE_CAP: &str = "Hole cap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BomCategory {
    RawMaterial,
    EdgeBand,
    Hardware,
    Generated,
}

impl std::fmt::Display for BomCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomCategory::RawMaterial => write!(f, "raw_material"),
            BomCategory::EdgeBand => write!(f, "edge_band"),
            BomCategory::Hardware => write!(f, "hardware"),
            BomCategory::Generated => write!(f, "generated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub category: BomCategory,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub unit_price: f64,
    pub total: f64,
    /// Synthesized by the cascade rather than entered
    #[serde(default)]
    pub auto_generated: bool,
    /// Priced from a built-in default instead of the catalog
    #[serde(default)]
    pub price_fallback: bool,
}

impl BomLine {
    fn new(category: BomCategory, name: impl Into<String>, quantity: f64, unit: Unit, unit_price: f64) -> Self {
        Self {
            category,
            name: name.into(),
            quantity,
            unit,
            unit_price,
            total: quantity * unit_price,
            auto_generated: category == BomCategory::Generated,
            price_fallback: false,
        }
    }

    fn with_source(mut self, source: PriceSource) -> Self {
        self.price_fallback = source.is_fallback();
        self
    }
}

/// What a matched rule adds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Brackets(f64),
    Screws(f64),
}

/// Cascade rules in application order
pub const CASCADE_RULES: &[(HardwareTag, Effect)] = &[
    (HardwareTag::HangerRod, Effect::Brackets(2.0)),
    (HardwareTag::DrawerSlide, Effect::Screws(4.0)),
    (HardwareTag::HangerBracket, Effect::Screws(2.0)),
    (HardwareTag::AngleBracket, Effect::Screws(2.0)),
    (HardwareTag::Caster, Effect::Screws(4.0)),
    (HardwareTag::LAngleBracket, Effect::Screws(3.0)),
];

/// Screws per generated bracket
pub const SCREWS_PER_BRACKET: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cascade {
    pub brackets: f64,
    pub screws: f64,
}

impl Cascade {
    fn apply(mut self, effect: Effect, quantity: f64) -> Self {
        match effect {
            Effect::Brackets(per) => self.brackets += quantity * per,
            Effect::Screws(per) => self.screws += quantity * per,
        }
        self
    }
}

/// Fold the rules over hardware lines, then add the bracket screws
pub fn cascade<'a>(hardware: impl IntoIterator<Item = HardwareRef<'a>>) -> Cascade {
    let folded = hardware.into_iter().fold(Cascade::default(), |acc, hw| {
        let tags = hardware_tags(hw.name);
        CASCADE_RULES
            .iter()
            .filter(|(tag, _)| tags.contains(tag))
            .fold(acc, |acc, (_, effect)| acc.apply(*effect, hw.quantity))
    });

    Cascade {
        brackets: folded.brackets,
        screws: folded.screws + folded.brackets * SCREWS_PER_BRACKET,
    }
}

/// Price a generated item from the first catalog entry matching `pattern`
fn generated_price(
    catalog: &[MaterialCatalogEntry],
    pattern: &NamePattern,
    default: f64,
) -> (Unit, f64, PriceSource) {
    match catalog.iter().find(|e| pattern.matches_name(&e.name)) {
        Some(entry) => (entry.unit, entry.unit_price, PriceSource::Catalog),
        None => {
            warn!(item = pattern.any_of[0], "no catalog entry for generated item, using default price");
            (Unit::Unit, default, PriceSource::Fallback)
        }
    }
}

fn raw_material_lines(catalog: &[MaterialCatalogEntry], pieces: &[Piece]) -> Vec<BomLine> {
    let mut groups: Vec<(&str, f64)> = Vec::new();
    for p in pieces {
        let linear = find_material(catalog, &p.material).is_some_and(|e| e.unit.is_linear());
        let amount = if linear {
            p.length / 1000.0 * p.quantity
        } else {
            p.metrics.area_mm2 / 1_000_000.0
        };
        match groups.iter_mut().find(|(n, _)| *n == p.material) {
            Some((_, total)) => *total += amount,
            None => groups.push((p.material.as_str(), amount)),
        }
    }

    groups
        .into_iter()
        .map(|(name, quantity)| match find_material(catalog, name) {
            Some(entry) => BomLine::new(
                BomCategory::RawMaterial,
                name,
                quantity,
                if entry.unit.is_linear() { Unit::LinearMeter } else { Unit::SquareMeter },
                entry.unit_price,
            ),
            None => BomLine::new(BomCategory::RawMaterial, name, quantity, Unit::SquareMeter, 0.0)
                .with_source(PriceSource::Fallback),
        })
        .collect()
}

/// Build the bill of materials
///
/// `total_fasteners` is the piece fastener count, which sizes the hole caps.
pub fn build<'a>(
    catalog: &[MaterialCatalogEntry],
    pieces: &[Piece],
    hardware: &[HardwareRef<'a>],
    total_fasteners: f64,
) -> Vec<BomLine> {
    let mut lines = raw_material_lines(catalog, pieces);

    lines.extend(edge_band_usage(catalog, pieces).into_iter().map(|usage| {
        BomLine::new(
            BomCategory::EdgeBand,
            format!("Edge band {}", usage.color),
            usage.length_mm / 1000.0,
            Unit::LinearMeter,
            usage.unit_price,
        )
        .with_source(usage.source)
    }));

    lines.extend(
        hardware
            .iter()
            .map(|hw| BomLine::new(BomCategory::Hardware, hw.name, hw.quantity, hw.unit, hw.unit_price)),
    );

    let generated = cascade(hardware.iter().copied());
    debug!(brackets = generated.brackets, screws = generated.screws, "bom cascade");

    if generated.brackets > 0.0 {
        let (unit, price, source) = generated_price(catalog, &HANGER_BRACKET, DEFAULT_BRACKET_PRICE);
        lines.push(
            BomLine::new(BomCategory::Generated, GENERATED_BRACKET, generated.brackets, unit, price)
                .with_source(source),
        );
    }
    if generated.screws > 0.0 {
        let (unit, price, source) = generated_price(catalog, &SMALL_SCREW, DEFAULT_SCREW_PRICE);
        lines.push(
            BomLine::new(BomCategory::Generated, GENERATED_SCREW, generated.screws, unit, price)
                .with_source(source),
        );
    }
    if total_fasteners > 0.0 {
        let (unit, price, source) = generated_price(catalog, &HOLE_CAP, DEFAULT_HOLE_CAP_PRICE);
        lines.push(
            BomLine::new(BomCategory::Generated, GENERATED_HOLE_CAP, total_fasteners, unit, price)
                .with_source(source),
        );
    }

    lines
}

/// Sum of all BOM line totals
pub fn total(lines: &[BomLine]) -> f64 {
    lines.iter().map(|l| l.total).sum()
}
