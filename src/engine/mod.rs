//! Costing and pricing engine
//!
//! [`compute`] is the only entry point: it takes borrowed entity
//! collections and returns the derived stats and bill of materials.
//! Nothing here holds state between calls.

pub mod bom;
pub mod classify;
pub mod installments;
pub mod labor;
pub mod materials;
pub mod piece;
pub mod pricing;
pub mod snapshot;
pub mod stats;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::identity::EntityId;
use crate::entities::card_rate::{anchor_fee, CardRateTier};
use crate::entities::cost::{AdditionalServiceLine, FixedCostLine};
use crate::entities::hardware::{FixedHardwareLine, HardwareRef, ProjectHardwareLine};
use crate::entities::labor::LaborRate;
use crate::entities::material::MaterialCatalogEntry;
use crate::entities::piece::Piece;
use crate::entities::settings::Settings;

pub use bom::BomLine;
pub use stats::ProjectStats;

/// Errors raised by the engine
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("{entity} {id}: field '{field}' is not a finite number")]
    NonFinite {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    #[error("anchor card fee {0}% leaves nothing to charge")]
    AnchorFeeTooHigh(f64),
}

/// Borrowed view of every collection the engine reads
#[derive(Debug, Clone, Copy)]
pub struct QuoteInputs<'a> {
    pub catalog: &'a [MaterialCatalogEntry],
    pub pieces: &'a [Piece],
    pub project_hardware: &'a [ProjectHardwareLine],
    pub fixed_hardware: &'a [FixedHardwareLine],
    pub labor_rates: &'a [LaborRate],
    pub fixed_costs: &'a [FixedCostLine],
    pub card_rates: &'a [CardRateTier],
    pub services: &'a [AdditionalServiceLine],
    pub settings: &'a Settings,
}

impl<'a> QuoteInputs<'a> {
    /// Project and fixed hardware, project lines first
    pub fn hardware(&self) -> Vec<HardwareRef<'a>> {
        self.project_hardware
            .iter()
            .map(HardwareRef::from)
            .chain(self.fixed_hardware.iter().map(HardwareRef::from))
            .collect()
    }

    fn hardware_lines_for_validation(&self) -> Vec<(&'static str, &'a EntityId, HardwareRef<'a>)> {
        self.project_hardware
            .iter()
            .map(|h| ("hardware", &h.id, HardwareRef::from(h)))
            .chain(
                self.fixed_hardware
                    .iter()
                    .map(|h| ("fixed hardware", &h.id, HardwareRef::from(h))),
            )
            .collect()
    }
}

/// Result of one computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteOutcome {
    pub stats: ProjectStats,
    pub bom: Vec<BomLine>,
}

fn check(
    entity: &'static str,
    id: &EntityId,
    fields: &[(&'static str, f64)],
) -> Result<(), EngineError> {
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, _)) => Err(EngineError::NonFinite {
            entity,
            id: id.to_string(),
            field: *field,
        }),
        None => Ok(()),
    }
}

/// Reject records carrying NaN or infinite numbers
fn validate(inputs: &QuoteInputs) -> Result<(), EngineError> {
    for e in inputs.catalog {
        let minutes = e.install_minutes.unwrap_or(0.0);
        check(
            "material",
            &e.id,
            &[("unit_price", e.unit_price), ("install_minutes", minutes)],
        )?;
    }
    for p in inputs.pieces {
        check(
            "piece",
            &p.id,
            &[
                ("length", p.length),
                ("width", p.width),
                ("quantity", p.quantity),
            ],
        )?;
    }
    for h in inputs.hardware_lines_for_validation() {
        check(
            h.0,
            h.1,
            &[
                ("unit_price", h.2.unit_price),
                ("quantity", h.2.quantity),
                ("install_minutes", h.2.install_minutes),
            ],
        )?;
    }
    for r in inputs.labor_rates {
        check("labor rate", &r.id, &[("minutes_per_unit", r.minutes_per_unit)])?;
    }
    for c in inputs.fixed_costs {
        check("fixed cost", &c.id, &[("value", c.value)])?;
    }
    for t in inputs.card_rates {
        check("card rate", &t.id, &[("fee_percent", t.fee_percent)])?;
    }
    for s in inputs.services {
        check("service", &s.id, &[("value", s.value)])?;
    }

    let settings = inputs.settings;
    let fields = [
        ("profit_margin", settings.profit_margin),
        ("extra_cost", settings.extra_cost),
        ("employees", settings.employees),
        ("monthly_hours", settings.monthly_hours),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(EngineError::NonFinite {
            entity: "settings",
            id: "settings".to_string(),
            field: *field,
        });
    }
    Ok(())
}

/// Compute stats and bill of materials from one consistent snapshot
pub fn compute(inputs: &QuoteInputs) -> Result<QuoteOutcome, EngineError> {
    validate(inputs)?;

    let fee = anchor_fee(inputs.card_rates);
    if fee >= 100.0 {
        return Err(EngineError::AnchorFeeTooHigh(fee));
    }

    // Cached piece metrics are re-derived, never trusted
    let pieces: Vec<Piece> = inputs
        .pieces
        .iter()
        .cloned()
        .map(|mut p| {
            p.refresh();
            p
        })
        .collect();

    let totals = materials::aggregate(inputs.catalog, &pieces);
    let hardware = inputs.hardware();
    let component_cost: f64 = hardware.iter().map(|h| h.value()).sum();

    let labor = labor::labor_lines(inputs.labor_rates, &totals, hardware.iter().copied());
    let total_minutes: f64 = labor.iter().map(|l| l.minutes).sum();
    let rates = labor::shop_rates(inputs.fixed_costs, inputs.settings);
    let labor_cost = total_minutes / 60.0 * rates.labor_rate;
    let overhead_cost = total_minutes / 60.0 * rates.overhead_rate;
    debug!(total_minutes, labor_cost, overhead_cost, "labor");

    let services_cost: f64 = inputs.services.iter().map(|s| s.value).sum();
    let extra = inputs.settings.extra_cost;
    let material_cost = totals.material_cost();

    let total_cost = material_cost
        + totals.tape_cost
        + component_cost
        + labor_cost
        + overhead_cost
        + extra
        + services_cost;
    let priced = pricing::price(total_cost, inputs.settings.profit_margin, fee);
    debug!(total_cost, sales_price = priced.sales_price, "priced");

    let stats = ProjectStats {
        total_area_mm2: totals.total_area_mm2,
        total_perimeter_mm: totals.total_perimeter_mm,
        total_edge_length_mm: totals.total_edge_length_mm,
        total_fasteners: totals.total_fasteners,
        wood_perimeter_mm: totals.wood_perimeter_mm,
        wood_edge_length_mm: totals.wood_edge_length_mm,
        metal_pieces: totals.metal_pieces,
        metal_length_mm: totals.metal_length_mm,
        glass_perimeter_mm: totals.glass_perimeter_mm,

        wood_cost: totals.wood_cost,
        metal_cost: totals.metal_cost,
        glass_cost: totals.glass_cost,
        paint_cost: totals.paint_cost,
        total_material_cost: material_cost,
        total_tape_cost: totals.tape_cost,
        total_component_cost: component_cost,

        total_labor_minutes: total_minutes,
        direct_fixed_cost: rates.direct_fixed_cost,
        indirect_fixed_cost: rates.indirect_fixed_cost,
        labor_rate: rates.labor_rate,
        overhead_rate: rates.overhead_rate,
        total_labor_cost: labor_cost,
        total_fixed_cost: overhead_cost,
        extra_cost: extra,
        total_services_cost: services_cost,

        total_cost,
        profit_margin: inputs.settings.profit_margin,
        base_price: priced.base_price,
        fee_percent: fee,
        sales_price: priced.sales_price,
        fee_amount: priced.settlement.fee_amount,
        net_revenue: priced.settlement.net_revenue,
        profit: priced.settlement.profit,
        realized_margin: priced.settlement.realized_margin,
        roi: priced.settlement.roi,

        labor,
    };

    let bom = bom::build(inputs.catalog, &pieces, &hardware, totals.total_fasteners);

    Ok(QuoteOutcome { stats, bom })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::material::Unit;
    use crate::entities::piece::{EdgeLetter, PieceDraft};
    use proptest::prelude::*;

    struct Fixture {
        catalog: Vec<MaterialCatalogEntry>,
        pieces: Vec<Piece>,
        project_hardware: Vec<ProjectHardwareLine>,
        fixed_hardware: Vec<FixedHardwareLine>,
        labor_rates: Vec<LaborRate>,
        fixed_costs: Vec<FixedCostLine>,
        card_rates: Vec<CardRateTier>,
        services: Vec<AdditionalServiceLine>,
        settings: Settings,
    }

    impl Fixture {
        fn empty() -> Self {
            Self {
                catalog: Vec::new(),
                pieces: Vec::new(),
                project_hardware: Vec::new(),
                fixed_hardware: Vec::new(),
                labor_rates: Vec::new(),
                fixed_costs: Vec::new(),
                card_rates: Vec::new(),
                services: Vec::new(),
                settings: Settings::default(),
            }
        }

        fn inputs(&self) -> QuoteInputs<'_> {
            QuoteInputs {
                catalog: &self.catalog,
                pieces: &self.pieces,
                project_hardware: &self.project_hardware,
                fixed_hardware: &self.fixed_hardware,
                labor_rates: &self.labor_rates,
                fixed_costs: &self.fixed_costs,
                card_rates: &self.card_rates,
                services: &self.services,
                settings: &self.settings,
            }
        }
    }

    #[test]
    fn test_empty_inputs_price_zero() {
        let f = Fixture::empty();
        let out = compute(&f.inputs()).unwrap();
        assert_eq!(out.stats.total_cost, 0.0);
        assert_eq!(out.stats.sales_price, 0.0);
        assert_eq!(out.stats.realized_margin, 0.0);
        assert!(out.bom.is_empty());
    }

    #[test]
    fn test_totals_sum_components() {
        let mut f = Fixture::empty();
        f.catalog.push(MaterialCatalogEntry::raw("MDF White 15mm", Unit::SquareMeter, 100.0));
        f.pieces.push(Piece::from_draft(PieceDraft {
            material: "MDF White 15mm".to_string(),
            length: 1000.0,
            width: 1000.0,
            quantity: 1.0,
            ..Default::default()
        }));
        f.fixed_hardware
            .push(FixedHardwareLine::new("Hinge", Unit::Unit, 5.0, 2.0, 0.0));
        f.services.push(AdditionalServiceLine::new("Freight", 50.0));
        f.settings.extra_cost = 20.0;

        let s = compute(&f.inputs()).unwrap().stats;
        assert_eq!(s.total_material_cost, 100.0);
        assert_eq!(s.total_component_cost, 10.0);
        assert_eq!(s.total_cost, 180.0);
        assert!((s.base_price - 234.0).abs() < 1e-9);
        assert_eq!(s.material_cost() + s.fabrication_cost(), s.total_cost);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let mut f = Fixture::empty();
        f.services.push(AdditionalServiceLine::new("Freight", f64::NAN));
        let err = compute(&f.inputs()).unwrap_err();
        assert!(matches!(err, EngineError::NonFinite { field: "value", .. }));
    }

    #[test]
    fn test_stale_piece_cache_is_ignored() {
        let mut f = Fixture::empty();
        let mut piece = Piece::from_draft(PieceDraft {
            material: "Plywood".to_string(),
            length: 500.0,
            width: 500.0,
            quantity: 1.0,
            ..Default::default()
        });
        piece.metrics.area_mm2 = 9.0e9;
        f.pieces.push(piece);
        let s = compute(&f.inputs()).unwrap().stats;
        assert_eq!(s.total_area_mm2, 250_000.0);
    }

    proptest! {
        #[test]
        fn compute_is_idempotent(
            length in 1.0f64..3000.0,
            width in 0.0f64..1500.0,
            quantity in 1u32..20,
            letter in 0usize..7,
            fee in 0.0f64..30.0,
            wages in 0.0f64..20_000.0,
            rod_qty in 0u32..10,
        ) {
            const LETTERS: [Option<EdgeLetter>; 7] = [
                None,
                Some(EdgeLetter::O),
                Some(EdgeLetter::I),
                Some(EdgeLetter::U),
                Some(EdgeLetter::C),
                Some(EdgeLetter::H),
                Some(EdgeLetter::L),
            ];
            let mut f = Fixture::empty();
            f.catalog.push(MaterialCatalogEntry::raw("MDF White 15mm", Unit::SquareMeter, 80.0));
            f.pieces.push(Piece::from_draft(PieceDraft {
                material: "MDF White 15mm".to_string(),
                length,
                width,
                quantity: quantity as f64,
                edge_color: Some("white".to_string()),
                edge_letter: LETTERS[letter],
                ..Default::default()
            }));
            f.card_rates.push(CardRateTier::new(12, fee));
            f.fixed_costs.push(FixedCostLine::new(
                "Wages",
                crate::entities::cost::CostClass::Direct,
                wages,
            ));
            f.fixed_hardware.push(FixedHardwareLine::new(
                "Hanger rod",
                Unit::Unit,
                10.0,
                rod_qty as f64,
                5.0,
            ));
            let a = compute(&f.inputs()).unwrap();
            let b = compute(&f.inputs()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
