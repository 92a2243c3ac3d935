//! Derived project statistics

use serde::{Deserialize, Serialize};

use crate::engine::labor::LaborLine;
use crate::engine::pricing::MarginHealth;

/// Full derived snapshot of a quote
///
/// Lengths are in millimeters and areas in mm², as accumulated from the
/// pieces. Costs and prices are in the workshop currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStats {
    // Physical totals
    pub total_area_mm2: f64,
    pub total_perimeter_mm: f64,
    pub total_edge_length_mm: f64,
    pub total_fasteners: f64,
    pub wood_perimeter_mm: f64,
    pub wood_edge_length_mm: f64,
    pub metal_pieces: f64,
    pub metal_length_mm: f64,
    pub glass_perimeter_mm: f64,

    // Material buckets
    pub wood_cost: f64,
    pub metal_cost: f64,
    pub glass_cost: f64,
    pub paint_cost: f64,
    pub total_material_cost: f64,
    pub total_tape_cost: f64,
    pub total_component_cost: f64,

    // Labor and overhead
    pub total_labor_minutes: f64,
    pub direct_fixed_cost: f64,
    pub indirect_fixed_cost: f64,
    pub labor_rate: f64,
    pub overhead_rate: f64,
    pub total_labor_cost: f64,
    /// Overhead allocated to this job
    pub total_fixed_cost: f64,
    pub extra_cost: f64,
    pub total_services_cost: f64,

    // Pricing
    pub total_cost: f64,
    pub profit_margin: f64,
    pub base_price: f64,
    pub fee_percent: f64,
    pub sales_price: f64,
    pub fee_amount: f64,
    pub net_revenue: f64,
    pub profit: f64,
    pub realized_margin: f64,
    pub roi: f64,

    pub labor: Vec<LaborLine>,
}

impl ProjectStats {
    pub fn margin_health(&self) -> MarginHealth {
        MarginHealth::rate(self.realized_margin)
    }

    /// Material, edge band and hardware
    pub fn material_cost(&self) -> f64 {
        self.total_material_cost + self.total_tape_cost + self.total_component_cost
    }

    /// Labor, overhead, services and extra cost
    pub fn fabrication_cost(&self) -> f64 {
        self.total_labor_cost + self.total_fixed_cost + self.total_services_cost + self.extra_cost
    }

    pub fn total_area_m2(&self) -> f64 {
        self.total_area_mm2 / 1_000_000.0
    }

    pub fn total_perimeter_m(&self) -> f64 {
        self.total_perimeter_mm / 1000.0
    }

    pub fn total_edge_length_m(&self) -> f64 {
        self.total_edge_length_mm / 1000.0
    }

    pub fn total_labor_hours(&self) -> f64 {
        self.total_labor_minutes / 60.0
    }
}
