//! Labor time and shop rate model

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::identity::EntityId;
use crate::engine::materials::MaterialTotals;
use crate::entities::cost::{CostClass, FixedCostLine};
use crate::entities::hardware::HardwareRef;
use crate::entities::labor::{LaborRate, ShopCategory};
use crate::entities::settings::Settings;

/// Physical quantity an activity is timed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Driver {
    WoodPerimeterM,
    WoodEdgeM,
    Fasteners,
    MetalPieces,
    MetalLengthM,
    GlassPerimeterM,
}

impl Driver {
    fn amount(&self, totals: &MaterialTotals) -> f64 {
        match self {
            Driver::WoodPerimeterM => totals.wood_perimeter_mm / 1000.0,
            Driver::WoodEdgeM => totals.wood_edge_length_mm / 1000.0,
            Driver::Fasteners => totals.total_fasteners,
            Driver::MetalPieces => totals.metal_pieces,
            Driver::MetalLengthM => totals.metal_length_mm / 1000.0,
            Driver::GlassPerimeterM => totals.glass_perimeter_mm / 1000.0,
        }
    }
}

/// One of the fixed activity slots
struct ActivitySlot {
    activity: &'static str,
    shop: ShopCategory,
    keywords: &'static [&'static str],
    driver: Driver,
}

const SLOTS: &[ActivitySlot] = &[
    ActivitySlot {
        activity: "wood cut",
        shop: ShopCategory::WoodShop,
        keywords: &["cut"],
        driver: Driver::WoodPerimeterM,
    },
    ActivitySlot {
        activity: "wood edge glue",
        shop: ShopCategory::WoodShop,
        keywords: &["glu", "edge band"],
        driver: Driver::WoodEdgeM,
    },
    ActivitySlot {
        activity: "wood assembly",
        shop: ShopCategory::WoodShop,
        keywords: &["assembl"],
        driver: Driver::Fasteners,
    },
    ActivitySlot {
        activity: "metal cut",
        shop: ShopCategory::MetalShop,
        keywords: &["cut"],
        driver: Driver::MetalPieces,
    },
    ActivitySlot {
        activity: "metal sanding",
        shop: ShopCategory::MetalShop,
        keywords: &["sand"],
        driver: Driver::MetalPieces,
    },
    ActivitySlot {
        activity: "metal welding",
        shop: ShopCategory::MetalShop,
        keywords: &["weld"],
        driver: Driver::MetalPieces,
    },
    ActivitySlot {
        activity: "metal painting",
        shop: ShopCategory::MetalShop,
        keywords: &["paint"],
        driver: Driver::MetalLengthM,
    },
    ActivitySlot {
        activity: "glass cut",
        shop: ShopCategory::GlassShop,
        keywords: &["cut"],
        driver: Driver::GlassPerimeterM,
    },
    ActivitySlot {
        activity: "glass finish",
        shop: ShopCategory::GlassShop,
        keywords: &["finish", "polish"],
        driver: Driver::GlassPerimeterM,
    },
];

/// Label of the hardware installation line
pub const HARDWARE_INSTALL: &str = "hardware install";

/// Time spent on one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborLine {
    pub activity: String,
    /// Amount of the driving quantity (meters, pieces or fasteners)
    pub quantity: f64,
    pub minutes_per_unit: f64,
    pub minutes: f64,
    /// Matched labor rate, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<EntityId>,
}

/// First rate in the given shop whose description carries a keyword
fn find_rate<'a>(rates: &'a [LaborRate], slot: &ActivitySlot) -> Option<&'a LaborRate> {
    rates.iter().find(|r| {
        let description = r.description.to_lowercase();
        r.in_shop(slot.shop) && slot.keywords.iter().any(|k| description.contains(k))
    })
}

/// Per-activity labor lines, hardware install last
pub fn labor_lines<'a>(
    rates: &[LaborRate],
    totals: &MaterialTotals,
    hardware: impl IntoIterator<Item = HardwareRef<'a>>,
) -> Vec<LaborLine> {
    let mut lines: Vec<LaborLine> = SLOTS
        .iter()
        .map(|slot| {
            let quantity = slot.driver.amount(totals);
            let rate = find_rate(rates, slot);
            let minutes_per_unit = rate.map(|r| r.minutes_per_unit).unwrap_or(0.0);
            LaborLine {
                activity: slot.activity.to_string(),
                quantity,
                minutes_per_unit,
                minutes: quantity * minutes_per_unit,
                rate: rate.map(|r| r.id),
            }
        })
        .collect();

    let (count, minutes) = hardware
        .into_iter()
        .fold((0.0, 0.0), |(q, m), hw| (q + hw.quantity, m + hw.minutes()));
    lines.push(LaborLine {
        activity: HARDWARE_INSTALL.to_string(),
        quantity: count,
        minutes_per_unit: if count > 0.0 { minutes / count } else { 0.0 },
        minutes,
        rate: None,
    });
    lines
}

/// Hourly shop rates from fixed costs and capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopRates {
    pub direct_fixed_cost: f64,
    pub indirect_fixed_cost: f64,
    pub capacity_hours: f64,
    /// Direct labor cost per hour
    pub labor_rate: f64,
    /// Overhead cost per hour
    pub overhead_rate: f64,
}

pub fn shop_rates(fixed_costs: &[FixedCostLine], settings: &Settings) -> ShopRates {
    let direct: f64 = fixed_costs
        .iter()
        .filter(|c| c.class == CostClass::Direct)
        .map(|c| c.value)
        .sum();
    let indirect: f64 = fixed_costs
        .iter()
        .filter(|c| c.class != CostClass::Direct)
        .map(|c| c.value)
        .sum();
    let capacity = settings.capacity_hours();

    let (labor_rate, overhead_rate) = if capacity > 0.0 {
        (direct / capacity, indirect / capacity)
    } else {
        (0.0, 0.0)
    };

    debug!(capacity, labor_rate, overhead_rate, "shop rates");
    ShopRates {
        direct_fixed_cost: direct,
        indirect_fixed_cost: indirect,
        capacity_hours: capacity,
        labor_rate,
        overhead_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::hardware::FixedHardwareLine;
    use crate::entities::material::Unit;
    use proptest::prelude::*;

    fn rates() -> Vec<LaborRate> {
        vec![
            LaborRate::new("Cut", 1.5, Some(ShopCategory::WoodShop)),
            LaborRate::new("Edge gluing and finishing", 5.0, None),
            LaborRate::new("Assembly", 0.3, Some(ShopCategory::WoodShop)),
            LaborRate::new("Cut metal", 5.0, Some(ShopCategory::MetalShop)),
            LaborRate::new("Sanding", 3.0, Some(ShopCategory::MetalShop)),
            LaborRate::new("Welding", 10.0, Some(ShopCategory::MetalShop)),
            LaborRate::new("Painting", 15.0, Some(ShopCategory::MetalShop)),
            LaborRate::new("Glass cut", 5.0, Some(ShopCategory::GlassShop)),
            LaborRate::new("Glass finishing", 5.0, Some(ShopCategory::GlassShop)),
        ]
    }

    fn minutes_of(lines: &[LaborLine], activity: &str) -> f64 {
        lines
            .iter()
            .find(|l| l.activity == activity)
            .map(|l| l.minutes)
            .unwrap()
    }

    #[test]
    fn test_wood_slots() {
        let totals = MaterialTotals {
            wood_perimeter_mm: 6000.0,
            wood_edge_length_mm: 2000.0,
            total_fasteners: 10.0,
            ..Default::default()
        };
        let lines = labor_lines(&rates(), &totals, std::iter::empty());
        assert_eq!(lines.len(), 10);
        assert!((minutes_of(&lines, "wood cut") - 9.0).abs() < 1e-9);
        assert!((minutes_of(&lines, "wood edge glue") - 10.0).abs() < 1e-9);
        assert!((minutes_of(&lines, "wood assembly") - 3.0).abs() < 1e-9);
        assert_eq!(minutes_of(&lines, "metal cut"), 0.0);
    }

    #[test]
    fn test_metal_slots_use_piece_count_and_length() {
        let totals = MaterialTotals {
            metal_pieces: 3.0,
            metal_length_mm: 6000.0,
            ..Default::default()
        };
        let lines = labor_lines(&rates(), &totals, std::iter::empty());
        assert_eq!(minutes_of(&lines, "metal cut"), 15.0);
        assert_eq!(minutes_of(&lines, "metal sanding"), 9.0);
        assert_eq!(minutes_of(&lines, "metal welding"), 30.0);
        assert_eq!(minutes_of(&lines, "metal painting"), 90.0);
    }

    #[test]
    fn test_shop_filter_prevents_cross_match() {
        // only a metal-shop cut rate exists
        let rates = vec![LaborRate::new("Cut", 5.0, Some(ShopCategory::MetalShop))];
        let totals = MaterialTotals {
            wood_perimeter_mm: 1000.0,
            ..Default::default()
        };
        let lines = labor_lines(&rates, &totals, std::iter::empty());
        assert_eq!(minutes_of(&lines, "wood cut"), 0.0);
        assert_eq!(lines[0].rate, None);
    }

    #[test]
    fn test_hardware_install_minutes() {
        let hw = vec![
            FixedHardwareLine::new("Hinge", Unit::Unit, 3.0, 4.0, 2.0),
            FixedHardwareLine::new("Handle", Unit::Unit, 8.0, 2.0, 5.0),
        ];
        let lines = labor_lines(&[], &MaterialTotals::default(), hw.iter().map(HardwareRef::from));
        assert_eq!(minutes_of(&lines, HARDWARE_INSTALL), 18.0);
    }

    #[test]
    fn test_shop_rates() {
        let costs = vec![
            FixedCostLine::new("Wages", CostClass::Direct, 6400.0),
            FixedCostLine::new("Office", CostClass::Indirect, 1600.0),
            FixedCostLine::new("Rent", CostClass::Expense, 1600.0),
        ];
        let r = shop_rates(&costs, &Settings::default());
        assert_eq!(r.capacity_hours, 320.0);
        assert_eq!(r.labor_rate, 20.0);
        assert_eq!(r.overhead_rate, 10.0);
    }

    proptest! {
        #[test]
        fn zero_capacity_rates_are_zero(
            direct in 0.0f64..50_000.0,
            indirect in 0.0f64..50_000.0,
            staff in 0.0f64..20.0,
            no_employees in any::<bool>(),
        ) {
            let costs = vec![
                FixedCostLine::new("Wages", CostClass::Direct, direct),
                FixedCostLine::new("Office", CostClass::Indirect, indirect),
            ];
            let settings = if no_employees {
                Settings { employees: 0.0, monthly_hours: staff * 10.0, ..Default::default() }
            } else {
                Settings { employees: staff, monthly_hours: 0.0, ..Default::default() }
            };
            let r = shop_rates(&costs, &settings);
            prop_assert_eq!(r.capacity_hours, 0.0);
            prop_assert_eq!(r.labor_rate, 0.0);
            prop_assert_eq!(r.overhead_rate, 0.0);
        }
    }
}
