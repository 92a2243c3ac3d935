//! Default workshop catalogs seeded by `jqt init`

use crate::entities::card_rate::CardRateTier;
use crate::entities::cost::{CostClass, FixedCostLine};
use crate::entities::hardware::FixedHardwareLine;
use crate::entities::labor::{LaborRate, ShopCategory};
use crate::entities::material::{MaterialCatalogEntry, Unit};
use crate::entities::settings::ProductCategory;

const RAW_MATERIALS: &[(&str, Unit, f64)] = &[
    ("MDF White 15mm", Unit::SquareMeter, 45.73),
    ("MDF Asphalt Grey 15mm", Unit::SquareMeter, 69.58),
    ("MDF Milkshake Pink", Unit::SquareMeter, 81.51),
    ("MDF Black 15mm", Unit::SquareMeter, 69.58),
    ("MDF Forest 15mm", Unit::SquareMeter, 67.59),
    ("MDF Woodgrain", Unit::SquareMeter, 69.58),
    ("Hardboard", Unit::SquareMeter, 17.07),
    ("Coated batten", Unit::LinearMeter, 5.00),
    ("Plywood", Unit::SquareMeter, 200.00),
    ("Metalon galvanized sheet", Unit::SquareMeter, 6.00),
    ("Metalon 30x30", Unit::LinearMeter, 9.17),
    ("Metalon 20x20", Unit::LinearMeter, 7.00),
    ("Metalon 50x30", Unit::LinearMeter, 13.00),
    ("MDF White 6mm", Unit::SquareMeter, 33.80),
    ("Slatwall panel", Unit::SquareMeter, 75.55),
    ("Mirror", Unit::SquareMeter, 92.11),
    ("Glass 4mm", Unit::SquareMeter, 190.00),
    ("Glass 6mm", Unit::SquareMeter, 328.00),
];

const HARDWARE: &[(&str, Unit, f64)] = &[
    ("Automotive paint white", Unit::Liter, 45.00),
    ("Automotive paint black", Unit::Liter, 45.00),
    ("Automotive paint gold", Unit::Liter, 55.00),
    ("Automotive paint (colors)", Unit::Liter, 45.00),
    ("Edge band white", Unit::LinearMeter, 1.20),
    ("Edge band woodgrain", Unit::LinearMeter, 2.50),
    ("Edge band grey", Unit::LinearMeter, 1.50),
    ("Edge band black", Unit::LinearMeter, 1.50),
    ("Screw 3.5x14", Unit::Unit, 0.04),
    ("Screw 3.5x16", Unit::Unit, 0.05),
    ("Screw 4x40", Unit::Unit, 0.10),
    ("Angle bracket", Unit::Unit, 0.20),
    ("Hole cap", Unit::Unit, 0.06),
    ("Wall plug N8", Unit::Unit, 0.10),
    ("Wall plug N6", Unit::Unit, 0.05),
    ("White glue", Unit::Kilogram, 16.00),
    ("Contact cement", Unit::Kilogram, 67.00),
    ("Round knob", Unit::Unit, 4.00),
    ("Bar handle", Unit::Unit, 5.00),
    ("Heavy duty drawer slide", Unit::Unit, 17.00),
    ("Drawer slide 400mm", Unit::Pair, 11.00),
    ("Drawer slide 350mm", Unit::Pair, 9.50),
    ("Drawer slide 300mm", Unit::Pair, 9.00),
    ("Drawer slide 250mm", Unit::Pair, 8.50),
    ("Straight hinge", Unit::Unit, 3.20),
    ("Curved hinge", Unit::Unit, 3.20),
    ("Varnish", Unit::Liter, 25.00),
    ("Hairpin leg", Unit::Unit, 8.00),
    ("Hanger rod", Unit::LinearMeter, 10.65),
    ("Hanger bracket", Unit::Unit, 1.00),
    ("L-angle bracket", Unit::Unit, 1.50),
    ("Invisible shelf bracket", Unit::Unit, 7.00),
    ("Aluminium handle profile", Unit::Unit, 21.67),
    ("Sliding door kit large", Unit::Pair, 56.00),
    ("Sliding door kit small", Unit::Pair, 25.00),
    ("Bottom door track", Unit::LinearMeter, 24.00),
    ("Top door track", Unit::LinearMeter, 26.00),
    ("Levelling foot", Unit::Unit, 4.00),
    ("Caster with brake", Unit::Unit, 7.50),
    ("Caster without brake", Unit::Unit, 6.50),
    ("Glass shelf support 6mm", Unit::Unit, 1.00),
    ("Push latch", Unit::Unit, 3.00),
    ("Lift-up stay", Unit::Unit, 8.00),
];

/// Default materials and hardware catalog
pub fn materials() -> Vec<MaterialCatalogEntry> {
    RAW_MATERIALS
        .iter()
        .map(|(name, unit, price)| MaterialCatalogEntry::raw(*name, *unit, *price))
        .chain(
            HARDWARE
                .iter()
                .map(|(name, unit, price)| MaterialCatalogEntry::hardware(*name, *unit, *price)),
        )
        .collect()
}

/// Default labor rates, one per activity slot
pub fn labor_rates() -> Vec<LaborRate> {
    use ShopCategory::*;
    [
        ("Cut", 1.5, WoodShop),
        ("Edge gluing and finishing", 5.0, WoodShop),
        ("Assembly", 0.3, WoodShop),
        ("Cut metalon", 5.0, MetalShop),
        ("Sanding", 3.0, MetalShop),
        ("Welding", 10.0, MetalShop),
        ("Painting", 15.0, MetalShop),
        ("Cut glass", 5.0, GlassShop),
        ("Glass finishing", 5.0, GlassShop),
    ]
    .into_iter()
    .map(|(desc, minutes, shop)| LaborRate::new(desc, minutes, Some(shop)))
    .collect()
}

pub fn fixed_costs() -> Vec<FixedCostLine> {
    [
        ("Wages - lead cabinetmaker", CostClass::Direct, 4000.00),
        ("Wages - cabinetmaker", CostClass::Direct, 2200.00),
        ("Wages - assistant", CostClass::Direct, 1600.00),
        ("Wages - metalworker", CostClass::Direct, 1600.00),
        ("Wages - helper", CostClass::Direct, 1300.00),
        ("Wages - office manager", CostClass::Indirect, 2500.00),
        ("Wages - sales", CostClass::Indirect, 900.00),
    ]
    .into_iter()
    .map(|(desc, class, value)| FixedCostLine::new(desc, class, value))
    .collect()
}

/// Standard hardware bundle; quantities and prices start at zero
pub fn fixed_hardware() -> Vec<FixedHardwareLine> {
    [
        ("Hanger bracket", 5.0),
        ("Screws 3.5x14", 0.5),
        ("Hole caps", 0.2),
        ("Screws 3.5x25", 0.5),
    ]
    .into_iter()
    .map(|(name, minutes)| FixedHardwareLine::new(name, Unit::Unit, 0.0, 0.0, minutes))
    .collect()
}

pub fn card_rates() -> Vec<CardRateTier> {
    [(1, 3.5), (2, 4.5), (3, 5.0), (4, 6.0), (5, 7.5), (6, 9.0), (10, 12.5), (12, 14.0)]
        .into_iter()
        .map(|(n, fee)| CardRateTier::new(n, fee))
        .collect()
}

pub fn categories() -> Vec<ProductCategory> {
    [
        ("Sideboard", 50.0),
        ("Wall cabinet", 55.0),
        ("Kitchen base cabinet", 60.0),
        ("Laundry cabinet", 55.0),
        ("Reception counter", 65.0),
        ("Workbench", 60.0),
        ("Single bed", 52.0),
        ("Double bed", 55.0),
        ("Chest of drawers", 55.0),
        ("Nightstand", 45.0),
        ("Desk", 50.0),
        ("Bookcase", 45.0),
        ("Display case", 60.0),
        ("Wardrobe", 55.0),
        ("Built-in wardrobe", 60.0),
        ("Niches", 40.0),
        ("Organizer", 42.0),
        ("TV panel", 50.0),
        ("Slatted panel", 55.0),
        ("Shelf", 50.0),
        ("TV stand", 50.0),
        ("Shoe cabinet", 50.0),
        ("Dining table", 60.0),
        ("Coffee table", 55.0),
        ("Dressing table", 55.0),
    ]
    .into_iter()
    .map(|(name, margin)| ProductCategory::new(name, margin))
    .collect()
}
