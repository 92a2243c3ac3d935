//! Material cost aggregation by family, paint and edge band

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::classify::{
    classify_family, normalize, MaterialFamily, EDGE_BAND_PREFIX, GENERIC_PAINT, PAINT_PREFIX,
};
use crate::entities::material::MaterialCatalogEntry;
use crate::entities::piece::Piece;

/// Liters of paint per linear meter of metal stock
pub const PAINT_LITERS_PER_METER: f64 = 0.025;

/// Unit price used when no paint entry is in the catalog
pub const DEFAULT_PAINT_PRICE: f64 = 45.00;

/// Price per meter used when no edge band entry matches a color
pub const DEFAULT_EDGE_BAND_PRICE: f64 = 1.50;

/// Where a unit price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Catalog,
    Fallback,
}

impl PriceSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PriceSource::Fallback)
    }
}

/// A unit price plus its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priced {
    pub unit_price: f64,
    pub source: PriceSource,
}

impl Priced {
    fn catalog(unit_price: f64) -> Self {
        Self {
            unit_price,
            source: PriceSource::Catalog,
        }
    }

    fn fallback(unit_price: f64) -> Self {
        Self {
            unit_price,
            source: PriceSource::Fallback,
        }
    }
}

/// Catalog entry for a material family name (exact match)
pub fn find_material<'a>(
    catalog: &'a [MaterialCatalogEntry],
    name: &str,
) -> Option<&'a MaterialCatalogEntry> {
    catalog.iter().find(|e| e.name == name)
}

/// First catalog entry whose normalized name contains `needle`
pub fn find_containing<'a>(
    catalog: &'a [MaterialCatalogEntry],
    needle: &str,
) -> Option<&'a MaterialCatalogEntry> {
    catalog.iter().find(|e| normalize(&e.name).contains(needle))
}

/// Paint price for a color: per-color entry, the generic entry, white, then the default
pub fn paint_price(catalog: &[MaterialCatalogEntry], color: &str) -> Priced {
    let needle = format!("{} {}", PAINT_PREFIX, normalize(color));
    if let Some(entry) = find_containing(catalog, &needle) {
        return Priced::catalog(entry.unit_price);
    }
    if let Some(entry) = catalog.iter().find(|e| normalize(&e.name) == GENERIC_PAINT) {
        return Priced::catalog(entry.unit_price);
    }
    if let Some(entry) = find_containing(catalog, &format!("{PAINT_PREFIX} white")) {
        debug!(color, "no generic paint entry, pricing as white");
        return Priced::catalog(entry.unit_price);
    }
    warn!(color, "no paint entry in catalog, using default price");
    Priced::fallback(DEFAULT_PAINT_PRICE)
}

/// Edge band price per meter for a color
pub fn edge_band_price(catalog: &[MaterialCatalogEntry], color: &str) -> Priced {
    let wanted = format!("{} {}", EDGE_BAND_PREFIX, normalize(color));
    match catalog.iter().find(|e| normalize(&e.name) == wanted) {
        Some(entry) => Priced::catalog(entry.unit_price),
        None => {
            warn!(color, "no edge band entry in catalog, using default price");
            Priced::fallback(DEFAULT_EDGE_BAND_PRICE)
        }
    }
}

/// Cost of one piece's stock. Unmatched families cost nothing.
pub fn piece_material_cost(catalog: &[MaterialCatalogEntry], piece: &Piece) -> f64 {
    match find_material(catalog, &piece.material) {
        Some(entry) if entry.unit.is_linear() => {
            (piece.length / 1000.0) * piece.quantity * entry.unit_price
        }
        Some(entry) => (piece.metrics.area_mm2 / 1_000_000.0) * entry.unit_price,
        None => {
            debug!(material = %piece.material, "material not in catalog, costed at zero");
            0.0
        }
    }
}

/// Edge band usage for one color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBandUsage {
    pub color: String,
    pub length_mm: f64,
    pub unit_price: f64,
    pub cost: f64,
    pub source: PriceSource,
}

/// Edge band length per color, in first-seen order
///
/// Pieces without a color or with no banded length are skipped.
pub fn edge_band_usage(catalog: &[MaterialCatalogEntry], pieces: &[Piece]) -> Vec<EdgeBandUsage> {
    let mut lengths: Vec<(String, f64)> = Vec::new();
    for piece in pieces {
        let Some(color) = piece.edge_color.as_deref() else {
            continue;
        };
        if piece.metrics.edge_length_mm <= 0.0 {
            continue;
        }
        match lengths.iter_mut().find(|(c, _)| c == color) {
            Some((_, total)) => *total += piece.metrics.edge_length_mm,
            None => lengths.push((color.to_string(), piece.metrics.edge_length_mm)),
        }
    }

    lengths
        .into_iter()
        .map(|(color, length_mm)| {
            let priced = edge_band_price(catalog, &color);
            EdgeBandUsage {
                cost: (length_mm / 1000.0) * priced.unit_price,
                unit_price: priced.unit_price,
                source: priced.source,
                color,
                length_mm,
            }
        })
        .collect()
}

/// Cost buckets and physical totals over all pieces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTotals {
    pub wood_cost: f64,
    pub metal_cost: f64,
    pub glass_cost: f64,
    /// Paint share of `metal_cost`
    pub paint_cost: f64,
    pub tape_cost: f64,

    pub total_area_mm2: f64,
    pub total_perimeter_mm: f64,
    pub total_edge_length_mm: f64,
    pub total_fasteners: f64,

    pub wood_perimeter_mm: f64,
    pub wood_edge_length_mm: f64,
    pub metal_pieces: f64,
    pub metal_length_mm: f64,
    pub glass_perimeter_mm: f64,

    pub edge_bands: Vec<EdgeBandUsage>,
}

impl MaterialTotals {
    pub fn material_cost(&self) -> f64 {
        self.wood_cost + self.metal_cost + self.glass_cost
    }
}

/// Aggregate cost and physical quantities over all pieces
pub fn aggregate(catalog: &[MaterialCatalogEntry], pieces: &[Piece]) -> MaterialTotals {
    let mut totals = MaterialTotals::default();

    for piece in pieces {
        let m = &piece.metrics;
        totals.total_area_mm2 += m.area_mm2;
        totals.total_perimeter_mm += m.perimeter_mm;
        totals.total_edge_length_mm += m.edge_length_mm;
        totals.total_fasteners += m.fasteners;

        let cost = piece_material_cost(catalog, piece);
        match classify_family(&piece.material) {
            MaterialFamily::Metal => {
                totals.metal_cost += cost;
                totals.metal_pieces += piece.quantity;
                totals.metal_length_mm += piece.length * piece.quantity;

                if let Some(color) = piece.paint_color.as_deref() {
                    let liters = (piece.length / 1000.0) * piece.quantity * PAINT_LITERS_PER_METER;
                    let paint = liters * paint_price(catalog, color).unit_price;
                    totals.paint_cost += paint;
                    totals.metal_cost += paint;
                }
            }
            MaterialFamily::Glass => {
                totals.glass_cost += cost;
                totals.glass_perimeter_mm += m.perimeter_mm;
            }
            MaterialFamily::Wood => {
                totals.wood_cost += cost;
                totals.wood_perimeter_mm += m.perimeter_mm;
                totals.wood_edge_length_mm += m.edge_length_mm;
            }
        }
    }

    totals.edge_bands = edge_band_usage(catalog, pieces);
    totals.tape_cost = totals.edge_bands.iter().map(|u| u.cost).sum();

    debug!(
        wood = totals.wood_cost,
        metal = totals.metal_cost,
        glass = totals.glass_cost,
        tape = totals.tape_cost,
        "material buckets"
    );
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::material::Unit;
    use crate::entities::piece::{EdgeLetter, PieceDraft};

    fn piece(material: &str, l: f64, w: f64, q: f64) -> Piece {
        Piece::from_draft(PieceDraft {
            material: material.to_string(),
            length: l,
            width: w,
            quantity: q,
            ..Default::default()
        })
    }

    fn catalog() -> Vec<MaterialCatalogEntry> {
        vec![
            MaterialCatalogEntry::raw("MDF White 15mm", Unit::SquareMeter, 80.0),
            MaterialCatalogEntry::raw("Metalon 30x30", Unit::LinearMeter, 12.0),
            MaterialCatalogEntry::raw("Glass 6mm", Unit::SquareMeter, 150.0),
            MaterialCatalogEntry::raw("Automotive paint black", Unit::Liter, 60.0),
            MaterialCatalogEntry::raw("Edge band white", Unit::LinearMeter, 2.0),
        ]
    }

    #[test]
    fn test_area_costed_wood() {
        let p = piece("MDF White 15mm", 1000.0, 500.0, 2.0);
        assert!((piece_material_cost(&catalog(), &p) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_costed_metal() {
        let p = piece("Metalon 30x30", 2000.0, 100.0, 3.0);
        assert!((piece_material_cost(&catalog(), &p) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_material_costs_zero_but_counts_physically() {
        let p = piece("Walnut slab", 1000.0, 1000.0, 1.0);
        let totals = aggregate(&catalog(), &[p]);
        assert_eq!(totals.wood_cost, 0.0);
        assert_eq!(totals.wood_perimeter_mm, 4000.0);
        assert_eq!(totals.total_area_mm2, 1_000_000.0);
    }

    #[test]
    fn test_paint_lookup_order() {
        let cat = catalog();
        assert_eq!(paint_price(&cat, "Black"), Priced::catalog(60.0));

        let mut with_generic = cat.clone();
        with_generic.push(MaterialCatalogEntry::raw(
            "Automotive paint (colors)",
            Unit::Liter,
            50.0,
        ));
        assert_eq!(paint_price(&with_generic, "red"), Priced::catalog(50.0));

        let mut with_white = cat.clone();
        with_white.push(MaterialCatalogEntry::raw(
            "Automotive paint white",
            Unit::Liter,
            40.0,
        ));
        assert_eq!(paint_price(&with_white, "red"), Priced::catalog(40.0));
        with_white.push(MaterialCatalogEntry::raw(
            "Automotive paint (colors)",
            Unit::Liter,
            50.0,
        ));
        assert_eq!(paint_price(&with_white, "red"), Priced::catalog(50.0));
        assert_eq!(paint_price(&cat, "red"), Priced::fallback(DEFAULT_PAINT_PRICE));

        let fallback = paint_price(&[], "red");
        assert_eq!(fallback.unit_price, DEFAULT_PAINT_PRICE);
        assert!(fallback.source.is_fallback());
    }

    #[test]
    fn test_paint_added_to_metal_bucket() {
        let mut p = piece("Metalon 30x30", 2000.0, 0.0, 2.0);
        p.paint_color = Some("black".to_string());
        let totals = aggregate(&catalog(), &[p]);
        // 4 m of stock at 12.00 plus 0.1 l of paint at 60.00
        assert!((totals.paint_cost - 6.0).abs() < 1e-9);
        assert!((totals.metal_cost - 54.0).abs() < 1e-9);
        assert_eq!(totals.metal_pieces, 2.0);
        assert_eq!(totals.metal_length_mm, 4000.0);
    }

    #[test]
    fn test_edge_band_grouped_by_color() {
        let mut a = piece("MDF White 15mm", 1000.0, 500.0, 1.0);
        a.edge_color = Some("White".to_string());
        a.edge_letter = Some(EdgeLetter::I);
        a.refresh();
        let mut b = a.clone();
        b.length = 500.0;
        b.refresh();
        let mut c = piece("MDF White 15mm", 1000.0, 500.0, 1.0);
        c.edge_color = Some("Oak".to_string());
        c.edge_letter = Some(EdgeLetter::O);
        c.refresh();

        let usage = edge_band_usage(&catalog(), &[a, b, c]);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].color, "White");
        assert_eq!(usage[0].length_mm, 1500.0);
        assert_eq!(usage[0].unit_price, 2.0);
        assert!((usage[0].cost - 3.0).abs() < 1e-9);
        assert_eq!(usage[1].unit_price, DEFAULT_EDGE_BAND_PRICE);
        assert!(usage[1].source.is_fallback());
    }

    #[test]
    fn test_glass_perimeter() {
        let p = piece("Glass 6mm", 1000.0, 500.0, 1.0);
        let totals = aggregate(&catalog(), &[p]);
        assert_eq!(totals.glass_perimeter_mm, 3000.0);
        assert!((totals.glass_cost - 75.0).abs() < 1e-9);
        assert_eq!(totals.wood_perimeter_mm, 0.0);
    }
}
