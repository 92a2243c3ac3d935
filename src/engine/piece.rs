//! Per-piece derivation of area, perimeter, edge length and fasteners
//!
//! Pure functions of a single piece's inputs; no piece reads another.

use crate::engine::classify::is_bar_stock;
use crate::entities::piece::{EdgeLetter, PieceMetrics};

/// Width actually used for a piece: bar stock has none
pub fn effective_width(material: &str, width: f64) -> f64 {
    if is_bar_stock(material) {
        0.0
    } else {
        width
    }
}

/// Edge-band length of a single copy for the given letter
pub fn edge_length_single(letter: Option<EdgeLetter>, length: f64, width: f64) -> f64 {
    match letter {
        Some(EdgeLetter::O) => 2.0 * (length + width),
        Some(EdgeLetter::I) => length,
        Some(EdgeLetter::U) => 2.0 * length + width,
        Some(EdgeLetter::C) => 2.0 * width + length,
        Some(EdgeLetter::H) => 2.0 * length,
        Some(EdgeLetter::L) => length + width,
        None => 0.0,
    }
}

/// Fasteners for all copies
pub fn fastener_count(letter: Option<EdgeLetter>, quantity: f64) -> f64 {
    match letter {
        Some(EdgeLetter::H) | Some(EdgeLetter::I) => 4.0 * quantity,
        Some(EdgeLetter::L) => 2.0 * quantity,
        _ => 0.0,
    }
}

/// Derive all cached metrics for a piece
///
/// `width` must already have the bar-stock rule applied.
pub fn derive_metrics(
    length: f64,
    width: f64,
    quantity: f64,
    letter: Option<EdgeLetter>,
) -> PieceMetrics {
    PieceMetrics {
        area_mm2: length * width * quantity,
        perimeter_mm: 2.0 * (length + width) * quantity,
        edge_length_mm: edge_length_single(letter, length, width) * quantity,
        fasteners: fastener_count(letter, quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LETTERS: [Option<EdgeLetter>; 7] = [
        Some(EdgeLetter::O),
        Some(EdgeLetter::I),
        Some(EdgeLetter::U),
        Some(EdgeLetter::C),
        Some(EdgeLetter::H),
        Some(EdgeLetter::L),
        None,
    ];

    #[test]
    fn test_edge_formulas() {
        let (l, w) = (1000.0, 500.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::O), l, w), 3000.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::I), l, w), 1000.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::U), l, w), 2500.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::C), l, w), 2000.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::H), l, w), 2000.0);
        assert_eq!(edge_length_single(Some(EdgeLetter::L), l, w), 1500.0);
        assert_eq!(edge_length_single(None, l, w), 0.0);
    }

    #[test]
    fn test_wood_panel_scenario() {
        let m = derive_metrics(1000.0, 500.0, 2.0, Some(EdgeLetter::O));
        assert_eq!(m.area_mm2, 1_000_000.0);
        assert_eq!(m.perimeter_mm, 6000.0);
        assert_eq!(m.edge_length_mm, 6000.0);
        assert_eq!(m.fasteners, 0.0);
    }

    #[test]
    fn test_effective_width() {
        assert_eq!(effective_width("Metalon 30x30", 100.0), 0.0);
        assert_eq!(effective_width("MDF Black 15mm", 100.0), 100.0);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let a = derive_metrics(733.0, 291.5, 3.0, Some(EdgeLetter::U));
        let b = derive_metrics(733.0, 291.5, 3.0, Some(EdgeLetter::U));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn perimeter_and_area_follow_dimensions(
            l in 1.0f64..5000.0,
            w in 0.0f64..3000.0,
            q in 1u32..50,
            idx in 0usize..7,
        ) {
            let q = q as f64;
            let m = derive_metrics(l, w, q, LETTERS[idx]);
            prop_assert!((m.perimeter_mm - 2.0 * (l + w) * q).abs() < 1e-6);
            prop_assert!((m.area_mm2 - l * w * q).abs() < 1e-3);
        }

        #[test]
        fn fasteners_depend_only_on_letter_and_quantity(q in 0u32..1000, idx in 0usize..7) {
            let q = q as f64;
            let expected = match LETTERS[idx] {
                Some(EdgeLetter::H) | Some(EdgeLetter::I) => 4.0 * q,
                Some(EdgeLetter::L) => 2.0 * q,
                _ => 0.0,
            };
            prop_assert_eq!(fastener_count(LETTERS[idx], q), expected);
        }

        #[test]
        fn bar_stock_has_no_area(l in 1.0f64..6000.0, w in 1.0f64..500.0, q in 1u32..20) {
            let width = effective_width("Metalon 20x20", w);
            let m = derive_metrics(l, width, q as f64, None);
            prop_assert_eq!(m.area_mm2, 0.0);
        }
    }
}
