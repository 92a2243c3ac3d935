//! Piece entity type - cut parts listed on the cutting sheet

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::engine::piece::{derive_metrics, effective_width};

/// Edge-band / fastener classification letter
///
/// The letter's shape mirrors which sides of the panel get banded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLetter {
    /// All four sides
    O,
    /// One long side
    I,
    /// Long, long, short
    U,
    /// Short, short, long
    C,
    /// Both long sides
    H,
    /// Two adjacent sides
    L,
}

/// Stored letters are case-insensitive; an unknown letter means no banding
fn lenient_edge_letter<'de, D>(deserializer: D) -> Result<Option<EdgeLetter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        if s.trim().is_empty() {
            return None;
        }
        match s.parse() {
            Ok(letter) => Some(letter),
            Err(_) => {
                warn!(letter = %s, "unknown edge letter, treating piece as unbanded");
                None
            }
        }
    }))
}

impl std::fmt::Display for EdgeLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            EdgeLetter::O => 'O',
            EdgeLetter::I => 'I',
            EdgeLetter::U => 'U',
            EdgeLetter::C => 'C',
            EdgeLetter::H => 'H',
            EdgeLetter::L => 'L',
        };
        write!(f, "{}", c)
    }
}

impl std::str::FromStr for EdgeLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "O" => Ok(EdgeLetter::O),
            "I" => Ok(EdgeLetter::I),
            "U" => Ok(EdgeLetter::U),
            "C" => Ok(EdgeLetter::C),
            "H" => Ok(EdgeLetter::H),
            "L" => Ok(EdgeLetter::L),
            _ => Err(format!(
                "Invalid edge letter: {}. Use O, I, U, C, H, or L",
                s
            )),
        }
    }
}

/// Quantities derived from a piece's own dimensions
///
/// Never set directly; recomputed whenever the piece is created or changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceMetrics {
    /// Total area for all copies (mm²)
    pub area_mm2: f64,
    /// Total perimeter for all copies (mm)
    pub perimeter_mm: f64,
    /// Total edge-band length for all copies (mm)
    pub edge_length_mm: f64,
    /// Total fastener count for all copies
    pub fasteners: f64,
}

/// Operator-entered fields of a piece
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceDraft {
    /// Material family name, matched against the catalog by exact name
    pub material: String,
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_edge_letter",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_letter: Option<EdgeLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint_color: Option<String>,
}

/// Partial update for a piece; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct PiecePatch {
    pub material: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub quantity: Option<f64>,
    pub name: Option<String>,
    pub edge_color: Option<String>,
    pub edge_letter: Option<Option<EdgeLetter>>,
    pub paint_color: Option<String>,
}

/// A Piece entity - one line of the cutting sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: EntityId,

    pub material: String,

    /// Length in mm
    pub length: f64,

    /// Width in mm (always 0 for bar stock)
    #[serde(default)]
    pub width: f64,

    pub quantity: f64,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_edge_letter",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_letter: Option<EdgeLetter>,

    /// Paint color for metal pieces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint_color: Option<String>,

    /// Cached derived quantities
    #[serde(default)]
    pub metrics: PieceMetrics,
}

impl_entity!(Piece, "PCE", name);

impl Piece {
    /// Build a piece from a draft, deriving its cached metrics
    ///
    /// Validation is the store's job; this only normalizes and derives.
    pub fn from_draft(draft: PieceDraft) -> Self {
        let mut piece = Self {
            id: EntityId::new(EntityPrefix::Pce),
            name: draft.name.unwrap_or_default(),
            material: draft.material,
            length: draft.length,
            width: draft.width,
            quantity: draft.quantity,
            edge_color: draft.edge_color.filter(|c| !c.trim().is_empty()),
            edge_letter: draft.edge_letter,
            paint_color: draft.paint_color.filter(|c| !c.trim().is_empty()),
            metrics: PieceMetrics::default(),
        };
        piece.refresh();
        piece
    }

    /// Snapshot of the operator-entered fields
    pub fn draft(&self) -> PieceDraft {
        PieceDraft {
            material: self.material.clone(),
            length: self.length,
            width: self.width,
            quantity: self.quantity,
            name: (!self.name.is_empty()).then(|| self.name.clone()),
            edge_color: self.edge_color.clone(),
            edge_letter: self.edge_letter,
            paint_color: self.paint_color.clone(),
        }
    }

    /// Merge a patch over this piece's inputs
    pub fn patched(&self, patch: PiecePatch) -> PieceDraft {
        let current = self.draft();
        PieceDraft {
            material: patch.material.unwrap_or(current.material),
            length: patch.length.unwrap_or(current.length),
            width: patch.width.unwrap_or(current.width),
            quantity: patch.quantity.unwrap_or(current.quantity),
            name: patch.name.or(current.name),
            edge_color: patch.edge_color.or(current.edge_color),
            edge_letter: patch.edge_letter.unwrap_or(current.edge_letter),
            paint_color: patch.paint_color.or(current.paint_color),
        }
    }

    /// Re-apply the bar-stock width rule and recompute the cached metrics
    pub fn refresh(&mut self) {
        self.width = effective_width(&self.material, self.width);
        self.metrics = derive_metrics(self.length, self.width, self.quantity, self.edge_letter);
    }

    /// Display name, falling back to the material
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.material
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(material: &str, length: f64, width: f64, quantity: f64) -> PieceDraft {
        PieceDraft {
            material: material.to_string(),
            length,
            width,
            quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_stored_edge_letter_is_lenient() {
        let yaml = |letter: &str| {
            format!(
                "id: PCE-01ARZ3NDEKTSV4RRFFQ69G5FAV\nmaterial: Plywood\nlength: 100\nwidth: 50\nquantity: 1\nedge_letter: {}\n",
                letter
            )
        };
        let lower: Piece = serde_yml::from_str(&yaml("o")).unwrap();
        assert_eq!(lower.edge_letter, Some(EdgeLetter::O));

        let unknown: Piece = serde_yml::from_str(&yaml("X")).unwrap();
        assert_eq!(unknown.edge_letter, None);

        let blank: Piece = serde_yml::from_str(&yaml("''")).unwrap();
        assert_eq!(blank.edge_letter, None);
    }

    #[test]
    fn test_edge_letter_parse() {
        assert_eq!("o".parse::<EdgeLetter>().unwrap(), EdgeLetter::O);
        assert_eq!(" H ".parse::<EdgeLetter>().unwrap(), EdgeLetter::H);
        assert!("X".parse::<EdgeLetter>().is_err());
    }

    #[test]
    fn test_from_draft_derives_metrics() {
        let mut d = draft("MDF White 15mm", 1000.0, 500.0, 2.0);
        d.edge_letter = Some(EdgeLetter::O);
        let piece = Piece::from_draft(d);

        assert_eq!(piece.metrics.area_mm2, 1_000_000.0);
        assert_eq!(piece.metrics.perimeter_mm, 6000.0);
        assert_eq!(piece.metrics.edge_length_mm, 6000.0);
        assert_eq!(piece.metrics.fasteners, 0.0);
    }

    #[test]
    fn test_bar_stock_width_forced_to_zero() {
        let piece = Piece::from_draft(draft("Metalon 30x30", 2000.0, 100.0, 3.0));
        assert_eq!(piece.width, 0.0);
        assert_eq!(piece.metrics.area_mm2, 0.0);
        assert_eq!(piece.metrics.perimeter_mm, 12_000.0);
    }

    #[test]
    fn test_patch_rederives() {
        let mut d = draft("MDF White 15mm", 600.0, 400.0, 1.0);
        d.edge_letter = Some(EdgeLetter::H);
        let piece = Piece::from_draft(d);
        assert_eq!(piece.metrics.fasteners, 4.0);

        let patched = piece.patched(PiecePatch {
            quantity: Some(3.0),
            edge_letter: Some(Some(EdgeLetter::L)),
            ..Default::default()
        });
        let updated = Piece::from_draft(patched);
        assert_eq!(updated.metrics.fasteners, 6.0);
        assert_eq!(updated.metrics.edge_length_mm, 3000.0);
    }

    #[test]
    fn test_blank_colors_are_dropped() {
        let mut d = draft("MDF White 15mm", 100.0, 100.0, 1.0);
        d.edge_color = Some("  ".to_string());
        d.paint_color = Some(String::new());
        let piece = Piece::from_draft(d);
        assert_eq!(piece.edge_color, None);
        assert_eq!(piece.paint_color, None);
    }

    #[test]
    fn test_display_name_falls_back_to_material() {
        let piece = Piece::from_draft(draft("Plywood", 100.0, 100.0, 1.0));
        assert_eq!(piece.display_name(), "Plywood");
    }
}
