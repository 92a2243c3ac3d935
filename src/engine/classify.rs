//! Name-based classification rules
//!
//! Every substring heuristic the engine applies to free-text names lives in
//! this table. Matching is always done on the normalized (trimmed,
//! lowercased) name.

use serde::{Deserialize, Serialize};

/// A substring rule: matches when any `any_of` marker is present and no
/// `none_of` marker is
#[derive(Debug, Clone, Copy)]
pub struct NamePattern {
    pub any_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl NamePattern {
    const fn any(any_of: &'static [&'static str]) -> Self {
        Self {
            any_of,
            none_of: &[],
        }
    }

    /// Test an already-normalized name
    pub fn matches(&self, normalized: &str) -> bool {
        self.any_of.iter().any(|m| normalized.contains(m))
            && !self.none_of.iter().any(|m| normalized.contains(m))
    }

    /// Normalize then test
    pub fn matches_name(&self, name: &str) -> bool {
        self.matches(&normalize(name))
    }
}

/// Metal bar and profile stock
pub const METAL: NamePattern = NamePattern::any(&["metalon", "steel tube", "metal profile", "metalwork"]);

/// Glass and mirror stock
pub const GLASS: NamePattern = NamePattern::any(&["glass", "mirror"]);

/// Stock with no meaningful width (bars, tubes, profiles)
pub const BAR_STOCK: NamePattern = METAL;

pub const HANGER_ROD: NamePattern = NamePattern::any(&["hanger rod", "hanger tube"]);
pub const DRAWER_SLIDE: NamePattern = NamePattern::any(&["drawer slide"]);
pub const HANGER_BRACKET: NamePattern = NamePattern::any(&["hanger bracket", "hanger support"]);
pub const ANGLE_BRACKET: NamePattern = NamePattern {
    any_of: &["angle bracket"],
    none_of: &["l-angle bracket"],
};
pub const L_ANGLE_BRACKET: NamePattern = NamePattern::any(&["l-angle bracket"]);
pub const CASTER: NamePattern = NamePattern::any(&["caster", "wheel"]);
pub const HOLE_CAP: NamePattern = NamePattern::any(&["hole cap"]);
/// Standard small screw used for generated fixings
pub const SMALL_SCREW: NamePattern = NamePattern::any(&["3.5x14"]);

/// Prefix of per-color paint entries ("Automotive paint black")
pub const PAINT_PREFIX: &str = "automotive paint";
/// Exact name of the generic paint entry
pub const GENERIC_PAINT: &str = "automotive paint (colors)";
/// Prefix of per-color edge band entries ("Edge band white")
pub const EDGE_BAND_PREFIX: &str = "edge band";

/// Trim and lowercase a name for matching
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Material family of a cut piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialFamily {
    Wood,
    Metal,
    Glass,
}

impl std::fmt::Display for MaterialFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialFamily::Wood => write!(f, "wood"),
            MaterialFamily::Metal => write!(f, "metal"),
            MaterialFamily::Glass => write!(f, "glass"),
        }
    }
}

/// Classify a material family name. Metal wins over glass; anything else is wood.
pub fn classify_family(name: &str) -> MaterialFamily {
    let normalized = normalize(name);
    if METAL.matches(&normalized) {
        MaterialFamily::Metal
    } else if GLASS.matches(&normalized) {
        MaterialFamily::Glass
    } else {
        MaterialFamily::Wood
    }
}

pub fn is_bar_stock(name: &str) -> bool {
    BAR_STOCK.matches_name(name)
}

/// Hardware tags that drive the BOM cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareTag {
    HangerRod,
    DrawerSlide,
    HangerBracket,
    AngleBracket,
    LAngleBracket,
    Caster,
}

const HARDWARE_TABLE: &[(HardwareTag, NamePattern)] = &[
    (HardwareTag::HangerRod, HANGER_ROD),
    (HardwareTag::DrawerSlide, DRAWER_SLIDE),
    (HardwareTag::HangerBracket, HANGER_BRACKET),
    (HardwareTag::AngleBracket, ANGLE_BRACKET),
    (HardwareTag::Caster, CASTER),
    (HardwareTag::LAngleBracket, L_ANGLE_BRACKET),
];

/// All tags a hardware name carries, in rule order
///
/// A name can carry several tags; each one fires independently.
pub fn hardware_tags(name: &str) -> Vec<HardwareTag> {
    let normalized = normalize(name);
    HARDWARE_TABLE
        .iter()
        .filter(|(_, pattern)| pattern.matches(&normalized))
        .map(|(tag, _)| *tag)
        .collect()
}
