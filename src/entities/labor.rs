//! Labor rate entity type - minutes per unit of shop work

use serde::{Deserialize, Serialize};

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Shop that performs an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    WoodShop,
    MetalShop,
    GlassShop,
    /// Any other shop; never matched by the standard activity slots
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ShopCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShopCategory::WoodShop => write!(f, "wood_shop"),
            ShopCategory::MetalShop => write!(f, "metal_shop"),
            ShopCategory::GlassShop => write!(f, "glass_shop"),
            ShopCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ShopCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "wood_shop" | "wood" => Ok(ShopCategory::WoodShop),
            "metal_shop" | "metal" => Ok(ShopCategory::MetalShop),
            "glass_shop" | "glass" => Ok(ShopCategory::GlassShop),
            "other" => Ok(ShopCategory::Other),
            _ => Err(format!(
                "Invalid shop category: {}. Use wood_shop, metal_shop, glass_shop, or other",
                s
            )),
        }
    }
}

/// A LaborRate entity - how long one unit of an activity takes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRate {
    pub id: EntityId,

    /// Activity description, matched by keyword (e.g. "Cut", "Welding")
    pub description: String,

    /// Minutes per unit (per meter, per piece or per fastener)
    pub minutes_per_unit: f64,

    /// Shop category; unset on legacy entries, which count as wood shop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ShopCategory>,
}

impl_entity!(LaborRate, "LAB", description);

impl LaborRate {
    pub fn new(
        description: impl Into<String>,
        minutes_per_unit: f64,
        category: Option<ShopCategory>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Lab),
            description: description.into(),
            minutes_per_unit,
            category,
        }
    }

    /// Whether this rate belongs to the given shop
    ///
    /// Legacy entries without a category belong to the wood shop.
    pub fn in_shop(&self, shop: ShopCategory) -> bool {
        match self.category {
            Some(category) => category == shop,
            None => shop == ShopCategory::WoodShop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_rate_is_wood_shop() {
        let rate = LaborRate::new("Cut", 1.5, None);
        assert!(rate.in_shop(ShopCategory::WoodShop));
        assert!(!rate.in_shop(ShopCategory::MetalShop));
    }

    #[test]
    fn test_other_category_matches_no_standard_shop() {
        let rate = LaborRate::new("Upholstery", 20.0, Some(ShopCategory::Other));
        assert!(!rate.in_shop(ShopCategory::WoodShop));
        assert!(!rate.in_shop(ShopCategory::GlassShop));
    }

    #[test]
    fn test_unknown_category_deserializes_as_other() {
        let yaml = format!(
            "id: {}\ndescription: Polish\nminutes_per_unit: 2\ncategory: paint_booth\n",
            EntityId::new(EntityPrefix::Lab)
        );
        let rate: LaborRate = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(rate.category, Some(ShopCategory::Other));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("metal-shop".parse::<ShopCategory>().unwrap(), ShopCategory::MetalShop);
        assert_eq!("glass".parse::<ShopCategory>().unwrap(), ShopCategory::GlassShop);
        assert!("bakery".parse::<ShopCategory>().is_err());
    }
}
