//! Quote settings and product categories

use serde::{Deserialize, Serialize};

use crate::core::entity::impl_entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A product category with the margin the workshop aims for on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: EntityId,
    pub name: String,
    /// Ideal profit margin percent
    pub ideal_margin: f64,
}

impl_entity!(ProductCategory, "CAT", name);

impl ProductCategory {
    pub fn new(name: impl Into<String>, ideal_margin: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cat),
            name: name.into(),
            ideal_margin,
        }
    }
}

/// Company details printed on proposal documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_terms: Option<String>,
}

/// Pricing and capacity settings for the current quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Markup applied over total cost, in percent
    #[serde(default = "default_margin")]
    pub profit_margin: f64,

    /// Flat amount added to total cost
    #[serde(default)]
    pub extra_cost: f64,

    #[serde(default = "default_employees")]
    pub employees: f64,

    /// Working hours per employee per month
    #[serde(default = "default_monthly_hours")]
    pub monthly_hours: f64,

    /// Selected product category name (empty when none)
    #[serde(default)]
    pub product_category: String,

    #[serde(default)]
    pub company: CompanyInfo,
}

fn default_margin() -> f64 {
    30.0
}

fn default_employees() -> f64 {
    2.0
}

fn default_monthly_hours() -> f64 {
    160.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profit_margin: default_margin(),
            extra_cost: 0.0,
            employees: default_employees(),
            monthly_hours: default_monthly_hours(),
            product_category: String::new(),
            company: CompanyInfo::default(),
        }
    }
}

impl Settings {
    /// Monthly shop capacity in hours
    pub fn capacity_hours(&self) -> f64 {
        self.employees * self.monthly_hours
    }

    /// Select a category; a known category also sets the margin to its ideal
    pub fn select_category(&mut self, name: &str, categories: &[ProductCategory]) {
        self.product_category = name.to_string();
        if let Some(cat) = categories.iter().find(|c| c.name == name) {
            self.profit_margin = cat.ideal_margin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.profit_margin, 30.0);
        assert_eq!(settings.capacity_hours(), 320.0);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings: Settings = serde_yml::from_str("profit_margin: 45\n").unwrap();
        assert_eq!(settings.profit_margin, 45.0);
        assert_eq!(settings.employees, 2.0);
        assert_eq!(settings.monthly_hours, 160.0);
    }

    #[test]
    fn test_select_known_category_sets_margin() {
        let cats = vec![ProductCategory::new("Wardrobe", 55.0)];
        let mut settings = Settings::default();
        settings.select_category("Wardrobe", &cats);
        assert_eq!(settings.product_category, "Wardrobe");
        assert_eq!(settings.profit_margin, 55.0);
    }

    #[test]
    fn test_select_unknown_category_keeps_margin() {
        let mut settings = Settings::default();
        settings.select_category("Spaceship", &[]);
        assert_eq!(settings.product_category, "Spaceship");
        assert_eq!(settings.profit_margin, 30.0);
    }
}
