//! Entity store - the caller-owned container of every quote collection
//!
//! All mutations go through validating methods; a rejected operation
//! leaves the store untouched. The engine reads the store through
//! [`EntityStore::inputs`], which borrows every collection at once.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::defaults;
use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::shortid::{Resolution, ShortIdIndex};
use crate::engine::classify::is_bar_stock;
use crate::engine::{self, EngineError, QuoteInputs, QuoteOutcome};
use crate::entities::card_rate::CardRateTier;
use crate::entities::cost::{AdditionalServiceLine, CostClass, FixedCostLine};
use crate::entities::hardware::{FixedHardwareLine, ProjectHardwareLine};
use crate::entities::labor::{LaborRate, ShopCategory};
use crate::entities::material::{MaterialCatalogEntry, MaterialKind, Unit};
use crate::entities::piece::{Piece, PieceDraft, PiecePatch};
use crate::entities::proposal::ProposalData;
use crate::entities::settings::{ProductCategory, Settings};

/// Errors from store operations
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("No {kind} matches '{reference}'")]
    NotFound { kind: &'static str, reference: String },

    #[error("'{reference}' matches {count} {kind} records; use a longer prefix")]
    Ambiguous {
        kind: &'static str,
        reference: String,
        count: usize,
    },

    #[error("A {kind} named '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, StoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(field, "must be a number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, StoreError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, format!("must not be negative (got {})", value)));
    }
    Ok(value)
}

fn positive(field: &'static str, value: f64) -> Result<f64, StoreError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, format!("must be greater than zero (got {})", value)));
    }
    Ok(value)
}

fn non_empty(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Index of the record a reference points to
fn position<T: Entity>(items: &[T], kind: &'static str, reference: &str) -> Result<usize, StoreError> {
    let index = ShortIdIndex::from_ids(items.iter().map(|i| i.id()));
    match index.resolve(reference) {
        Resolution::Found(id) => items
            .iter()
            .position(|i| *i.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                kind,
                reference: reference.to_string(),
            }),
        Resolution::Ambiguous(count) => Err(StoreError::Ambiguous {
            kind,
            reference: reference.to_string(),
            count,
        }),
        Resolution::Missing => by_label(items, kind, reference),
    }
}

/// Fall back to a case-insensitive label match ("Hanger rod")
fn by_label<T: Entity>(items: &[T], kind: &'static str, reference: &str) -> Result<usize, StoreError> {
    let wanted = reference.trim();
    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, i)| !wanted.is_empty() && i.label().eq_ignore_ascii_case(wanted))
        .map(|(idx, _)| idx)
        .collect();
    match matches.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(StoreError::NotFound {
            kind,
            reference: reference.to_string(),
        }),
        many => Err(StoreError::Ambiguous {
            kind,
            reference: reference.to_string(),
            count: many.len(),
        }),
    }
}

// =========================================================================
// Patches
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub unit: Option<Unit>,
    pub unit_price: Option<f64>,
    pub kind: Option<MaterialKind>,
    pub install_minutes: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct HardwarePatch {
    pub name: Option<String>,
    pub unit: Option<Unit>,
    pub unit_price: Option<f64>,
    pub quantity: Option<f64>,
    pub install_minutes: Option<f64>,
    pub meterage: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct LaborPatch {
    pub description: Option<String>,
    pub minutes_per_unit: Option<f64>,
    pub category: Option<ShopCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct CostPatch {
    pub description: Option<String>,
    pub class: Option<CostClass>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub profit_margin: Option<f64>,
    pub extra_cost: Option<f64>,
    pub employees: Option<f64>,
    pub monthly_hours: Option<f64>,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub warranty_terms: Option<String>,
}

// =========================================================================
// Store
// =========================================================================

/// Every collection that makes up a quote, plus settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStore {
    catalog: Vec<MaterialCatalogEntry>,
    pieces: Vec<Piece>,
    project_hardware: Vec<ProjectHardwareLine>,
    fixed_hardware: Vec<FixedHardwareLine>,
    labor_rates: Vec<LaborRate>,
    fixed_costs: Vec<FixedCostLine>,
    card_rates: Vec<CardRateTier>,
    services: Vec<AdditionalServiceLine>,
    categories: Vec<ProductCategory>,
    settings: Settings,
}

impl EntityStore {
    /// A store seeded with the default workshop catalogs
    pub fn with_defaults() -> Self {
        Self {
            catalog: defaults::materials(),
            labor_rates: defaults::labor_rates(),
            fixed_costs: defaults::fixed_costs(),
            fixed_hardware: defaults::fixed_hardware(),
            card_rates: defaults::card_rates(),
            categories: defaults::categories(),
            ..Default::default()
        }
    }

    /// Borrow every collection for one engine pass
    pub fn inputs(&self) -> QuoteInputs<'_> {
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

    pub fn compute(&self) -> Result<QuoteOutcome, EngineError> {
        engine::compute(&self.inputs())
    }

    /// Recompute every piece's derived fields (after loading from disk)
    pub fn refresh_derived(&mut self) {
        for piece in &mut self.pieces {
            piece.refresh();
        }
    }

    pub fn catalog(&self) -> &[MaterialCatalogEntry] {
        &self.catalog
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn project_hardware(&self) -> &[ProjectHardwareLine] {
        &self.project_hardware
    }

    pub fn fixed_hardware(&self) -> &[FixedHardwareLine] {
        &self.fixed_hardware
    }

    pub fn labor_rates(&self) -> &[LaborRate] {
        &self.labor_rates
    }

    pub fn fixed_costs(&self) -> &[FixedCostLine] {
        &self.fixed_costs
    }

    pub fn card_rates(&self) -> &[CardRateTier] {
        &self.card_rates
    }

    pub fn services(&self) -> &[AdditionalServiceLine] {
        &self.services
    }

    pub fn categories(&self) -> &[ProductCategory] {
        &self.categories
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =====================================================================
    // Pieces
    // =====================================================================

    fn validate_piece(draft: &PieceDraft) -> Result<(), StoreError> {
        non_empty("material", &draft.material)?;
        positive("length", draft.length)?;
        positive("quantity", draft.quantity)?;
        if is_bar_stock(&draft.material) {
            non_negative("width", draft.width)?;
        } else {
            positive("width", draft.width)?;
        }
        Ok(())
    }

    pub fn add_piece(&mut self, draft: PieceDraft) -> Result<&Piece, StoreError> {
        Self::validate_piece(&draft)?;
        let piece = Piece::from_draft(draft);
        info!(id = %piece.id, material = %piece.material, "added piece");
        self.pieces.push(piece);
        Ok(&self.pieces[self.pieces.len() - 1])
    }

    pub fn update_piece(&mut self, reference: &str, patch: PiecePatch) -> Result<&Piece, StoreError> {
        let idx = position(&self.pieces, "piece", reference)?;
        let draft = self.pieces[idx].patched(patch);
        Self::validate_piece(&draft)?;

        let id = self.pieces[idx].id;
        let mut piece = Piece::from_draft(draft);
        piece.id = id;
        info!(id = %id, "updated piece");
        self.pieces[idx] = piece;
        Ok(&self.pieces[idx])
    }

    pub fn remove_piece(&mut self, reference: &str) -> Result<Piece, StoreError> {
        let idx = position(&self.pieces, "piece", reference)?;
        let piece = self.pieces.remove(idx);
        info!(id = %piece.id, "removed piece");
        Ok(piece)
    }

    // =====================================================================
    // Catalog
    // =====================================================================

    fn validate_material(entry: &MaterialCatalogEntry) -> Result<(), StoreError> {
        non_empty("name", &entry.name)?;
        non_negative("unit_price", entry.unit_price)?;
        if let Some(minutes) = entry.install_minutes {
            non_negative("install_minutes", minutes)?;
        }
        Ok(())
    }

    pub fn add_material(&mut self, entry: MaterialCatalogEntry) -> Result<&MaterialCatalogEntry, StoreError> {
        Self::validate_material(&entry)?;
        if self.catalog.iter().any(|e| e.name == entry.name) {
            return Err(StoreError::Duplicate {
                kind: "material",
                name: entry.name,
            });
        }
        info!(id = %entry.id, name = %entry.name, "added catalog entry");
        self.catalog.push(entry);
        Ok(&self.catalog[self.catalog.len() - 1])
    }

    pub fn update_material(
        &mut self,
        reference: &str,
        patch: MaterialPatch,
    ) -> Result<&MaterialCatalogEntry, StoreError> {
        let idx = position(&self.catalog, "material", reference)?;
        let mut entry = self.catalog[idx].clone();
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(unit) = patch.unit {
            entry.unit = unit;
        }
        if let Some(price) = patch.unit_price {
            entry.unit_price = price;
        }
        if let Some(kind) = patch.kind {
            entry.kind = kind;
        }
        if let Some(minutes) = patch.install_minutes {
            entry.install_minutes = Some(minutes);
        }
        Self::validate_material(&entry)?;
        if self
            .catalog
            .iter()
            .enumerate()
            .any(|(i, e)| i != idx && e.name == entry.name)
        {
            return Err(StoreError::Duplicate {
                kind: "material",
                name: entry.name,
            });
        }
        info!(id = %entry.id, "updated catalog entry");
        self.catalog[idx] = entry;
        Ok(&self.catalog[idx])
    }

    pub fn remove_material(&mut self, reference: &str) -> Result<MaterialCatalogEntry, StoreError> {
        let idx = position(&self.catalog, "material", reference)?;
        let entry = self.catalog.remove(idx);
        info!(id = %entry.id, "removed catalog entry");
        Ok(entry)
    }

    /// Append default materials and labor rates that are missing
    ///
    /// Materials match by name, labor rates by description and shop.
    /// Existing entries are never altered. Returns the counts added.
    pub fn backfill_defaults(&mut self) -> (usize, usize) {
        let missing_materials: Vec<MaterialCatalogEntry> = defaults::materials()
            .into_iter()
            .filter(|d| !self.catalog.iter().any(|e| e.name == d.name))
            .collect();
        let missing_labor: Vec<LaborRate> = defaults::labor_rates()
            .into_iter()
            .filter(|d| {
                let shop = d.category.unwrap_or(ShopCategory::WoodShop);
                !self
                    .labor_rates
                    .iter()
                    .any(|r| r.description == d.description && r.in_shop(shop))
            })
            .collect();

        let counts = (missing_materials.len(), missing_labor.len());
        self.catalog.extend(missing_materials);
        self.labor_rates.extend(missing_labor);
        info!(materials = counts.0, labor = counts.1, "backfilled defaults");
        counts
    }

    // =====================================================================
    // Hardware
    // =====================================================================

    fn validate_hardware(unit_price: f64, quantity: f64, minutes: f64) -> Result<(), StoreError> {
        non_negative("unit_price", unit_price)?;
        non_negative("quantity", quantity)?;
        non_negative("install_minutes", minutes)?;
        Ok(())
    }

    /// Add a project hardware line copied from a catalog hardware entry
    pub fn add_project_hardware(
        &mut self,
        catalog_ref: &str,
        quantity: f64,
        meterage: Option<f64>,
    ) -> Result<&ProjectHardwareLine, StoreError> {
        let idx = position(&self.catalog, "material", catalog_ref)?;
        let entry = &self.catalog[idx];
        if entry.kind != MaterialKind::Hardware {
            return Err(invalid(
                "catalog entry",
                format!("'{}' is a raw material, not hardware", entry.name),
            ));
        }
        positive("quantity", quantity)?;
        if let Some(m) = meterage {
            non_negative("meterage", m)?;
        }

        let line = ProjectHardwareLine::from_catalog(entry, quantity, meterage);
        info!(id = %line.id, name = %line.name, quantity, "added project hardware");
        self.project_hardware.push(line);
        Ok(&self.project_hardware[self.project_hardware.len() - 1])
    }

    pub fn update_project_hardware(
        &mut self,
        reference: &str,
        patch: HardwarePatch,
    ) -> Result<&ProjectHardwareLine, StoreError> {
        let idx = position(&self.project_hardware, "hardware line", reference)?;
        let mut line = self.project_hardware[idx].clone();
        if let Some(name) = patch.name {
            line.name = name;
        }
        if let Some(unit) = patch.unit {
            line.unit = unit;
        }
        if let Some(price) = patch.unit_price {
            line.unit_price = price;
        }
        if let Some(qty) = patch.quantity {
            line.quantity = positive("quantity", qty)?;
        }
        if let Some(minutes) = patch.install_minutes {
            line.install_minutes = minutes;
        }
        if let Some(m) = patch.meterage {
            line.meterage = Some(non_negative("meterage", m)?);
        }
        non_empty("name", &line.name)?;
        Self::validate_hardware(line.unit_price, line.quantity, line.install_minutes)?;
        info!(id = %line.id, "updated project hardware");
        self.project_hardware[idx] = line;
        Ok(&self.project_hardware[idx])
    }

    pub fn remove_project_hardware(&mut self, reference: &str) -> Result<ProjectHardwareLine, StoreError> {
        let idx = position(&self.project_hardware, "hardware line", reference)?;
        let line = self.project_hardware.remove(idx);
        info!(id = %line.id, "removed project hardware");
        Ok(line)
    }

    pub fn add_fixed_hardware(&mut self, line: FixedHardwareLine) -> Result<&FixedHardwareLine, StoreError> {
        non_empty("name", &line.name)?;
        Self::validate_hardware(line.unit_price, line.quantity, line.install_minutes)?;
        info!(id = %line.id, name = %line.name, "added fixed hardware");
        self.fixed_hardware.push(line);
        Ok(&self.fixed_hardware[self.fixed_hardware.len() - 1])
    }

    pub fn update_fixed_hardware(
        &mut self,
        reference: &str,
        patch: HardwarePatch,
    ) -> Result<&FixedHardwareLine, StoreError> {
        let idx = position(&self.fixed_hardware, "fixed hardware line", reference)?;
        let mut line = self.fixed_hardware[idx].clone();
        if let Some(name) = patch.name {
            line.name = name;
        }
        if let Some(unit) = patch.unit {
            line.unit = unit;
        }
        if let Some(price) = patch.unit_price {
            line.unit_price = price;
        }
        if let Some(qty) = patch.quantity {
            line.quantity = qty;
        }
        if let Some(minutes) = patch.install_minutes {
            line.install_minutes = minutes;
        }
        non_empty("name", &line.name)?;
        Self::validate_hardware(line.unit_price, line.quantity, line.install_minutes)?;
        info!(id = %line.id, "updated fixed hardware");
        self.fixed_hardware[idx] = line;
        Ok(&self.fixed_hardware[idx])
    }

    pub fn remove_fixed_hardware(&mut self, reference: &str) -> Result<FixedHardwareLine, StoreError> {
        let idx = position(&self.fixed_hardware, "fixed hardware line", reference)?;
        let line = self.fixed_hardware.remove(idx);
        info!(id = %line.id, "removed fixed hardware");
        Ok(line)
    }

    // =====================================================================
    // Labor rates and fixed costs
    // =====================================================================

    pub fn add_labor_rate(&mut self, rate: LaborRate) -> Result<&LaborRate, StoreError> {
        non_empty("description", &rate.description)?;
        non_negative("minutes_per_unit", rate.minutes_per_unit)?;
        info!(id = %rate.id, description = %rate.description, "added labor rate");
        self.labor_rates.push(rate);
        Ok(&self.labor_rates[self.labor_rates.len() - 1])
    }

    pub fn update_labor_rate(&mut self, reference: &str, patch: LaborPatch) -> Result<&LaborRate, StoreError> {
        let idx = position(&self.labor_rates, "labor rate", reference)?;
        let mut rate = self.labor_rates[idx].clone();
        if let Some(description) = patch.description {
            rate.description = description;
        }
        if let Some(minutes) = patch.minutes_per_unit {
            rate.minutes_per_unit = minutes;
        }
        if let Some(category) = patch.category {
            rate.category = Some(category);
        }
        non_empty("description", &rate.description)?;
        non_negative("minutes_per_unit", rate.minutes_per_unit)?;
        info!(id = %rate.id, "updated labor rate");
        self.labor_rates[idx] = rate;
        Ok(&self.labor_rates[idx])
    }

    pub fn remove_labor_rate(&mut self, reference: &str) -> Result<LaborRate, StoreError> {
        let idx = position(&self.labor_rates, "labor rate", reference)?;
        let rate = self.labor_rates.remove(idx);
        info!(id = %rate.id, "removed labor rate");
        Ok(rate)
    }

    pub fn add_fixed_cost(&mut self, cost: FixedCostLine) -> Result<&FixedCostLine, StoreError> {
        non_empty("description", &cost.description)?;
        non_negative("value", cost.value)?;
        info!(id = %cost.id, description = %cost.description, "added fixed cost");
        self.fixed_costs.push(cost);
        Ok(&self.fixed_costs[self.fixed_costs.len() - 1])
    }

    pub fn update_fixed_cost(&mut self, reference: &str, patch: CostPatch) -> Result<&FixedCostLine, StoreError> {
        let idx = position(&self.fixed_costs, "fixed cost", reference)?;
        let mut cost = self.fixed_costs[idx].clone();
        if let Some(description) = patch.description {
            cost.description = description;
        }
        if let Some(class) = patch.class {
            cost.class = class;
        }
        if let Some(value) = patch.value {
            cost.value = value;
        }
        non_empty("description", &cost.description)?;
        non_negative("value", cost.value)?;
        info!(id = %cost.id, "updated fixed cost");
        self.fixed_costs[idx] = cost;
        Ok(&self.fixed_costs[idx])
    }

    pub fn remove_fixed_cost(&mut self, reference: &str) -> Result<FixedCostLine, StoreError> {
        let idx = position(&self.fixed_costs, "fixed cost", reference)?;
        let cost = self.fixed_costs.remove(idx);
        info!(id = %cost.id, "removed fixed cost");
        Ok(cost)
    }

    // =====================================================================
    // Card rates, services and categories
    // =====================================================================

    /// Insert or replace the tier for an installment count
    pub fn set_card_rate(&mut self, installments: u32, fee_percent: f64) -> Result<&CardRateTier, StoreError> {
        if installments == 0 {
            return Err(invalid("installments", "must be at least 1"));
        }
        non_negative("fee_percent", fee_percent)?;
        if fee_percent >= 100.0 {
            return Err(invalid("fee_percent", "must be below 100"));
        }

        let idx = match self.card_rates.iter().position(|t| t.installments == installments) {
            Some(idx) => {
                self.card_rates[idx].fee_percent = fee_percent;
                idx
            }
            None => {
                self.card_rates.push(CardRateTier::new(installments, fee_percent));
                self.card_rates.sort_by_key(|t| t.installments);
                self.card_rates
                    .iter()
                    .position(|t| t.installments == installments)
                    .unwrap_or(0)
            }
        };
        info!(installments, fee_percent, "set card rate");
        Ok(&self.card_rates[idx])
    }

    /// Remove a tier by installment count or reference
    pub fn remove_card_rate(&mut self, reference: &str) -> Result<CardRateTier, StoreError> {
        let by_count = reference
            .trim()
            .strip_suffix('x')
            .and_then(|n| n.parse::<u32>().ok())
            .and_then(|n| self.card_rates.iter().position(|t| t.installments == n));
        let idx = match by_count {
            Some(idx) => idx,
            None => position(&self.card_rates, "card rate", reference)?,
        };
        let tier = self.card_rates.remove(idx);
        info!(installments = tier.installments, "removed card rate");
        Ok(tier)
    }

    pub fn add_service(&mut self, service: AdditionalServiceLine) -> Result<&AdditionalServiceLine, StoreError> {
        non_empty("description", &service.description)?;
        non_negative("value", service.value)?;
        info!(id = %service.id, description = %service.description, "added service");
        self.services.push(service);
        Ok(&self.services[self.services.len() - 1])
    }

    pub fn remove_service(&mut self, reference: &str) -> Result<AdditionalServiceLine, StoreError> {
        let idx = position(&self.services, "service", reference)?;
        let service = self.services.remove(idx);
        info!(id = %service.id, "removed service");
        Ok(service)
    }

    pub fn add_category(&mut self, category: ProductCategory) -> Result<&ProductCategory, StoreError> {
        non_empty("name", &category.name)?;
        non_negative("ideal_margin", category.ideal_margin)?;
        if self.categories.iter().any(|c| c.name == category.name) {
            return Err(StoreError::Duplicate {
                kind: "category",
                name: category.name,
            });
        }
        info!(id = %category.id, name = %category.name, "added category");
        self.categories.push(category);
        Ok(&self.categories[self.categories.len() - 1])
    }

    pub fn remove_category(&mut self, reference: &str) -> Result<ProductCategory, StoreError> {
        let idx = match self.categories.iter().position(|c| c.name == reference) {
            Some(idx) => idx,
            None => position(&self.categories, "category", reference)?,
        };
        let category = self.categories.remove(idx);
        info!(id = %category.id, "removed category");
        Ok(category)
    }

    // =====================================================================
    // Settings
    // =====================================================================

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<&Settings, StoreError> {
        let mut settings = self.settings.clone();
        if let Some(margin) = patch.profit_margin {
            settings.profit_margin = non_negative("profit_margin", margin)?;
        }
        if let Some(extra) = patch.extra_cost {
            settings.extra_cost = non_negative("extra_cost", extra)?;
        }
        if let Some(employees) = patch.employees {
            settings.employees = non_negative("employees", employees)?;
        }
        if let Some(hours) = patch.monthly_hours {
            settings.monthly_hours = non_negative("monthly_hours", hours)?;
        }
        if let Some(name) = patch.company_name {
            settings.company.name = name;
        }
        if patch.company_email.is_some() {
            settings.company.email = patch.company_email;
        }
        if patch.company_phone.is_some() {
            settings.company.phone = patch.company_phone;
        }
        if patch.company_address.is_some() {
            settings.company.address = patch.company_address;
        }
        if patch.warranty_terms.is_some() {
            settings.company.warranty_terms = patch.warranty_terms;
        }
        info!("updated settings");
        self.settings = settings;
        Ok(&self.settings)
    }

    /// Select a product category, adopting its ideal margin when known
    pub fn select_category(&mut self, name: &str) -> &Settings {
        self.settings.select_category(name, &self.categories);
        info!(category = name, margin = self.settings.profit_margin, "selected category");
        &self.settings
    }

    // =====================================================================
    // Project lifecycle
    // =====================================================================

    /// Start a new quote: clear project collections, keep catalogs
    pub fn reset_project(&mut self) {
        self.pieces.clear();
        self.project_hardware.clear();
        self.services.clear();
        self.settings.extra_cost = 0.0;
        self.settings.product_category.clear();
        info!("reset project");
    }

    /// Owned copies of the project-specific collections
    pub fn proposal_data(&self) -> ProposalData {
        ProposalData {
            pieces: self.pieces.clone(),
            project_hardware: self.project_hardware.clone(),
            fixed_hardware: self.fixed_hardware.clone(),
            services: self.services.clone(),
            settings: self.settings.clone(),
            card_rates: Some(self.card_rates.clone()),
        }
    }

    /// Replace project collections with a saved proposal's copies
    ///
    /// Catalog, labor rates, fixed costs and categories are left alone.
    pub fn restore(&mut self, data: &ProposalData) {
        self.pieces = data.pieces.clone();
        self.project_hardware = data.project_hardware.clone();
        self.fixed_hardware = data.fixed_hardware.clone();
        self.services = data.services.clone();
        self.settings = data.settings.clone();
        if let Some(rates) = &data.card_rates {
            if !rates.is_empty() {
                self.card_rates = rates.clone();
            }
        }
        self.refresh_derived();
        info!(pieces = self.pieces.len(), "restored project from proposal");
    }

    /// Find an entity's positional alias within its collection
    pub fn alias_of(&self, id: &EntityId) -> Option<String> {
        use crate::core::identity::EntityPrefix as P;
        let ids: Vec<&EntityId> = match id.prefix() {
            P::Mat => self.catalog.iter().map(|e| &e.id).collect(),
            P::Pce => self.pieces.iter().map(|e| &e.id).collect(),
            P::Hw => self.project_hardware.iter().map(|e| &e.id).collect(),
            P::Fhw => self.fixed_hardware.iter().map(|e| &e.id).collect(),
            P::Lab => self.labor_rates.iter().map(|e| &e.id).collect(),
            P::Fcst => self.fixed_costs.iter().map(|e| &e.id).collect(),
            P::Rate => self.card_rates.iter().map(|e| &e.id).collect(),
            P::Svc => self.services.iter().map(|e| &e.id).collect(),
            P::Cat => self.categories.iter().map(|e| &e.id).collect(),
            P::Prop => Vec::new(),
        };
        ShortIdIndex::from_ids(ids)
            .get_prefixed_short_id(id)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::piece::EdgeLetter;

    fn wood(length: f64, width: f64, quantity: f64) -> PieceDraft {
        PieceDraft {
            material: "MDF White 15mm".to_string(),
            length,
            width,
            quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_piece_validates() {
        let mut store = EntityStore::default();
        assert!(matches!(
            store.add_piece(wood(0.0, 100.0, 1.0)),
            Err(StoreError::InvalidField { field: "length", .. })
        ));
        assert!(store.add_piece(wood(100.0, f64::NAN, 1.0)).is_err());
        assert!(store.add_piece(wood(100.0, 100.0, -1.0)).is_err());
        assert!(store.pieces().is_empty());

        store.add_piece(wood(100.0, 100.0, 1.0)).unwrap();
        assert_eq!(store.pieces().len(), 1);
    }

    #[test]
    fn test_bar_stock_accepts_zero_width() {
        let mut store = EntityStore::default();
        let piece = store
            .add_piece(PieceDraft {
                material: "Metalon 20x20".to_string(),
                length: 1200.0,
                width: 0.0,
                quantity: 2.0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(piece.metrics.area_mm2, 0.0);
    }

    #[test]
    fn test_update_piece_keeps_id_and_rederives() {
        let mut store = EntityStore::default();
        let id = store.add_piece(wood(600.0, 400.0, 1.0)).unwrap().id;
        let updated = store
            .update_piece(
                "PCE@1",
                PiecePatch {
                    edge_letter: Some(Some(EdgeLetter::H)),
                    quantity: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.metrics.fasteners, 8.0);
        assert_eq!(updated.metrics.edge_length_mm, 2400.0);
    }

    #[test]
    fn test_rejected_update_leaves_store_unchanged() {
        let mut store = EntityStore::default();
        store.add_piece(wood(600.0, 400.0, 1.0)).unwrap();
        let before = store.clone();
        let result = store.update_piece(
            "@1",
            PiecePatch {
                length: Some(-5.0),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_project_hardware_requires_hardware_entry() {
        let mut store = EntityStore::with_defaults();
        let err = store.add_project_hardware("MAT@1", 1.0, None).unwrap_err();
        assert!(matches!(err, StoreError::InvalidField { .. }));

        let rod = store
            .catalog()
            .iter()
            .find(|e| e.name == "Hanger rod")
            .map(|e| e.id.to_string())
            .unwrap();
        let line = store.add_project_hardware(&rod, 2.0, Some(1.6)).unwrap();
        assert_eq!(line.unit_price, 10.65);
    }

    #[test]
    fn test_card_rate_upsert_and_bounds() {
        let mut store = EntityStore::default();
        store.set_card_rate(12, 14.0).unwrap();
        store.set_card_rate(3, 5.0).unwrap();
        store.set_card_rate(12, 13.0).unwrap();
        assert_eq!(store.card_rates().len(), 2);
        assert_eq!(store.card_rates()[0].installments, 3);
        assert_eq!(store.card_rates()[1].fee_percent, 13.0);

        assert!(store.set_card_rate(0, 1.0).is_err());
        assert!(store.set_card_rate(4, 100.0).is_err());
        store.remove_card_rate("3x").unwrap();
        assert_eq!(store.card_rates().len(), 1);
    }

    #[test]
    fn test_reset_keeps_catalogs_and_fixed_hardware() {
        let mut store = EntityStore::with_defaults();
        store.add_piece(wood(100.0, 100.0, 1.0)).unwrap();
        store
            .add_service(AdditionalServiceLine::new("Freight", 80.0))
            .unwrap();
        store
            .update_settings(SettingsPatch {
                extra_cost: Some(50.0),
                ..Default::default()
            })
            .unwrap();
        store.select_category("Wardrobe");

        let catalog_len = store.catalog().len();
        let fixed_len = store.fixed_hardware().len();
        store.reset_project();

        assert!(store.pieces().is_empty());
        assert!(store.services().is_empty());
        assert_eq!(store.settings().extra_cost, 0.0);
        assert_eq!(store.settings().product_category, "");
        assert_eq!(store.catalog().len(), catalog_len);
        assert_eq!(store.fixed_hardware().len(), fixed_len);
    }

    #[test]
    fn test_backfill_only_adds_missing() {
        let mut store = EntityStore::with_defaults();
        let price = store.catalog()[0].unit_price;
        store.remove_material("MAT@2").unwrap();
        store.remove_labor_rate("LAB@1").unwrap();
        store
            .update_material(
                "MAT@1",
                MaterialPatch {
                    unit_price: Some(price + 10.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.backfill_defaults(), (1, 1));
        assert_eq!(store.catalog()[0].unit_price, price + 10.0);
        assert_eq!(store.backfill_defaults(), (0, 0));
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let mut store = EntityStore::with_defaults();
        let err = store
            .add_material(MaterialCatalogEntry::raw("Plywood", Unit::SquareMeter, 1.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn test_restore_replaces_project_collections() {
        let mut store = EntityStore::with_defaults();
        store.add_piece(wood(1000.0, 500.0, 1.0)).unwrap();
        let data = store.proposal_data();

        store.reset_project();
        store.add_piece(wood(10.0, 10.0, 1.0)).unwrap();
        store.add_piece(wood(20.0, 20.0, 1.0)).unwrap();
        store.restore(&data);

        assert_eq!(store.pieces().len(), 1);
        assert_eq!(store.pieces()[0].length, 1000.0);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let mut store = EntityStore::with_defaults();
        store.add_piece(wood(1000.0, 500.0, 1.0)).unwrap();
        let data = store.proposal_data();
        store
            .update_piece(
                "@1",
                PiecePatch {
                    length: Some(2000.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(data.pieces[0].length, 1000.0);
    }

    #[test]
    fn test_alias_of() {
        let mut store = EntityStore::default();
        store.add_piece(wood(100.0, 100.0, 1.0)).unwrap();
        let id = store.add_piece(wood(200.0, 100.0, 1.0)).unwrap().id;
        assert_eq!(store.alias_of(&id).as_deref(), Some("PCE@2"));
    }

    #[test]
    fn test_ambiguous_reference() {
        let mut store = EntityStore::default();
        store.add_piece(wood(100.0, 100.0, 1.0)).unwrap();
        store.add_piece(wood(100.0, 100.0, 1.0)).unwrap();
        assert!(matches!(
            store.remove_piece("PCE-"),
            Err(StoreError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_reference_by_name() {
        let mut store = EntityStore::with_defaults();
        let line = store.add_project_hardware("hanger rod", 1.0, None).unwrap();
        assert_eq!(line.name, "Hanger rod");
        assert!(matches!(
            store.add_project_hardware("Flux capacitor", 1.0, None),
            Err(StoreError::NotFound { .. })
        ));
    }
}
