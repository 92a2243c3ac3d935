//! Proposal capture and manual financial override

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::engine::pricing::settle;
use crate::engine::stats::ProjectStats;
use crate::entities::proposal::{ClientInfo, ProposalData, ProposalStatus, SavedProposal};

#[derive(Debug, Error, Diagnostic)]
pub enum ProposalError {
    #[error("override value for {field} must be a finite, non-negative number (got {value})")]
    InvalidOverride { field: &'static str, value: f64 },

    #[error("{0}")]
    InvalidStatus(String),
}

/// Next sequence number: one past the highest in use
pub fn next_sequence(existing: &[SavedProposal]) -> u32 {
    existing.iter().map(|p| p.sequence).max().unwrap_or(0) + 1
}

/// Freeze the current project into a new proposal
///
/// `data` and `stats` are owned copies, so later edits to the live store
/// cannot reach the proposal.
pub fn capture(
    data: ProposalData,
    stats: ProjectStats,
    client: ClientInfo,
    sequence: u32,
    author: impl Into<String>,
    created: DateTime<Utc>,
) -> SavedProposal {
    let proposal = SavedProposal {
        id: EntityId::new(EntityPrefix::Prop),
        sequence,
        created,
        author: author.into(),
        client,
        final_price: stats.sales_price,
        status: ProposalStatus::AwaitingApproval,
        data,
        stats,
    };
    info!(id = %proposal.id, number = %proposal.number(), "captured proposal");
    proposal
}

/// The three numbers an operator may overwrite on a saved proposal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialOverride {
    pub material_cost: Option<f64>,
    pub fabrication_cost: Option<f64>,
    pub final_price: Option<f64>,
}

impl FinancialOverride {
    pub fn is_empty(&self) -> bool {
        self.material_cost.is_none() && self.fabrication_cost.is_none() && self.final_price.is_none()
    }

    fn validate(&self) -> Result<(), ProposalError> {
        let fields = [
            ("material_cost", self.material_cost),
            ("fabrication_cost", self.fabrication_cost),
            ("final_price", self.final_price),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ProposalError::InvalidOverride { field, value });
                }
            }
        }
        Ok(())
    }
}

/// Overwrite material cost, fabrication cost and price, then re-settle
///
/// The material delta lands in the material bucket and the fabrication
/// delta in the overhead bucket, so both cost views keep summing to the
/// total cost.
pub fn apply_override(
    proposal: &mut SavedProposal,
    ov: &FinancialOverride,
) -> Result<(), ProposalError> {
    ov.validate()?;

    let stats = &mut proposal.stats;
    let material = ov.material_cost.unwrap_or_else(|| stats.material_cost());
    let fabrication = ov.fabrication_cost.unwrap_or_else(|| stats.fabrication_cost());
    let price = ov.final_price.unwrap_or(proposal.final_price);

    let material_delta = material - stats.material_cost();
    let fabrication_delta = fabrication - stats.fabrication_cost();
    stats.total_material_cost += material_delta;
    stats.total_fixed_cost += fabrication_delta;
    stats.total_cost = material + fabrication;
    stats.sales_price = price;

    let s = settle(stats.total_cost, price, stats.fee_percent);
    stats.fee_amount = s.fee_amount;
    stats.net_revenue = s.net_revenue;
    stats.profit = s.profit;
    stats.realized_margin = s.realized_margin;
    stats.roi = s.roi;

    proposal.final_price = price;
    info!(id = %proposal.id, material, fabrication, price, "applied financial override");
    Ok(())
}

/// Move a proposal to another lifecycle status
///
/// Any status may follow any other.
pub fn set_status(proposal: &mut SavedProposal, status: &str) -> Result<ProposalStatus, ProposalError> {
    let status: ProposalStatus = status.parse().map_err(ProposalError::InvalidStatus)?;
    info!(id = %proposal.id, from = %proposal.status, to = %status, "changed proposal status");
    proposal.status = status;
    Ok(status)
}

/// Partial update of a proposal's client metadata
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub client_name: Option<String>,
    pub project_name: Option<String>,
    pub phone: Option<String>,
    pub service_description: Option<String>,
    pub validity_days: Option<u32>,
    pub warranty: Option<String>,
    pub delivery_time: Option<String>,
    pub payment_condition: Option<String>,
}

/// Edit client metadata in place; figures are left alone
pub fn edit_client(proposal: &mut SavedProposal, patch: ClientPatch) {
    let client = &mut proposal.client;
    if let Some(name) = patch.client_name {
        client.client_name = name;
    }
    if let Some(project) = patch.project_name {
        client.project_name = project;
    }
    if let Some(days) = patch.validity_days {
        client.validity_days = days;
    }
    let optional = [
        (&mut client.phone, patch.phone),
        (&mut client.service_description, patch.service_description),
        (&mut client.warranty, patch.warranty),
        (&mut client.delivery_time, patch.delivery_time),
        (&mut client.payment_condition, patch.payment_condition),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            *field = (!value.is_empty()).then_some(value);
        }
    }
    info!(id = %proposal.id, "edited proposal client details");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ProjectStats {
        ProjectStats {
            total_material_cost: 400.0,
            total_tape_cost: 20.0,
            total_component_cost: 80.0,
            total_labor_cost: 200.0,
            total_fixed_cost: 100.0,
            total_services_cost: 50.0,
            extra_cost: 50.0,
            total_cost: 900.0,
            fee_percent: 10.0,
            sales_price: 1500.0,
            ..Default::default()
        }
    }

    fn saved() -> SavedProposal {
        capture(
            ProposalData::default(),
            stats(),
            ClientInfo::new("Ana", "Wardrobe"),
            1,
            "shop",
            Utc::now(),
        )
    }

    #[test]
    fn test_capture_initial_state() {
        let p = saved();
        assert_eq!(p.status, ProposalStatus::AwaitingApproval);
        assert_eq!(p.final_price, 1500.0);
        assert!(p.id.to_string().starts_with("PROP-"));
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(&[]), 1);
        let mut a = saved();
        a.sequence = 4;
        let b = saved();
        assert_eq!(next_sequence(&[a, b]), 5);
    }

    #[test]
    fn test_override_redistributes_deltas() {
        let mut p = saved();
        apply_override(
            &mut p,
            &FinancialOverride {
                material_cost: Some(600.0),
                fabrication_cost: Some(500.0),
                final_price: Some(2000.0),
            },
        )
        .unwrap();

        let s = &p.stats;
        assert_eq!(s.total_material_cost, 500.0);
        assert_eq!(s.total_fixed_cost, 200.0);
        assert_eq!(s.material_cost(), 600.0);
        assert_eq!(s.fabrication_cost(), 500.0);
        assert_eq!(s.total_cost, 1100.0);
        assert_eq!(s.fee_amount, 200.0);
        assert_eq!(s.profit, 700.0);
        assert!((s.realized_margin - 35.0).abs() < 1e-9);
        assert!((s.roi - 700.0 / 1100.0 * 100.0).abs() < 1e-9);
        assert_eq!(p.final_price, 2000.0);
    }

    #[test]
    fn test_partial_override_keeps_other_numbers() {
        let mut p = saved();
        apply_override(
            &mut p,
            &FinancialOverride {
                final_price: Some(1200.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(p.stats.total_cost, 900.0);
        assert_eq!(p.stats.profit, 1200.0 - 120.0 - 900.0);
    }

    #[test]
    fn test_negative_override_rejected() {
        let mut p = saved();
        let before = p.clone();
        let err = apply_override(
            &mut p,
            &FinancialOverride {
                material_cost: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ProposalError::InvalidOverride { field: "material_cost", .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_set_status() {
        let mut p = saved();
        assert_eq!(set_status(&mut p, "sent").unwrap(), ProposalStatus::Sent);
        assert_eq!(set_status(&mut p, "awaiting").unwrap(), ProposalStatus::AwaitingApproval);
        assert!(matches!(
            set_status(&mut p, "lost"),
            Err(ProposalError::InvalidStatus(_))
        ));
        assert_eq!(p.status, ProposalStatus::AwaitingApproval);
    }

    #[test]
    fn test_edit_client_keeps_figures() {
        let mut p = saved();
        let stats = p.stats.clone();
        edit_client(
            &mut p,
            ClientPatch {
                phone: Some("555-0101".to_string()),
                validity_days: Some(30),
                warranty: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(p.client.phone.as_deref(), Some("555-0101"));
        assert_eq!(p.client.validity_days, 30);
        assert_eq!(p.client.warranty, None);
        assert_eq!(p.client.client_name, "Ana");
        assert_eq!(p.stats, stats);
    }
}
