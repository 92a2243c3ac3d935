//! Saved proposal entity type - a frozen quote sent to a client

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;
use crate::engine::stats::ProjectStats;
use crate::entities::card_rate::CardRateTier;
use crate::entities::cost::AdditionalServiceLine;
use crate::entities::hardware::{FixedHardwareLine, ProjectHardwareLine};
use crate::entities::piece::Piece;
use crate::entities::settings::Settings;

/// Proposal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    AwaitingApproval,
    InProgress,
    Sent,
    Completed,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::AwaitingApproval => write!(f, "awaiting_approval"),
            ProposalStatus::InProgress => write!(f, "in_progress"),
            ProposalStatus::Sent => write!(f, "sent"),
            ProposalStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "awaiting_approval" | "awaiting" => Ok(ProposalStatus::AwaitingApproval),
            "in_progress" => Ok(ProposalStatus::InProgress),
            "sent" => Ok(ProposalStatus::Sent),
            "completed" | "done" => Ok(ProposalStatus::Completed),
            _ => Err(format!(
                "Invalid proposal status: {}. Use awaiting_approval, in_progress, sent, or completed",
                s
            )),
        }
    }
}

fn default_validity() -> u32 {
    15
}

/// Client and commercial terms printed on the proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub client_name: String,

    #[serde(default)]
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Description of the work offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,

    /// Days the quoted price stays valid
    #[serde(default = "default_validity")]
    pub validity_days: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_condition: Option<String>,
}

impl ClientInfo {
    pub fn new(client_name: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            project_name: project_name.into(),
            phone: None,
            service_description: None,
            validity_days: default_validity(),
            warranty: None,
            delivery_time: None,
            payment_condition: None,
        }
    }
}

/// Copies of the project-specific collections at save time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalData {
    #[serde(default)]
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub project_hardware: Vec<ProjectHardwareLine>,
    #[serde(default)]
    pub fixed_hardware: Vec<FixedHardwareLine>,
    #[serde(default)]
    pub services: Vec<AdditionalServiceLine>,
    #[serde(default)]
    pub settings: Settings,
    /// Absent on proposals saved without a card table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_rates: Option<Vec<CardRateTier>>,
}

/// A SavedProposal entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProposal {
    pub id: EntityId,
    pub sequence: u32,
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub author: String,

    pub client: ClientInfo,

    /// Price quoted to the client
    pub final_price: f64,

    #[serde(default)]
    pub status: ProposalStatus,

    pub data: ProposalData,

    pub stats: ProjectStats,
}

impl crate::core::entity::Entity for SavedProposal {
    const PREFIX: &'static str = "PROP";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.client.project_name
    }
}

impl SavedProposal {
    /// Display number `NNNN-YYYY`
    pub fn number(&self) -> String {
        format!("{:04}-{}", self.sequence, self.created.year())
    }

    /// Material, edge band and hardware cost
    pub fn material_cost(&self) -> f64 {
        self.stats.material_cost()
    }

    /// Labor, overhead, services and extra cost
    pub fn fabrication_cost(&self) -> f64 {
        self.stats.fabrication_cost()
    }

    /// Date until which the price holds
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.created + chrono::Duration::days(i64::from(self.client.validity_days))
    }
}
