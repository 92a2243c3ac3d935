//! Entity type implementations

pub mod card_rate;
pub mod cost;
pub mod hardware;
pub mod labor;
pub mod material;
pub mod piece;
pub mod proposal;
pub mod settings;

pub use card_rate::CardRateTier;
pub use cost::{AdditionalServiceLine, CostClass, FixedCostLine};
pub use hardware::{FixedHardwareLine, HardwareRef, ProjectHardwareLine};
pub use labor::{LaborRate, ShopCategory};
pub use material::{MaterialCatalogEntry, MaterialKind, Unit};
pub use piece::{EdgeLetter, Piece, PieceDraft, PiecePatch};
pub use proposal::{ClientInfo, ProposalData, ProposalStatus, SavedProposal};
pub use settings::{CompanyInfo, ProductCategory, Settings};
