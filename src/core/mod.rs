//! Core module - identity, storage and project plumbing

pub mod config;
pub mod defaults;
pub mod entity;
pub mod identity;
pub mod logging;
pub mod project;
pub mod shortid;
pub mod store;

pub use config::Config;
pub use entity::Entity;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use project::{Project, ProjectError};
pub use shortid::ShortIdIndex;
pub use store::{EntityStore, StoreError};
