//! Entity trait - common interface for all quote records

use crate::core::identity::EntityId;

/// Common trait for all records held by the entity store
pub trait Entity {
    /// The entity type prefix (e.g., "PCE", "HW")
    const PREFIX: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Human-readable label used in listings and messages
    fn label(&self) -> &str;
}

/// Implements [`Entity`] for a record with `id` and a string label field
macro_rules! impl_entity {
    ($ty:ty, $prefix:literal, $label:ident) => {
        impl $crate::core::entity::Entity for $ty {
            const PREFIX: &'static str = $prefix;

            fn id(&self) -> &$crate::core::identity::EntityId {
                &self.id
            }

            fn label(&self) -> &str {
                &self.$label
            }
        }
    };
}

pub(crate) use impl_entity;
