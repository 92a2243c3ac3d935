//! Short ID system for easier entity selection
//!
//! Aliases are positional: `PCE@2` is the second piece in the store.
//! Supported reference formats:
//! - Entity-prefixed: `PCE@1`, `HW@3`
//! - Simple: `@1` or `1` (position within the collection being addressed)
//! - Full ID (`PCE-01J...`) or a unique case-insensitive prefix of it

use std::collections::HashMap;

use crate::core::identity::EntityId;

/// Positional aliases for one collection
#[derive(Debug, Default)]
pub struct ShortIdIndex {
    /// Maps "PREFIX@N" to full entity ID
    entries: HashMap<String, EntityId>,
    /// Full ID to "PREFIX@N"
    reverse: HashMap<EntityId, String>,
    /// IDs in collection order
    ordered: Vec<EntityId>,
}

/// Outcome of resolving a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(EntityId),
    Ambiguous(usize),
    Missing,
}

impl ShortIdIndex {
    /// Build the index for a collection in its stored order
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let mut index = Self::default();
        for id in ids {
            let key = format!("{}@{}", id.prefix(), index.ordered.len() + 1);
            index.entries.insert(key.clone(), *id);
            index.reverse.insert(*id, key);
            index.ordered.push(*id);
        }
        index
    }

    /// Resolve a reference to a full entity ID
    pub fn resolve(&self, reference: &str) -> Resolution {
        let reference = reference.trim();

        if let Some((prefix, num)) = reference.split_once('@') {
            if !prefix.is_empty() {
                let key = format!("{}@{}", prefix.to_uppercase(), num);
                return match self.entries.get(&key) {
                    Some(id) => Resolution::Found(*id),
                    None => Resolution::Missing,
                };
            }
            return self.by_position(num);
        }

        if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
            return self.by_position(reference);
        }

        let wanted = reference.to_uppercase();
        if let Some(id) = self.ordered.iter().find(|id| id.to_string() == wanted) {
            return Resolution::Found(*id);
        }
        let matches: Vec<&EntityId> = self
            .ordered
            .iter()
            .filter(|id| !wanted.is_empty() && id.to_string().starts_with(&wanted))
            .collect();
        match matches.as_slice() {
            [id] => Resolution::Found(**id),
            [] => Resolution::Missing,
            many => Resolution::Ambiguous(many.len()),
        }
    }

    fn by_position(&self, num: &str) -> Resolution {
        num.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.ordered.get(i))
            .map(|id| Resolution::Found(*id))
            .unwrap_or(Resolution::Missing)
    }

    /// The prefixed alias of an ID (e.g. "PCE@1")
    pub fn get_prefixed_short_id(&self, id: &EntityId) -> Option<&str> {
        self.reverse.get(id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    fn ids(prefix: EntityPrefix, n: usize) -> Vec<EntityId> {
        (0..n).map(|_| EntityId::new(prefix)).collect()
    }

    #[test]
    fn test_prefixed_and_simple_aliases() {
        let pieces = ids(EntityPrefix::Pce, 3);
        let index = ShortIdIndex::from_ids(&pieces);

        assert_eq!(index.resolve("PCE@1"), Resolution::Found(pieces[0]));
        assert_eq!(index.resolve("pce@3"), Resolution::Found(pieces[2]));
        assert_eq!(index.resolve("@2"), Resolution::Found(pieces[1]));
        assert_eq!(index.resolve("2"), Resolution::Found(pieces[1]));
        assert_eq!(index.resolve("@0"), Resolution::Missing);
        assert_eq!(index.resolve("PCE@9"), Resolution::Missing);
        assert_eq!(index.resolve("HW@1"), Resolution::Missing);
    }

    #[test]
    fn test_full_and_partial_ids() {
        let pieces = ids(EntityPrefix::Pce, 2);
        let index = ShortIdIndex::from_ids(&pieces);

        let full = pieces[1].to_string();
        assert_eq!(index.resolve(&full), Resolution::Found(pieces[1]));
        assert_eq!(index.resolve(&full.to_lowercase()), Resolution::Found(pieces[1]));
        assert_eq!(index.resolve("PCE-"), Resolution::Ambiguous(2));
        assert_eq!(index.resolve("MAT-"), Resolution::Missing);
    }

    #[test]
    fn test_reverse_lookup() {
        let hw = ids(EntityPrefix::Hw, 2);
        let index = ShortIdIndex::from_ids(&hw);
        assert_eq!(index.get_prefixed_short_id(&hw[1]), Some("HW@2"));
        assert_eq!(index.get_prefixed_short_id(&hw[0]), Some("HW@1"));
    }
}
