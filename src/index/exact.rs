//! Exact normalized-string index over one authority table
//!
//! Built once per table (headings, aliases). For every `(id, raw)` pair the
//! normalized form and its punctuation-stripped variant are related to the
//! id, and the raw text is kept as the id's display string.

use std::collections::BTreeSet;

use tracing::debug;

use super::bimap::BiMultiMap;
use crate::identifier::EntityId;
use crate::normalize::{normalize, strip_punctuation};

/// Bidirectional exact lookup between entity ids and normalized strings
#[derive(Debug, Clone, Default)]
pub struct ExactIndex {
    /// id ↔ normalized forms (primary and punctuation-stripped)
    keys: BiMultiMap<EntityId, String>,
    /// id ↔ raw display strings, exactly as supplied
    display: BiMultiMap<EntityId, String>,
}

impl ExactIndex {
    /// Build from `(id, raw text)` pairs. Texts that normalize to nothing are skipped.
    pub fn build<'a, I>(entries: I, punctuation: &str) -> Self
    where
        I: IntoIterator<Item = (EntityId, &'a str)>,
    {
        let mut index = Self::default();

        for (id, raw) in entries {
            let normalized = normalize(raw);
            if normalized.is_empty() {
                debug!(%id, "skipping blank authority string");
                continue;
            }

            let stripped = strip_punctuation(&normalized, punctuation);
            if !stripped.is_empty() && stripped != normalized {
                index.keys.insert(id, stripped);
            }
            index.keys.insert(id, normalized);
            index.display.insert(id, raw.to_string());
        }

        index
    }

    /// Ids registered under the normalized query
    pub fn exact(&self, normalized: &str) -> Option<&BTreeSet<EntityId>> {
        self.keys.reverse(normalized)
    }

    /// Raw display strings of an id
    pub fn display_names(&self, id: EntityId) -> Option<&BTreeSet<String>> {
        self.display.forward(&id)
    }

    #[cfg(test)]
    pub(crate) fn normalized_forms(&self, id: EntityId) -> Option<&BTreeSet<String>> {
        self.keys.forward(&id)
    }

    #[cfg(test)]
    pub(crate) fn ids_for_display(&self, raw: &str) -> Option<&BTreeSet<EntityId>> {
        self.display.reverse(raw)
    }

    /// Every registered normalized key, unordered
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.keys.rights()
    }

    /// Every `(key, ids)` pair, unordered
    pub fn entries(&self) -> impl Iterator<Item = (&String, &BTreeSet<EntityId>)> {
        self.keys
            .rights()
            .filter_map(|key| self.keys.reverse(key).map(|ids| (key, ids)))
    }

    pub fn entity_count(&self) -> usize {
        self.keys.left_count()
    }

    pub fn key_count(&self) -> usize {
        self.keys.right_count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
