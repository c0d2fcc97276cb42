//! Lookup structures over normalized authority strings
//!
//! - [`bimap`] - bidirectional many-to-many relation
//! - [`exact`] - id ↔ normalized string, one per table
//! - [`trie`] - longest-stored-prefix lookup

pub mod bimap;
pub mod exact;
pub mod trie;

pub use bimap::BiMultiMap;
pub use exact::ExactIndex;
pub use trie::{NodeId, PrefixMatch, PrefixTrie};

use std::collections::BTreeSet;

use crate::identifier::EntityId;

/// Prefix trie over the keys of an exact index
pub type IdTrie = PrefixTrie<BTreeSet<EntityId>>;

/// Build the prefix trie holding the same `(key → ids)` pairs as `index`
pub fn trie_from_exact(index: &ExactIndex) -> IdTrie {
    let mut trie = IdTrie::new();
    for (key, ids) in index.entries() {
        trie.entry(key).extend(ids.iter().copied());
    }
    trie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DEFAULT_PUNCTUATION;

    #[test]
    fn test_trie_mirrors_exact_index() {
        let exact = ExactIndex::build(
            [
                (EntityId::new(1), "Bach"),
                (EntityId::new(2), "Bach, Johann"),
                (EntityId::new(3), "bach"),
            ],
            DEFAULT_PUNCTUATION,
        );
        let trie = trie_from_exact(&exact);

        assert_eq!(trie.len(), exact.key_count());
        for (key, ids) in exact.entries() {
            assert_eq!(trie.get(key), Some(ids));
        }
    }
}
