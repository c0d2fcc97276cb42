//! Tertiary lookup strategies
//!
//! Levels 1-4 (exact heading, exact alias) are shared; what runs after them
//! is selected once at construction:
//! - [`TertiaryStrategy::Prefix`] - longest stored prefix in the heading
//!   trie, then in the alias trie
//! - [`TertiaryStrategy::Fuzzy`] - nearest thesaurus terms by edit distance,
//!   level `4 + distance`

use std::collections::BTreeSet;

use super::result::{MatchLevel, MatchSource};
use super::probe;
use crate::config::{ResolverConfig, StrategyKind};
use crate::identifier::EntityId;
use crate::index::{trie_from_exact, ExactIndex, IdTrie};
use crate::thesaurus::Thesaurus;

/// Ids found by one tier, before display strings are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TierHit {
    pub ids: BTreeSet<EntityId>,
    pub level: MatchLevel,
    pub source: MatchSource,
}

/// Lookup used once both exact tiers miss
#[derive(Debug, Clone)]
pub enum TertiaryStrategy {
    Prefix { headings: IdTrie, aliases: IdTrie },
    Fuzzy {
        thesaurus: Thesaurus,
        max_distance: usize,
    },
}

impl TertiaryStrategy {
    /// Build only the structures the configured strategy needs
    pub(crate) fn build(
        config: &ResolverConfig,
        headings: &ExactIndex,
        aliases: &ExactIndex,
    ) -> Self {
        match config.strategy {
            StrategyKind::Prefix => Self::Prefix {
                headings: trie_from_exact(headings),
                aliases: trie_from_exact(aliases),
            },
            StrategyKind::Fuzzy => Self::Fuzzy {
                thesaurus: Thesaurus::build(headings.keys().chain(aliases.keys())),
                max_distance: config.max_distance,
            },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Prefix { .. } => StrategyKind::Prefix,
            Self::Fuzzy { .. } => StrategyKind::Fuzzy,
        }
    }

    pub(crate) fn lookup(
        &self,
        query: &str,
        headings: &ExactIndex,
        aliases: &ExactIndex,
    ) -> Option<TierHit> {
        match self {
            Self::Prefix {
                headings: heading_trie,
                aliases: alias_trie,
            } => prefix_lookup(query, heading_trie, alias_trie),
            Self::Fuzzy {
                thesaurus,
                max_distance,
            } => fuzzy_lookup(query, thesaurus, *max_distance, headings, aliases),
        }
    }
}

fn prefix_lookup(query: &str, headings: &IdTrie, aliases: &IdTrie) -> Option<TierHit> {
    probe("heading_prefix");
    if let Some(found) = headings.longest_prefix_match(query) {
        return Some(TierHit {
            ids: found.value.clone(),
            level: MatchLevel::by_count(
                MatchLevel::HEADING_PREFIX,
                MatchLevel::HEADING_PREFIX_AMBIGUOUS,
                found.value.len(),
            ),
            source: MatchSource::HeadingPrefix,
        });
    }

    probe("alias_prefix");
    aliases.longest_prefix_match(query).map(|found| TierHit {
        ids: found.value.clone(),
        level: MatchLevel::by_count(
            MatchLevel::ALIAS_PREFIX,
            MatchLevel::ALIAS_PREFIX_AMBIGUOUS,
            found.value.len(),
        ),
        source: MatchSource::AliasPrefix,
    })
}

fn fuzzy_lookup(
    query: &str,
    thesaurus: &Thesaurus,
    max_distance: usize,
    headings: &ExactIndex,
    aliases: &ExactIndex,
) -> Option<TierHit> {
    probe("thesaurus");
    let nearest = thesaurus.nearest(query, max_distance);
    let distance = nearest.first()?.distance;
    let level = MatchLevel::fuzzy(distance)?;

    let mut ids = BTreeSet::new();
    for candidate in &nearest {
        if let Some(found) = headings.exact(&candidate.term) {
            ids.extend(found.iter().copied());
        }
        if let Some(found) = aliases.exact(&candidate.term) {
            ids.extend(found.iter().copied());
        }
    }

    Some(TierHit {
        ids,
        level,
        source: MatchSource::Fuzzy { distance },
    })
}
