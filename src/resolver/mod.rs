//! Tiered name-to-identifier resolution
//!
//! ## Query pipeline
//!
//! ```text
//! find("Bach, Johann Sebastian (Komponist)")
//!         │
//!         ├─► blank / absent?             ─► None (no index consulted)
//!         ├─► normalize
//!         ├─► 1. exact heading            ─► level 1 | 2
//!         ├─► 2. exact alias              ─► level 3 | 4
//!         ├─► 3. tertiary strategy
//!         │       prefix: heading trie    ─► level 5 | 6
//!         │               alias trie      ─► level 7 | 8
//!         │       fuzzy:  thesaurus       ─► level 4 + distance
//!         └─► nothing                     ─► level 9
//! ```
//!
//! All indices are built eagerly by [`ResolverBuilder::build`]; afterwards
//! the resolver is immutable and can be shared across threads freely.

pub mod result;
pub mod strategy;

pub use result::{MatchLevel, MatchResult, MatchSource};
pub use strategy::TertiaryStrategy;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::{ResolverConfig, StrategyKind};
use crate::error::{ResolverError, ResolverResult, TableKind};
use crate::identifier::{EntityId, Identifier};
use crate::index::ExactIndex;
use crate::normalize::{is_blank, normalize};
use strategy::TierHit;

/// Tracing target of the per-index probe events
pub const PROBE_TARGET: &str = "authority_match::probe";

pub(crate) fn probe(tier: &'static str) {
    trace!(target: PROBE_TARGET, tier, "index probe");
}

/// formatted identifier → display strings
pub type AuthorityTable = BTreeMap<String, Vec<String>>;

/// Both input tables, as supplied by the record-extraction side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorityTables {
    pub headings: Option<AuthorityTable>,
    pub aliases: Option<AuthorityTable>,
}

type Rows = Vec<(String, Vec<String>)>;

fn collect_rows<T, K, V, S>(table: T) -> Rows
where
    T: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    table
        .into_iter()
        .map(|(id, texts)| (id.into(), texts.into_iter().map(Into::into).collect()))
        .collect()
}

/// Collects the input tables and configuration for a [`Resolver`]
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    headings: Option<Rows>,
    aliases: Option<Rows>,
    config: ResolverConfig,
}

impl ResolverBuilder {
    /// Heading table: formatted identifier → heading strings
    pub fn headings<T, K, V, S>(mut self, table: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headings = Some(collect_rows(table));
        self
    }

    /// Alias table: formatted identifier → alias strings
    pub fn aliases<T, K, V, S>(mut self, table: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(collect_rows(table));
        self
    }

    /// Both tables at once; an absent table stays absent
    pub fn tables(mut self, tables: AuthorityTables) -> Self {
        self.headings = tables.headings.map(collect_rows);
        self.aliases = tables.aliases.map(collect_rows);
        self
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Parse identifiers and build every index.
    ///
    /// Fails if a table is missing, an identifier is malformed, or the
    /// configuration is invalid.
    pub fn build(self) -> ResolverResult<Resolver> {
        let config = self.config;
        config.validate()?;

        let headings = self.headings.ok_or(ResolverError::MissingTable {
            table: TableKind::Headings,
        })?;
        let aliases = self.aliases.ok_or(ResolverError::MissingTable {
            table: TableKind::Aliases,
        })?;

        let mut formatted = HashMap::new();
        let heading_rows = parse_rows(
            TableKind::Headings,
            headings,
            config.verify_check_digits,
            &mut formatted,
        )?;
        let alias_rows = parse_rows(
            TableKind::Aliases,
            aliases,
            config.verify_check_digits,
            &mut formatted,
        )?;

        let headings = ExactIndex::build(
            heading_rows.iter().map(|(id, text)| (*id, text.as_str())),
            &config.punctuation,
        );
        let aliases = ExactIndex::build(
            alias_rows.iter().map(|(id, text)| (*id, text.as_str())),
            &config.punctuation,
        );
        let strategy = TertiaryStrategy::build(&config, &headings, &aliases);

        let resolver = Resolver {
            headings,
            aliases,
            strategy,
            formatted,
            config,
        };
        info!(
            strategy = %resolver.strategy.kind(),
            heading_entities = resolver.headings.entity_count(),
            alias_entities = resolver.aliases.entity_count(),
            heading_keys = resolver.headings.key_count(),
            alias_keys = resolver.aliases.key_count(),
            "authority resolver built"
        );

        Ok(resolver)
    }
}

/// Parse the identifier of every row, flattening to `(id, text)` pairs
fn parse_rows(
    table: TableKind,
    rows: Rows,
    verify_check: bool,
    formatted: &mut HashMap<EntityId, String>,
) -> ResolverResult<Vec<(EntityId, String)>> {
    let mut flat = Vec::new();
    for (raw_id, texts) in rows {
        let identifier = Identifier::parse(&raw_id, verify_check).map_err(|source| {
            ResolverError::MalformedIdentifier {
                table,
                value: raw_id.clone(),
                source,
            }
        })?;
        formatted
            .entry(identifier.id)
            .or_insert(identifier.formatted);
        flat.extend(texts.into_iter().map(|text| (identifier.id, text)));
    }
    Ok(flat)
}

/// Frozen, thread-safe name resolver over one authority set
#[derive(Debug, Clone)]
pub struct Resolver {
    headings: ExactIndex,
    aliases: ExactIndex,
    strategy: TertiaryStrategy,
    /// id → identifier spelling as first supplied
    formatted: HashMap<EntityId, String>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Resolve a name.
    ///
    /// Returns `None` for absent or blank input without consulting any
    /// index. Otherwise always returns a result; level 9 means no match.
    pub fn find<'a>(&self, name: impl Into<Option<&'a str>>) -> Option<MatchResult> {
        let name = name.into()?;
        if is_blank(name) {
            debug!("blank query");
            return None;
        }

        let query = normalize(name);
        let result = match self
            .exact_lookup(&query)
            .or_else(|| self.strategy.lookup(&query, &self.headings, &self.aliases))
        {
            Some(hit) => self.to_result(hit),
            None => MatchResult::no_match(),
        };

        debug!(
            query = %query,
            level = result.level.value(),
            matches = result.ids.len(),
            "resolved"
        );
        Some(result)
    }

    /// Resolve several names in order
    pub fn find_many<I, S>(&self, names: I) -> Vec<Option<MatchResult>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.find(name.as_ref()))
            .collect()
    }

    fn exact_lookup(&self, query: &str) -> Option<TierHit> {
        probe("exact_heading");
        if let Some(ids) = self.headings.exact(query) {
            return Some(TierHit {
                ids: ids.clone(),
                level: MatchLevel::by_count(
                    MatchLevel::EXACT_HEADING,
                    MatchLevel::EXACT_HEADING_AMBIGUOUS,
                    ids.len(),
                ),
                source: MatchSource::ExactHeading,
            });
        }

        probe("exact_alias");
        self.aliases.exact(query).map(|ids| TierHit {
            ids: ids.clone(),
            level: MatchLevel::by_count(
                MatchLevel::EXACT_ALIAS,
                MatchLevel::EXACT_ALIAS_AMBIGUOUS,
                ids.len(),
            ),
            source: MatchSource::ExactAlias,
        })
    }

    fn to_result(&self, hit: TierHit) -> MatchResult {
        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for id in &hit.ids {
            ids.insert(self.formatted_id(*id));
            let display = self
                .headings
                .display_names(*id)
                .or_else(|| self.aliases.display_names(*id));
            if let Some(display) = display {
                names.extend(display.iter().cloned());
            }
        }
        MatchResult::matched(ids, names, hit.level, hit.source)
    }

    /// Identifier spelling as supplied, or the canonical one
    pub fn formatted_id(&self, id: EntityId) -> String {
        self.formatted
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.formatted())
    }

    pub fn headings(&self) -> &ExactIndex {
        &self.headings
    }

    pub fn aliases(&self) -> &ExactIndex {
        &self.aliases
    }

    pub fn strategy(&self) -> &TertiaryStrategy {
        &self.strategy
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn stats(&self) -> ResolverStats {
        let (trie_nodes, thesaurus_terms) = match &self.strategy {
            TertiaryStrategy::Prefix { headings, aliases } => {
                (headings.node_count() + aliases.node_count(), 0)
            }
            TertiaryStrategy::Fuzzy { thesaurus, .. } => {
                (thesaurus.node_count(), thesaurus.len())
            }
        };

        ResolverStats {
            strategy: self.strategy.kind(),
            entity_count: self.formatted.len(),
            heading_entities: self.headings.entity_count(),
            alias_entities: self.aliases.entity_count(),
            heading_keys: self.headings.key_count(),
            alias_keys: self.aliases.key_count(),
            trie_nodes,
            thesaurus_terms,
            max_distance: self.config.max_distance,
        }
    }
}

/// Index sizes, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub strategy: StrategyKind,
    pub entity_count: usize,
    pub heading_entities: usize,
    pub alias_entities: usize,
    pub heading_keys: usize,
    pub alias_keys: usize,
    pub trie_nodes: usize,
    pub thesaurus_terms: usize,
    pub max_distance: usize,
}

impl std::fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Authority Resolver Statistics:")?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        writeln!(f, "  Entities: {}", self.entity_count)?;
        writeln!(
            f,
            "  Headings: {} entities, {} keys",
            self.heading_entities, self.heading_keys
        )?;
        writeln!(
            f,
            "  Aliases: {} entities, {} keys",
            self.alias_entities, self.alias_keys
        )?;
        writeln!(f, "  Trie nodes: {}", self.trie_nodes)?;
        if self.strategy == StrategyKind::Fuzzy {
            writeln!(f, "  Thesaurus terms: {}", self.thesaurus_terms)?;
            writeln!(f, "  Max distance: {}", self.max_distance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gnd(n: u64) -> String {
        EntityId::new(n).formatted()
    }

    fn resolver(strategy: StrategyKind) -> Resolver {
        Resolver::builder()
            .headings([
                (gnd(1), vec!["Bach, Johann Sebastian"]),
                (gnd(2), vec!["Müller"]),
                (gnd(3), vec!["Müller"]),
            ])
            .aliases([(gnd(1), vec!["Bach, J. S."]), (gnd(4), vec!["Anonymus"])])
            .strategy(strategy)
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_tables() {
        let err = Resolver::builder()
            .aliases(Vec::<(String, Vec<String>)>::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ResolverError::MissingTable {
                table: TableKind::Headings
            }
        ));

        let err = Resolver::builder()
            .headings(Vec::<(String, Vec<String>)>::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ResolverError::MissingTable {
                table: TableKind::Aliases
            }
        ));
    }

    #[test]
    fn test_malformed_identifier_rejected_at_build() {
        let err = Resolver::builder()
            .headings([("12x4", vec!["Bach"])])
            .aliases(Vec::<(String, Vec<String>)>::new())
            .build()
            .unwrap_err();
        match err {
            ResolverError::MalformedIdentifier { table, value, .. } => {
                assert_eq!(table, TableKind::Headings);
                assert_eq!(value, "12x4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_build() {
        let err = Resolver::builder()
            .headings(Vec::<(String, Vec<String>)>::new())
            .aliases(Vec::<(String, Vec<String>)>::new())
            .config(ResolverConfig {
                max_distance: 9,
                ..ResolverConfig::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, ResolverError::InvalidConfig(_)));
    }

    #[test]
    fn test_blank_input_is_none() {
        let r = resolver(StrategyKind::Prefix);
        assert_eq!(r.find(None), None);
        assert_eq!(r.find(""), None);
        assert_eq!(r.find(" \t "), None);
    }

    #[test]
    fn test_names_are_raw_headings() {
        let r = resolver(StrategyKind::Prefix);
        let result = r.find("bach, j. s.").unwrap();
        assert_eq!(result.level, MatchLevel::EXACT_ALIAS);
        assert_eq!(
            result.names,
            BTreeSet::from(["Bach, Johann Sebastian".to_string()])
        );
    }

    #[test]
    fn test_alias_only_entity_reports_alias_names() {
        let r = resolver(StrategyKind::Prefix);
        let result = r.find("ANONYMUS").unwrap();
        assert_eq!(result.ids, BTreeSet::from([gnd(4)]));
        assert_eq!(result.names, BTreeSet::from(["Anonymus".to_string()]));
    }

    #[test]
    fn test_formatted_spelling_preserved() {
        let r = Resolver::builder()
            .headings([
                ("4011882-4", vec!["Deutschland"]),
                ("4005728-8", vec!["Berlin"]),
            ])
            .aliases([("4005728-8", vec!["Berlin (West)"])])
            .build()
            .unwrap();

        let result = r.find("deutschland").unwrap();
        assert_eq!(result.level, MatchLevel::EXACT_HEADING);
        assert_eq!(result.ids, BTreeSet::from(["4011882-4".to_string()]));

        let result = r.find("berlin (west)").unwrap();
        assert_eq!(result.level, MatchLevel::EXACT_ALIAS);
        assert_eq!(result.ids, BTreeSet::from(["4005728-8".to_string()]));

        assert_eq!(r.formatted_id(EntityId::new(4011882)), "4011882-4");
        assert_eq!(r.formatted_id(EntityId::new(1)), "19");
    }

    #[test]
    fn test_find_many_keeps_order() {
        let r = resolver(StrategyKind::Prefix);
        let results = r.find_many(["Müller", "  ", "Nobody"]);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().map(|m| m.level),
            Some(MatchLevel::EXACT_HEADING_AMBIGUOUS)
        );
        assert!(results[1].is_none());
        assert_eq!(
            results[2].as_ref().map(|m| m.level),
            Some(MatchLevel::NO_MATCH)
        );
    }

    #[test]
    fn test_stats_by_strategy() {
        let prefix = resolver(StrategyKind::Prefix).stats();
        assert_eq!(prefix.strategy, StrategyKind::Prefix);
        assert_eq!(prefix.entity_count, 4);
        assert_eq!(prefix.heading_entities, 3);
        assert_eq!(prefix.alias_entities, 2);
        assert_eq!(prefix.thesaurus_terms, 0);
        assert!(prefix.trie_nodes > 0);

        let fuzzy = resolver(StrategyKind::Fuzzy).stats();
        assert_eq!(fuzzy.strategy, StrategyKind::Fuzzy);
        // Keys: "bach, johann sebastian", "bach johann sebastian", "müller",
        // "bach, j. s.", "bach j s", "anonymus"
        assert_eq!(fuzzy.thesaurus_terms, 6);
        assert!(fuzzy.to_string().contains("Thesaurus terms: 6"));
    }
}
