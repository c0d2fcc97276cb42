//! Authority-file name resolution
//!
//! Resolves a free-text name (typed by an operator, taken from legacy
//! catalogue text, copied from a foreign catalogue) to the identifier(s) of
//! the matching entity in an authority file, with a confidence level.
//!
//! ## Architecture
//!
//! ```text
//! id → headings ─┐                        ┌─► ExactIndex (headings) ─┐
//!                ├─► ResolverBuilder ─────┤                          ├─► Resolver::find
//! id → aliases ──┘     (parse ids,        ├─► ExactIndex (aliases) ──┤
//!                       normalize)        └─► TertiaryStrategy ──────┘
//!                                              Prefix: two PrefixTries
//!                                              Fuzzy:  Thesaurus
//! ```
//!
//! ## Usage
//!
//! ```
//! use authority_match::{MatchLevel, Resolver, StrategyKind};
//!
//! let resolver = Resolver::builder()
//!     .headings([("118584596", vec!["Mozart, Wolfgang Amadeus"])])
//!     .aliases([("118584596", vec!["Mozart, Wolfgang Gottlieb"])])
//!     .strategy(StrategyKind::Fuzzy)
//!     .build()
//!     .unwrap();
//!
//! let result = resolver.find("Mozart, Wolfgang Amadeos").unwrap();
//! assert_eq!(result.level, MatchLevel::fuzzy(1).unwrap());
//! assert!(result.ids.contains("118584596"));
//! ```

pub mod config;
pub mod error;
pub mod identifier;
pub mod index;
pub mod normalize;
pub mod resolver;
pub mod thesaurus;

pub use config::{ResolverConfig, StrategyKind};
pub use error::{ConfigError, IdentifierError, ResolverError, ResolverResult, TableKind};
pub use identifier::{EntityId, Identifier};
pub use resolver::{
    AuthorityTable, AuthorityTables, MatchLevel, MatchResult, MatchSource, Resolver,
    ResolverBuilder, ResolverStats, TertiaryStrategy,
};
pub use thesaurus::{FuzzyMatch, Thesaurus};
