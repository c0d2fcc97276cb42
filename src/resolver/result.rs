//! Match result model
//!
//! Every non-blank query yields a [`MatchResult`] carrying a [`MatchLevel`]:
//!
//! | level | prefix strategy            | fuzzy strategy |
//! |-------|----------------------------|----------------|
//! | 1 / 2 | exact heading, unique / ambiguous | same    |
//! | 3 / 4 | exact alias, unique / ambiguous   | same    |
//! | 5 / 6 | heading prefix, unique / ambiguous | distance 1 / 2 |
//! | 7 / 8 | alias prefix, unique / ambiguous   | distance 3 / 4 |
//! | 9     | no match                   | no match       |
//!
//! Lower levels are strictly more confident. The fuzzy levels do not encode
//! uniqueness; use [`MatchResult::is_ambiguous`] for that.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::InvalidLevel;

/// Confidence tier of a match, 1 (best) to 9 (no match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MatchLevel(u8);

impl MatchLevel {
    pub const EXACT_HEADING: Self = Self(1);
    pub const EXACT_HEADING_AMBIGUOUS: Self = Self(2);
    pub const EXACT_ALIAS: Self = Self(3);
    pub const EXACT_ALIAS_AMBIGUOUS: Self = Self(4);
    pub const HEADING_PREFIX: Self = Self(5);
    pub const HEADING_PREFIX_AMBIGUOUS: Self = Self(6);
    pub const ALIAS_PREFIX: Self = Self(7);
    pub const ALIAS_PREFIX_AMBIGUOUS: Self = Self(8);
    pub const NO_MATCH: Self = Self(9);

    /// Level for a fuzzy match at `distance` edits (1..=4 → 5..=8)
    pub fn fuzzy(distance: usize) -> Option<Self> {
        match distance {
            1..=4 => Some(Self(4 + distance as u8)),
            _ => None,
        }
    }

    /// Pick the unique or ambiguous level of a tier by candidate count
    pub(crate) fn by_count(unique: Self, ambiguous: Self, count: usize) -> Self {
        if count > 1 {
            ambiguous
        } else {
            unique
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_no_match(self) -> bool {
        self.0 == 9
    }

    /// Odd levels below 9. Meaningful for levels 1-4 and the prefix strategy's 5-8.
    pub const fn is_unique_tier(self) -> bool {
        self.0 % 2 == 1 && self.0 < 9
    }
}

impl TryFrom<u8> for MatchLevel {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidLevel(value))
        }
    }
}

impl From<MatchLevel> for u8 {
    fn from(level: MatchLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum MatchSource {
    ExactHeading,
    ExactAlias,
    HeadingPrefix,
    AliasPrefix,
    Fuzzy { distance: usize },
    None,
}

/// Outcome of resolving one name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Formatted identifiers of the matched entities
    pub ids: BTreeSet<String>,
    /// Raw display strings of the matched entities
    pub names: BTreeSet<String>,
    pub level: MatchLevel,
    pub source: MatchSource,
}

impl MatchResult {
    /// Level 9: nothing matched
    pub fn no_match() -> Self {
        Self {
            ids: BTreeSet::new(),
            names: BTreeSet::new(),
            level: MatchLevel::NO_MATCH,
            source: MatchSource::None,
        }
    }

    pub(crate) fn matched(
        ids: BTreeSet<String>,
        names: BTreeSet<String>,
        level: MatchLevel,
        source: MatchSource,
    ) -> Self {
        if ids.is_empty() {
            return Self::no_match();
        }
        Self {
            ids,
            names,
            level,
            source,
        }
    }

    pub fn is_match(&self) -> bool {
        !self.level.is_no_match()
    }

    /// More than one entity matched; the caller has to choose
    pub fn is_ambiguous(&self) -> bool {
        self.ids.len() > 1
    }

    /// The single matched identifier, if the match is unambiguous
    pub fn unique_id(&self) -> Option<&str> {
        match self.ids.len() {
            1 => self.ids.iter().next().map(String::as_str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_levels() {
        assert_eq!(MatchLevel::fuzzy(0), None);
        assert_eq!(MatchLevel::fuzzy(1), Some(MatchLevel::HEADING_PREFIX));
        assert_eq!(MatchLevel::fuzzy(4).map(MatchLevel::value), Some(8));
        assert_eq!(MatchLevel::fuzzy(5), None);
    }

    #[test]
    fn test_level_ordering_is_confidence() {
        assert!(MatchLevel::EXACT_HEADING < MatchLevel::EXACT_HEADING_AMBIGUOUS);
        assert!(MatchLevel::EXACT_ALIAS_AMBIGUOUS < MatchLevel::HEADING_PREFIX);
        assert!(MatchLevel::ALIAS_PREFIX_AMBIGUOUS < MatchLevel::NO_MATCH);
    }

    #[test]
    fn test_unique_tiers() {
        let unique: Vec<u8> = (1..=9)
            .filter_map(|v| MatchLevel::try_from(v).ok())
            .filter(|l| l.is_unique_tier())
            .map(MatchLevel::value)
            .collect();
        assert_eq!(unique, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_try_from_bounds() {
        assert_eq!(MatchLevel::try_from(0), Err(InvalidLevel(0)));
        assert_eq!(MatchLevel::try_from(10), Err(InvalidLevel(10)));
        assert_eq!(MatchLevel::try_from(9), Ok(MatchLevel::NO_MATCH));
    }

    #[test]
    fn test_by_count() {
        let pick = |n| MatchLevel::by_count(MatchLevel::EXACT_ALIAS, MatchLevel::EXACT_ALIAS_AMBIGUOUS, n);
        assert_eq!(pick(1), MatchLevel::EXACT_ALIAS);
        assert_eq!(pick(3), MatchLevel::EXACT_ALIAS_AMBIGUOUS);
    }

    #[test]
    fn test_no_match_invariant() {
        let result = MatchResult::no_match();
        assert!(!result.is_match());
        assert!(result.ids.is_empty());
        assert!(result.names.is_empty());

        let forced = MatchResult::matched(
            BTreeSet::new(),
            BTreeSet::from(["Bach".to_string()]),
            MatchLevel::EXACT_HEADING,
            MatchSource::ExactHeading,
        );
        assert_eq!(forced, MatchResult::no_match());
    }

    #[test]
    fn test_unique_id() {
        let one = MatchResult::matched(
            BTreeSet::from(["19".to_string()]),
            BTreeSet::new(),
            MatchLevel::EXACT_HEADING,
            MatchSource::ExactHeading,
        );
        assert_eq!(one.unique_id(), Some("19"));
        assert!(!one.is_ambiguous());

        let two = MatchResult::matched(
            BTreeSet::from(["19".to_string(), "27".to_string()]),
            BTreeSet::new(),
            MatchLevel::EXACT_HEADING_AMBIGUOUS,
            MatchSource::ExactHeading,
        );
        assert_eq!(two.unique_id(), None);
        assert!(two.is_ambiguous());
    }

    #[test]
    fn test_json_shape() {
        let result = MatchResult::matched(
            BTreeSet::from(["118584596".to_string()]),
            BTreeSet::from(["Mozart, Wolfgang Amadeus".to_string()]),
            MatchLevel::fuzzy(1).unwrap(),
            MatchSource::Fuzzy { distance: 1 },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["level"], 5);
        assert_eq!(json["source"]["tier"], "fuzzy");
        assert_eq!(json["source"]["distance"], 1);
        assert_eq!(json["ids"][0], "118584596");

        let back: MatchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_json_rejects_invalid_level() {
        let json = serde_json::json!({
            "ids": [],
            "names": [],
            "level": 12,
            "source": { "tier": "none" }
        });
        assert!(serde_json::from_value::<MatchResult>(json).is_err());
    }
}
