//! Error types for authority matching
//!
//! Only construction can fail. Queries never return an error: "not found",
//! "ambiguous" and blank input are all encoded in the match result.

use std::path::PathBuf;

use thiserror::Error;

/// Construction-time faults raised while building a [`crate::Resolver`]
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Required {table} table was not supplied")]
    MissingTable { table: TableKind },

    #[error("Malformed identifier '{value}' in {table} table: {source}")]
    MalformedIdentifier {
        table: TableKind,
        value: String,
        #[source]
        source: IdentifierError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Which input table an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Headings,
    Aliases,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Headings => write!(f, "heading"),
            TableKind::Aliases => write!(f, "alias"),
        }
    }
}

/// Why a formatted identifier could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier has no digits before the check character")]
    MissingBase,

    #[error("unexpected character '{0}'")]
    InvalidCharacter(char),

    #[error("identifier does not fit in 64 bits")]
    Overflow,

    #[error("check character '{found}' does not match expected '{expected}'")]
    CheckMismatch { expected: char, found: char },
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A numeric match level outside 1..=9
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Match level {0} is outside 1..=9")]
pub struct InvalidLevel(pub u8);

pub type ResolverResult<T> = Result<T, ResolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_message() {
        let err = ResolverError::MissingTable {
            table: TableKind::Aliases,
        };
        assert_eq!(err.to_string(), "Required alias table was not supplied");
    }

    #[test]
    fn test_malformed_identifier_message() {
        let err = ResolverError::MalformedIdentifier {
            table: TableKind::Headings,
            value: "12a4".to_string(),
            source: IdentifierError::InvalidCharacter('a'),
        };
        let msg = err.to_string();
        assert!(msg.contains("12a4"));
        assert!(msg.contains("heading"));
        assert!(msg.contains("'a'"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: ResolverError = ConfigError::Invalid {
            field: "max_distance",
            reason: "must be between 1 and 4".to_string(),
        }
        .into();
        assert!(matches!(err, ResolverError::InvalidConfig(_)));
        assert!(err.to_string().contains("max_distance"));
    }
}
