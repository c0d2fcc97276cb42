//! Authority identifiers
//!
//! Authority records are keyed by a formatted identifier: a run of digits
//! followed by a modulus-11 check character, optionally separated by a
//! hyphen (`118584596`, `11850553X`, `4011882-4`). Internally an entity is
//! keyed by the digits alone, see [`EntityId`].
//!
//! Both spellings weight the digits 2, 3, 4, ... from the right, but derive
//! the check value differently:
//!
//! ```text
//! compact     118584596   check = (11 - sum % 11) % 11
//! hyphenated  4011882-4   check = sum % 11
//! ```
//!
//! A check value of 10 renders as `X`.

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Canonical key of an authority entity (identifier digits without the check character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Check character of the compact spelling
    pub fn check_char(self) -> char {
        check_symbol((11 - self.weighted_sum() % 11) % 11)
    }

    /// Check character of the hyphenated `digits-check` spelling
    pub fn hyphenated_check_char(self) -> char {
        check_symbol(self.weighted_sum() % 11)
    }

    /// Digit sum with weights 2, 3, 4, ... from the rightmost digit
    fn weighted_sum(self) -> u64 {
        let mut sum = 0u64;
        let mut weight = 2u64;
        let mut rest = self.0;
        loop {
            sum += (rest % 10) * weight;
            rest /= 10;
            weight += 1;
            if rest == 0 {
                break;
            }
        }
        sum
    }

    /// Canonical compact spelling: digits followed by the check character
    pub fn formatted(self) -> String {
        format!("{}{}", self.0, self.check_char())
    }
}

fn check_symbol(value: u64) -> char {
    match value {
        10 => 'X',
        digit => char::from_digit(digit as u32, 10).unwrap_or('0'),
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A parsed identifier together with the spelling it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub id: EntityId,
    pub formatted: String,
}

impl Identifier {
    /// Parse a formatted identifier.
    ///
    /// With `verify_check` the trailing check character must match the one
    /// computed from the digits under the rule of the spelling used.
    pub fn parse(raw: &str, verify_check: bool) -> Result<Self, IdentifierError> {
        let formatted = raw.trim();
        if formatted.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let (base, check, hyphenated) = split_check(formatted)?;
        if base.is_empty() {
            return Err(IdentifierError::MissingBase);
        }
        if !(check.is_ascii_digit() || check == 'X' || check == 'x') {
            return Err(IdentifierError::InvalidCharacter(check));
        }

        let mut value: u64 = 0;
        for c in base.chars() {
            let digit = c
                .to_digit(10)
                .ok_or(IdentifierError::InvalidCharacter(c))?;
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or(IdentifierError::Overflow)?;
        }

        let id = EntityId(value);
        if verify_check {
            let expected = if hyphenated {
                id.hyphenated_check_char()
            } else {
                id.check_char()
            };
            let found = check.to_ascii_uppercase();
            if expected != found {
                return Err(IdentifierError::CheckMismatch { expected, found });
            }
        }

        Ok(Self {
            id,
            formatted: formatted.to_string(),
        })
    }
}

/// Split `base[-]check` into the base digits, the check character, and
/// whether the hyphenated spelling was used
fn split_check(formatted: &str) -> Result<(&str, char, bool), IdentifierError> {
    if let Some((base, check)) = formatted.rsplit_once('-') {
        let mut chars = check.chars();
        let first = chars.next().ok_or(IdentifierError::InvalidCharacter('-'))?;
        if let Some(extra) = chars.next() {
            return Err(IdentifierError::InvalidCharacter(extra));
        }
        return Ok((base, first, true));
    }

    let mut chars = formatted.chars();
    let check = chars.next_back().ok_or(IdentifierError::Empty)?;
    Ok((chars.as_str(), check, false))
}
