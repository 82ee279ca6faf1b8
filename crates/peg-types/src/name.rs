//! # Account Names
//!
//! Account identifiers for both the peg core and the base system.
//!
//! A name is 1 to 12 characters drawn from `a-z`, `1-5` and `.`, the
//! character set the base ledger accepts for account registration. Names are
//! ordered and hashable so they can key the balance tables directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of an account name in characters.
pub const MAX_NAME_LEN: usize = 12;

/// Errors produced when validating an account name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name is empty or longer than [`MAX_NAME_LEN`].
    #[error("account name must be 1-{MAX_NAME_LEN} characters, got {0}")]
    InvalidLength(usize),

    /// Name contains a character outside `a-z`, `1-5`, `.`.
    #[error("account name contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A validated account identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Validate and construct a name.
    pub fn new(name: &str) -> Result<Self, NameError> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(NameError::InvalidLength(name.len()));
        }
        for c in name.chars() {
            let valid = c.is_ascii_lowercase() || ('1'..='5').contains(&c) || c == '.';
            if !valid {
                return Err(NameError::InvalidCharacter(c));
            }
        }
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}
