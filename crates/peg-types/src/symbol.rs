//! # Currency Symbols
//!
//! A [`SymbolCode`] is the ticker (1-7 uppercase `A-Z` characters); a
//! [`Symbol`] pairs the code with a precision (number of decimal places).
//! The precision is intrinsic to the currency: two assets only interoperate
//! when both code and precision match.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of a symbol code in characters.
pub const MAX_SYMBOL_LEN: usize = 7;

/// Precision shared by the base currency and the resource-exchange shares.
pub const BASE_PRECISION: u8 = 4;

/// Errors produced when validating a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// Code is empty or longer than [`MAX_SYMBOL_LEN`].
    #[error("symbol code must be 1-{MAX_SYMBOL_LEN} characters, got {0}")]
    InvalidLength(usize),

    /// Code contains a character outside `A-Z`.
    #[error("symbol code contains invalid character '{0}'")]
    InvalidCharacter(char),

    /// Precision larger than an i64 amount can carry meaningfully.
    #[error("symbol precision {0} exceeds maximum of 18")]
    InvalidPrecision(u8),
}

/// A validated currency ticker.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolCode(String);

impl SymbolCode {
    /// Validate and construct a symbol code.
    pub fn new(code: &str) -> Result<Self, SymbolError> {
        if code.is_empty() || code.len() > MAX_SYMBOL_LEN {
            return Err(SymbolError::InvalidLength(code.len()));
        }
        for c in code.chars() {
            if !c.is_ascii_uppercase() {
                return Err(SymbolError::InvalidCharacter(c));
            }
        }
        Ok(Self(code.to_string()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolCode({})", self.0)
    }
}

impl FromStr for SymbolCode {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SymbolCode {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SymbolCode> for String {
    fn from(value: SymbolCode) -> Self {
        value.0
    }
}

/// A currency symbol: ticker plus decimal precision.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    code: SymbolCode,
    precision: u8,
}

impl Symbol {
    /// Validate and construct a symbol.
    pub fn new(code: &str, precision: u8) -> Result<Self, SymbolError> {
        if precision > 18 {
            return Err(SymbolError::InvalidPrecision(precision));
        }
        Ok(Self {
            code: SymbolCode::new(code)?,
            precision,
        })
    }

    /// The base (reserve) currency symbol.
    pub fn base() -> Self {
        Self {
            code: SymbolCode("CORE".to_string()),
            precision: BASE_PRECISION,
        }
    }

    /// The resource-exchange share symbol.
    pub fn rent() -> Self {
        Self {
            code: SymbolCode("RENT".to_string()),
            precision: BASE_PRECISION,
        }
    }

    /// The ticker.
    pub fn code(&self) -> &SymbolCode {
        &self.code
    }

    /// The number of decimal places.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// `10^precision`, the scaling factor between raw amounts and whole units.
    pub fn scale(&self) -> i64 {
        10i64.pow(u32::from(self.precision))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({},{})", self.precision, self.code)
    }
}
