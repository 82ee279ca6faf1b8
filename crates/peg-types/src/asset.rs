//! # Fixed-Point Assets
//!
//! An [`Asset`] is a signed 64-bit raw amount scaled by its symbol's
//! precision. All arithmetic is checked: mixing symbols or overflowing an
//! `i64` is an error, never a silent wrap. Amounts may be transiently
//! negative inside a settlement step; ledger operations enforce the
//! non-negative invariant at their own boundaries.

use crate::symbol::{Symbol, SymbolError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by asset arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Arithmetic mixed two different symbols.
    #[error("symbol mismatch: {left} vs {right}")]
    SymbolMismatch { left: Symbol, right: Symbol },

    /// The raw amount overflowed an i64.
    #[error("asset amount overflow")]
    Overflow,

    /// String did not have the shape `"<amount> <CODE>"`.
    #[error("malformed asset string: {0}")]
    Malformed(String),

    /// Fractional digits did not determine a valid precision.
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// A quantity of one currency: raw `i64` amount plus symbol.
///
/// The raw amount is the whole-unit value times `10^precision`, e.g.
/// `1.0000 CORE` has raw amount `10_000`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    /// Construct from a raw amount and symbol.
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// The zero quantity of a currency.
    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    /// True when the raw amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// The same raw amount re-denominated in another symbol.
    ///
    /// This is the 1:1 peg hop: it is only meaningful between symbols of
    /// equal precision, which the swap engine guarantees at initialization.
    pub fn with_symbol(&self, symbol: Symbol) -> Self {
        Self {
            amount: self.amount,
            symbol,
        }
    }

    /// Checked addition; both symbols must match.
    pub fn checked_add(&self, other: &Asset) -> Result<Asset, AssetError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    /// Checked subtraction; both symbols must match.
    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, AssetError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    fn require_same_symbol(&self, other: &Asset) -> Result<(), AssetError> {
        if self.symbol != other.symbol {
            return Err(AssetError::SymbolMismatch {
                left: self.symbol.clone(),
                right: other.symbol.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.symbol.scale();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let whole = abs / scale.unsigned_abs();
        let frac = abs % scale.unsigned_abs();
        if self.symbol.precision() == 0 {
            write!(f, "{sign}{whole} {}", self.symbol.code())
        } else {
            write!(
                f,
                "{sign}{whole}.{frac:0width$} {}",
                self.symbol.code(),
                width = self.symbol.precision() as usize
            )
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({self})")
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    /// Parse `"123.4567 CORE"`; the number of fractional digits becomes the
    /// symbol precision.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AssetError::Malformed(s.to_string());
        let (number, code) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let (sign, digits) = match number.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, number),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, fr)) => (w, fr),
            None => (digits, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let precision = u8::try_from(frac.len()).map_err(|_| malformed())?;
        let symbol = Symbol::new(code, precision)?;

        let whole: i64 = whole.parse().map_err(|_| AssetError::Overflow)?;
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| AssetError::Overflow)?
        };
        let amount = whole
            .checked_mul(symbol.scale())
            .and_then(|w| w.checked_add(frac))
            .and_then(|a| a.checked_mul(sign))
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, symbol))
    }
}
