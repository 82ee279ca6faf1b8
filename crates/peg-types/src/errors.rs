//! # Error Taxonomy
//!
//! Defines error types used across the peg core, grouped by the component
//! that raises them. Every failure aborts the entire top-level request; none
//! of these are recoverable mid-request.

use crate::asset::{Asset, AssetError};
use crate::name::Name;
use crate::symbol::SymbolCode;
use thiserror::Error;

/// Errors raised by the Ledger component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Quantity was zero or negative where a positive amount is required.
    #[error("must use a positive quantity")]
    NonPositiveAmount,

    /// Debit exceeds the available balance (or no balance row exists).
    #[error("overdrawn balance: {account} has {available}, needs {needed}")]
    InsufficientFunds {
        account: Name,
        available: Asset,
        needed: Asset,
    },

    /// No balance row exists where one is required.
    #[error("no balance row for {account} in {code}")]
    BalanceNotFound { account: Name, code: SymbolCode },

    /// Close attempted on a row whose balance is not exactly zero.
    #[error("cannot close {account}: balance is {balance}, not zero")]
    BalanceNotZero { account: Name, balance: Asset },

    /// No supply record exists for the symbol.
    #[error("token with symbol {0} does not exist")]
    UnknownSymbol(SymbolCode),

    /// A supply record already exists for the symbol.
    #[error("token with symbol {0} already exists")]
    SymbolExists(SymbolCode),

    /// Asset symbol (code or precision) does not match the supply record.
    #[error("symbol precision mismatch")]
    PrecisionMismatch,

    /// Issuance would push current supply past the maximum.
    #[error("quantity exceeds available supply")]
    SupplyOverflow,

    /// A balance row's amount would leave the representable range.
    #[error("balance amount overflow")]
    BalanceOverflow,
}

/// Errors raised by the Peg/Swap Engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// Peg configuration has not been set.
    #[error("the peg core is not initialized")]
    NotInitialized,

    /// Peg configuration was already set; it is immutable afterwards.
    #[error("the peg core is already initialized")]
    AlreadyInitialized,

    /// Received currency is neither the base nor the wrapped symbol.
    #[error("invalid symbol")]
    InvalidCurrency,

    /// Supplied currency is not the configured wrapped symbol.
    #[error("wrong token used")]
    WrongToken,

    /// Wrapped symbol precision does not match the base currency precision.
    #[error("wrapped precision must equal base currency precision")]
    PrecisionMismatch,

    /// Destination account has opted out of directed swap-and-send.
    #[error("recipient is blocked from receiving swapped tokens: {0}")]
    RecipientBlocked(Name),
}

/// Errors raised by the Settlement Reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Post-forward balance differs from the snapshot-derived expectation.
    #[error("base balance mismatch: {actual} != {expected}")]
    BalanceMismatch { actual: Asset, expected: Asset },
}

/// Unified error for request execution.
///
/// Component errors convert into this via `?`; the executor reports it as
/// the rejection reason for the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Action lacked the required authorization.
    #[error("missing required authority of {0}")]
    MissingAuthority(Name),

    /// Referenced account is not registered with the base system.
    #[error("account does not exist: {0}")]
    UnknownAccount(Name),

    /// Memo exceeds the wire limit.
    #[error("memo has more than 256 bytes")]
    MemoTooLong,

    /// Transfer where sender and receiver are the same account.
    #[error("cannot transfer to self")]
    SelfTransfer,

    /// Cost estimation overflowed.
    #[error("cost estimation failed: {0}")]
    Estimate(String),

    /// Failure surfaced verbatim from the base system.
    #[error("base system rejected request: {0}")]
    Base(String),
}
