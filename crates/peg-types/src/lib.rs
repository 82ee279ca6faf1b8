//! # Peg Types Crate
//!
//! This crate contains the domain primitives shared across the peg core:
//! account names, currency symbols, fixed-point assets, the catalogue of
//! schedulable actions and the error taxonomy.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Fixed-Point Only**: Currency amounts are `i64` scaled by the symbol's
//!   precision; no floating point is used anywhere in the core.
//! - **Typed Messages**: Every message that can be scheduled inside a request
//!   (wrapper action, base-system request, transfer notification) is a
//!   variant of the `Action` catalogue, so the executor can replay, log and
//!   roll back requests uniformly.

pub mod action;
pub mod asset;
pub mod errors;
pub mod name;
pub mod ports;
pub mod symbol;

pub use action::{check_memo, Action, ActionKind, BaseRequest, TransferNotice, MAX_MEMO_BYTES};
pub use asset::{Asset, AssetError};
pub use errors::*;
pub use name::Name;
pub use ports::{BaseSystemView, RamMarketState};
pub use symbol::{Symbol, SymbolCode};
