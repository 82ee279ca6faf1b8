//! # Peg Ledger Crate
//!
//! Token accounting for the wrapped currency: per-account balance rows and
//! per-symbol supply statistics.
//!
//! ## Design Principles
//!
//! - **Conservation**: Every mutation either moves value between rows or
//!   adjusts supply and a row by the same amount. The sum of all balances
//!   always equals the recorded supply.
//! - **Checked Arithmetic**: All amount math goes through checked `i64`
//!   operations; overflow is an error, never a wrap.
//! - **Typed Events**: Every mutation returns a [`LedgerEvent`] describing
//!   what changed, so callers can log or assert on ledger activity without
//!   re-deriving it from state diffs.

pub mod events;
pub mod ledger;

pub use events::LedgerEvent;
pub use ledger::{CurrencyStats, TokenLedger};
