//! # Peg Swap Crate
//!
//! The 1:1 conversion engine between the base currency and the wrapped
//! currency, plus the wrapped token's own action handlers.
//!
//! ## How the peg works
//!
//! At initialization the entire maximum supply is minted into the core
//! account's own row. That float is the swap counterparty:
//!
//! - A base-currency deposit into the core's base account moves wrapped
//!   tokens out of the float to the depositor, so every externally held
//!   wrapped unit is backed by one base unit held in trust by the core.
//! - A wrapped transfer into the core account is a redeem: the tokens rejoin
//!   the float and the core pays the sender the same amount of base currency.
//!
//! Supply never changes during swaps; only `retire` shrinks it.
//!
//! ## Design Principles
//!
//! - **Fail Closed**: every conversion requires the peg configuration to be
//!   set; nothing swaps before `init`.
//! - **No Direct Dispatch**: handlers mutate the wrapped ledger and return
//!   the follow-up actions they schedule; the executor owns ordering and
//!   rollback.

pub mod handlers;
pub mod state;

pub use state::{PegConfig, PegState};
