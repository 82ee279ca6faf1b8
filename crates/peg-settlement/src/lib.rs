//! # Peg Settlement Crate
//!
//! Lets wrapped-token holders invoke base-system operations without ever
//! holding base currency themselves. Every forwarded operation is wrapped in
//! one of two protocols:
//!
//! - **swap before forwarding**: convert the caller's wrapped tokens into
//!   base currency, then forward the base-denominated request on their
//!   behalf;
//! - **forward then reconcile**: snapshot the caller's base balance, forward,
//!   then either verify the balance landed where expected
//!   ([`reconcile::enforce_balance`]) or sweep any surplus back into wrapped
//!   tokens ([`reconcile::sweep_excess`]).
//!
//! The base system's own side effects (refunds, sale proceeds, unused
//! payment remainders) are what make the reconciliation step necessary: the
//! exact cost of several operations is only known after they run.

pub mod forward;
pub mod reconcile;
