//! # Peg Runtime Crate
//!
//! Owns the execution model the other crates assume: one top-level request
//! at a time, run to completion, all-or-nothing.
//!
//! ## Request lifecycle
//!
//! 1. [`chain::Chain::push_request`] snapshots the peg state and the base
//!    system adapter.
//! 2. The action is dispatched to its handler, which mutates state and
//!    returns the follow-up actions it scheduled.
//! 3. Scheduled actions execute depth-first: each child runs to completion
//!    (including its own children) before the next sibling.
//! 4. Any error unwinds the whole request and restores the snapshot; success
//!    commits everything at once.
//!
//! The base system is reached through the [`base::BaseSystem`] port.
//! [`memory::MemoryBaseSystem`] is the reference adapter used by the test
//! suite; it reproduces the base-system behaviors the forwarding wrappers
//! depend on (escrowed payments, RAM market pricing, the resource exchange,
//! delegation refunds) without any of the rest.

pub mod base;
pub mod chain;
pub mod genesis;
pub mod memory;

pub use base::BaseSystem;
pub use chain::Chain;
pub use genesis::GenesisConfig;
pub use memory::MemoryBaseSystem;
