//! # Peg Core Test Suite
//!
//! Unified test crate exercising the whole stack through the public request
//! interface: every scenario builds a chain from [`peg_runtime::GenesisConfig`]
//! and drives it with `push_request` only.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Chain fixtures shared by every scenario
//! │
//! └── integration/      # End-to-end scenarios
//!     ├── swap_flows.rs     # Deposits, redemptions, swapto, blocking
//!     ├── forwarding.rs     # Priced wrappers, sweeps, balance enforcement
//!     └── conservation.rs   # Supply and backing invariants, rollback
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p peg-tests
//! ```

pub mod integration;
pub mod support;
