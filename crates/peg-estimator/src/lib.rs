//! # Peg Estimator Crate
//!
//! Cost quotes against the base system's RAM bancor market.
//!
//! The byte-denominated RAM wrapper needs to know, before forwarding, how
//! much base currency a purchase of N bytes will cost, so it can swap exactly
//! that much out of the caller's wrapped balance. The quote reproduces the
//! market's own connector formula in `u128` arithmetic; no floating point is
//! used, so the estimate and the market settle to the same integer.

pub mod bancor;

pub use bancor::{quote, ram_bytes_cost, with_fee, EstimateError, FEE_DEN, FEE_NUM};
