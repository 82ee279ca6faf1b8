//! Connector-pair quoting.
//!
//! `quote` computes how much of the output reserve a given input buys:
//!
//! ```text
//! out = floor(reserve_out * amount_in / (reserve_in + amount_in))
//! ```
//!
//! Intermediate products are carried in `u128` so reserves near `i64::MAX`
//! cannot overflow. `with_fee` grosses a cost up by the market's 0.5% fee,
//! rounding up so the estimate never undershoots what the market charges.

use peg_types::RamMarketState;
use thiserror::Error;

/// Fee gross-up numerator: cost * 1000 / 995 is cost / 0.995.
pub const FEE_NUM: u128 = 1000;
/// Fee gross-up denominator.
pub const FEE_DEN: u128 = 995;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// Input amount or a reserve was zero or negative.
    #[error("quote requires positive reserves and amount")]
    NonPositiveInput,

    /// Quoted value does not fit an `i64`.
    #[error("quoted cost overflows")]
    Overflow,
}

/// Output units received for `amount_in` input units against a connector pair.
pub fn quote(reserve_in: i64, reserve_out: i64, amount_in: i64) -> Result<i64, EstimateError> {
    if reserve_in <= 0 || reserve_out <= 0 || amount_in <= 0 {
        return Err(EstimateError::NonPositiveInput);
    }
    let numerator = reserve_out as u128 * amount_in as u128;
    let denominator = reserve_in as u128 + amount_in as u128;
    let out = numerator / denominator;
    i64::try_from(out).map_err(|_| EstimateError::Overflow)
}

/// Gross `cost` up by the market fee, rounding up.
pub fn with_fee(cost: i64) -> Result<i64, EstimateError> {
    if cost < 0 {
        return Err(EstimateError::NonPositiveInput);
    }
    let gross = (cost as u128 * FEE_NUM).div_ceil(FEE_DEN);
    i64::try_from(gross).map_err(|_| EstimateError::Overflow)
}

/// Fee-inclusive base-currency cost of buying `bytes` bytes of RAM.
pub fn ram_bytes_cost(market: &RamMarketState, bytes: u64) -> Result<i64, EstimateError> {
    let bytes = i64::try_from(bytes).map_err(|_| EstimateError::Overflow)?;
    let cost = quote(market.ram_reserve, market.base_reserve, bytes)?;
    with_fee(cost)
}
