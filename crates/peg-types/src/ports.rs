//! # Base System View
//!
//! Read-only port onto the base system. The settlement reconciler and the
//! cost estimator only ever observe the base system through this trait;
//! mutations go through scheduled [`crate::BaseRequest`]s instead.

use crate::asset::Asset;
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Snapshot of the base system's RAM bancor market reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamMarketState {
    /// Connector balance of unsold RAM, in bytes.
    pub ram_reserve: i64,
    /// Connector balance of base currency, in raw units.
    pub base_reserve: i64,
}

/// Read-only queries against the base system's state.
pub trait BaseSystemView {
    /// Whether `account` is registered with the base system.
    fn is_account(&self, account: &Name) -> bool;

    /// The base-currency balance held by `account` on the base ledger.
    /// Accounts with no balance row read as zero.
    fn base_balance(&self, account: &Name) -> Asset;

    /// Current RAM market reserves.
    fn ram_market(&self) -> RamMarketState;
}
