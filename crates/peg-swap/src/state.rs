//! Peg engine state: configuration singleton, blocked-recipient set and the
//! wrapped token ledger.

use peg_ledger::TokenLedger;
use peg_types::{Asset, Name, SwapError, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Peg configuration, set once at initialization and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegConfig {
    /// The wrapped currency symbol chosen at `init`.
    pub wrapped: Symbol,
}

/// All state owned by the peg core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PegState {
    core: Name,
    config: Option<PegConfig>,
    blocked: BTreeSet<Name>,
    pub ledger: TokenLedger,
}

impl PegState {
    /// Fresh, uninitialized state for a core running as `core`.
    pub fn new(core: Name) -> Self {
        Self {
            core,
            config: None,
            blocked: BTreeSet::new(),
            ledger: TokenLedger::new(),
        }
    }

    /// The core's own account name.
    pub fn core(&self) -> &Name {
        &self.core
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    /// The configured wrapped symbol, or `NotInitialized`.
    pub fn wrapped_symbol(&self) -> Result<Symbol, SwapError> {
        self.config
            .as_ref()
            .map(|cfg| cfg.wrapped.clone())
            .ok_or(SwapError::NotInitialized)
    }

    /// Store the configuration; fails once set.
    pub fn set_config(&mut self, config: PegConfig) -> Result<(), SwapError> {
        if self.config.is_some() {
            return Err(SwapError::AlreadyInitialized);
        }
        self.config = Some(config);
        Ok(())
    }

    /// Fail unless `quantity` is denominated in the wrapped symbol.
    pub fn enforce_wrapped(&self, quantity: &Asset) -> Result<(), SwapError> {
        if quantity.symbol != self.wrapped_symbol()? {
            return Err(SwapError::WrongToken);
        }
        Ok(())
    }

    pub fn is_blocked(&self, account: &Name) -> bool {
        self.blocked.contains(account)
    }

    /// Add or remove `account` from the blocked-recipient set. Idempotent.
    pub fn set_blocked(&mut self, account: Name, blocked: bool) {
        if blocked {
            self.blocked.insert(account);
        } else {
            self.blocked.remove(&account);
        }
    }
}
