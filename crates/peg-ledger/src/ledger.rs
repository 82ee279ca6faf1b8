//! In-memory token ledger.
//!
//! Balance rows are keyed by `(owner, symbol code)` and supply statistics by
//! symbol code alone, mirroring how the base ledger scopes its tables. The
//! ledger is a plain value type: the executor clones it for its request
//! snapshot and discards the clone on rollback.

use peg_types::{Asset, LedgerError, Name, Symbol, SymbolCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::events::LedgerEvent;

/// Supply record for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyStats {
    pub supply: Asset,
    pub max_supply: Asset,
    pub issuer: Name,
}

/// Balance rows plus supply statistics for every currency this ledger hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenLedger {
    stats: BTreeMap<SymbolCode, CurrencyStats>,
    balances: BTreeMap<(Name, SymbolCode), Asset>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a currency with its issuer and maximum supply.
    pub fn create(&mut self, issuer: Name, max_supply: Asset) -> Result<LedgerEvent, LedgerError> {
        if !max_supply.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        let code = max_supply.symbol.code().clone();
        if self.stats.contains_key(&code) {
            return Err(LedgerError::SymbolExists(code));
        }
        self.stats.insert(
            code,
            CurrencyStats {
                supply: Asset::zero(max_supply.symbol.clone()),
                max_supply: max_supply.clone(),
                issuer: issuer.clone(),
            },
        );
        debug!(%issuer, %max_supply, "currency created");
        Ok(LedgerEvent::Created { issuer, max_supply })
    }

    /// Mint new units into the issuer's balance row.
    pub fn issue(&mut self, quantity: Asset) -> Result<LedgerEvent, LedgerError> {
        if !quantity.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        let stats = self.stats_for(&quantity.symbol)?;
        let issuer = stats.issuer.clone();
        let supply = stats
            .supply
            .checked_add(&quantity)
            .map_err(|_| LedgerError::SupplyOverflow)?;
        if supply.amount > stats.max_supply.amount {
            return Err(LedgerError::SupplyOverflow);
        }
        self.stats
            .get_mut(quantity.symbol.code())
            .ok_or_else(|| LedgerError::UnknownSymbol(quantity.symbol.code().clone()))?
            .supply = supply;
        self.add_balance(&issuer, &quantity)?;
        debug!(to = %issuer, %quantity, "issued");
        Ok(LedgerEvent::Issued {
            to: issuer,
            quantity,
        })
    }

    /// Burn units out of the issuer's balance row.
    pub fn retire(&mut self, quantity: Asset, memo: String) -> Result<LedgerEvent, LedgerError> {
        if !quantity.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        let stats = self.stats_for(&quantity.symbol)?;
        let issuer = stats.issuer.clone();
        let supply = stats
            .supply
            .checked_sub(&quantity)
            .map_err(|_| LedgerError::SupplyOverflow)?;
        self.sub_balance(&issuer, &quantity)?;
        self.stats
            .get_mut(quantity.symbol.code())
            .ok_or_else(|| LedgerError::UnknownSymbol(quantity.symbol.code().clone()))?
            .supply = supply;
        debug!(from = %issuer, %quantity, "retired");
        Ok(LedgerEvent::Retired {
            from: issuer,
            quantity,
            memo,
        })
    }

    /// Move value between two balance rows.
    pub fn transfer(
        &mut self,
        from: &Name,
        to: &Name,
        quantity: Asset,
        memo: String,
    ) -> Result<LedgerEvent, LedgerError> {
        if !quantity.is_positive() {
            return Err(LedgerError::NonPositiveAmount);
        }
        self.stats_for(&quantity.symbol)?;
        self.sub_balance(from, &quantity)?;
        self.add_balance(to, &quantity)?;
        debug!(%from, %to, %quantity, "transferred");
        Ok(LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            quantity,
            memo,
        })
    }

    /// Ensure a balance row exists for `owner`, creating a zero row if absent.
    pub fn open(&mut self, owner: &Name, symbol: &Symbol) -> Result<LedgerEvent, LedgerError> {
        self.stats_for(symbol)?;
        self.balances
            .entry((owner.clone(), symbol.code().clone()))
            .or_insert_with(|| Asset::zero(symbol.clone()));
        Ok(LedgerEvent::Opened {
            owner: owner.clone(),
            symbol: symbol.clone(),
        })
    }

    /// Remove an empty balance row.
    pub fn close(&mut self, owner: &Name, symbol: &Symbol) -> Result<LedgerEvent, LedgerError> {
        let key = (owner.clone(), symbol.code().clone());
        let balance = self
            .balances
            .get(&key)
            .ok_or_else(|| LedgerError::BalanceNotFound {
                account: owner.clone(),
                code: symbol.code().clone(),
            })?;
        if balance.amount != 0 {
            return Err(LedgerError::BalanceNotZero {
                account: owner.clone(),
                balance: balance.clone(),
            });
        }
        self.balances.remove(&key);
        Ok(LedgerEvent::Closed {
            owner: owner.clone(),
            symbol: symbol.clone(),
        })
    }

    /// The balance row for `(owner, code)`, if one exists.
    pub fn balance(&self, owner: &Name, code: &SymbolCode) -> Option<Asset> {
        self.balances.get(&(owner.clone(), code.clone())).cloned()
    }

    /// Like [`Self::balance`] but reading missing rows as zero.
    pub fn balance_or_zero(&self, owner: &Name, symbol: &Symbol) -> Asset {
        self.balance(owner, symbol.code())
            .unwrap_or_else(|| Asset::zero(symbol.clone()))
    }

    /// Supply record for a currency, if registered.
    pub fn stats(&self, code: &SymbolCode) -> Option<&CurrencyStats> {
        self.stats.get(code)
    }

    /// Sum of every balance row in `code`, for conservation checks.
    pub fn total_balances(&self, code: &SymbolCode) -> i64 {
        self.balances
            .iter()
            .filter(|((_, c), _)| c == code)
            .map(|(_, asset)| asset.amount)
            .sum()
    }

    /// Supply record matching the full symbol, rejecting precision drift.
    fn stats_for(&self, symbol: &Symbol) -> Result<&CurrencyStats, LedgerError> {
        let stats = self
            .stats
            .get(symbol.code())
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.code().clone()))?;
        if stats.supply.symbol != *symbol {
            return Err(LedgerError::PrecisionMismatch);
        }
        Ok(stats)
    }

    fn add_balance(&mut self, owner: &Name, quantity: &Asset) -> Result<(), LedgerError> {
        let entry = self
            .balances
            .entry((owner.clone(), quantity.symbol.code().clone()))
            .or_insert_with(|| Asset::zero(quantity.symbol.clone()));
        *entry = entry
            .checked_add(quantity)
            .map_err(|_| LedgerError::BalanceOverflow)?;
        Ok(())
    }

    /// Debits read a missing row as zero, so the failure is always reported
    /// as an overdraw rather than a missing-row error.
    fn sub_balance(&mut self, owner: &Name, quantity: &Asset) -> Result<(), LedgerError> {
        let key = (owner.clone(), quantity.symbol.code().clone());
        let available = self
            .balances
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Asset::zero(quantity.symbol.clone()));
        if available.amount < quantity.amount {
            return Err(LedgerError::InsufficientFunds {
                account: owner.clone(),
                available,
                needed: quantity.clone(),
            });
        }
        let remaining = available
            .checked_sub(quantity)
            .map_err(|_| LedgerError::BalanceOverflow)?;
        self.balances.insert(key, remaining);
        Ok(())
    }
}
