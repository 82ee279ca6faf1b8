//! Genesis wiring for a chain backed by the in-memory base system.

use peg_types::{Action, ActionKind, Asset, EngineError, Name, RamMarketState, Symbol};

use crate::chain::Chain;
use crate::memory::{MemoryBaseSystem, RentPool};

/// Everything needed to stand up a working chain: the core account, the
/// wrapped currency's maximum supply, the seeded base accounts and the base
/// system's market parameters.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    pub core: Name,
    pub max_supply: Asset,
    /// Accounts registered at genesis with their base-currency balances.
    pub accounts: Vec<(Name, i64)>,
    pub ram_market: RamMarketState,
    pub rent_pool: RentPool,
}

impl GenesisConfig {
    /// Mainnet-shaped defaults: 2.1 billion wrapped supply and the RAM and
    /// exchange reserves observed on the reference network.
    pub fn standard() -> Result<Self, EngineError> {
        Ok(Self {
            core: Name::new("peg.core").map_err(genesis_error)?,
            max_supply: Asset::new(
                2_100_000_000_0000,
                Symbol::new("PEG", 4).map_err(genesis_error)?,
            ),
            accounts: Vec::new(),
            ram_market: RamMarketState {
                ram_reserve: 85_450_299_267,
                base_reserve: 223_190_417_222,
            },
            rent_pool: RentPool {
                total_lendable: 1_300_942_508_095,
                total_shares: 10_818_039_031_328_963,
            },
        })
    }

    /// Add an account funded with `base_balance` raw base units.
    pub fn with_account(mut self, account: Name, base_balance: i64) -> Self {
        self.accounts.push((account, base_balance));
        self
    }

    /// Build the chain and run peg initialization.
    pub fn build(self) -> Result<Chain<MemoryBaseSystem>, EngineError> {
        let mut base = MemoryBaseSystem::new(self.core.clone(), self.ram_market, self.rent_pool);
        for (account, balance) in self.accounts {
            base.register_account(account, balance);
        }
        let mut chain = Chain::new(self.core.clone(), base);
        chain.push_request(Action::new(
            self.core,
            ActionKind::Init {
                max_supply: self.max_supply,
            },
        ))?;
        Ok(chain)
    }
}

fn genesis_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::Base(format!("invalid genesis parameter: {err}"))
}
