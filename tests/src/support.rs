//! Chain fixtures shared by the integration scenarios.

use std::sync::Once;

use peg_runtime::{Chain, GenesisConfig, MemoryBaseSystem};
use peg_types::{Action, ActionKind, Asset, BaseRequest, BaseSystemView, Name, Symbol};

static TRACING: Once = Once::new();

/// Route handler logs through the test harness when `RUST_LOG` asks for them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn name(raw: &str) -> Name {
    Name::new(raw).unwrap()
}

pub fn core_account() -> Name {
    name("peg.core")
}

/// Base-currency amount in raw units (4 decimal places).
pub fn base_asset(amount: i64) -> Asset {
    Asset::new(amount, Symbol::base())
}

/// Wrapped-currency amount in raw units (4 decimal places).
pub fn wrapped_asset(amount: i64) -> Asset {
    Asset::new(amount, Symbol::new("PEG", 4).unwrap())
}

/// A freshly initialized chain with the given base-funded accounts.
pub fn standard_chain(accounts: &[(&str, i64)]) -> Chain<MemoryBaseSystem> {
    init_tracing();
    let mut genesis = GenesisConfig::standard().unwrap();
    for (account, balance) in accounts {
        genesis = genesis.with_account(name(account), *balance);
    }
    genesis.build().unwrap()
}

/// Send base currency from `account` to the core, which swaps it into
/// wrapped tokens for the sender.
pub fn deposit(chain: &mut Chain<MemoryBaseSystem>, account: &str, amount: i64) {
    let from = name(account);
    chain
        .push_request(Action::new(
            from.clone(),
            ActionKind::Base(BaseRequest::TokenTransfer {
                from,
                to: core_account(),
                quantity: base_asset(amount),
                memo: String::new(),
            }),
        ))
        .unwrap();
}

/// The wrapped balance of `account` in raw units, zero if no row exists.
pub fn wrapped_of(chain: &Chain<MemoryBaseSystem>, account: &str) -> i64 {
    let code = chain.peg().wrapped_symbol().unwrap().code().clone();
    chain
        .wrapped_balance(&name(account), &code)
        .map(|asset| asset.amount)
        .unwrap_or(0)
}

/// The base-currency balance of `account` in raw units.
pub fn base_of(chain: &Chain<MemoryBaseSystem>, account: &str) -> i64 {
    chain.base().base_balance(&name(account)).amount
}

/// Every wrapped token is accounted for and every externally held wrapped
/// token is backed by base currency in the core account.
pub fn assert_peg_invariants(chain: &Chain<MemoryBaseSystem>) {
    let code = chain.peg().wrapped_symbol().unwrap().code().clone();
    let stats = chain.peg().ledger.stats(&code).unwrap();
    assert_eq!(stats.supply, stats.max_supply, "supply must stay constant");
    assert_eq!(
        chain.peg().ledger.total_balances(&code),
        stats.supply.amount,
        "balance rows must sum to the supply"
    );

    let float = chain
        .wrapped_balance(&core_account(), &code)
        .map(|asset| asset.amount)
        .unwrap_or(0);
    let external = stats.supply.amount - float;
    assert!(
        base_of(chain, "peg.core") >= external,
        "core base reserve {} cannot back {} external wrapped tokens",
        base_of(chain, "peg.core"),
        external
    );
}
