//! In-memory reference adapter for the base system.
//!
//! Implements just enough of each base operation for the forwarding wrappers
//! to be exercised end to end: payments move through escrow accounts, the
//! RAM market prices with the same connector formula as the estimator, the
//! resource exchange keeps a share pool, and unstaking goes through a
//! deferred refund. Everything else (votes, rewards, permissions, code) is
//! recorded and acknowledged.

use peg_estimator::{quote, ram_bytes_cost};
use peg_types::{
    Action, ActionKind, Asset, BaseRequest, BaseSystemView, EngineError, Name, RamMarketState,
    Symbol, TransferNotice,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Escrow holding RAM purchase funds and paying out sale proceeds.
pub const RAM_ESCROW: &str = "sys.ram";
/// Escrow holding staked funds and paying out unstake refunds.
pub const STAKE_ESCROW: &str = "sys.stake";
/// Escrow for the resource exchange fund and resource rental fees.
pub const RENT_ESCROW: &str = "sys.rent";
/// Escrow holding name-auction bids.
pub const NAME_ESCROW: &str = "sys.names";

/// Flat per-request resource rental price; rentals never take more than this
/// from `max_payment`, leaving a remainder for the sweep step.
pub const RENT_FLAT_PRICE: i64 = 1_0000;

const ESCROW_FLOAT: i64 = 1_000_000_000_0000;

/// Resource-exchange share pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentPool {
    pub total_lendable: i64,
    pub total_shares: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct VoteRecord {
    proxy: Option<Name>,
    producers: Vec<Name>,
}

/// The reference base system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBaseSystem {
    core: Name,
    accounts: BTreeSet<Name>,
    balances: BTreeMap<Name, i64>,
    ram_market: RamMarketState,
    bid_refunds: BTreeMap<Name, i64>,
    rent_pool: RentPool,
    rent_funds: BTreeMap<Name, i64>,
    rent_savings: BTreeMap<Name, i64>,
    rent_matured: BTreeMap<Name, i64>,
    stakes: BTreeMap<Name, (i64, i64)>,
    refunds: BTreeMap<Name, i64>,
    votes: BTreeMap<Name, VoteRecord>,
    last_request: Option<&'static str>,
}

impl MemoryBaseSystem {
    /// Fresh base system aware of the core account, with funded escrows.
    pub fn new(core: Name, ram_market: RamMarketState, rent_pool: RentPool) -> Self {
        let mut system = Self {
            core,
            accounts: BTreeSet::new(),
            balances: BTreeMap::new(),
            ram_market,
            bid_refunds: BTreeMap::new(),
            rent_pool,
            rent_funds: BTreeMap::new(),
            rent_savings: BTreeMap::new(),
            rent_matured: BTreeMap::new(),
            stakes: BTreeMap::new(),
            refunds: BTreeMap::new(),
            votes: BTreeMap::new(),
            last_request: None,
        };
        for escrow in [RAM_ESCROW, STAKE_ESCROW, RENT_ESCROW, NAME_ESCROW] {
            let name = Name::new(escrow).unwrap_or_else(|_| unreachable!("escrow names are valid"));
            system.accounts.insert(name.clone());
            system.balances.insert(name, ESCROW_FLOAT);
        }
        let core = system.core.clone();
        system.accounts.insert(core);
        system
    }

    /// Register an account with a starting base balance.
    pub fn register_account(&mut self, account: Name, balance: i64) {
        self.balances.insert(account.clone(), balance);
        self.accounts.insert(account);
    }

    /// Make a name-bid refund claimable, as the auction would after an
    /// outbid. Test fixture hook.
    pub fn insert_bid_refund(&mut self, bidder: Name, amount: i64) {
        self.bid_refunds.insert(bidder, amount);
    }

    /// Label of the most recently applied request.
    pub fn last_request(&self) -> Option<&'static str> {
        self.last_request
    }

    pub fn stake_of(&self, account: &Name) -> (i64, i64) {
        self.stakes.get(account).copied().unwrap_or((0, 0))
    }

    pub fn refund_of(&self, account: &Name) -> i64 {
        self.refunds.get(account).copied().unwrap_or(0)
    }

    pub fn rent_fund_of(&self, account: &Name) -> i64 {
        self.rent_funds.get(account).copied().unwrap_or(0)
    }

    pub fn rent_savings_of(&self, account: &Name) -> i64 {
        self.rent_savings.get(account).copied().unwrap_or(0)
    }

    pub fn rent_matured_of(&self, account: &Name) -> i64 {
        self.rent_matured.get(account).copied().unwrap_or(0)
    }

    pub fn producers_voted_by(&self, voter: &Name) -> Option<&[Name]> {
        self.votes.get(voter).map(|v| v.producers.as_slice())
    }

    fn escrow(name: &'static str) -> Name {
        Name::new(name).unwrap_or_else(|_| unreachable!("escrow names are valid"))
    }

    fn require_auth(authorizer: &Name, account: &Name) -> Result<(), EngineError> {
        if authorizer != account {
            return Err(EngineError::MissingAuthority(account.clone()));
        }
        Ok(())
    }

    fn reject(message: &str) -> EngineError {
        EngineError::Base(message.to_string())
    }

    /// Move base currency, emitting a transfer notice when the core is a
    /// party to the transfer.
    fn pay(&mut self, from: &Name, to: &Name, amount: i64) -> Result<Vec<Action>, EngineError> {
        if amount <= 0 {
            return Err(Self::reject("must transfer positive quantity"));
        }
        if from == to {
            return Err(Self::reject("cannot transfer to self"));
        }
        if !self.accounts.contains(to) {
            return Err(Self::reject("to account does not exist"));
        }
        let available = self.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(Self::reject("overdrawn balance"));
        }
        self.balances.insert(from.clone(), available - amount);
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        debug!(%from, %to, amount, "base transfer");

        if from == &self.core || to == &self.core {
            return Ok(vec![Action::new(
                self.core.clone(),
                ActionKind::Notify(TransferNotice {
                    from: from.clone(),
                    to: to.clone(),
                    quantity: Asset::new(amount, Symbol::base()),
                    memo: String::new(),
                }),
            )]);
        }
        Ok(Vec::new())
    }

    fn require_base(quantity: &Asset) -> Result<(), EngineError> {
        if quantity.symbol != Symbol::base() {
            return Err(Self::reject("asset must be system token"));
        }
        Ok(())
    }

    /// Base units bought by `shares` at the current pool ratio.
    fn shares_to_base(&self, shares: i64) -> Result<i64, EngineError> {
        self.require_seeded_pool()?;
        let out = self.rent_pool.total_lendable as u128 * shares as u128
            / self.rent_pool.total_shares as u128;
        Ok(out as i64)
    }

    /// Shares minted for `amount` base units at the current pool ratio.
    fn base_to_shares(&self, amount: i64) -> Result<i64, EngineError> {
        self.require_seeded_pool()?;
        let out = self.rent_pool.total_shares as u128 * amount as u128
            / self.rent_pool.total_lendable as u128;
        Ok(out as i64)
    }

    /// An empty pool has no exchange rate to convert at.
    fn require_seeded_pool(&self) -> Result<(), EngineError> {
        if self.rent_pool.total_lendable <= 0 || self.rent_pool.total_shares <= 0 {
            return Err(Self::reject("rent pool is not seeded"));
        }
        Ok(())
    }

    fn take_from_fund(&mut self, owner: &Name, amount: i64) -> Result<(), EngineError> {
        let fund = self
            .rent_funds
            .get_mut(owner)
            .ok_or_else(|| Self::reject("no deposit found"))?;
        if *fund < amount {
            return Err(Self::reject("insufficient fund balance"));
        }
        *fund -= amount;
        Ok(())
    }
}

impl BaseSystemView for MemoryBaseSystem {
    fn is_account(&self, account: &Name) -> bool {
        self.accounts.contains(account)
    }

    fn base_balance(&self, account: &Name) -> Asset {
        Asset::new(
            self.balances.get(account).copied().unwrap_or(0),
            Symbol::base(),
        )
    }

    fn ram_market(&self) -> RamMarketState {
        self.ram_market.clone()
    }
}

impl super::base::BaseSystem for MemoryBaseSystem {
    fn apply(
        &mut self,
        authorizer: &Name,
        request: &BaseRequest,
    ) -> Result<Vec<Action>, EngineError> {
        let followups = match request {
            BaseRequest::TokenTransfer {
                from,
                to,
                quantity,
                memo: _,
            } => {
                Self::require_auth(authorizer, from)?;
                Self::require_base(quantity)?;
                self.pay(from, to, quantity.amount)?
            }

            BaseRequest::BidName { bidder, bid, .. } => {
                Self::require_auth(authorizer, bidder)?;
                Self::require_base(bid)?;
                if !bid.is_positive() {
                    return Err(Self::reject("insufficient bid"));
                }
                self.pay(bidder, &Self::escrow(NAME_ESCROW), bid.amount)?
            }

            BaseRequest::BidRefund { bidder, .. } => {
                let amount = self
                    .bid_refunds
                    .remove(bidder)
                    .ok_or_else(|| Self::reject("refund bid does not exist"))?;
                self.pay(&Self::escrow(NAME_ESCROW), bidder, amount)?
            }

            BaseRequest::BuyRam {
                payer, quantity, ..
            }
            | BaseRequest::BuyRamSelf { payer, quantity }
            | BaseRequest::BuyRamBurn {
                payer, quantity, ..
            } => {
                Self::require_auth(authorizer, payer)?;
                Self::require_base(quantity)?;
                self.pay(payer, &Self::escrow(RAM_ESCROW), quantity.amount)?
            }

            BaseRequest::BuyRamBytes { payer, bytes, .. } => {
                Self::require_auth(authorizer, payer)?;
                let cost = ram_bytes_cost(&self.ram_market, *bytes)
                    .map_err(|e| Self::reject(&e.to_string()))?;
                self.pay(payer, &Self::escrow(RAM_ESCROW), cost)?
            }

            BaseRequest::RamBurn { owner, .. } => {
                Self::require_auth(authorizer, owner)?;
                Vec::new()
            }

            BaseRequest::RamTransfer { from, .. } => {
                Self::require_auth(authorizer, from)?;
                Vec::new()
            }

            BaseRequest::SellRam { account, bytes } => {
                Self::require_auth(authorizer, account)?;
                if *bytes <= 0 {
                    return Err(Self::reject("cannot sell negative byte quantity"));
                }
                let proceeds = quote(self.ram_market.ram_reserve, self.ram_market.base_reserve, *bytes)
                    .map_err(|e| Self::reject(&e.to_string()))?;
                self.pay(&Self::escrow(RAM_ESCROW), account, proceeds)?
            }

            BaseRequest::ExchangeDeposit { owner, amount } => {
                Self::require_auth(authorizer, owner)?;
                Self::require_base(amount)?;
                let followups = self.pay(owner, &Self::escrow(RENT_ESCROW), amount.amount)?;
                *self.rent_funds.entry(owner.clone()).or_insert(0) += amount.amount;
                followups
            }

            BaseRequest::BuyRent { from, amount } => {
                Self::require_auth(authorizer, from)?;
                Self::require_base(amount)?;
                self.take_from_fund(from, amount.amount)?;
                let shares = self.base_to_shares(amount.amount)?;
                *self.rent_savings.entry(from.clone()).or_insert(0) += shares;
                self.rent_pool.total_lendable += amount.amount;
                self.rent_pool.total_shares += shares;
                Vec::new()
            }

            BaseRequest::MoveToSavings { owner, rent } => {
                Self::require_auth(authorizer, owner)?;
                let matured = self
                    .rent_matured
                    .get_mut(owner)
                    .ok_or_else(|| Self::reject("no matured shares found"))?;
                if *matured < rent.amount {
                    return Err(Self::reject("insufficient matured shares"));
                }
                *matured -= rent.amount;
                *self.rent_savings.entry(owner.clone()).or_insert(0) += rent.amount;
                Vec::new()
            }

            BaseRequest::MoveFromSavings { owner, rent } => {
                Self::require_auth(authorizer, owner)?;
                let savings = self
                    .rent_savings
                    .get_mut(owner)
                    .ok_or_else(|| Self::reject("no shares found"))?;
                if *savings < rent.amount {
                    return Err(Self::reject("insufficient shares"));
                }
                *savings -= rent.amount;
                *self.rent_matured.entry(owner.clone()).or_insert(0) += rent.amount;
                Vec::new()
            }

            BaseRequest::SellRent { from, rent } => {
                Self::require_auth(authorizer, from)?;
                let matured = self
                    .rent_matured
                    .get_mut(from)
                    .ok_or_else(|| Self::reject("no matured shares found"))?;
                if *matured < rent.amount {
                    return Err(Self::reject("insufficient matured shares"));
                }
                *matured -= rent.amount;
                let payout = self.shares_to_base(rent.amount)?;
                self.rent_pool.total_shares -= rent.amount;
                self.rent_pool.total_lendable -= payout;
                *self.rent_funds.entry(from.clone()).or_insert(0) += payout;
                Vec::new()
            }

            BaseRequest::ExchangeWithdraw { owner, amount } => {
                Self::require_auth(authorizer, owner)?;
                Self::require_base(amount)?;
                self.take_from_fund(owner, amount.amount)?;
                self.pay(&Self::escrow(RENT_ESCROW), owner, amount.amount)?
            }

            BaseRequest::RentResources {
                payer, max_payment, ..
            } => {
                Self::require_auth(authorizer, payer)?;
                Self::require_base(max_payment)?;
                if !max_payment.is_positive() {
                    return Err(Self::reject("insufficient payment"));
                }
                let price = max_payment.amount.min(RENT_FLAT_PRICE);
                self.pay(payer, &Self::escrow(RENT_ESCROW), price)?
            }

            BaseRequest::Delegate {
                from, net, cpu, ..
            } => {
                Self::require_auth(authorizer, from)?;
                Self::require_base(net)?;
                Self::require_base(cpu)?;
                if net.amount < 0 || cpu.amount < 0 || net.amount + cpu.amount <= 0 {
                    return Err(Self::reject("must stake a positive amount"));
                }
                let followups = self.pay(from, &Self::escrow(STAKE_ESCROW), net.amount + cpu.amount)?;
                let stake = self.stakes.entry(from.clone()).or_insert((0, 0));
                stake.0 += net.amount;
                stake.1 += cpu.amount;
                followups
            }

            BaseRequest::Undelegate {
                from, net, cpu, ..
            } => {
                Self::require_auth(authorizer, from)?;
                let stake = self
                    .stakes
                    .get_mut(from)
                    .ok_or_else(|| Self::reject("no stake found"))?;
                if stake.0 < net.amount {
                    return Err(Self::reject("insufficient net stake"));
                }
                if stake.1 < cpu.amount {
                    return Err(Self::reject("insufficient cpu stake"));
                }
                stake.0 -= net.amount;
                stake.1 -= cpu.amount;
                *self.refunds.entry(from.clone()).or_insert(0) += net.amount + cpu.amount;
                Vec::new()
            }

            BaseRequest::UnstakeToRent {
                owner,
                from_net,
                from_cpu,
                ..
            } => {
                Self::require_auth(authorizer, owner)?;
                let stake = self
                    .stakes
                    .get_mut(owner)
                    .ok_or_else(|| Self::reject("no stake found"))?;
                if stake.0 < from_net.amount {
                    return Err(Self::reject("insufficient net stake"));
                }
                if stake.1 < from_cpu.amount {
                    return Err(Self::reject("insufficient cpu stake"));
                }
                stake.0 -= from_net.amount;
                stake.1 -= from_cpu.amount;
                let moved = from_net.amount + from_cpu.amount;
                let shares = self.base_to_shares(moved)?;
                *self.rent_savings.entry(owner.clone()).or_insert(0) += shares;
                self.rent_pool.total_lendable += moved;
                self.rent_pool.total_shares += shares;
                Vec::new()
            }

            BaseRequest::Refund { owner } => {
                Self::require_auth(authorizer, owner)?;
                let amount = self
                    .refunds
                    .remove(owner)
                    .ok_or_else(|| Self::reject("refund request not found"))?;
                self.pay(&Self::escrow(STAKE_ESCROW), owner, amount)?
            }

            BaseRequest::Vote {
                voter,
                proxy,
                producers,
            } => {
                Self::require_auth(authorizer, voter)?;
                self.votes.insert(
                    voter.clone(),
                    VoteRecord {
                        proxy: proxy.clone(),
                        producers: producers.clone(),
                    },
                );
                Vec::new()
            }

            BaseRequest::RefreshVote { voter } => {
                Self::require_auth(authorizer, voter)?;
                Vec::new()
            }

            BaseRequest::ClaimRewards { owner } => {
                Self::require_auth(authorizer, owner)?;
                Vec::new()
            }

            BaseRequest::NewAccount { creator, account } => {
                Self::require_auth(authorizer, creator)?;
                if self.accounts.contains(account) {
                    return Err(Self::reject("account already exists"));
                }
                self.register_account(account.clone(), 0);
                Vec::new()
            }

            BaseRequest::LinkAuth { account, .. }
            | BaseRequest::UnlinkAuth { account, .. }
            | BaseRequest::UpdateAuth { account, .. }
            | BaseRequest::DeleteAuth { account, .. }
            | BaseRequest::SetCode { account, .. }
            | BaseRequest::SetAbi { account, .. } => {
                Self::require_auth(authorizer, account)?;
                Vec::new()
            }
        };

        self.last_request = Some(request.label());
        Ok(followups)
    }
}
