//! The atomic request executor.

use peg_settlement::{forward, reconcile};
use peg_swap::{handlers, PegState};
use peg_types::{Action, ActionKind, Asset, EngineError, Name, SymbolCode};
use tracing::{debug, warn};

use crate::base::BaseSystem;

/// The peg core plus its base system, executing one request at a time.
///
/// `push_request` is the only entry point: it snapshots both sides, runs the
/// action and everything it schedules depth-first, and either commits the
/// whole request or restores the snapshot. State is never observable
/// mid-request from outside.
#[derive(Debug, Clone)]
pub struct Chain<B: BaseSystem + Clone> {
    peg: PegState,
    base: B,
}

impl<B: BaseSystem + Clone> Chain<B> {
    pub fn new(core: Name, base: B) -> Self {
        Self {
            peg: PegState::new(core),
            base,
        }
    }

    pub fn peg(&self) -> &PegState {
        &self.peg
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    /// Mutable adapter access for test fixtures.
    pub fn base_mut(&mut self) -> &mut B {
        &mut self.base
    }

    /// The wrapped balance row for `account`, if one exists.
    pub fn wrapped_balance(&self, account: &Name, code: &SymbolCode) -> Option<Asset> {
        self.peg.ledger.balance(account, code)
    }

    /// Execute one top-level request atomically.
    pub fn push_request(&mut self, action: Action) -> Result<(), EngineError> {
        let peg_snapshot = self.peg.clone();
        let base_snapshot = self.base.clone();
        debug!(?action, "request");
        match self.execute(&action) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.peg = peg_snapshot;
                self.base = base_snapshot;
                warn!(%err, "request rejected, state restored");
                Err(err)
            }
        }
    }

    /// Run an action and, depth-first, everything it schedules.
    fn execute(&mut self, action: &Action) -> Result<(), EngineError> {
        let scheduled = self.dispatch(action)?;
        for child in &scheduled {
            self.execute(child)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: &Action) -> Result<Vec<Action>, EngineError> {
        let Self { peg, base } = self;
        match &action.kind {
            // wrapped token and swap paths
            ActionKind::Init { max_supply } => handlers::init(peg, action, max_supply),
            ActionKind::Transfer {
                from,
                to,
                quantity,
                memo,
            } => handlers::transfer(peg, &*base, action, from, to, quantity, memo),
            ActionKind::Open {
                owner,
                symbol,
                ram_payer,
            } => handlers::open(peg, &*base, action, owner, symbol, ram_payer),
            ActionKind::Close { owner, symbol } => handlers::close(peg, action, owner, symbol),
            ActionKind::Retire { quantity, memo } => handlers::retire(peg, action, quantity, memo),
            ActionKind::SwapTo {
                from,
                to,
                quantity,
                memo,
            } => handlers::swap_to(peg, action, from, to, quantity, memo),
            ActionKind::SetSwapBlock { account, blocked } => {
                handlers::set_swap_block(peg, action, account, *blocked)
            }
            ActionKind::Notify(notice) => handlers::on_base_deposit(peg, notice),

            // reconciliation steps
            ActionKind::EnforceBalance { account, expected } => {
                reconcile::enforce_balance(&*base, account, expected)
            }
            ActionKind::SweepExcess {
                account,
                base_before,
            } => reconcile::sweep_excess(peg, &*base, action, account, base_before),

            // forwarding wrappers
            ActionKind::BidName {
                bidder,
                newname,
                bid,
            } => forward::bid_name(peg, action, bidder, newname, bid),
            ActionKind::BidRefund { bidder, newname } => {
                forward::bid_refund(peg, &*base, action, bidder, newname)
            }
            ActionKind::BuyRam {
                payer,
                receiver,
                quantity,
            } => forward::buy_ram(peg, action, payer, receiver, quantity),
            ActionKind::BuyRamBurn {
                payer,
                quantity,
                memo,
            } => forward::buy_ram_burn(peg, action, payer, quantity, memo),
            ActionKind::BuyRamBytes {
                payer,
                receiver,
                bytes,
            } => forward::buy_ram_bytes(peg, &*base, action, payer, receiver, *bytes),
            ActionKind::BuyRamSelf { payer, quantity } => {
                forward::buy_ram_self(peg, action, payer, quantity)
            }
            ActionKind::RamBurn { owner, bytes, memo } => {
                forward::ram_burn(action, owner, *bytes, memo)
            }
            ActionKind::RamTransfer {
                from,
                to,
                bytes,
                memo,
            } => forward::ram_transfer(action, from, to, *bytes, memo),
            ActionKind::SellRam { account, bytes } => {
                forward::sell_ram(peg, &*base, action, account, *bytes)
            }
            ActionKind::Deposit { owner, amount } => forward::deposit(peg, action, owner, amount),
            ActionKind::BuyRent { from, amount } => forward::buy_rent(peg, action, from, amount),
            ActionKind::MoveToSavings { owner, rent } => {
                forward::move_to_savings(action, owner, rent)
            }
            ActionKind::MoveFromSavings { owner, rent } => {
                forward::move_from_savings(action, owner, rent)
            }
            ActionKind::SellRent { from, rent } => forward::sell_rent(action, from, rent),
            ActionKind::Withdraw { owner, amount } => forward::withdraw(peg, action, owner, amount),
            ActionKind::RentResources {
                payer,
                receiver,
                days,
                net_frac,
                cpu_frac,
                max_payment,
            } => forward::rent_resources(
                peg, &*base, action, payer, receiver, *days, *net_frac, *cpu_frac, max_payment,
            ),
            ActionKind::Delegate {
                from,
                receiver,
                net,
                cpu,
                transfer,
            } => forward::delegate(peg, action, from, receiver, net, cpu, *transfer),
            ActionKind::Undelegate {
                from,
                receiver,
                net,
                cpu,
            } => forward::undelegate(peg, action, from, receiver, net, cpu),
            ActionKind::UnstakeToRent {
                owner,
                receiver,
                from_net,
                from_cpu,
            } => forward::unstake_to_rent(peg, action, owner, receiver, from_net, from_cpu),
            ActionKind::Refund { owner } => forward::refund(peg, &*base, action, owner),
            ActionKind::Vote {
                voter,
                proxy,
                producers,
            } => forward::vote(action, voter, proxy.as_ref(), producers),
            ActionKind::RefreshVote { voter } => forward::refresh_vote(action, voter),
            ActionKind::ClaimRewards { owner } => forward::claim_rewards(action, owner),
            ActionKind::NewAccount { creator, account } => {
                forward::new_account(action, creator, account)
            }
            ActionKind::LinkAuth {
                account,
                code,
                message_type,
                requirement,
            } => forward::link_auth(action, account, code, message_type, requirement),
            ActionKind::UnlinkAuth {
                account,
                code,
                message_type,
            } => forward::unlink_auth(action, account, code, message_type),
            ActionKind::UpdateAuth {
                account,
                permission,
                parent,
                auth,
            } => forward::update_auth(action, account, permission, parent, auth),
            ActionKind::DeleteAuth {
                account,
                permission,
            } => forward::delete_auth(action, account, permission),
            ActionKind::SetCode { account, code } => forward::set_code(action, account, code),
            ActionKind::SetAbi { account, abi } => forward::set_abi(action, account, abi),

            // outbound base request
            ActionKind::Base(request) => base.apply(&action.authorizer, request),
        }
    }
}
