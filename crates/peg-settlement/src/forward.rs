//! The catalogue of forwarding wrappers.
//!
//! Every wrapper accepts wrapped-denominated amounts where a price is
//! involved, converts through the reconciliation primitives, and schedules
//! the base-denominated request. Wrappers never talk to the base system
//! directly; they only return the actions to run next.
//!
//! Wrapper shapes:
//! - priced up front: swap before, then forward (`bid_name`, `buy_ram`,
//!   `deposit`, `delegate`, ...)
//! - cost known only afterwards: snapshot, forward, sweep the surplus
//!   (`sell_ram`, `refund`, `bid_refund`, `rent_resources`)
//! - byte-priced: estimate, swap before, forward, enforce the balance
//!   (`buy_ram_bytes`)
//! - no currency at all: plain forwards (`vote`, `new_account`, permission
//!   and code management)

use peg_estimator::ram_bytes_cost;
use peg_swap::PegState;
use peg_types::{
    check_memo, Action, ActionKind, Asset, BaseRequest, BaseSystemView, EngineError, Name, Symbol,
};

use crate::reconcile::{swap_after_forwarding, swap_before_forwarding};

fn forward(authorizer: &Name, request: BaseRequest) -> Action {
    Action::new(authorizer.clone(), ActionKind::Base(request))
}

/// Trailing core-authorized sweep step.
fn sweep_step(state: &PegState, account: &Name, base_before: Asset) -> Action {
    Action::new(
        state.core().clone(),
        ActionKind::SweepExcess {
            account: account.clone(),
            base_before,
        },
    )
}

pub fn bid_name(
    state: &mut PegState,
    action: &Action,
    bidder: &Name,
    newname: &Name,
    bid: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(bidder)?;
    let mut actions = swap_before_forwarding(state, bidder, bid)?;
    actions.push(forward(
        bidder,
        BaseRequest::BidName {
            bidder: bidder.clone(),
            newname: newname.clone(),
            bid: bid.with_symbol(Symbol::base()),
        },
    ));
    Ok(actions)
}

/// Refund amounts depend on auction state, so the refund is swept rather
/// than predicted.
pub fn bid_refund(
    state: &PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    bidder: &Name,
    newname: &Name,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(bidder)?;
    let before = view.base_balance(bidder);
    Ok(vec![
        forward(
            bidder,
            BaseRequest::BidRefund {
                bidder: bidder.clone(),
                newname: newname.clone(),
            },
        ),
        sweep_step(state, bidder, before),
    ])
}

pub fn buy_ram(
    state: &mut PegState,
    action: &Action,
    payer: &Name,
    receiver: &Name,
    quantity: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(payer)?;
    let mut actions = swap_before_forwarding(state, payer, quantity)?;
    actions.push(forward(
        payer,
        BaseRequest::BuyRam {
            payer: payer.clone(),
            receiver: receiver.clone(),
            quantity: quantity.with_symbol(Symbol::base()),
        },
    ));
    Ok(actions)
}

pub fn buy_ram_burn(
    state: &mut PegState,
    action: &Action,
    payer: &Name,
    quantity: &Asset,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(payer)?;
    check_memo(memo)?;
    let mut actions = swap_before_forwarding(state, payer, quantity)?;
    actions.push(forward(
        payer,
        BaseRequest::BuyRamBurn {
            payer: payer.clone(),
            quantity: quantity.with_symbol(Symbol::base()),
            memo: memo.to_string(),
        },
    ));
    Ok(actions)
}

/// Byte-denominated purchase: the cost is estimated against the current
/// market reserves, exactly that much is swapped, and a trailing check
/// verifies the caller's base balance returned to its starting point.
pub fn buy_ram_bytes(
    state: &mut PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    payer: &Name,
    receiver: &Name,
    bytes: u64,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(payer)?;
    let market = view.ram_market();
    let cost = ram_bytes_cost(&market, bytes).map_err(|e| EngineError::Estimate(e.to_string()))?;
    let wrapped_cost = Asset::new(cost, state.wrapped_symbol()?);
    // snapshot before the swap credit lands
    let expected = view.base_balance(payer);

    let mut actions = swap_before_forwarding(state, payer, &wrapped_cost)?;
    actions.push(forward(
        payer,
        BaseRequest::BuyRamBytes {
            payer: payer.clone(),
            receiver: receiver.clone(),
            bytes,
        },
    ));
    actions.push(Action::new(
        payer.clone(),
        ActionKind::EnforceBalance {
            account: payer.clone(),
            expected,
        },
    ));
    Ok(actions)
}

pub fn buy_ram_self(
    state: &mut PegState,
    action: &Action,
    payer: &Name,
    quantity: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(payer)?;
    let mut actions = swap_before_forwarding(state, payer, quantity)?;
    actions.push(forward(
        payer,
        BaseRequest::BuyRamSelf {
            payer: payer.clone(),
            quantity: quantity.with_symbol(Symbol::base()),
        },
    ));
    Ok(actions)
}

pub fn ram_burn(
    action: &Action,
    owner: &Name,
    bytes: i64,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    check_memo(memo)?;
    Ok(vec![forward(
        owner,
        BaseRequest::RamBurn {
            owner: owner.clone(),
            bytes,
            memo: memo.to_string(),
        },
    )])
}

pub fn ram_transfer(
    action: &Action,
    from: &Name,
    to: &Name,
    bytes: i64,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    check_memo(memo)?;
    Ok(vec![forward(
        from,
        BaseRequest::RamTransfer {
            from: from.clone(),
            to: to.clone(),
            bytes,
            memo: memo.to_string(),
        },
    )])
}

/// Sale proceeds are market-priced, so they are swept rather than predicted.
pub fn sell_ram(
    state: &PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    account: &Name,
    bytes: i64,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    let before = view.base_balance(account);
    Ok(vec![
        forward(
            account,
            BaseRequest::SellRam {
                account: account.clone(),
                bytes,
            },
        ),
        sweep_step(state, account, before),
    ])
}

pub fn deposit(
    state: &mut PegState,
    action: &Action,
    owner: &Name,
    amount: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    let mut actions = swap_before_forwarding(state, owner, amount)?;
    actions.push(forward(
        owner,
        BaseRequest::ExchangeDeposit {
            owner: owner.clone(),
            amount: amount.with_symbol(Symbol::base()),
        },
    ));
    Ok(actions)
}

/// Buys exchange shares out of the already-deposited fund; no swap needed.
pub fn buy_rent(
    state: &PegState,
    action: &Action,
    from: &Name,
    amount: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    state.enforce_wrapped(amount)?;
    Ok(vec![forward(
        from,
        BaseRequest::BuyRent {
            from: from.clone(),
            amount: amount.with_symbol(Symbol::base()),
        },
    )])
}

pub fn move_to_savings(
    action: &Action,
    owner: &Name,
    rent: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    Ok(vec![forward(
        owner,
        BaseRequest::MoveToSavings {
            owner: owner.clone(),
            rent: rent.clone(),
        },
    )])
}

pub fn move_from_savings(
    action: &Action,
    owner: &Name,
    rent: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    Ok(vec![forward(
        owner,
        BaseRequest::MoveFromSavings {
            owner: owner.clone(),
            rent: rent.clone(),
        },
    )])
}

pub fn sell_rent(
    action: &Action,
    from: &Name,
    rent: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    Ok(vec![forward(
        from,
        BaseRequest::SellRent {
            from: from.clone(),
            rent: rent.clone(),
        },
    )])
}

/// Withdrawn base currency is immediately round-tripped back into wrapped
/// tokens through the deposit hook.
pub fn withdraw(
    state: &PegState,
    action: &Action,
    owner: &Name,
    amount: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    state.enforce_wrapped(amount)?;
    let base_amount = amount.with_symbol(Symbol::base());
    let mut actions = vec![forward(
        owner,
        BaseRequest::ExchangeWithdraw {
            owner: owner.clone(),
            amount: base_amount.clone(),
        },
    )];
    actions.extend(swap_after_forwarding(state, owner, &base_amount)?);
    Ok(actions)
}

/// The base system may take less than `max_payment`; the remainder is swept
/// back after the forward.
pub fn rent_resources(
    state: &mut PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    payer: &Name,
    receiver: &Name,
    days: u32,
    net_frac: i64,
    cpu_frac: i64,
    max_payment: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(payer)?;
    let before = view.base_balance(payer);
    let mut actions = swap_before_forwarding(state, payer, max_payment)?;
    actions.push(forward(
        payer,
        BaseRequest::RentResources {
            payer: payer.clone(),
            receiver: receiver.clone(),
            days,
            net_frac,
            cpu_frac,
            max_payment: max_payment.with_symbol(Symbol::base()),
        },
    ));
    actions.push(sweep_step(state, payer, before));
    Ok(actions)
}

pub fn delegate(
    state: &mut PegState,
    action: &Action,
    from: &Name,
    receiver: &Name,
    net: &Asset,
    cpu: &Asset,
    transfer: bool,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    let total = net.checked_add(cpu)?;
    let mut actions = swap_before_forwarding(state, from, &total)?;
    actions.push(forward(
        from,
        BaseRequest::Delegate {
            from: from.clone(),
            receiver: receiver.clone(),
            net: net.with_symbol(Symbol::base()),
            cpu: cpu.with_symbol(Symbol::base()),
            transfer,
        },
    ));
    Ok(actions)
}

pub fn undelegate(
    state: &PegState,
    action: &Action,
    from: &Name,
    receiver: &Name,
    net: &Asset,
    cpu: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    state.enforce_wrapped(net)?;
    state.enforce_wrapped(cpu)?;
    Ok(vec![forward(
        from,
        BaseRequest::Undelegate {
            from: from.clone(),
            receiver: receiver.clone(),
            net: net.with_symbol(Symbol::base()),
            cpu: cpu.with_symbol(Symbol::base()),
        },
    )])
}

pub fn unstake_to_rent(
    state: &PegState,
    action: &Action,
    owner: &Name,
    receiver: &Name,
    from_net: &Asset,
    from_cpu: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    state.enforce_wrapped(from_net)?;
    state.enforce_wrapped(from_cpu)?;
    Ok(vec![forward(
        owner,
        BaseRequest::UnstakeToRent {
            owner: owner.clone(),
            receiver: receiver.clone(),
            from_net: from_net.with_symbol(Symbol::base()),
            from_cpu: from_cpu.with_symbol(Symbol::base()),
        },
    )])
}

/// Unstaking refunds arrive as base currency; sweep them back to wrapped.
pub fn refund(
    state: &PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    owner: &Name,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    let before = view.base_balance(owner);
    Ok(vec![
        forward(
            owner,
            BaseRequest::Refund {
                owner: owner.clone(),
            },
        ),
        sweep_step(state, owner, before),
    ])
}

pub fn vote(
    action: &Action,
    voter: &Name,
    proxy: Option<&Name>,
    producers: &[Name],
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(voter)?;
    Ok(vec![forward(
        voter,
        BaseRequest::Vote {
            voter: voter.clone(),
            proxy: proxy.cloned(),
            producers: producers.to_vec(),
        },
    )])
}

pub fn refresh_vote(action: &Action, voter: &Name) -> Result<Vec<Action>, EngineError> {
    action.require_auth(voter)?;
    Ok(vec![forward(
        voter,
        BaseRequest::RefreshVote {
            voter: voter.clone(),
        },
    )])
}

pub fn claim_rewards(action: &Action, owner: &Name) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    Ok(vec![forward(
        owner,
        BaseRequest::ClaimRewards {
            owner: owner.clone(),
        },
    )])
}

pub fn new_account(
    action: &Action,
    creator: &Name,
    account: &Name,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(creator)?;
    Ok(vec![forward(
        creator,
        BaseRequest::NewAccount {
            creator: creator.clone(),
            account: account.clone(),
        },
    )])
}

pub fn link_auth(
    action: &Action,
    account: &Name,
    code: &Name,
    message_type: &str,
    requirement: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::LinkAuth {
            account: account.clone(),
            code: code.clone(),
            message_type: message_type.to_string(),
            requirement: requirement.to_string(),
        },
    )])
}

pub fn unlink_auth(
    action: &Action,
    account: &Name,
    code: &Name,
    message_type: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::UnlinkAuth {
            account: account.clone(),
            code: code.clone(),
            message_type: message_type.to_string(),
        },
    )])
}

pub fn update_auth(
    action: &Action,
    account: &Name,
    permission: &str,
    parent: &str,
    auth: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::UpdateAuth {
            account: account.clone(),
            permission: permission.to_string(),
            parent: parent.to_string(),
            auth: auth.to_string(),
        },
    )])
}

pub fn delete_auth(
    action: &Action,
    account: &Name,
    permission: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::DeleteAuth {
            account: account.clone(),
            permission: permission.to_string(),
        },
    )])
}

pub fn set_code(action: &Action, account: &Name, code: &[u8]) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::SetCode {
            account: account.clone(),
            code: code.to_vec(),
        },
    )])
}

pub fn set_abi(action: &Action, account: &Name, abi: &[u8]) -> Result<Vec<Action>, EngineError> {
    action.require_auth(account)?;
    Ok(vec![forward(
        account,
        BaseRequest::SetAbi {
            account: account.clone(),
            abi: abi.to_vec(),
        },
    )])
}
