//! Action handlers for the wrapped token and the swap paths.
//!
//! Each handler validates authority and arguments, mutates the peg state,
//! and returns the follow-up actions it schedules. The executor runs those
//! depth-first inside the same atomic request, so a failure anywhere in the
//! chain discards everything a handler did here.

use peg_ledger::LedgerEvent;
use peg_types::{
    check_memo, Action, ActionKind, Asset, BaseRequest, BaseSystemView, EngineError, LedgerError,
    Name, SwapError, Symbol, TransferNotice,
};
use tracing::{debug, info};

use crate::state::{PegConfig, PegState};

/// Infrastructure accounts whose inbound base transfers are bookkeeping,
/// not deposits. Swapping those would strand tokens in escrow accounts.
fn is_system_payer(account: &Name) -> bool {
    matches!(account.as_str(), "sys.ram" | "sys.stake")
}

/// One-time peg initialization: store the configuration and mint the whole
/// maximum supply into the core's own row as the swap float.
pub fn init(
    state: &mut PegState,
    action: &Action,
    max_supply: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(state.core())?;
    if state.is_initialized() {
        return Err(SwapError::AlreadyInitialized.into());
    }
    if !max_supply.is_positive() {
        return Err(LedgerError::NonPositiveAmount.into());
    }
    if max_supply.symbol.code() == Symbol::base().code() {
        return Err(SwapError::InvalidCurrency.into());
    }
    if max_supply.symbol.precision() != Symbol::base().precision() {
        return Err(SwapError::PrecisionMismatch.into());
    }

    state.set_config(PegConfig {
        wrapped: max_supply.symbol.clone(),
    })?;
    let core = state.core().clone();
    state.ledger.create(core, max_supply.clone())?;
    state.ledger.issue(max_supply.clone())?;
    info!(%max_supply, "peg initialized");
    Ok(Vec::new())
}

/// Wrapped-currency transfer. A transfer into the core account doubles as a
/// redeem request: the tokens rejoin the float and the core pays the sender
/// the same amount of base currency.
pub fn transfer(
    state: &mut PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    from: &Name,
    to: &Name,
    quantity: &Asset,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    if from == to {
        return Err(EngineError::SelfTransfer);
    }
    action.require_auth(from)?;
    if !view.is_account(to) {
        return Err(EngineError::UnknownAccount(to.clone()));
    }
    check_memo(memo)?;

    let event = state
        .ledger
        .transfer(from, to, quantity.clone(), memo.to_string())?;
    on_ledger_event(state, &event)
}

/// Schedule whatever a ledger mutation implies.
///
/// The only event with a follow-up is a wrapped transfer landing in the core
/// account: that is a redeem, the tokens rejoined the float and the core
/// owes the sender an equal base payment. Everything else schedules nothing.
pub fn on_ledger_event(state: &PegState, event: &LedgerEvent) -> Result<Vec<Action>, EngineError> {
    if let LedgerEvent::Transferred {
        from, to, quantity, ..
    } = event
    {
        if to == state.core() {
            state.enforce_wrapped(quantity)?;
            debug!(%from, %quantity, "redeem");
            return Ok(vec![credit_base_to(state, from, quantity)]);
        }
    }
    Ok(Vec::new())
}

/// Create a zero balance row for `owner`; idempotent when one exists.
pub fn open(
    state: &mut PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    owner: &Name,
    symbol: &Symbol,
    ram_payer: &Name,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(ram_payer)?;
    if !view.is_account(owner) {
        return Err(EngineError::UnknownAccount(owner.clone()));
    }
    let event = state.ledger.open(owner, symbol)?;
    on_ledger_event(state, &event)
}

/// Remove an empty balance row.
pub fn close(
    state: &mut PegState,
    action: &Action,
    owner: &Name,
    symbol: &Symbol,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(owner)?;
    let event = state.ledger.close(owner, symbol)?;
    on_ledger_event(state, &event)
}

/// Burn wrapped tokens out of the issuer's float, shrinking the supply.
pub fn retire(
    state: &mut PegState,
    action: &Action,
    quantity: &Asset,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    check_memo(memo)?;
    let issuer = state
        .ledger
        .stats(quantity.symbol.code())
        .ok_or_else(|| LedgerError::UnknownSymbol(quantity.symbol.code().clone()))?
        .issuer
        .clone();
    action.require_auth(&issuer)?;
    let event = state.ledger.retire(quantity.clone(), memo.to_string())?;
    on_ledger_event(state, &event)
}

/// Deposit-triggered swap: base currency arriving at the core account is
/// answered with an equal wrapped transfer out of the float to the sender.
pub fn on_base_deposit(
    state: &mut PegState,
    notice: &TransferNotice,
) -> Result<Vec<Action>, EngineError> {
    if &notice.from == state.core() || &notice.to != state.core() {
        return Ok(Vec::new());
    }
    if !notice.quantity.is_positive() {
        return Err(LedgerError::NonPositiveAmount.into());
    }
    if is_system_payer(&notice.from) {
        debug!(from = %notice.from, "ignoring infrastructure transfer");
        return Ok(Vec::new());
    }
    if notice.quantity.symbol != Symbol::base() {
        return Err(SwapError::InvalidCurrency.into());
    }
    let wrapped = state.wrapped_symbol()?;

    let swap_amount = notice.quantity.with_symbol(wrapped);
    debug!(from = %notice.from, %swap_amount, "deposit swap");
    Ok(vec![Action::new(
        state.core().clone(),
        ActionKind::Transfer {
            from: state.core().clone(),
            to: notice.from.clone(),
            quantity: swap_amount,
            memo: String::new(),
        },
    )])
}

/// Swap-and-send: convert in either direction and deliver the converted
/// currency straight to `to`, unless `to` has opted out.
pub fn swap_to(
    state: &mut PegState,
    action: &Action,
    from: &Name,
    to: &Name,
    quantity: &Asset,
    memo: &str,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(from)?;
    if state.is_blocked(to) {
        return Err(SwapError::RecipientBlocked(to.clone()).into());
    }
    let wrapped = state.wrapped_symbol()?;
    let core = state.core().clone();

    if quantity.symbol == Symbol::base() {
        // Deposit first; the notification hook credits `from` with wrapped
        // tokens, which the second step then passes along.
        Ok(vec![
            Action::new(
                from.clone(),
                ActionKind::Base(BaseRequest::TokenTransfer {
                    from: from.clone(),
                    to: core,
                    quantity: quantity.clone(),
                    memo: memo.to_string(),
                }),
            ),
            Action::new(
                from.clone(),
                ActionKind::Transfer {
                    from: from.clone(),
                    to: to.clone(),
                    quantity: quantity.with_symbol(wrapped),
                    memo: memo.to_string(),
                },
            ),
        ])
    } else if quantity.symbol == wrapped {
        // Redeem first; the core pays `from` base currency, which the second
        // step then passes along.
        Ok(vec![
            Action::new(
                from.clone(),
                ActionKind::Transfer {
                    from: from.clone(),
                    to: core,
                    quantity: quantity.clone(),
                    memo: memo.to_string(),
                },
            ),
            Action::new(
                from.clone(),
                ActionKind::Base(BaseRequest::TokenTransfer {
                    from: from.clone(),
                    to: to.clone(),
                    quantity: quantity.with_symbol(Symbol::base()),
                    memo: memo.to_string(),
                }),
            ),
        ])
    } else {
        Err(SwapError::InvalidCurrency.into())
    }
}

/// Toggle the blocked-recipient flag. The account itself or the core
/// authority may change it; nobody else.
pub fn set_swap_block(
    state: &mut PegState,
    action: &Action,
    account: &Name,
    blocked: bool,
) -> Result<Vec<Action>, EngineError> {
    if !action.has_auth(state.core()) {
        action.require_auth(account)?;
    }
    state.set_blocked(account.clone(), blocked);
    Ok(Vec::new())
}

/// Outgoing base payment from the core to `account`, matching `quantity`'s
/// raw amount.
fn credit_base_to(state: &PegState, account: &Name, quantity: &Asset) -> Action {
    Action::new(
        state.core().clone(),
        ActionKind::Base(BaseRequest::TokenTransfer {
            from: state.core().clone(),
            to: account.clone(),
            quantity: quantity.with_symbol(Symbol::base()),
            memo: String::new(),
        }),
    )
}
