//! The reconciliation primitives shared by every forwarding wrapper.

use peg_swap::{handlers, PegState};
use peg_types::{
    Action, ActionKind, Asset, BaseRequest, BaseSystemView, EngineError, LedgerError, Name,
    SettlementError, Symbol,
};
use tracing::{debug, warn};

/// Convert `quantity` of the caller's wrapped tokens into base currency.
///
/// The wrapped tokens move into the core's float; the transfer event then
/// schedules the core's equal base payment to the caller (the same redeem
/// reaction a plain wrapped transfer into the core triggers), so by the time
/// the forwarded request runs the caller can pay for it in base currency.
pub fn swap_before_forwarding(
    state: &mut PegState,
    account: &Name,
    quantity: &Asset,
) -> Result<Vec<Action>, EngineError> {
    state.enforce_wrapped(quantity)?;
    if !quantity.is_positive() {
        return Err(LedgerError::NonPositiveAmount.into());
    }
    let core = state.core().clone();
    let event = state
        .ledger
        .transfer(account, &core, quantity.clone(), String::new())?;
    debug!(%account, %quantity, "swap before forwarding");
    handlers::on_ledger_event(state, &event)
}

/// Send `amount` of the caller's base currency back to the core.
///
/// The deposit notification hook finishes the job by crediting the caller
/// with wrapped tokens, so this is the second half of a round trip.
pub fn swap_after_forwarding(
    state: &PegState,
    account: &Name,
    amount: &Asset,
) -> Result<Vec<Action>, EngineError> {
    if !amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount.into());
    }
    debug!(%account, %amount, "swap after forwarding");
    Ok(vec![Action::new(
        account.clone(),
        ActionKind::Base(BaseRequest::TokenTransfer {
            from: account.clone(),
            to: state.core().clone(),
            quantity: amount.with_symbol(Symbol::base()),
            memo: String::new(),
        }),
    )])
}

/// Fail the request unless `account`'s base balance equals `expected`.
///
/// Scheduled as the trailing step of wrappers whose cost is computed up
/// front; a mismatch means some notification handler moved base currency
/// the wrapper did not anticipate.
pub fn enforce_balance(
    view: &dyn BaseSystemView,
    account: &Name,
    expected: &Asset,
) -> Result<Vec<Action>, EngineError> {
    let actual = view.base_balance(account);
    if actual != *expected {
        return Err(SettlementError::BalanceMismatch {
            actual,
            expected: expected.clone(),
        }
        .into());
    }
    Ok(Vec::new())
}

/// Swap any base currency `account` gained since `base_before` back into
/// wrapped tokens. Core-authority only; always scheduled as a trailing step.
///
/// A balance below the snapshot is not corrected, only logged: the base
/// system is not expected to debit callers beyond the forwarded cost.
pub fn sweep_excess(
    state: &PegState,
    view: &dyn BaseSystemView,
    action: &Action,
    account: &Name,
    base_before: &Asset,
) -> Result<Vec<Action>, EngineError> {
    action.require_auth(state.core())?;
    let base_after = view.base_balance(account);
    if base_after.amount > base_before.amount {
        let excess = base_after.checked_sub(base_before)?;
        debug!(%account, %excess, "sweeping excess");
        return swap_after_forwarding(state, account, &excess);
    }
    if base_after.amount < base_before.amount {
        warn!(%account, %base_before, %base_after, "base balance fell below snapshot, not swept");
    }
    Ok(Vec::new())
}
