//! # Action Catalogue
//!
//! Every message that can be scheduled inside a top-level request is a
//! variant here: the wrapper's own actions, the base-denominated requests
//! forwarded to the base system, and the transfer notifications the base
//! ledger emits back at the core. Handlers never call each other directly;
//! they return the actions they schedule, and the executor runs them
//! depth-first within the same atomic request.

use crate::asset::Asset;
use crate::errors::EngineError;
use crate::name::Name;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};

/// Maximum memo length in bytes, enforced on all transfers.
pub const MAX_MEMO_BYTES: usize = 256;

/// Reject memos over the wire limit.
pub fn check_memo(memo: &str) -> Result<(), EngineError> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(EngineError::MemoTooLong);
    }
    Ok(())
}

/// A schedulable message: the acting authority plus the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The account whose authority backs this action.
    pub authorizer: Name,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(authorizer: Name, kind: ActionKind) -> Self {
        Self { authorizer, kind }
    }

    /// True when `account` authorized this action.
    pub fn has_auth(&self, account: &Name) -> bool {
        &self.authorizer == account
    }

    /// Fail unless `account` authorized this action.
    pub fn require_auth(&self, account: &Name) -> Result<(), EngineError> {
        if !self.has_auth(account) {
            return Err(EngineError::MissingAuthority(account.clone()));
        }
        Ok(())
    }
}

/// Notification that a base-currency transfer touched the core's account.
///
/// Emitted by the base ledger after the transfer has been applied, and
/// scheduled in the same request, before the sender's remaining sub-actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferNotice {
    pub from: Name,
    pub to: Name,
    pub quantity: Asset,
    pub memo: String,
}

/// Operations addressed to the peg core or scheduled by it.
///
/// Wrapped-denominated wrappers mirror the base system's catalogue; each
/// swaps before or after forwarding so callers never hold base currency
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    // === Wrapped token =====================================================
    /// One-time peg initialization with the wrapped currency's max supply.
    Init { max_supply: Asset },
    Transfer {
        from: Name,
        to: Name,
        quantity: Asset,
        memo: String,
    },
    Open {
        owner: Name,
        symbol: Symbol,
        ram_payer: Name,
    },
    Close { owner: Name, symbol: Symbol },
    Retire { quantity: Asset, memo: String },

    // === Swap ==============================================================
    SwapTo {
        from: Name,
        to: Name,
        quantity: Asset,
        memo: String,
    },
    SetSwapBlock { account: Name, blocked: bool },
    EnforceBalance { account: Name, expected: Asset },
    SweepExcess { account: Name, base_before: Asset },

    // === Forwarding wrappers (wrapped-denominated) =========================
    BidName {
        bidder: Name,
        newname: Name,
        bid: Asset,
    },
    BidRefund { bidder: Name, newname: Name },
    BuyRam {
        payer: Name,
        receiver: Name,
        quantity: Asset,
    },
    BuyRamBurn {
        payer: Name,
        quantity: Asset,
        memo: String,
    },
    BuyRamBytes {
        payer: Name,
        receiver: Name,
        bytes: u64,
    },
    BuyRamSelf { payer: Name, quantity: Asset },
    RamBurn {
        owner: Name,
        bytes: i64,
        memo: String,
    },
    RamTransfer {
        from: Name,
        to: Name,
        bytes: i64,
        memo: String,
    },
    SellRam { account: Name, bytes: i64 },
    Deposit { owner: Name, amount: Asset },
    BuyRent { from: Name, amount: Asset },
    MoveToSavings { owner: Name, rent: Asset },
    MoveFromSavings { owner: Name, rent: Asset },
    SellRent { from: Name, rent: Asset },
    Withdraw { owner: Name, amount: Asset },
    RentResources {
        payer: Name,
        receiver: Name,
        days: u32,
        net_frac: i64,
        cpu_frac: i64,
        max_payment: Asset,
    },
    Delegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        transfer: bool,
    },
    Undelegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
    },
    UnstakeToRent {
        owner: Name,
        receiver: Name,
        from_net: Asset,
        from_cpu: Asset,
    },
    Refund { owner: Name },
    Vote {
        voter: Name,
        proxy: Option<Name>,
        producers: Vec<Name>,
    },
    RefreshVote { voter: Name },
    ClaimRewards { owner: Name },
    NewAccount { creator: Name, account: Name },
    LinkAuth {
        account: Name,
        code: Name,
        message_type: String,
        requirement: String,
    },
    UnlinkAuth {
        account: Name,
        code: Name,
        message_type: String,
    },
    UpdateAuth {
        account: Name,
        permission: String,
        parent: String,
        auth: String,
    },
    DeleteAuth { account: Name, permission: String },
    SetCode { account: Name, code: Vec<u8> },
    SetAbi { account: Name, abi: Vec<u8> },

    // === External ==========================================================
    /// A base-denominated request routed to the base system port.
    Base(BaseRequest),
    /// A base-ledger transfer notification delivered to the core.
    Notify(TransferNotice),
}

/// Requests the base system accepts, all denominated in its own units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BaseRequest {
    TokenTransfer {
        from: Name,
        to: Name,
        quantity: Asset,
        memo: String,
    },
    BidName {
        bidder: Name,
        newname: Name,
        bid: Asset,
    },
    BidRefund { bidder: Name, newname: Name },
    BuyRam {
        payer: Name,
        receiver: Name,
        quantity: Asset,
    },
    BuyRamBurn {
        payer: Name,
        quantity: Asset,
        memo: String,
    },
    BuyRamBytes {
        payer: Name,
        receiver: Name,
        bytes: u64,
    },
    BuyRamSelf { payer: Name, quantity: Asset },
    RamBurn {
        owner: Name,
        bytes: i64,
        memo: String,
    },
    RamTransfer {
        from: Name,
        to: Name,
        bytes: i64,
        memo: String,
    },
    SellRam { account: Name, bytes: i64 },
    ExchangeDeposit { owner: Name, amount: Asset },
    BuyRent { from: Name, amount: Asset },
    MoveToSavings { owner: Name, rent: Asset },
    MoveFromSavings { owner: Name, rent: Asset },
    SellRent { from: Name, rent: Asset },
    ExchangeWithdraw { owner: Name, amount: Asset },
    RentResources {
        payer: Name,
        receiver: Name,
        days: u32,
        net_frac: i64,
        cpu_frac: i64,
        max_payment: Asset,
    },
    Delegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        transfer: bool,
    },
    Undelegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
    },
    UnstakeToRent {
        owner: Name,
        receiver: Name,
        from_net: Asset,
        from_cpu: Asset,
    },
    Refund { owner: Name },
    Vote {
        voter: Name,
        proxy: Option<Name>,
        producers: Vec<Name>,
    },
    RefreshVote { voter: Name },
    ClaimRewards { owner: Name },
    NewAccount { creator: Name, account: Name },
    LinkAuth {
        account: Name,
        code: Name,
        message_type: String,
        requirement: String,
    },
    UnlinkAuth {
        account: Name,
        code: Name,
        message_type: String,
    },
    UpdateAuth {
        account: Name,
        permission: String,
        parent: String,
        auth: String,
    },
    DeleteAuth { account: Name, permission: String },
    SetCode { account: Name, code: Vec<u8> },
    SetAbi { account: Name, abi: Vec<u8> },
}

impl BaseRequest {
    /// Short identifier used for logging and request tracking.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TokenTransfer { .. } => "token_transfer",
            Self::BidName { .. } => "bid_name",
            Self::BidRefund { .. } => "bid_refund",
            Self::BuyRam { .. } => "buy_ram",
            Self::BuyRamBurn { .. } => "buy_ram_burn",
            Self::BuyRamBytes { .. } => "buy_ram_bytes",
            Self::BuyRamSelf { .. } => "buy_ram_self",
            Self::RamBurn { .. } => "ram_burn",
            Self::RamTransfer { .. } => "ram_transfer",
            Self::SellRam { .. } => "sell_ram",
            Self::ExchangeDeposit { .. } => "exchange_deposit",
            Self::BuyRent { .. } => "buy_rent",
            Self::MoveToSavings { .. } => "move_to_savings",
            Self::MoveFromSavings { .. } => "move_from_savings",
            Self::SellRent { .. } => "sell_rent",
            Self::ExchangeWithdraw { .. } => "exchange_withdraw",
            Self::RentResources { .. } => "rent_resources",
            Self::Delegate { .. } => "delegate",
            Self::Undelegate { .. } => "undelegate",
            Self::UnstakeToRent { .. } => "unstake_to_rent",
            Self::Refund { .. } => "refund",
            Self::Vote { .. } => "vote",
            Self::RefreshVote { .. } => "refresh_vote",
            Self::ClaimRewards { .. } => "claim_rewards",
            Self::NewAccount { .. } => "new_account",
            Self::LinkAuth { .. } => "link_auth",
            Self::UnlinkAuth { .. } => "unlink_auth",
            Self::UpdateAuth { .. } => "update_auth",
            Self::DeleteAuth { .. } => "delete_auth",
            Self::SetCode { .. } => "set_code",
            Self::SetAbi { .. } => "set_abi",
        }
    }
}
