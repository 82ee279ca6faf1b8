//! Typed ledger events, one per mutation.

use peg_types::{Asset, Name, Symbol};
use serde::{Deserialize, Serialize};

/// What a ledger mutation did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A new currency was registered with its maximum supply.
    Created { issuer: Name, max_supply: Asset },

    /// New units entered circulation in the issuer's row.
    Issued { to: Name, quantity: Asset },

    /// Units left circulation from the issuer's row.
    Retired { from: Name, quantity: Asset, memo: String },

    /// Value moved between two balance rows.
    Transferred {
        from: Name,
        to: Name,
        quantity: Asset,
        memo: String,
    },

    /// A zero balance row was created (or already existed).
    Opened { owner: Name, symbol: Symbol },

    /// An empty balance row was removed.
    Closed { owner: Name, symbol: Symbol },
}
