//! Vault domain (cash/gold ledger, transaction records, vault snapshots).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod events;
pub mod ledger;
pub mod quote;
pub mod transaction;
pub mod vault_state;

pub use events::{TransactionRecorded, VaultEvent};
pub use ledger::{Account, LedgerError, LedgerRequest, TransactionKind, apply};
pub use quote::GoldPriceQuote;
pub use transaction::{TransactionRecord, TxReference};
pub use vault_state::{RiskStatus, VaultState, VaultStateInput, simulated_history};
