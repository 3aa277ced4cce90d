use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aurum_events::Event;

use crate::ledger::Account;
use crate::transaction::TransactionRecord;
use crate::vault_state::VaultState;

/// A transaction was recorded and the owner's balances updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecorded {
    pub record: TransactionRecord,
    pub balances: Account,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VaultEvent {
    TransactionRecorded(TransactionRecorded),
    VaultStateRecorded(VaultState),
}

impl Event for VaultEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VaultEvent::TransactionRecorded(_) => "vault.transaction.recorded",
            VaultEvent::VaultStateRecorded(_) => "vault.state.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            VaultEvent::TransactionRecorded(e) => e.record.recorded_at,
            VaultEvent::VaultStateRecorded(s) => s.recorded_at,
        }
    }
}
