//! Storage boundary for accounts, transaction records and vault snapshots.
//!
//! Transaction records and vault snapshots are append-only: the traits offer
//! no way to update or delete them. Account snapshots are overwritten in
//! place by the transaction recorder, which serializes writers per user.

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use aurum_core::UserId;
use aurum_vault::{Account, TransactionRecord, VaultState};

pub use in_memory::{InMemoryAccountStore, InMemoryTransactionLog, InMemoryVaultStateLog};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned: {0}")]
    Poisoned(&'static str),
}

/// Latest balance snapshot per user.
pub trait AccountStore: Send + Sync {
    fn get(&self, user_id: UserId) -> Result<Option<Account>, StoreError>;
    fn put(&self, user_id: UserId, account: Account) -> Result<(), StoreError>;
}

/// Append-only transaction history.
pub trait TransactionLog: Send + Sync {
    fn append(&self, record: TransactionRecord) -> Result<(), StoreError>;

    /// Up to `limit` of the user's records, newest first.
    fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Append-only vault snapshot history, ordered by insertion.
pub trait VaultStateLog: Send + Sync {
    fn append(&self, state: VaultState) -> Result<(), StoreError>;

    /// Append `states` only if the log is empty. Returns how many were added.
    fn append_if_empty(&self, states: Vec<VaultState>) -> Result<usize, StoreError>;

    fn latest(&self) -> Result<Option<VaultState>, StoreError>;

    /// Up to `limit` most recent snapshots, oldest first.
    fn recent(&self, limit: usize) -> Result<Vec<VaultState>, StoreError>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn get(&self, user_id: UserId) -> Result<Option<Account>, StoreError> {
        (**self).get(user_id)
    }

    fn put(&self, user_id: UserId, account: Account) -> Result<(), StoreError> {
        (**self).put(user_id, account)
    }
}

impl<S> TransactionLog for Arc<S>
where
    S: TransactionLog + ?Sized,
{
    fn append(&self, record: TransactionRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }

    fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        (**self).recent_for_user(user_id, limit)
    }
}

impl<S> VaultStateLog for Arc<S>
where
    S: VaultStateLog + ?Sized,
{
    fn append(&self, state: VaultState) -> Result<(), StoreError> {
        (**self).append(state)
    }

    fn append_if_empty(&self, states: Vec<VaultState>) -> Result<usize, StoreError> {
        (**self).append_if_empty(states)
    }

    fn latest(&self) -> Result<Option<VaultState>, StoreError> {
        (**self).latest()
    }

    fn recent(&self, limit: usize) -> Result<Vec<VaultState>, StoreError> {
        (**self).recent(limit)
    }
}
