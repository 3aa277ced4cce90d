use std::collections::HashMap;
use std::sync::RwLock;

use aurum_core::UserId;
use aurum_vault::{Account, TransactionRecord, VaultState};

use super::{AccountStore, StoreError, TransactionLog, VaultStateLog};

/// In-memory account snapshots. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<UserId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, user_id: UserId) -> Result<Option<Account>, StoreError> {
        let map = self
            .accounts
            .read()
            .map_err(|_| StoreError::Poisoned("accounts"))?;
        Ok(map.get(&user_id).copied())
    }

    fn put(&self, user_id: UserId, account: Account) -> Result<(), StoreError> {
        let mut map = self
            .accounts
            .write()
            .map_err(|_| StoreError::Poisoned("accounts"))?;
        map.insert(user_id, account);
        Ok(())
    }
}

/// In-memory append-only transaction log, bucketed per user.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    by_user: RwLock<HashMap<UserId, Vec<TransactionRecord>>>,
}

impl InMemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn append(&self, record: TransactionRecord) -> Result<(), StoreError> {
        let mut map = self
            .by_user
            .write()
            .map_err(|_| StoreError::Poisoned("transactions"))?;
        map.entry(record.user_id).or_default().push(record);
        Ok(())
    }

    fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let map = self
            .by_user
            .read()
            .map_err(|_| StoreError::Poisoned("transactions"))?;
        Ok(map
            .get(&user_id)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// In-memory vault snapshot log.
#[derive(Debug, Default)]
pub struct InMemoryVaultStateLog {
    states: RwLock<Vec<VaultState>>,
}

impl InMemoryVaultStateLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VaultStateLog for InMemoryVaultStateLog {
    fn append(&self, state: VaultState) -> Result<(), StoreError> {
        let mut states = self
            .states
            .write()
            .map_err(|_| StoreError::Poisoned("vault_states"))?;
        states.push(state);
        Ok(())
    }

    fn append_if_empty(&self, new_states: Vec<VaultState>) -> Result<usize, StoreError> {
        let mut states = self
            .states
            .write()
            .map_err(|_| StoreError::Poisoned("vault_states"))?;
        if !states.is_empty() {
            return Ok(0);
        }
        let n = new_states.len();
        states.extend(new_states);
        Ok(n)
    }

    fn latest(&self) -> Result<Option<VaultState>, StoreError> {
        let states = self
            .states
            .read()
            .map_err(|_| StoreError::Poisoned("vault_states"))?;
        Ok(states.last().cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<VaultState>, StoreError> {
        let states = self
            .states
            .read()
            .map_err(|_| StoreError::Poisoned("vault_states"))?;
        let start = states.len().saturating_sub(limit);
        Ok(states[start..].to_vec())
    }
}
