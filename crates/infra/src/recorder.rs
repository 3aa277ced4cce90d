//! Transaction recording pipeline.
//!
//! ```text
//! request (user, kind, amount)
//!   ↓
//! 1. Take the user's lock (one read-modify-write per account at a time;
//!    the lock entry is dropped again once no caller holds it)
//!   ↓
//! 2. Load the account snapshot and the latest vault snapshot (gold quote)
//!   ↓
//! 3. Apply the ledger rule (pure; rejection stops here, nothing persisted)
//!   ↓
//! 4. Store the new account snapshot, then append the transaction record
//!    (the snapshot is restored if the append fails)
//!   ↓
//! 5. Publish `vault.transaction.recorded` (best-effort)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;

use aurum_core::UserId;
use aurum_events::{EventBus, EventEnvelope};
use aurum_vault::{
    Account, GoldPriceQuote, LedgerError, LedgerRequest, TransactionKind, TransactionRecord,
    TransactionRecorded, TxReference, VaultEvent,
};

use crate::store::{AccountStore, StoreError, TransactionLog, VaultStateLog};

/// How many records `recent_transactions` returns.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct TransactionRecorder<A, T, V, B> {
    accounts: A,
    transactions: T,
    vault_states: V,
    bus: B,
    fallback_quote: GoldPriceQuote,
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl<A, T, V, B> TransactionRecorder<A, T, V, B> {
    pub fn new(accounts: A, transactions: T, vault_states: V, bus: B) -> Self {
        Self {
            accounts,
            transactions,
            vault_states,
            bus,
            fallback_quote: GoldPriceQuote::fallback(),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Quote used for rebalances before any vault snapshot exists.
    pub fn with_fallback_quote(mut self, quote: GoldPriceQuote) -> Self {
        self.fallback_quote = quote;
        self
    }

    fn user_lock(&self, user_id: UserId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|_| StoreError::Poisoned("user_locks"))?;
        Ok(locks.entry(user_id).or_default().clone())
    }

    /// Drop the map entry once no other caller holds or waits on it.
    /// `lock` is the caller's clone, so 2 = map entry + caller.
    fn release_user_lock(&self, user_id: UserId, lock: Arc<Mutex<()>>) {
        if let Ok(mut locks) = self.user_locks.lock() {
            if Arc::strong_count(&lock) == 2 {
                locks.remove(&user_id);
            }
        }
    }

    #[cfg(test)]
    fn tracked_user_locks(&self) -> usize {
        self.user_locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl<A, T, V, B> TransactionRecorder<A, T, V, B>
where
    A: AccountStore,
    T: TransactionLog,
    V: VaultStateLog,
    B: EventBus<EventEnvelope>,
{
    /// Apply and persist one transaction for `user_id`.
    pub fn record(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        amount: f64,
    ) -> Result<TransactionRecorded, RecorderError> {
        let lock = self.user_lock(user_id)?;
        let result = match lock.lock() {
            Ok(_guard) => self.record_locked(user_id, kind, amount),
            Err(_) => Err(StoreError::Poisoned("user_lock").into()),
        };
        self.release_user_lock(user_id, lock);
        result
    }

    fn record_locked(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        amount: f64,
    ) -> Result<TransactionRecorded, RecorderError> {
        let current = self.accounts.get(user_id)?.unwrap_or_else(Account::empty);

        let mut request = LedgerRequest::new(kind, amount);
        if kind == TransactionKind::Rebalance {
            // A stored price is passed through as-is so the rule can reject it.
            request = match self.vault_states.latest()? {
                Some(state) => request.with_gold_price(state.gold_price),
                None => request.with_quote(self.fallback_quote),
            };
        }

        let balances = match current.apply(&request) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(%user_id, %kind, amount, error = %err, "transaction rejected");
                return Err(err.into());
            }
        };

        // Balances first: a failed append can be undone by restoring the
        // previous snapshot, while an appended record cannot be removed.
        let record = TransactionRecord::new(user_id, kind, amount, TxReference::random(), Utc::now());
        self.accounts.put(user_id, balances)?;
        if let Err(err) = self.transactions.append(record.clone()) {
            tracing::error!(%user_id, %kind, amount, error = %err, "record append failed; restoring balances");
            if let Err(restore) = self.accounts.put(user_id, current) {
                tracing::error!(%user_id, error = %restore, "failed to restore balances");
            }
            return Err(err.into());
        }

        tracing::info!(
            %user_id,
            %kind,
            amount,
            reference = %record.reference,
            cash_balance = balances.cash_balance(),
            gold_balance = balances.gold_balance(),
            "transaction recorded"
        );

        let recorded = TransactionRecorded { record, balances };
        self.publish(user_id, VaultEvent::TransactionRecorded(recorded.clone()));
        Ok(recorded)
    }

    /// Current balances; a user with no history has an empty account.
    pub fn account(&self, user_id: UserId) -> Result<Account, RecorderError> {
        Ok(self.accounts.get(user_id)?.unwrap_or_else(Account::empty))
    }

    /// The user's most recent records, newest first.
    pub fn recent_transactions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TransactionRecord>, RecorderError> {
        Ok(self
            .transactions
            .recent_for_user(user_id, RECENT_TRANSACTIONS_LIMIT)?)
    }

    fn publish(&self, user_id: UserId, event: VaultEvent) {
        let envelope = match EventEnvelope::from_typed(Some(user_id), &event) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(%user_id, "failed to serialize event: {e}");
                return;
            }
        };
        if let Err(e) = self.bus.publish(envelope) {
            tracing::warn!(%user_id, "event publication failed: {e:?}");
        }
    }
}
