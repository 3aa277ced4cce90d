use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;

use aurum_core::DomainError;
use aurum_events::{EventBus, EventEnvelope};
use aurum_vault::{VaultEvent, VaultState, VaultStateInput, simulated_history};

use crate::store::{StoreError, VaultStateLog};

/// Snapshots returned by `history`.
pub const HISTORY_LIMIT: usize = 30;

/// Daily points generated by `seed`.
pub const SEED_POINTS: u32 = 30;

#[derive(Debug, Error)]
pub enum VaultServiceError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and appends vault snapshots. Writes are serialized so that
/// toggling always builds on the true latest snapshot.
pub struct VaultStateService<V, B> {
    states: V,
    bus: B,
    write_lock: Mutex<()>,
}

impl<V, B> VaultStateService<V, B>
where
    V: VaultStateLog,
    B: EventBus<EventEnvelope>,
{
    pub fn new(states: V, bus: B) -> Self {
        Self {
            states,
            bus,
            write_lock: Mutex::new(()),
        }
    }

    pub fn latest(&self) -> Result<Option<VaultState>, StoreError> {
        self.states.latest()
    }

    /// Oldest first.
    pub fn history(&self) -> Result<Vec<VaultState>, StoreError> {
        self.states.recent(HISTORY_LIMIT)
    }

    /// Append a copy of the latest snapshot with the risk label flipped.
    /// Returns `None` when there is nothing to toggle.
    pub fn toggle(&self) -> Result<Option<VaultState>, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Poisoned("vault_write"))?;

        let Some(latest) = self.states.latest()? else {
            tracing::debug!("toggle requested with no vault state");
            return Ok(None);
        };
        let next = latest.toggled(Utc::now());
        self.states.append(next.clone())?;

        tracing::info!(from = %latest.status, to = %next.status, "vault risk status toggled");
        self.publish(&next);
        Ok(Some(next))
    }

    /// Append a snapshot with explicit figures. Figures that would make the
    /// snapshot unusable as a price source are rejected before anything is
    /// stored.
    pub fn update(&self, input: VaultStateInput) -> Result<VaultState, VaultServiceError> {
        let state = VaultState::from_input(input, Utc::now()).inspect_err(|e| {
            tracing::warn!(error = %e, "vault state update rejected");
        })?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Poisoned("vault_write"))?;
        self.states.append(state.clone())?;

        tracing::info!(status = %state.status, gold_price = state.gold_price, "vault state updated");
        self.publish(&state);
        Ok(state)
    }

    /// Fill an empty log with simulated daily history. Returns the number of
    /// snapshots inserted (0 if the log already had data).
    pub fn seed(&self) -> Result<usize, StoreError> {
        let history = simulated_history(Utc::now(), SEED_POINTS, &mut rand::thread_rng());
        let inserted = self.states.append_if_empty(history)?;
        if inserted > 0 {
            tracing::info!(inserted, "seeded simulated vault history");
        } else {
            tracing::debug!("vault history already present; seed skipped");
        }
        Ok(inserted)
    }

    fn publish(&self, state: &VaultState) {
        let event = VaultEvent::VaultStateRecorded(state.clone());
        match EventEnvelope::from_typed(None, &event) {
            Ok(env) => {
                if let Err(e) = self.bus.publish(env) {
                    tracing::warn!("event publication failed: {e:?}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize event: {e}"),
        }
    }
}
