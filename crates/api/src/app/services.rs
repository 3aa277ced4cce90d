use std::sync::Arc;

use aurum_events::{EventEnvelope, InMemoryEventBus};
use aurum_infra::store::{InMemoryAccountStore, InMemoryTransactionLog, InMemoryVaultStateLog};
use aurum_infra::{TransactionRecorder, VaultStateService};

use crate::config::ApiConfig;

pub type Bus = Arc<InMemoryEventBus<EventEnvelope>>;

pub type Recorder = TransactionRecorder<
    Arc<InMemoryAccountStore>,
    Arc<InMemoryTransactionLog>,
    Arc<InMemoryVaultStateLog>,
    Bus,
>;

pub type VaultService = VaultStateService<Arc<InMemoryVaultStateLog>, Bus>;

pub struct AppServices {
    pub recorder: Recorder,
    pub vault: VaultService,
}

/// In-memory wiring (dev/test). Recorder and vault service share one
/// snapshot log, so rebalances price off the latest recorded vault state.
pub fn build_services(config: &ApiConfig) -> AppServices {
    let vault_states = Arc::new(InMemoryVaultStateLog::new());
    let bus: Bus = Arc::new(InMemoryEventBus::new());

    let recorder = TransactionRecorder::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(InMemoryTransactionLog::new()),
        vault_states.clone(),
        bus.clone(),
    )
    .with_fallback_quote(config.fallback_gold_price);

    let vault = VaultStateService::new(vault_states, bus);

    AppServices { recorder, vault }
}
