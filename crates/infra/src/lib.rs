//! Infrastructure layer: storage adapters and the services that orchestrate
//! the vault domain around them (transaction recording, vault snapshots).

pub mod recorder;
pub mod store;
pub mod vault_service;

pub use recorder::{RecorderError, TransactionRecorder};
pub use vault_service::{VaultServiceError, VaultStateService};
