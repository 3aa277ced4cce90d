use chrono::{DateTime, Utc};

/// A domain event: an immutable fact about something that already happened
/// to the vault (a recorded transaction, a new vault snapshot).
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "vault.transaction.recorded").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
