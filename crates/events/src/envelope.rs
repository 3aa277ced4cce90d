use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use aurum_core::UserId;

use crate::event::Event;

/// Envelope for a published event.
///
/// `user_id` scopes account-level events to their owner; vault-wide events
/// (state snapshots) carry `None`. `payload` is the serialized domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_id: Uuid,
    user_id: Option<UserId>,
    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,
    payload: JsonValue,
}

impl EventEnvelope {
    pub fn new(
        event_id: Uuid,
        user_id: Option<UserId>,
        event_type: impl Into<String>,
        event_version: u32,
        occurred_at: DateTime<Utc>,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id,
            user_id,
            event_type: event_type.into(),
            event_version,
            occurred_at,
            payload,
        }
    }

    /// Wrap a typed domain event, serializing it to JSON.
    pub fn from_typed<E>(user_id: Option<UserId>, event: &E) -> Result<Self, serde_json::Error>
    where
        E: Event + Serialize,
    {
        Ok(Self::new(
            Uuid::now_v7(),
            user_id,
            event.event_type(),
            event.version(),
            event.occurred_at(),
            serde_json::to_value(event)?,
        ))
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    pub fn into_payload(self) -> JsonValue {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            2
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn from_typed_copies_event_metadata() {
        let at = Utc::now();
        let user = UserId::new();
        let env = EventEnvelope::from_typed(Some(user), &Pinged { at }).unwrap();

        assert_eq!(env.user_id(), Some(user));
        assert_eq!(env.event_type(), "test.pinged");
        assert_eq!(env.event_version(), 2);
        assert_eq!(env.occurred_at(), at);
        assert!(env.payload().get("at").is_some());
    }
}
