use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// Envelope for a published event: delivery metadata around the payload.
///
/// Every subscriber receives its own clone of the envelope, so `event_id` is the
/// handle to correlate log lines of different listeners reacting to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,
    payload: E,
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a payload, stamping a fresh time-ordered id and the current time.
    pub fn new(payload: E) -> Self {
        Self::with_metadata(Uuid::now_v7(), Utc::now(), payload)
    }

    pub fn with_metadata(event_id: Uuid, occurred_at: DateTime<Utc>, payload: E) -> Self {
        Self {
            event_id,
            event_type: payload.event_type().to_string(),
            event_version: payload.version(),
            occurred_at,
            payload,
        }
    }
}

impl<E> EventEnvelope<E> {
    pub fn event_id(&self) -> Uuid {
        self.event_id
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

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
