//! Gateway message format
//!
//! All frames are JSON objects tagged by a `type` field. Clients send
//! subscribe, unsubscribe, and heartbeat frames; the gateway answers with
//! hello, ready, push, heartbeat_ack, and error frames.

use forum_core::events::PushEvent;
use serde::{Deserialize, Serialize};

/// Messages a client may send after the handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving pushes for a topic
    Subscribe { topic: String },
    /// Stop receiving pushes for a topic
    Unsubscribe { topic: String },
    /// Liveness signal; answered with a `heartbeat_ack` frame
    Heartbeat,
}

impl ClientMessage {
    /// Deserialize from a JSON frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to a JSON frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages the gateway sends to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame after the upgrade; carries the heartbeat contract
    Hello { heartbeat_interval_ms: u64 },
    /// Sent once the connection is registered and following its actor's
    /// personal topic
    Ready {
        actor_id: String,
        connection_id: String,
        unread_notifications: i64,
    },
    /// A fan-out push for one of the connection's topics
    Push {
        #[serde(flatten)]
        event: PushEvent,
    },
    /// Answer to a client heartbeat
    HeartbeatAck,
    /// A request was rejected; the connection stays open
    Error { code: String, message: String },
}

impl ServerMessage {
    /// Create a hello frame
    #[must_use]
    pub fn hello(heartbeat_interval_ms: u64) -> Self {
        Self::Hello {
            heartbeat_interval_ms,
        }
    }

    /// Create a ready frame
    #[must_use]
    pub fn ready(actor_id: String, connection_id: String, unread_notifications: i64) -> Self {
        Self::Ready {
            actor_id,
            connection_id,
            unread_notifications,
        }
    }

    /// Wrap a push event for delivery
    #[must_use]
    pub fn push(event: PushEvent) -> Self {
        Self::Push { event }
    }

    /// Create an error frame
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Serialize to a JSON frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
