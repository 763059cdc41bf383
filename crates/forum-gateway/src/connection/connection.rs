//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state. The actor is
//! fixed at admission because the handshake authenticates before the
//! upgrade completes.

use crate::protocol::ServerMessage;
use forum_core::{Snowflake, Topic};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    connection_id: String,

    /// The authenticated actor behind this connection
    actor_id: Snowflake,

    /// Channel to send messages to the WebSocket
    sender: mpsc::Sender<ServerMessage>,

    /// Last heartbeat received
    last_heartbeat: RwLock<Instant>,

    /// Topics this connection is subscribed to
    topics: RwLock<HashSet<Topic>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        connection_id: String,
        actor_id: Snowflake,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Arc<Self> {
        Arc::new(Self {
            connection_id,
            actor_id,
            sender,
            last_heartbeat: RwLock::new(Instant::now()),
            topics: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new connection ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Get the connection ID
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Get the authenticated actor ID
    pub fn actor_id(&self) -> Snowflake {
        self.actor_id
    }

    /// Record a heartbeat received
    pub async fn record_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    /// Get time since last heartbeat
    pub async fn time_since_heartbeat(&self) -> std::time::Duration {
        self.last_heartbeat.read().await.elapsed()
    }

    /// Add a topic subscription
    ///
    /// Returns `false` if the connection was already subscribed.
    pub async fn subscribe(&self, topic: Topic) -> bool {
        self.topics.write().await.insert(topic)
    }

    /// Remove a topic subscription
    ///
    /// Returns `false` if the connection was not subscribed.
    pub async fn unsubscribe(&self, topic: Topic) -> bool {
        self.topics.write().await.remove(&topic)
    }

    /// Get all subscribed topics
    pub async fn topics(&self) -> Vec<Topic> {
        self.topics.read().await.iter().copied().collect()
    }

    /// Check if subscribed to a topic
    pub async fn is_subscribed(&self, topic: Topic) -> bool {
        self.topics.read().await.contains(&topic)
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Send a message to this connection
    pub async fn send(
        &self,
        message: ServerMessage,
    ) -> Result<(), mpsc::error::SendError<ServerMessage>> {
        self.sender.send(message).await
    }

    /// Try to send a message (non-blocking)
    pub fn try_send(
        &self,
        message: ServerMessage,
    ) -> Result<(), mpsc::error::TrySendError<ServerMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("connection_id", &self.connection_id)
            .field("actor_id", &self.actor_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
