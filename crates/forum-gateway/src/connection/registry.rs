//! Connection registry
//!
//! Tracks all active WebSocket connections and their topic subscriptions
//! using `DashMap` for thread-safe access. This state is purely in-memory;
//! a restart empties it and clients re-subscribe on reconnect.

use super::Connection;
use crate::protocol::ServerMessage;
use forum_core::events::PushEvent;
use forum_core::{Snowflake, Topic};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Tracks active connections, actor presence, and topic subscriptions
pub struct ConnectionRegistry {
    /// Active connections by connection ID
    connections: DashMap<String, Arc<Connection>>,

    /// Actor ID to connection IDs mapping
    actor_connections: DashMap<Snowflake, HashSet<String>>,

    /// Topic to connection IDs mapping
    topic_connections: DashMap<Topic, HashSet<String>>,
}

impl ConnectionRegistry {
    /// Create a new connection registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            actor_connections: DashMap::new(),
            topic_connections: DashMap::new(),
        }
    }

    /// Create a new connection registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection for an authenticated actor
    pub fn add_connection(
        &self,
        connection_id: String,
        actor_id: Snowflake,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(connection_id.clone(), actor_id, sender);
        self.connections
            .insert(connection_id.clone(), connection.clone());

        self.actor_connections
            .entry(actor_id)
            .or_default()
            .insert(connection_id.clone());

        tracing::debug!(
            connection_id = %connection_id,
            actor_id = %actor_id,
            "Connection added"
        );

        connection
    }

    /// Remove a connection, releasing its actor link and every topic
    /// subscription in one step.
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU
    /// race conditions.
    pub async fn remove_connection(&self, connection_id: &str) {
        if let Some((_, connection)) = self.connections.remove(connection_id) {
            // Unlink the actor mapping
            self.actor_connections
                .alter(&connection.actor_id(), |_, mut conns| {
                    conns.remove(connection_id);
                    conns
                });
            self.actor_connections.retain(|_, conns| !conns.is_empty());

            // Unlink every topic subscription
            for topic in connection.topics().await {
                self.topic_connections.alter(&topic, |_, mut conns| {
                    conns.remove(connection_id);
                    conns
                });
            }
            self.topic_connections.retain(|_, conns| !conns.is_empty());

            tracing::debug!(connection_id = %connection_id, "Connection removed");
        }
    }

    /// Get a connection by ID
    pub fn get_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(connection_id).map(|r| r.clone())
    }

    /// Subscribe a connection to a topic
    ///
    /// Subscribing an already-subscribed connection is a no-op. Returns
    /// `false` only when the connection is unknown.
    pub async fn subscribe(&self, connection_id: &str, topic: Topic) -> bool {
        if let Some(connection) = self.get_connection(connection_id) {
            connection.subscribe(topic).await;

            self.topic_connections
                .entry(topic)
                .or_default()
                .insert(connection_id.to_string());

            tracing::trace!(
                connection_id = %connection_id,
                topic = %topic,
                "Connection subscribed"
            );

            true
        } else {
            false
        }
    }

    /// Unsubscribe a connection from a topic
    ///
    /// Unsubscribing a connection that never subscribed is a no-op. Returns
    /// `false` only when the connection is unknown.
    pub async fn unsubscribe(&self, connection_id: &str, topic: Topic) -> bool {
        if let Some(connection) = self.get_connection(connection_id) {
            connection.unsubscribe(topic).await;

            self.topic_connections.alter(&topic, |_, mut conns| {
                conns.remove(connection_id);
                conns
            });
            self.topic_connections.retain(|_, conns| !conns.is_empty());

            tracing::trace!(
                connection_id = %connection_id,
                topic = %topic,
                "Connection unsubscribed"
            );

            true
        } else {
            false
        }
    }

    /// Get all connections of an actor
    pub fn get_actor_connections(&self, actor_id: Snowflake) -> Vec<Arc<Connection>> {
        self.actor_connections
            .get(&actor_id)
            .map(|conns| {
                conns
                    .iter()
                    .filter_map(|cid| self.connections.get(cid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all connections subscribed to a topic
    pub fn get_topic_connections(&self, topic: Topic) -> Vec<Arc<Connection>> {
        self.topic_connections
            .get(&topic)
            .map(|conns| {
                conns
                    .iter()
                    .filter_map(|cid| self.connections.get(cid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deliver a push event to every connection subscribed to its topic
    ///
    /// The subscriber set is snapshotted before sending; a connection that
    /// subscribes mid-publish sees only later events.
    pub async fn publish(&self, event: &PushEvent) -> usize {
        let connections = self.get_topic_connections(event.topic);
        let message = ServerMessage::push(event.clone());
        let mut sent = 0;

        for conn in connections {
            if conn.send(message.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            topic = %event.topic,
            kind = %event.kind,
            sent = sent,
            "Push published to topic"
        );

        sent
    }

    /// Check whether an actor has at least one live connection
    pub fn is_online(&self, actor_id: Snowflake) -> bool {
        self.actor_connections
            .get(&actor_id)
            .is_some_and(|conns| !conns.is_empty())
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of actors with at least one connection
    pub fn actor_count(&self) -> usize {
        self.actor_connections.len()
    }

    /// Get the number of topics with at least one subscriber
    pub fn topic_count(&self) -> usize {
        self.topic_connections.len()
    }

    /// Check if a connection exists
    pub fn has_connection(&self, connection_id: &str) -> bool {
        self.connections.contains_key(connection_id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .field("actors", &self.actor_connections.len())
            .field("topics", &self.topic_connections.len())
            .finish()
    }
}
