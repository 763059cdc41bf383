//! Push dispatcher
//!
//! Drains the fan-out coordinator's push queue and publishes each event
//! to the connections subscribed to its topic.

use crate::connection::ConnectionRegistry;
use forum_core::events::PushEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Routes queued push events to WebSocket connections
pub struct PushDispatcher {
    /// Connection registry for topic delivery
    registry: Arc<ConnectionRegistry>,
    /// Whether the dispatcher is running
    running: Arc<AtomicBool>,
}

impl PushDispatcher {
    /// Create a new push dispatcher
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the dispatcher
    ///
    /// This spawns a background task that receives push events from the
    /// fan-out queue and delivers them to subscribed connections. The task
    /// ends when the queue's sending side is dropped.
    pub fn start(self: Arc<Self>, receiver: mpsc::Receiver<PushEvent>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Push dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run(receiver).await;
        });

        tracing::info!("Push dispatcher started");
    }

    /// Stop the dispatcher after the event currently in flight
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run the dispatcher loop
    async fn run(&self, mut receiver: mpsc::Receiver<PushEvent>) {
        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Some(event) => self.handle_event(event).await,
                None => {
                    tracing::warn!("Push queue closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Push dispatcher loop ended");
    }

    /// Deliver one push event
    ///
    /// Personal topics are gated on presence: an actor with no live
    /// connection skips the publish entirely, since the journal already
    /// holds the durable record.
    async fn handle_event(&self, event: PushEvent) {
        if let forum_core::Topic::User(actor_id) = event.topic {
            if !self.registry.is_online(actor_id) {
                tracing::trace!(
                    topic = %event.topic,
                    kind = %event.kind,
                    "Recipient offline, push skipped"
                );
                return;
            }
        }

        let sent = self.registry.publish(&event).await;

        tracing::trace!(
            topic = %event.topic,
            kind = %event.kind,
            sent = sent,
            "Push dispatched"
        );
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for PushDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for PushDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushDispatcher")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerMessage;
    use forum_core::{Snowflake, Topic};
    use std::time::Duration;

    #[tokio::test]
    async fn test_dispatcher_delivers_to_subscribers() {
        let registry = ConnectionRegistry::new_shared();
        let (conn_tx, mut conn_rx) = mpsc::channel(10);
        registry.add_connection("conn1".to_string(), Snowflake::new(1), conn_tx);

        let topic = Topic::post(Snowflake::new(100));
        registry.subscribe("conn1", topic).await;

        let (push_tx, push_rx) = mpsc::channel(10);
        let dispatcher = Arc::new(PushDispatcher::new(registry));
        dispatcher.clone().start(push_rx);
        assert!(dispatcher.is_running());

        push_tx
            .send(PushEvent::new(
                "score_changed",
                topic,
                serde_json::json!({"score": 2}),
            ))
            .await
            .unwrap();

        let received = tokio::time::timeout(Duration::from_secs(1), conn_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match received {
            ServerMessage::Push { event } => {
                assert_eq!(event.kind, "score_changed");
                assert_eq!(event.topic, topic);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_personal_topic_skipped_while_recipient_offline() {
        let registry = ConnectionRegistry::new_shared();

        // An onlooker subscribed to someone else's personal topic
        let (onlooker_tx, mut onlooker_rx) = mpsc::channel(10);
        registry.add_connection("onlooker".to_string(), Snowflake::new(2), onlooker_tx);
        let topic = Topic::user(Snowflake::new(1));
        registry.subscribe("onlooker", topic).await;

        let (push_tx, push_rx) = mpsc::channel(10);
        let dispatcher = Arc::new(PushDispatcher::new(registry.clone()));
        dispatcher.clone().start(push_rx);

        // Actor 1 has no live connection, so nothing is published
        push_tx
            .send(PushEvent::new(
                "score_changed",
                topic,
                serde_json::json!({"score": 1}),
            ))
            .await
            .unwrap();
        let silent = tokio::time::timeout(Duration::from_millis(100), onlooker_rx.recv()).await;
        assert!(silent.is_err());

        // Once actor 1 connects, the gate opens for their topic again
        let (owner_tx, mut owner_rx) = mpsc::channel(10);
        registry.add_connection("owner".to_string(), Snowflake::new(1), owner_tx);
        registry.subscribe("owner", topic).await;

        push_tx
            .send(PushEvent::new(
                "score_changed",
                topic,
                serde_json::json!({"score": 2}),
            ))
            .await
            .unwrap();
        let received = tokio::time::timeout(Duration::from_secs(1), owner_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(received, ServerMessage::Push { .. }));
        assert!(onlooker_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_dispatcher_stops_when_queue_closes() {
        let registry = ConnectionRegistry::new_shared();
        let (push_tx, push_rx) = mpsc::channel::<PushEvent>(10);

        let dispatcher = Arc::new(PushDispatcher::new(registry));
        dispatcher.clone().start(push_rx);
        assert!(dispatcher.is_running());

        drop(push_tx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!dispatcher.is_running());
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let registry = ConnectionRegistry::new_shared();
        let (_push_tx, push_rx) = mpsc::channel::<PushEvent>(10);
        let (_tx2, rx2) = mpsc::channel::<PushEvent>(10);

        let dispatcher = Arc::new(PushDispatcher::new(registry));
        dispatcher.clone().start(push_rx);
        dispatcher.clone().start(rx2);

        assert!(dispatcher.is_running());
    }
}
