//! Fan-out coordinator
//!
//! Receives completed mutation outcomes from the services, journals the
//! durable notifications they intend, and queues the ephemeral pushes for
//! the gateway dispatcher. Journal failures are logged and never block the
//! push path; a full push queue drops events rather than stalling callers.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

use forum_core::events::{FanoutEvent, NotificationIntent, PushEvent};
use forum_core::traits::NotificationRepository;
use forum_core::{DomainError, NotificationRecord, SnowflakeGenerator};

/// Coordinates notification journaling and push publication for mutation
/// outcomes. Cheap to clone; the service context holds one.
#[derive(Clone)]
pub struct FanoutCoordinator {
    journal: Arc<dyn NotificationRepository>,
    generator: Arc<SnowflakeGenerator>,
    push_tx: mpsc::Sender<PushEvent>,
}

impl FanoutCoordinator {
    /// Create a coordinator and the push queue receiver the gateway
    /// dispatcher consumes
    pub fn new(
        journal: Arc<dyn NotificationRepository>,
        generator: Arc<SnowflakeGenerator>,
        queue_capacity: usize,
    ) -> (Self, mpsc::Receiver<PushEvent>) {
        let (push_tx, push_rx) = mpsc::channel(queue_capacity.max(1));
        (
            Self {
                journal,
                generator,
                push_tx,
            },
            push_rx,
        )
    }

    /// Journal every notification the event intends, then queue its pushes.
    ///
    /// The two steps are independent: a failed journal write is logged at
    /// WARN and the pushes still go out, so subscribers see live activity
    /// even when the durable record is missing.
    #[instrument(skip(self, event), fields(event_kind = event.event_type()))]
    pub async fn dispatch(&self, event: FanoutEvent) {
        for intent in event.notifications() {
            match self.record(&intent).await {
                Ok(Some(record)) => {
                    debug!(
                        notification_id = %record.id,
                        recipient_id = %record.recipient_id,
                        kind = record.kind.as_str(),
                        "Notification journaled"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        recipient_id = %intent.recipient_id,
                        kind = intent.kind.as_str(),
                        "Notification journal write failed; pushes proceed"
                    );
                }
            }
        }

        let pushes = PushEvent::from_fanout(&event);
        let mut queued = 0usize;
        for push in pushes {
            match self.push_tx.try_send(push) {
                Ok(()) => queued += 1,
                Err(e) => {
                    warn!(error = %e, "Push queue full; event dropped");
                }
            }
        }
        debug!(queued, "Fan-out pushes queued");
    }

    /// Write one durable notification record for an intent.
    ///
    /// Self-directed intents are silently skipped and return `None`; an
    /// actor is never notified about their own action.
    pub async fn record(
        &self,
        intent: &NotificationIntent,
    ) -> Result<Option<NotificationRecord>, DomainError> {
        if intent.recipient_id == intent.sender_id {
            return Ok(None);
        }

        let mut record = NotificationRecord::new(
            self.generator.generate(),
            intent.recipient_id,
            intent.sender_id,
            intent.kind,
            intent.title.clone(),
            intent.message.clone(),
        );
        if let Some(post_id) = intent.post_id {
            record = record.with_post(post_id);
        }
        if let Some(comment_id) = intent.comment_id {
            record = record.with_comment(comment_id);
        }
        if let Some(team_id) = intent.team_id {
            record = record.with_team(team_id);
        }

        self.journal.create(&record).await?;
        Ok(Some(record))
    }
}

impl std::fmt::Debug for FanoutCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutCoordinator")
            .field("queue_capacity", &self.push_tx.max_capacity())
            .finish()
    }
}
