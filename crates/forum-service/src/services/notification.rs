//! Notification service
//!
//! Recipient-facing journal operations: listing, unread counts, and
//! mark-read transitions. Journal writes happen in the fan-out
//! coordinator as part of mutation dispatch.

use tracing::{info, instrument};

use forum_core::{DomainError, Snowflake};

use crate::dto::{
    MarkAllReadResponse, NotificationListParams, NotificationPageResponse, NotificationResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark one notification read. Only the recipient may do this;
    /// marking an already-read record keeps the original read time.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        notification_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<NotificationResponse> {
        let record = self
            .ctx
            .notification_repo()
            .find_by_id(notification_id)
            .await?
            .ok_or(DomainError::NotificationNotFound(notification_id))?;

        let read = record.marked_read(actor_id)?;
        self.ctx.notification_repo().mark_read(&read).await?;

        info!(notification_id = %notification_id, recipient_id = %actor_id, "Notification marked read");

        Ok(NotificationResponse::from(&read))
    }

    /// Mark every unread notification for the actor read
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, actor_id: Snowflake) -> ServiceResult<MarkAllReadResponse> {
        let updated = self.ctx.notification_repo().mark_all_read(actor_id).await?;

        info!(recipient_id = %actor_id, updated, "All notifications marked read");

        Ok(MarkAllReadResponse { updated })
    }

    /// List the recipient's notifications, newest first, with the total
    /// and unread counts the client renders as badges.
    #[instrument(skip(self))]
    pub async fn list_for_recipient(
        &self,
        recipient_id: Snowflake,
        params: NotificationListParams,
    ) -> ServiceResult<NotificationPageResponse> {
        let query = params.to_query();
        let records = self
            .ctx
            .notification_repo()
            .find_for_recipient(recipient_id, query)
            .await?;
        let total = self
            .ctx
            .notification_repo()
            .count_for_recipient(recipient_id)
            .await?;
        let unread = self
            .ctx
            .notification_repo()
            .count_unread(recipient_id)
            .await?;

        Ok(NotificationPageResponse {
            data: records.iter().map(NotificationResponse::from).collect(),
            total,
            unread,
            page: query.page,
            limit: query.limit,
        })
    }

    /// Unread count alone (the gateway sends it with the ready event)
    #[instrument(skip(self))]
    pub async fn unread_count(&self, recipient_id: Snowflake) -> ServiceResult<i64> {
        Ok(self
            .ctx
            .notification_repo()
            .count_unread(recipient_id)
            .await?)
    }
}
