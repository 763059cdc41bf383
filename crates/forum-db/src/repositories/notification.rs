//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::NotificationRecord;
use forum_core::traits::{NotificationQuery, NotificationRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::NotificationModel;

use super::error::{map_db_error, notification_not_found};

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, sender_id, kind, title, message, \
     post_id, comment_id, team_id, is_read, created_at, read_at";

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, record))]
    async fn create(&self, record: &NotificationRecord) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, recipient_id, sender_id, kind, title, message,
                                       post_id, comment_id, team_id, is_read,
                                       created_at, read_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.id.into_inner())
        .bind(record.recipient_id.into_inner())
        .bind(record.sender_id.into_inner())
        .bind(record.kind.as_str())
        .bind(&record.title)
        .bind(&record.message)
        .bind(record.post_id.map(Snowflake::into_inner))
        .bind(record.comment_id.map(Snowflake::into_inner))
        .bind(record.team_id.map(Snowflake::into_inner))
        .bind(record.read)
        .bind(record.created_at)
        .bind(record.read_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<NotificationRecord>> {
        let result = sqlx::query_as::<_, NotificationModel>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(NotificationRecord::from))
    }

    #[instrument(skip(self, record))]
    async fn mark_read(&self, record: &NotificationRecord) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = $2
            WHERE id = $1
            "#,
        )
        .bind(record.id.into_inner())
        .bind(record.read_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(notification_not_found(record.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE recipient_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(recipient_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_for_recipient(
        &self,
        recipient_id: Snowflake,
        query: NotificationQuery,
    ) -> RepoResult<Vec<NotificationRecord>> {
        let limit = query.limit.clamp(1, 100);

        let results = if query.unread_only {
            sqlx::query_as::<_, NotificationModel>(&format!(
                r#"
                SELECT {NOTIFICATION_COLUMNS}
                FROM notifications
                WHERE recipient_id = $1 AND is_read = FALSE
                ORDER BY id DESC
                LIMIT $2 OFFSET $3
                "#
            ))
            .bind(recipient_id.into_inner())
            .bind(limit)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, NotificationModel>(&format!(
                r#"
                SELECT {NOTIFICATION_COLUMNS}
                FROM notifications
                WHERE recipient_id = $1
                ORDER BY id DESC
                LIMIT $2 OFFSET $3
                "#
            ))
            .bind(recipient_id.into_inner())
            .bind(limit)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(NotificationRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_for_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1",
        )
        .bind(recipient_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_unread(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
