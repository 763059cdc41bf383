//! Notification entity <-> model mapper

use forum_core::entities::{NotificationKind, NotificationRecord};
use forum_core::value_objects::Snowflake;

use crate::models::NotificationModel;

/// Convert database kind string to NotificationKind
///
/// The column carries a CHECK constraint, so unknown strings only occur
/// after a schema drift; they fall back to the broadest kind.
fn parse_kind(kind: &str) -> NotificationKind {
    NotificationKind::parse(kind).unwrap_or(NotificationKind::PostComment)
}

/// Convert NotificationModel to NotificationRecord entity
impl From<NotificationModel> for NotificationRecord {
    fn from(model: NotificationModel) -> Self {
        NotificationRecord {
            id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            sender_id: Snowflake::new(model.sender_id),
            kind: parse_kind(&model.kind),
            title: model.title,
            message: model.message,
            post_id: model.post_id.map(Snowflake::new),
            comment_id: model.comment_id.map(Snowflake::new),
            team_id: model.team_id.map(Snowflake::new),
            read: model.is_read,
            created_at: model.created_at,
            read_at: model.read_at,
        }
    }
}
