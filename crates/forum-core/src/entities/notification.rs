//! Notification entity - a durable fan-out record for one recipient
//!
//! Created by the fan-out coordinator, mutated only by the recipient
//! marking it read, never hard-deleted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of event a notification records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PostUpvote,
    CommentUpvote,
    PostComment,
    CommentReply,
    TeamJoin,
    TeamLeave,
}

impl NotificationKind {
    /// Stable string form used on the wire and in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostUpvote => "post_upvote",
            Self::CommentUpvote => "comment_upvote",
            Self::PostComment => "post_comment",
            Self::CommentReply => "comment_reply",
            Self::TeamJoin => "team_join",
            Self::TeamLeave => "team_leave",
        }
    }

    /// Parse the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post_upvote" => Some(Self::PostUpvote),
            "comment_upvote" => Some(Self::CommentUpvote),
            "post_comment" => Some(Self::PostComment),
            "comment_reply" => Some(Self::CommentReply),
            "team_join" => Some(Self::TeamJoin),
            "team_leave" => Some(Self::TeamLeave),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable notification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: Snowflake,
    pub recipient_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub post_id: Option<Snowflake>,
    pub comment_id: Option<Snowflake>,
    pub team_id: Option<Snowflake>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    /// Create a new unread NotificationRecord
    pub fn new(
        id: Snowflake,
        recipient_id: Snowflake,
        sender_id: Snowflake,
        kind: NotificationKind,
        title: String,
        message: String,
    ) -> Self {
        Self {
            id,
            recipient_id,
            sender_id,
            kind,
            title,
            message,
            post_id: None,
            comment_id: None,
            team_id: None,
            read: false,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    /// Attach a related post reference
    pub fn with_post(mut self, post_id: Snowflake) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Attach a related comment reference
    pub fn with_comment(mut self, comment_id: Snowflake) -> Self {
        self.comment_id = Some(comment_id);
        self
    }

    /// Attach a related team reference
    pub fn with_team(mut self, team_id: Snowflake) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Mark-read transition: only the recipient may read their record.
    ///
    /// Marking an already-read record again keeps the original read time.
    pub fn marked_read(&self, actor_id: Snowflake) -> Result<Self, DomainError> {
        if actor_id != self.recipient_id {
            return Err(DomainError::NotNotificationRecipient);
        }
        if self.read {
            return Ok(self.clone());
        }
        Ok(Self {
            read: true,
            read_at: Some(Utc::now()),
            ..self.clone()
        })
    }
}
