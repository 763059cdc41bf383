//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use forum_core::entities::{Comment, NotificationRecord, Team};
use forum_core::Snowflake;

use super::responses::{CommentResponse, MembershipResponse, NotificationResponse};

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author_id: comment.author_id.to_string(),
            parent_comment_id: comment.parent_id.map(|id| id.to_string()),
            content: comment.content.clone(),
            score: comment.score(),
            is_edited: comment.is_edited,
            is_deleted: comment.is_deleted,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(&comment)
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<&NotificationRecord> for NotificationResponse {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            sender_id: record.sender_id.to_string(),
            kind: record.kind.as_str().to_string(),
            title: record.title.clone(),
            message: record.message.clone(),
            post_id: record.post_id.map(|id| id.to_string()),
            comment_id: record.comment_id.map(|id| id.to_string()),
            team_id: record.team_id.map(|id| id.to_string()),
            read: record.read,
            created_at: record.created_at,
            read_at: record.read_at,
        }
    }
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(record: NotificationRecord) -> Self {
        Self::from(&record)
    }
}

// ============================================================================
// Membership Mappers
// ============================================================================

impl MembershipResponse {
    /// Build the response for a completed join
    pub fn joined(team: &Team, actor_id: Snowflake) -> Self {
        Self {
            team_id: team.id.to_string(),
            actor_id: actor_id.to_string(),
            role: team
                .member(actor_id)
                .map(|member| member.role.as_str().to_string()),
            member_count: team.member_count(),
            team_now_empty: false,
        }
    }

    /// Build the response for a completed leave
    pub fn left(team: &Team, actor_id: Snowflake) -> Self {
        Self {
            team_id: team.id.to_string(),
            actor_id: actor_id.to_string(),
            role: None,
            member_count: team.member_count(),
            team_now_empty: team.is_empty(),
        }
    }
}
