//! Response DTOs for boundary operations
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use forum_core::{VotableKind, VoteState};

use crate::services::{ServiceError, ServiceResult};

// ============================================================================
// Boundary Envelope
// ============================================================================

/// The envelope every boundary operation answers with: `success` plus
/// either the operation `data` or a stable `errorKind` and message.
#[derive(Debug, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(rename = "errorKind", skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> OperationResult<T> {
    /// Successful envelope carrying the operation data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_kind: None,
            message: None,
        }
    }

    /// Failure envelope carrying the error kind and a human message
    pub fn err(error: &ServiceError) -> Self {
        Self {
            success: false,
            data: None,
            error_kind: Some(error.error_code().to_string()),
            message: Some(error.to_string()),
        }
    }
}

impl<T> From<ServiceResult<T>> for OperationResult<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(&e),
        }
    }
}

// ============================================================================
// Vote Responses
// ============================================================================

/// Outcome of a vote action: the updated score and the acting voter's
/// resulting state
#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub kind: VotableKind,
    pub id: String,
    pub score: i64,
    pub vote_state: VoteState,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// A single comment as returned by thread operations
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
    pub content: String,
    pub score: i64,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a reply listing
#[derive(Debug, Serialize)]
pub struct ReplyPageResponse {
    pub data: Vec<CommentResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ============================================================================
// Membership Responses
// ============================================================================

/// Outcome of a team join or leave
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub team_id: String,
    pub actor_id: String,
    /// Present after a join; absent after a leave
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub member_count: usize,
    pub team_now_empty: bool,
}

// ============================================================================
// Notification Responses
// ============================================================================

/// A single journaled notification
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub sender_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

/// One page of a recipient's notification listing, newest first
#[derive(Debug, Serialize)]
pub struct NotificationPageResponse {
    pub data: Vec<NotificationResponse>,
    pub total: i64,
    pub unread: i64,
    pub page: i64,
    pub limit: i64,
}

/// Outcome of marking a recipient's whole journal read
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
