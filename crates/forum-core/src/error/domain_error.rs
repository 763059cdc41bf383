//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Team not found: {0}")]
    TeamNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    // =========================================================================
    // Invalid Reference Errors
    // =========================================================================
    #[error("Parent comment not found: {0}")]
    ParentCommentMissing(Snowflake),

    #[error("Parent comment belongs to a different post")]
    ParentPostMismatch,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the comment author")]
    NotCommentAuthor,

    #[error("Not the notification recipient")]
    NotNotificationRecipient,

    // =========================================================================
    // Membership Rule Violations
    // =========================================================================
    #[error("Already a member of this team")]
    AlreadyMember,

    #[error("Not a member of this team")]
    NotMember,

    #[error("Team is full: capacity {capacity}")]
    TeamFull { capacity: u32 },

    #[error("Team is closed to new members")]
    TeamClosed,

    #[error("Creator cannot leave while other members remain (transfer ownership first)")]
    CreatorMustTransfer,

    // =========================================================================
    // Concurrency Errors
    // =========================================================================
    #[error("Concurrent mutation in flight for {0}")]
    MutationConflict(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Content is empty")]
    ContentEmpty,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get the stable error-kind string reported at the boundary
    pub fn kind(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_)
            | Self::CommentNotFound(_)
            | Self::TeamNotFound(_)
            | Self::NotificationNotFound(_) => "NOT_FOUND",

            // Invalid Reference
            Self::ParentCommentMissing(_) | Self::ParentPostMismatch => "INVALID_REFERENCE",

            // Authorization
            Self::NotCommentAuthor | Self::NotNotificationRecipient => "NOT_AUTHORIZED",

            // Membership Rules
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::NotMember => "NOT_MEMBER",
            Self::TeamFull { .. } => "TEAM_FULL",
            Self::TeamClosed => "TEAM_CLOSED",
            Self::CreatorMustTransfer => "CREATOR_MUST_TRANSFER",

            // Concurrency
            Self::MutationConflict(_) => "CONFLICT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::ContentEmpty => "CONTENT_EMPTY",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PostNotFound(_)
                | Self::CommentNotFound(_)
                | Self::TeamNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is an invalid-reference error
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::ParentCommentMissing(_) | Self::ParentPostMismatch)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotCommentAuthor | Self::NotNotificationRecipient)
    }

    /// Check if this is a membership rule violation
    pub fn is_membership_rule(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMember
                | Self::NotMember
                | Self::TeamFull { .. }
                | Self::TeamClosed
                | Self::CreatorMustTransfer
        )
    }

    /// Check if this is a concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::MutationConflict(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ContentTooLong { .. } | Self::ContentEmpty
        )
    }
}
