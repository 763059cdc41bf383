//! Error handling utilities for repositories

use forum_core::error::DomainError;
use forum_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "post not found" error
pub fn post_not_found(id: Snowflake) -> DomainError {
    DomainError::PostNotFound(id)
}

/// Create a "comment not found" error
pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}

/// Create a "team not found" error
pub fn team_not_found(id: Snowflake) -> DomainError {
    DomainError::TeamNotFound(id)
}

/// Create a "notification not found" error
pub fn notification_not_found(id: Snowflake) -> DomainError {
    DomainError::NotificationNotFound(id)
}
