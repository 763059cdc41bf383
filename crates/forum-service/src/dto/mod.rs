//! Data transfer objects for boundary requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for boundary inputs
//! - Response DTOs for serializing boundary outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreateCommentRequest, NotificationListParams, ReplyListParams, VoteRequest,
};

// Re-export commonly used response types
pub use responses::{
    CommentResponse, MarkAllReadResponse, MembershipResponse, NotificationPageResponse,
    NotificationResponse, OperationResult, ReplyPageResponse, VoteResponse,
};
