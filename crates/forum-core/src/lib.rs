//! # forum-core
//!
//! Domain layer for the forum interaction fabric: entities, value objects,
//! pure state transitions, repository traits, and fan-out event types.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Comment, NotificationKind, NotificationRecord, Post, Team, TeamMember, TeamRole,
    TOMBSTONE_CONTENT,
};
pub use error::DomainError;
pub use events::{FanoutEvent, PushEvent};
pub use traits::{
    CommentRepository, NotificationQuery, NotificationRepository, PostRepository, ReplyQuery,
    RepoResult, TeamRepository,
};
pub use value_objects::{
    Snowflake, SnowflakeGenerator, SnowflakeParseError, Topic, VotableKind, VoteDirection,
    VoteOutcome, VoteSets, VoteState,
};
