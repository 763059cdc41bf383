//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in forum-core.
//! Each repository handles database operations for a specific domain entity.

mod comment;
mod error;
mod notification;
mod post;
mod team;

pub use comment::PgCommentRepository;
pub use notification::PgNotificationRepository;
pub use post::PgPostRepository;
pub use team::PgTeamRepository;
