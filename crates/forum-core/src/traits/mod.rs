//! Port traits implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    CommentRepository, NotificationQuery, NotificationRepository, PostRepository, ReplyQuery,
    RepoResult, TeamRepository,
};
