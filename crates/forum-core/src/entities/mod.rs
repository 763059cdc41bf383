//! Domain entities - core business objects

mod comment;
mod notification;
mod post;
mod team;

pub use comment::{Comment, TOMBSTONE_CONTENT};
pub use notification::{NotificationKind, NotificationRecord};
pub use post::Post;
pub use team::{Team, TeamMember, TeamRole};
