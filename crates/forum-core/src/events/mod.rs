//! Fan-out events - mutation outcomes and the push envelope

mod fanout;

pub use fanout::{
    CommentCreatedEvent, FanoutEvent, MemberJoinedEvent, MemberLeftEvent, NotificationIntent,
    PushEvent, ScoreChangedEvent,
};
