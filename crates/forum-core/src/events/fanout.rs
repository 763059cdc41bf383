//! Fan-out events - what a mutation hands to the coordinator
//!
//! A `FanoutEvent` is the outcome of a completed mutation. It knows how to
//! derive the topics it touches and the durable notifications it intends,
//! so the coordinator stays a thin orchestration layer and both
//! derivations are testable without a live transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::NotificationKind;
use crate::value_objects::{Snowflake, Topic, VotableKind, VoteState};

/// Maximum excerpt length carried into notification text
const EXCERPT_LEN: usize = 80;

/// All mutation outcomes that fan out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FanoutEvent {
    ScoreChanged(ScoreChangedEvent),
    CommentCreated(CommentCreatedEvent),
    MemberJoined(MemberJoinedEvent),
    MemberLeft(MemberLeftEvent),
}

impl FanoutEvent {
    /// Wire kind of the ephemeral push for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScoreChanged(_) => "score_changed",
            Self::CommentCreated(_) => "comment_created",
            Self::MemberJoined(_) => "member_joined",
            Self::MemberLeft(_) => "member_left",
        }
    }

    /// When the mutation completed
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ScoreChanged(e) => e.timestamp,
            Self::CommentCreated(e) => e.timestamp,
            Self::MemberJoined(e) => e.timestamp,
            Self::MemberLeft(e) => e.timestamp,
        }
    }

    /// Topics this event publishes to: the entity's own topic plus the
    /// personal topic of each distinct recipient.
    pub fn topics(&self) -> Vec<Topic> {
        match self {
            Self::ScoreChanged(e) => {
                let mut topics = vec![Topic::post(e.post_id)];
                if e.entity_author_id != e.actor_id {
                    topics.push(Topic::user(e.entity_author_id));
                }
                topics
            }
            Self::CommentCreated(e) => {
                let mut topics = vec![Topic::post(e.post_id)];
                for intent in self.notifications() {
                    topics.push(Topic::user(intent.recipient_id));
                }
                topics
            }
            Self::MemberJoined(e) => {
                let mut topics = vec![Topic::team(e.team_id)];
                if e.creator_id != e.actor_id {
                    topics.push(Topic::user(e.creator_id));
                }
                topics
            }
            Self::MemberLeft(e) => {
                let mut topics = vec![Topic::team(e.team_id)];
                if e.creator_id != e.actor_id {
                    topics.push(Topic::user(e.creator_id));
                }
                topics
            }
        }
    }

    /// Durable notifications this event intends, one per distinct
    /// interested recipient. Self-directed entries are never produced.
    pub fn notifications(&self) -> Vec<NotificationIntent> {
        match self {
            Self::ScoreChanged(e) => e.notification().into_iter().collect(),
            Self::CommentCreated(e) => e.notifications(),
            Self::MemberJoined(e) => e.notification().into_iter().collect(),
            Self::MemberLeft(e) => e.notification().into_iter().collect(),
        }
    }
}

/// The (recipient, sender, kind, payload) tuple the journal records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    pub recipient_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub post_id: Option<Snowflake>,
    pub comment_id: Option<Snowflake>,
    pub team_id: Option<Snowflake>,
}

// ============================================================================
// Event Structs
// ============================================================================

/// A vote landed and moved the net score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChangedEvent {
    pub kind: VotableKind,
    pub entity_id: Snowflake,
    /// The post carrying the entity (the entity itself for post votes)
    pub post_id: Snowflake,
    pub entity_author_id: Snowflake,
    pub actor_id: Snowflake,
    pub state: VoteState,
    pub previous_score: i64,
    pub score: i64,
    /// Post title or comment excerpt for notification text
    pub excerpt: String,
    pub timestamp: DateTime<Utc>,
}

impl ScoreChangedEvent {
    fn notification(&self) -> Option<NotificationIntent> {
        // Only a freshly placed upvote earns a durable record; un-votes
        // and downvotes stay ephemeral.
        if self.state != VoteState::Up || self.actor_id == self.entity_author_id {
            return None;
        }
        let (kind, title, message) = match self.kind {
            VotableKind::Post => (
                NotificationKind::PostUpvote,
                "Post upvoted".to_string(),
                format!("Your post \"{}\" received an upvote", self.excerpt),
            ),
            VotableKind::Comment => (
                NotificationKind::CommentUpvote,
                "Comment upvoted".to_string(),
                format!("Your comment \"{}\" received an upvote", self.excerpt),
            ),
        };
        Some(NotificationIntent {
            recipient_id: self.entity_author_id,
            sender_id: self.actor_id,
            kind,
            title,
            message,
            post_id: Some(self.post_id),
            comment_id: match self.kind {
                VotableKind::Comment => Some(self.entity_id),
                VotableKind::Post => None,
            },
            team_id: None,
        })
    }
}

/// A comment was added to a post (optionally as a reply)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedEvent {
    pub comment_id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub post_author_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub parent_author_id: Option<Snowflake>,
    /// Comment excerpt for notification text
    pub excerpt: String,
    pub timestamp: DateTime<Utc>,
}

impl CommentCreatedEvent {
    fn notifications(&self) -> Vec<NotificationIntent> {
        let mut intents = Vec::new();

        // Reply notification to the parent author takes precedence; the
        // post author is told separately only when they are a third party.
        if let (Some(parent_id), Some(parent_author)) = (self.parent_id, self.parent_author_id) {
            if parent_author != self.author_id {
                intents.push(NotificationIntent {
                    recipient_id: parent_author,
                    sender_id: self.author_id,
                    kind: NotificationKind::CommentReply,
                    title: "New reply".to_string(),
                    message: format!("Someone replied to your comment: \"{}\"", self.excerpt),
                    post_id: Some(self.post_id),
                    comment_id: Some(parent_id),
                    team_id: None,
                });
            }
        }

        let already_notified = intents
            .iter()
            .any(|i| i.recipient_id == self.post_author_id);
        if self.post_author_id != self.author_id && !already_notified {
            intents.push(NotificationIntent {
                recipient_id: self.post_author_id,
                sender_id: self.author_id,
                kind: NotificationKind::PostComment,
                title: "New comment".to_string(),
                message: format!("Your post has a new comment: \"{}\"", self.excerpt),
                post_id: Some(self.post_id),
                comment_id: Some(self.comment_id),
                team_id: None,
            });
        }

        intents
    }
}

/// An actor joined a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoinedEvent {
    pub team_id: Snowflake,
    pub actor_id: Snowflake,
    pub creator_id: Snowflake,
    pub team_name: String,
    pub member_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl MemberJoinedEvent {
    fn notification(&self) -> Option<NotificationIntent> {
        if self.creator_id == self.actor_id {
            return None;
        }
        Some(NotificationIntent {
            recipient_id: self.creator_id,
            sender_id: self.actor_id,
            kind: NotificationKind::TeamJoin,
            title: "New team member".to_string(),
            message: format!("Someone joined your team \"{}\"", self.team_name),
            post_id: None,
            comment_id: None,
            team_id: Some(self.team_id),
        })
    }
}

/// An actor left a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLeftEvent {
    pub team_id: Snowflake,
    pub actor_id: Snowflake,
    pub creator_id: Snowflake,
    pub team_name: String,
    pub member_count: usize,
    /// Set when the departure emptied the team
    pub team_now_empty: bool,
    pub timestamp: DateTime<Utc>,
}

impl MemberLeftEvent {
    fn notification(&self) -> Option<NotificationIntent> {
        if self.creator_id == self.actor_id {
            return None;
        }
        Some(NotificationIntent {
            recipient_id: self.creator_id,
            sender_id: self.actor_id,
            kind: NotificationKind::TeamLeave,
            title: "Member left".to_string(),
            message: format!("Someone left your team \"{}\"", self.team_name),
            post_id: None,
            comment_id: None,
            team_id: Some(self.team_id),
        })
    }
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

/// Clip text to the excerpt length on a char boundary
pub(crate) fn excerpt_of(text: &str) -> String {
    if text.len() <= EXCERPT_LEN {
        return text.to_string();
    }
    let mut end = EXCERPT_LEN;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    text[..end].to_string()
}

impl ScoreChangedEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: VotableKind,
        entity_id: Snowflake,
        post_id: Snowflake,
        entity_author_id: Snowflake,
        actor_id: Snowflake,
        state: VoteState,
        previous_score: i64,
        score: i64,
        excerpt: &str,
    ) -> Self {
        Self {
            kind,
            entity_id,
            post_id,
            entity_author_id,
            actor_id,
            state,
            previous_score,
            score,
            excerpt: excerpt_of(excerpt),
            timestamp: Utc::now(),
        }
    }
}

impl CommentCreatedEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        comment_id: Snowflake,
        post_id: Snowflake,
        author_id: Snowflake,
        post_author_id: Snowflake,
        parent_id: Option<Snowflake>,
        parent_author_id: Option<Snowflake>,
        excerpt: &str,
    ) -> Self {
        Self {
            comment_id,
            post_id,
            author_id,
            post_author_id,
            parent_id,
            parent_author_id,
            excerpt: excerpt_of(excerpt),
            timestamp: Utc::now(),
        }
    }
}

impl MemberJoinedEvent {
    pub fn new(
        team_id: Snowflake,
        actor_id: Snowflake,
        creator_id: Snowflake,
        team_name: String,
        member_count: usize,
    ) -> Self {
        Self {
            team_id,
            actor_id,
            creator_id,
            team_name,
            member_count,
            timestamp: Utc::now(),
        }
    }
}

impl MemberLeftEvent {
    pub fn new(
        team_id: Snowflake,
        actor_id: Snowflake,
        creator_id: Snowflake,
        team_name: String,
        member_count: usize,
        team_now_empty: bool,
    ) -> Self {
        Self {
            team_id,
            actor_id,
            creator_id,
            team_name,
            member_count,
            team_now_empty,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Push Envelope
// ============================================================================

/// The ephemeral event shape pushed to subscribed connections:
/// `{ kind, topic, payload, timestamp }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    pub kind: String,
    pub topic: Topic,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PushEvent {
    /// Build a push envelope for one topic
    pub fn new(kind: impl Into<String>, topic: Topic, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            topic,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Build the per-topic pushes for a fan-out event
    pub fn from_fanout(event: &FanoutEvent) -> Vec<Self> {
        let payload = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);
        event
            .topics()
            .into_iter()
            .map(|topic| Self {
                kind: event.event_type().to_string(),
                topic,
                payload: payload.clone(),
                timestamp: event.timestamp(),
            })
            .collect()
    }
}
