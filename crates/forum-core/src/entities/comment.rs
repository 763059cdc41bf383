//! Comment entity - a threaded, votable reply on a post
//!
//! A comment belongs to exactly one post and optionally to one parent
//! comment in the same post. Deletion is soft: the content becomes a
//! tombstone but the row stays so descendant replies keep their anchor.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{Snowflake, VoteSets, VoteState};

/// Content marker written in place of a soft-deleted comment's text
pub const TOMBSTONE_CONTENT: &str = "[deleted]";

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub content: String,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub votes: VoteSets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new top-level Comment
    pub fn new(id: Snowflake, post_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            post_id,
            author_id,
            parent_id: None,
            content,
            is_edited: false,
            is_deleted: false,
            votes: VoteSets::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply attached to a parent comment
    pub fn new_reply(
        id: Snowflake,
        post_id: Snowflake,
        author_id: Snowflake,
        content: String,
        parent_id: Snowflake,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, post_id, author_id, content)
        }
    }

    /// Check if this comment is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Net score derived from the vote sets
    #[inline]
    pub fn score(&self) -> i64 {
        self.votes.score()
    }

    /// The standing vote of one actor on this comment
    #[inline]
    pub fn vote_state_of(&self, actor_id: Snowflake) -> VoteState {
        self.votes.state_of(actor_id)
    }

    /// The comment with its vote sets replaced (ledger transition result)
    pub fn with_votes(&self, votes: VoteSets) -> Self {
        Self {
            votes,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Soft-delete transition: only the author may delete.
    ///
    /// Returns the tombstoned comment; linkage fields are untouched so
    /// descendants stay attached.
    pub fn soft_deleted(&self, actor_id: Snowflake) -> Result<Self, DomainError> {
        if actor_id != self.author_id {
            return Err(DomainError::NotCommentAuthor);
        }
        Ok(Self {
            content: TOMBSTONE_CONTENT.to_string(),
            is_deleted: true,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// Truncated content for notification text
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}
