//! Post entity - a votable top-level forum entry
//!
//! Posts are authored and edited by routine CRUD outside this subsystem;
//! here they matter as vote carriers, comment parents, and notification
//! subjects.

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, VoteSets, VoteState};

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub title: String,
    pub votes: VoteSets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post with empty vote sets
    pub fn new(id: Snowflake, author_id: Snowflake, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            title,
            votes: VoteSets::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Net score derived from the vote sets
    #[inline]
    pub fn score(&self) -> i64 {
        self.votes.score()
    }

    /// The standing vote of one actor on this post
    #[inline]
    pub fn vote_state_of(&self, actor_id: Snowflake) -> VoteState {
        self.votes.state_of(actor_id)
    }

    /// The post with its vote sets replaced (ledger transition result)
    pub fn with_votes(&self, votes: VoteSets) -> Self {
        Self {
            votes,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Truncated title for notification text
    pub fn title_preview(&self, max_len: usize) -> &str {
        if self.title.len() <= max_len {
            &self.title
        } else {
            let mut end = max_len;
            while !self.title.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.title[..end]
        }
    }
}
