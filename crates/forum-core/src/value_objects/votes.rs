//! Vote sets - the pair of mutually-exclusive voter id sets carried by
//! every votable entity (post or comment)
//!
//! Invariant: an actor id appears in at most one of the two sets at any
//! time. Score is always derived as |upvoters| - |downvoters| and never
//! stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::value_objects::Snowflake;

/// Which kind of entity a vote targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotableKind {
    Post,
    Comment,
}

impl fmt::Display for VotableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// Direction requested by a vote action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// An actor's standing vote on a votable after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    None,
    Up,
    Down,
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Result of applying a vote action to a [`VoteSets`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The sets after the action
    pub sets: VoteSets,
    /// The acting voter's resulting state
    pub state: VoteState,
    /// Score before the action
    pub previous_score: i64,
    /// Score after the action
    pub score: i64,
}

impl VoteOutcome {
    /// Whether the action changed the net score
    #[inline]
    pub fn score_changed(&self) -> bool {
        self.score != self.previous_score
    }
}

/// The upvoter/downvoter id sets of a votable entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSets {
    pub upvoters: BTreeSet<Snowflake>,
    pub downvoters: BTreeSet<Snowflake>,
}

impl VoteSets {
    /// Empty sets (a freshly created votable)
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted id lists, dropping duplicates
    pub fn from_ids(upvoters: Vec<Snowflake>, downvoters: Vec<Snowflake>) -> Self {
        Self {
            upvoters: upvoters.into_iter().collect(),
            downvoters: downvoters.into_iter().collect(),
        }
    }

    /// Net score: |upvoters| - |downvoters|
    #[inline]
    pub fn score(&self) -> i64 {
        self.upvoters.len() as i64 - self.downvoters.len() as i64
    }

    /// The standing vote of a single actor
    pub fn state_of(&self, actor: Snowflake) -> VoteState {
        if self.upvoters.contains(&actor) {
            VoteState::Up
        } else if self.downvoters.contains(&actor) {
            VoteState::Down
        } else {
            VoteState::None
        }
    }

    /// Apply a toggle-vote action, returning the new sets and outcome.
    ///
    /// Voting in the direction of an existing vote removes it (un-vote);
    /// voting in the opposite direction moves the actor across, so an
    /// actor can never sit in both sets.
    pub fn apply(&self, actor: Snowflake, direction: VoteDirection) -> VoteOutcome {
        let previous_score = self.score();
        let mut next = self.clone();

        let state = match direction {
            VoteDirection::Up => {
                if next.upvoters.remove(&actor) {
                    VoteState::None
                } else {
                    next.downvoters.remove(&actor);
                    next.upvoters.insert(actor);
                    VoteState::Up
                }
            }
            VoteDirection::Down => {
                if next.downvoters.remove(&actor) {
                    VoteState::None
                } else {
                    next.upvoters.remove(&actor);
                    next.downvoters.insert(actor);
                    VoteState::Down
                }
            }
        };

        let score = next.score();
        VoteOutcome {
            sets: next,
            state,
            previous_score,
            score,
        }
    }
}
