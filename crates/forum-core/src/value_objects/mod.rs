//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod topic;
mod votes;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use topic::Topic;
pub use votes::{VotableKind, VoteDirection, VoteOutcome, VoteSets, VoteState};
