//! Vote set <-> column array conversions

use forum_core::value_objects::{Snowflake, VoteSets};

/// Rebuild vote sets from the persisted BIGINT[] columns
pub fn vote_sets_from_columns(upvoter_ids: Vec<i64>, downvoter_ids: Vec<i64>) -> VoteSets {
    VoteSets::from_ids(
        upvoter_ids.into_iter().map(Snowflake::new).collect(),
        downvoter_ids.into_iter().map(Snowflake::new).collect(),
    )
}

/// Flatten vote sets into the BIGINT[] column arrays
pub fn vote_columns(votes: &VoteSets) -> (Vec<i64>, Vec<i64>) {
    (
        votes.upvoters.iter().map(|s| s.into_inner()).collect(),
        votes.downvoters.iter().map(|s| s.into_inner()).collect(),
    )
}
