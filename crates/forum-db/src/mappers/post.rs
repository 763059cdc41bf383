//! Post entity <-> model mapper

use forum_core::entities::Post;
use forum_core::value_objects::Snowflake;

use crate::models::PostModel;

use super::votes::vote_sets_from_columns;

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            title: model.title,
            votes: vote_sets_from_columns(model.upvoter_ids, model.downvoter_ids),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forum_core::value_objects::VoteState;

    #[test]
    fn test_model_to_entity() {
        let model = PostModel {
            id: 1,
            author_id: 10,
            title: "Intro".to_string(),
            upvoter_ids: vec![20, 21],
            downvoter_ids: vec![22],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let post = Post::from(model);
        assert_eq!(post.id, Snowflake::new(1));
        assert_eq!(post.score(), 1);
        assert_eq!(post.vote_state_of(Snowflake::new(22)), VoteState::Down);
    }
}
