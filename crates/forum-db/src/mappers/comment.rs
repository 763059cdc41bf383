//! Comment entity <-> model mapper

use forum_core::entities::Comment;
use forum_core::value_objects::Snowflake;

use crate::models::CommentModel;

use super::votes::vote_sets_from_columns;

/// Convert CommentModel to Comment entity
impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            parent_id: model.parent_comment_id.map(Snowflake::new),
            content: model.content,
            is_edited: model.is_edited,
            is_deleted: model.is_deleted,
            votes: vote_sets_from_columns(model.upvoter_ids, model.downvoter_ids),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
