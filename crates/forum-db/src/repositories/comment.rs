//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Comment;
use forum_core::traits::{CommentRepository, ReplyQuery, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::mappers::vote_columns;
use crate::models::CommentModel;

use super::error::{comment_not_found, map_db_error};

const COMMENT_COLUMNS: &str = "id, post_id, author_id, parent_comment_id, content, \
     is_edited, is_deleted, upvoter_ids, downvoter_ids, created_at, updated_at";

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self, comment))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let (upvoter_ids, downvoter_ids) = vote_columns(&comment.votes);

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, parent_comment_id, content,
                                  is_edited, is_deleted, upvoter_ids, downvoter_ids,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.parent_id.map(Snowflake::into_inner))
        .bind(&comment.content)
        .bind(comment.is_edited)
        .bind(comment.is_deleted)
        .bind(&upvoter_ids)
        .bind(&downvoter_ids)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment))]
    async fn update_votes(&self, comment: &Comment) -> RepoResult<()> {
        let (upvoter_ids, downvoter_ids) = vote_columns(&comment.votes);

        let result = sqlx::query(
            r#"
            UPDATE comments
            SET upvoter_ids = $2, downvoter_ids = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(&upvoter_ids)
        .bind(&downvoter_ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(comment.id));
        }

        Ok(())
    }

    #[instrument(skip(self, comment))]
    async fn soft_delete(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET content = $2, is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(&comment.content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(comment.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_replies(
        &self,
        parent_id: Snowflake,
        query: ReplyQuery,
    ) -> RepoResult<Vec<Comment>> {
        let limit = query.limit.clamp(1, 100);

        // Deleted replies stay listed only while they anchor descendants;
        // deleted leaves vanish from the thread.
        let results = sqlx::query_as::<_, CommentModel>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE parent_comment_id = $1
              AND (is_deleted = FALSE OR EXISTS (
                  SELECT 1 FROM comments c2 WHERE c2.parent_comment_id = comments.id
              ))
            ORDER BY cardinality(upvoter_ids) - cardinality(downvoter_ids) DESC,
                     created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(parent_id.into_inner())
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE parent_comment_id = $1
              AND (is_deleted = FALSE OR EXISTS (
                  SELECT 1 FROM comments c2 WHERE c2.parent_comment_id = comments.id
              ))
            "#,
        )
        .bind(parent_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
