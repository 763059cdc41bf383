//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Post;
use forum_core::traits::{PostRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::mappers::vote_columns;
use crate::models::PostModel;

use super::error::{map_db_error, post_not_found};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r#"
            SELECT id, author_id, title, upvoter_ids, downvoter_ids, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post))]
    async fn update_votes(&self, post: &Post) -> RepoResult<()> {
        let (upvoter_ids, downvoter_ids) = vote_columns(&post.votes);

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET upvoter_ids = $2, downvoter_ids = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(post.id.into_inner())
        .bind(&upvoter_ids)
        .bind(&downvoter_ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id));
        }

        Ok(())
    }
}
