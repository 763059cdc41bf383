//! PostgreSQL implementation of TeamRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Team;
use forum_core::traits::{RepoResult, TeamRepository};
use forum_core::value_objects::Snowflake;

use crate::mappers::member_docs;
use crate::models::TeamModel;

use super::error::{map_db_error, team_not_found};

/// PostgreSQL implementation of TeamRepository
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    /// Create a new PgTeamRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Team>> {
        let result = sqlx::query_as::<_, TeamModel>(
            r#"
            SELECT id, creator_id, name, capacity, is_open, members, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Team::from))
    }

    #[instrument(skip(self, team))]
    async fn update_members(&self, team: &Team) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET members = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(team.id.into_inner())
        .bind(Json(member_docs(team)))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(team_not_found(team.id));
        }

        Ok(())
    }
}
