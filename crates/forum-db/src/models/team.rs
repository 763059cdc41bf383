//! Team database model

use chrono::{DateTime, Utc};
use forum_core::entities::TeamRole;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One member entry inside the embedded JSONB member list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberDoc {
    pub actor_id: i64,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// Database model for teams table
#[derive(Debug, Clone, FromRow)]
pub struct TeamModel {
    pub id: i64,
    pub creator_id: i64,
    pub name: String,
    pub capacity: i32,
    pub is_open: bool,
    pub members: Json<Vec<TeamMemberDoc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamModel {
    /// Current member count
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
