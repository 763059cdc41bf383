//! Team entity <-> model mapper

use forum_core::entities::{Team, TeamMember};
use forum_core::value_objects::Snowflake;

use crate::models::{TeamMemberDoc, TeamModel};

/// Convert an embedded member document to a TeamMember entity
impl From<TeamMemberDoc> for TeamMember {
    fn from(doc: TeamMemberDoc) -> Self {
        TeamMember {
            actor_id: Snowflake::new(doc.actor_id),
            role: doc.role,
            joined_at: doc.joined_at,
        }
    }
}

/// Convert TeamModel to Team entity
impl From<TeamModel> for Team {
    fn from(model: TeamModel) -> Self {
        Team {
            id: Snowflake::new(model.id),
            creator_id: Snowflake::new(model.creator_id),
            name: model.name,
            capacity: model.capacity as u32,
            open: model.is_open,
            members: model.members.0.into_iter().map(TeamMember::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Flatten a team's member list into the embedded JSONB document form
pub fn member_docs(team: &Team) -> Vec<TeamMemberDoc> {
    team.members
        .iter()
        .map(|m| TeamMemberDoc {
            actor_id: m.actor_id.into_inner(),
            role: m.role,
            joined_at: m.joined_at,
        })
        .collect()
}
