//! Team entity - a capacity-bounded group of actors
//!
//! The creator is always a member with the admin role. Membership
//! changes are pure transitions returning a new team state or a tagged
//! error, so the registry can persist exactly what was validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Role of a member inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Admin,
    Member,
}

impl TeamRole {
    /// Stable string form used in persisted member lists
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

/// One entry in a team's ordered member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub actor_id: Snowflake,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(actor_id: Snowflake, role: TeamRole) -> Self {
        Self {
            actor_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

/// Team entity with its embedded member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: Snowflake,
    pub creator_id: Snowflake,
    pub name: String,
    pub capacity: u32,
    /// Whether the team accepts joins without an invite
    pub open: bool,
    /// Members in join order; the creator is always present
    pub members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new Team with the creator as its first (admin) member
    pub fn new(
        id: Snowflake,
        creator_id: Snowflake,
        name: String,
        capacity: u32,
        open: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            creator_id,
            name,
            capacity,
            open,
            members: vec![TeamMember::new(creator_id, TeamRole::Admin)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a member entry by actor id
    pub fn member(&self, actor_id: Snowflake) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.actor_id == actor_id)
    }

    /// Check if an actor is a member
    #[inline]
    pub fn is_member(&self, actor_id: Snowflake) -> bool {
        self.member(actor_id).is_some()
    }

    /// Check if an actor is the team creator
    #[inline]
    pub fn is_creator(&self, actor_id: Snowflake) -> bool {
        self.creator_id == actor_id
    }

    /// Current member count
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the member count has reached capacity
    #[inline]
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity as usize
    }

    /// Whether the team has no members left (eligible for deletion by
    /// the owning collaborator)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Join transition: appends the actor with the member role.
    ///
    /// Guard order: already-member, then capacity, then the open flag.
    pub fn with_member(&self, actor_id: Snowflake) -> Result<Self, DomainError> {
        if self.is_member(actor_id) {
            return Err(DomainError::AlreadyMember);
        }
        if self.is_full() {
            return Err(DomainError::TeamFull {
                capacity: self.capacity,
            });
        }
        if !self.open {
            return Err(DomainError::TeamClosed);
        }

        let mut next = self.clone();
        next.members.push(TeamMember::new(actor_id, TeamRole::Member));
        next.updated_at = Utc::now();
        Ok(next)
    }

    /// Leave transition: removes the actor.
    ///
    /// The creator may only leave once everyone else has gone.
    pub fn without_member(&self, actor_id: Snowflake) -> Result<Self, DomainError> {
        if !self.is_member(actor_id) {
            return Err(DomainError::NotMember);
        }
        if self.is_creator(actor_id) && self.member_count() > 1 {
            return Err(DomainError::CreatorMustTransfer);
        }

        let mut next = self.clone();
        next.members.retain(|m| m.actor_id != actor_id);
        next.updated_at = Utc::now();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(capacity: u32, open: bool) -> Team {
        Team::new(
            Snowflake::new(1),
            Snowflake::new(10),
            "rustaceans".to_string(),
            capacity,
            open,
        )
    }

    #[test]
    fn test_creator_is_admin_member() {
        let t = team(4, true);
        assert_eq!(t.member_count(), 1);
        let creator = t.member(Snowflake::new(10)).unwrap();
        assert_eq!(creator.role, TeamRole::Admin);
    }

    #[test]
    fn test_join_appends_in_order() {
        let t = team(4, true);
        let t = t.with_member(Snowflake::new(20)).unwrap();
        let t = t.with_member(Snowflake::new(30)).unwrap();

        let ids: Vec<i64> = t.members.iter().map(|m| m.actor_id.into_inner()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(t.member(Snowflake::new(20)).unwrap().role, TeamRole::Member);
    }

    #[test]
    fn test_join_twice_rejected() {
        let t = team(4, true).with_member(Snowflake::new(20)).unwrap();
        let err = t.with_member(Snowflake::new(20)).unwrap_err();
        assert_eq!(err.kind(), "ALREADY_MEMBER");
    }

    #[test]
    fn test_join_full_team_rejected_and_unchanged() {
        let t = team(2, true).with_member(Snowflake::new(20)).unwrap();
        assert!(t.is_full());

        let err = t.with_member(Snowflake::new(30)).unwrap_err();
        assert_eq!(err.kind(), "TEAM_FULL");
        assert_eq!(t.member_count(), 2);
        assert!(t.is_member(Snowflake::new(10)));
        assert!(t.is_member(Snowflake::new(20)));
    }

    #[test]
    fn test_join_closed_team_rejected() {
        let t = team(4, false);
        let err = t.with_member(Snowflake::new(20)).unwrap_err();
        assert_eq!(err.kind(), "TEAM_CLOSED");
    }

    #[test]
    fn test_already_member_wins_over_full() {
        // A member re-joining a full team reports ALREADY_MEMBER, not TEAM_FULL
        let t = team(2, true).with_member(Snowflake::new(20)).unwrap();
        let err = t.with_member(Snowflake::new(20)).unwrap_err();
        assert_eq!(err.kind(), "ALREADY_MEMBER");
    }

    #[test]
    fn test_leave_non_member_rejected() {
        let t = team(4, true);
        let err = t.without_member(Snowflake::new(99)).unwrap_err();
        assert_eq!(err.kind(), "NOT_MEMBER");
    }

    #[test]
    fn test_creator_cannot_leave_with_members_remaining() {
        let t = team(4, true).with_member(Snowflake::new(20)).unwrap();
        let err = t.without_member(Snowflake::new(10)).unwrap_err();
        assert_eq!(err.kind(), "CREATOR_MUST_TRANSFER");
    }

    #[test]
    fn test_creator_leaves_last_and_team_empties() {
        let t = team(4, true).with_member(Snowflake::new(20)).unwrap();
        let t = t.without_member(Snowflake::new(20)).unwrap();
        let t = t.without_member(Snowflake::new(10)).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_role_strings() {
        assert_eq!(TeamRole::Admin.as_str(), "admin");
        assert_eq!(TeamRole::Member.as_str(), "member");
    }
}
