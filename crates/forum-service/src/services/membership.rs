//! Membership service
//!
//! Handles team joins and leaves under the team's entity lock.

use tracing::{info, instrument};

use forum_core::events::{FanoutEvent, MemberJoinedEvent, MemberLeftEvent};
use forum_core::{DomainError, Snowflake};

use crate::dto::MembershipResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Join a team. The actor is appended with the member role; rejects
    /// when already a member, the team is full, or the team is closed.
    #[instrument(skip(self))]
    pub async fn join_team(
        &self,
        team_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let _guard = self.ctx.locks().acquire(&format!("team:{team_id}")).await?;

        let team = self
            .ctx
            .team_repo()
            .find_by_id(team_id)
            .await?
            .ok_or(DomainError::TeamNotFound(team_id))?;

        let joined = team.with_member(actor_id)?;
        self.ctx.team_repo().update_members(&joined).await?;

        info!(
            team_id = %team_id,
            actor_id = %actor_id,
            member_count = joined.member_count(),
            "Member joined team"
        );

        let event = FanoutEvent::MemberJoined(MemberJoinedEvent::new(
            team_id,
            actor_id,
            joined.creator_id,
            joined.name.clone(),
            joined.member_count(),
        ));
        self.ctx.fanout().dispatch(event).await;

        Ok(MembershipResponse::joined(&joined, actor_id))
    }

    /// Leave a team. The creator may only leave once everyone else has
    /// gone; the response reports whether the departure emptied the team.
    #[instrument(skip(self))]
    pub async fn leave_team(
        &self,
        team_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let _guard = self.ctx.locks().acquire(&format!("team:{team_id}")).await?;

        let team = self
            .ctx
            .team_repo()
            .find_by_id(team_id)
            .await?
            .ok_or(DomainError::TeamNotFound(team_id))?;

        let left = team.without_member(actor_id)?;
        self.ctx.team_repo().update_members(&left).await?;

        info!(
            team_id = %team_id,
            actor_id = %actor_id,
            member_count = left.member_count(),
            team_now_empty = left.is_empty(),
            "Member left team"
        );

        let event = FanoutEvent::MemberLeft(MemberLeftEvent::new(
            team_id,
            actor_id,
            left.creator_id,
            left.name.clone(),
            left.member_count(),
            left.is_empty(),
        ));
        self.ctx.fanout().dispatch(event).await;

        Ok(MembershipResponse::left(&left, actor_id))
    }
}
