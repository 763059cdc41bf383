//! Vote service
//!
//! Applies toggle-votes to posts and comments under the entity lock and
//! fans out the resulting score change.

use tracing::{info, instrument};

use forum_core::events::{FanoutEvent, ScoreChangedEvent};
use forum_core::{DomainError, Snowflake, VotableKind};

use crate::dto::{VoteRequest, VoteResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a toggle-vote to a post or comment.
    ///
    /// Voting again in the same direction removes the vote; voting in the
    /// opposite direction switches it. The response carries the updated
    /// score and the actor's resulting vote state.
    #[instrument(skip(self))]
    pub async fn apply_vote(
        &self,
        kind: VotableKind,
        entity_id: Snowflake,
        actor_id: Snowflake,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        match kind {
            VotableKind::Post => self.vote_post(entity_id, actor_id, request).await,
            VotableKind::Comment => self.vote_comment(entity_id, actor_id, request).await,
        }
    }

    async fn vote_post(
        &self,
        post_id: Snowflake,
        actor_id: Snowflake,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let _guard = self.ctx.locks().acquire(&format!("post:{post_id}")).await?;

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        let outcome = post.votes.apply(actor_id, request.direction);
        let updated = post.with_votes(outcome.sets.clone());
        self.ctx.post_repo().update_votes(&updated).await?;

        info!(
            post_id = %post_id,
            actor_id = %actor_id,
            score = outcome.score,
            state = %outcome.state,
            "Post vote applied"
        );

        if outcome.score_changed() {
            let event = FanoutEvent::ScoreChanged(ScoreChangedEvent::new(
                VotableKind::Post,
                post_id,
                post_id,
                post.author_id,
                actor_id,
                outcome.state,
                outcome.previous_score,
                outcome.score,
                &post.title,
            ));
            self.ctx.fanout().dispatch(event).await;
        }

        Ok(VoteResponse {
            kind: VotableKind::Post,
            id: post_id.to_string(),
            score: outcome.score,
            vote_state: outcome.state,
        })
    }

    async fn vote_comment(
        &self,
        comment_id: Snowflake,
        actor_id: Snowflake,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let _guard = self
            .ctx
            .locks()
            .acquire(&format!("comment:{comment_id}"))
            .await?;

        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        let outcome = comment.votes.apply(actor_id, request.direction);
        let updated = comment.with_votes(outcome.sets.clone());
        self.ctx.comment_repo().update_votes(&updated).await?;

        info!(
            comment_id = %comment_id,
            actor_id = %actor_id,
            score = outcome.score,
            state = %outcome.state,
            "Comment vote applied"
        );

        if outcome.score_changed() {
            let event = FanoutEvent::ScoreChanged(ScoreChangedEvent::new(
                VotableKind::Comment,
                comment_id,
                comment.post_id,
                comment.author_id,
                actor_id,
                outcome.state,
                outcome.previous_score,
                outcome.score,
                &comment.content,
            ));
            self.ctx.fanout().dispatch(event).await;
        }

        Ok(VoteResponse {
            kind: VotableKind::Comment,
            id: comment_id.to_string(),
            score: outcome.score,
            vote_state: outcome.state,
        })
    }
}
