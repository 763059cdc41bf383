//! Thread service
//!
//! Handles comment creation, soft deletion, and reply listings.

use tracing::{info, instrument};
use validator::Validate;

use forum_core::entities::Comment;
use forum_core::events::{CommentCreatedEvent, FanoutEvent};
use forum_core::{DomainError, Snowflake};

use crate::dto::{CommentResponse, CreateCommentRequest, ReplyListParams, ReplyPageResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Longest comment body accepted, in characters
const MAX_CONTENT_LEN: usize = 4_000;

/// Thread service
pub struct ThreadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ThreadService<'a> {
    /// Create a new ThreadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a comment on a post, optionally as a reply to an existing
    /// comment on the same post.
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        post_id: Snowflake,
        author_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let content = request.content.trim();
        if content.is_empty() {
            return Err(DomainError::ContentEmpty.into());
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_LEN,
            }
            .into());
        }

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        // Resolve the parent when replying; it must live on the same post
        let parent = match &request.parent_comment_id {
            Some(raw) => {
                let parent_id = Snowflake::parse(raw)
                    .map_err(|_| ServiceError::validation("Invalid parent_comment_id"))?;
                let parent = self
                    .ctx
                    .comment_repo()
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DomainError::ParentCommentMissing(parent_id))?;
                if parent.post_id != post_id {
                    return Err(DomainError::ParentPostMismatch.into());
                }
                Some(parent)
            }
            None => None,
        };

        let comment_id = self.ctx.generate_id();
        let comment = match &parent {
            Some(parent) => Comment::new_reply(
                comment_id,
                post_id,
                author_id,
                content.to_string(),
                parent.id,
            ),
            None => Comment::new(comment_id, post_id, author_id, content.to_string()),
        };

        self.ctx.comment_repo().create(&comment).await?;

        info!(
            comment_id = %comment_id,
            post_id = %post_id,
            author_id = %author_id,
            is_reply = comment.is_reply(),
            "Comment created"
        );

        let event = FanoutEvent::CommentCreated(CommentCreatedEvent::new(
            comment.id,
            post_id,
            author_id,
            post.author_id,
            parent.as_ref().map(|p| p.id),
            parent.as_ref().map(|p| p.author_id),
            &comment.content,
        ));
        self.ctx.fanout().dispatch(event).await;

        Ok(CommentResponse::from(&comment))
    }

    /// Soft-delete a comment: only the author may delete, the content is
    /// replaced by a tombstone, and descendants stay attached.
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        comment_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<CommentResponse> {
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

        let deleted = comment.soft_deleted(actor_id)?;
        self.ctx.comment_repo().soft_delete(&deleted).await?;

        info!(comment_id = %comment_id, actor_id = %actor_id, "Comment soft-deleted");

        Ok(CommentResponse::from(&deleted))
    }

    /// List the replies of a comment, ordered by score descending with
    /// creation time as the tie-break. Deleted replies appear only while
    /// they still anchor descendants.
    #[instrument(skip(self))]
    pub async fn list_replies(
        &self,
        parent_id: Snowflake,
        params: ReplyListParams,
    ) -> ServiceResult<ReplyPageResponse> {
        // The parent itself must exist (tombstoned parents still do)
        self.ctx
            .comment_repo()
            .find_by_id(parent_id)
            .await?
            .ok_or(DomainError::CommentNotFound(parent_id))?;

        let query = params.to_query();
        let replies = self.ctx.comment_repo().find_replies(parent_id, query).await?;
        let total = self.ctx.comment_repo().count_replies(parent_id).await?;

        Ok(ReplyPageResponse {
            data: replies.iter().map(CommentResponse::from).collect(),
            total,
            page: query.page,
            limit: query.limit,
        })
    }
}
