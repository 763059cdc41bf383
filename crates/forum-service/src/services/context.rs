//! Service context - dependency container for services
//!
//! Holds the repositories, per-entity lock registry, id generator, and
//! fan-out coordinator that every service operates through.

use std::sync::Arc;

use forum_core::traits::{
    CommentRepository, NotificationRepository, PostRepository, TeamRepository,
};
use forum_core::SnowflakeGenerator;
use forum_db::PgPool;

use super::fanout::FanoutCoordinator;
use super::locks::EntityLocks;

/// Service context containing all dependencies
///
/// This is the dependency container passed to all services. It provides
/// access to:
/// - Database repositories (the store is the source of truth)
/// - The per-entity mutation lock registry
/// - The fan-out coordinator for notification and push publication
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool (health checks, lifecycle)
    pool: PgPool,

    // Repositories
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    team_repo: Arc<dyn TeamRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // Mutation serialization
    entity_locks: EntityLocks,

    // Fan-out
    fanout: FanoutCoordinator,

    // ID generation
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        post_repo: Arc<dyn PostRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        team_repo: Arc<dyn TeamRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        entity_locks: EntityLocks,
        fanout: FanoutCoordinator,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            pool,
            post_repo,
            comment_repo,
            team_repo,
            notification_repo,
            entity_locks,
            fanout,
            snowflake_generator,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the comment repository
    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    /// Get the team repository
    pub fn team_repo(&self) -> &dyn TeamRepository {
        self.team_repo.as_ref()
    }

    /// Get the notification repository
    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    // === Mutation Locks ===

    /// Get the per-entity mutation lock registry
    pub fn locks(&self) -> &EntityLocks {
        &self.entity_locks
    }

    // === Fan-out ===

    /// Get the fan-out coordinator
    pub fn fanout(&self) -> &FanoutCoordinator {
        &self.fanout
    }

    // === ID Generation ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> forum_core::Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("entity_locks", &self.entity_locks)
            .field("fanout", &self.fanout)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    team_repo: Option<Arc<dyn TeamRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    entity_locks: Option<EntityLocks>,
    fanout: Option<FanoutCoordinator>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            post_repo: None,
            comment_repo: None,
            team_repo: None,
            notification_repo: None,
            entity_locks: None,
            fanout: None,
            snowflake_generator: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn team_repo(mut self, repo: Arc<dyn TeamRepository>) -> Self {
        self.team_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn entity_locks(mut self, locks: EntityLocks) -> Self {
        self.entity_locks = Some(locks);
        self
    }

    pub fn fanout(mut self, fanout: FanoutCoordinator) -> Self {
        self.fanout = Some(fanout);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool.ok_or_else(|| super::error::ServiceError::validation("pool is required"))?,
            self.post_repo.ok_or_else(|| super::error::ServiceError::validation("post_repo is required"))?,
            self.comment_repo.ok_or_else(|| super::error::ServiceError::validation("comment_repo is required"))?,
            self.team_repo.ok_or_else(|| super::error::ServiceError::validation("team_repo is required"))?,
            self.notification_repo.ok_or_else(|| super::error::ServiceError::validation("notification_repo is required"))?,
            self.entity_locks.ok_or_else(|| super::error::ServiceError::validation("entity_locks is required"))?,
            self.fanout.ok_or_else(|| super::error::ServiceError::validation("fanout is required"))?,
            self.snowflake_generator.ok_or_else(|| super::error::ServiceError::validation("snowflake_generator is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
