//! # forum-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `forum-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forum_common::AppConfig;
//! use forum_db::pool::create_pool;
//! use forum_db::PgPostRepository;
//! use forum_core::traits::PostRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool(&config.database).await?;
//!     let post_repo = PgPostRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, health_check, run_migrations, PgPool};
pub use repositories::{
    PgCommentRepository, PgNotificationRepository, PgPostRepository, PgTeamRepository,
};
