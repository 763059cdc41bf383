//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, create_pool_from_env, health_check, run_migrations};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
