//! Integration test support for the interaction fabric
//!
//! Provides in-memory repository implementations and a `TestFabric`
//! fixture wiring services, fan-out, and the connection registry
//! together without PostgreSQL or a live WebSocket transport.

pub mod fixtures;
pub mod memory;

pub use fixtures::TestFabric;
pub use memory::{
    MemoryCommentRepository, MemoryNotificationRepository, MemoryPostRepository,
    MemoryTeamRepository,
};
