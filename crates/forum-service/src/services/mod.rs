//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod fanout;
pub mod locks;
pub mod membership;
pub mod notification;
pub mod thread;
pub mod vote;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use fanout::FanoutCoordinator;
pub use locks::{EntityGuard, EntityLocks};
pub use membership::MembershipService;
pub use notification::NotificationService;
pub use thread::ThreadService;
pub use vote::VoteService;
