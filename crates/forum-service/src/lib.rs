//! # forum-service
//!
//! Application layer containing the interaction services, the fan-out
//! coordinator, and the boundary DTOs.

pub mod dto;
pub mod services;

pub use dto::{OperationResult, VoteRequest};
pub use services::{
    EntityLocks, FanoutCoordinator, MembershipService, NotificationService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ThreadService, VoteService,
};
