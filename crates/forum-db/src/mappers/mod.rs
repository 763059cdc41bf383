//! Entity to model mappers
//!
//! This module provides conversions between domain entities (forum-core)
//! and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - column helpers: Prepare entity data for database binds

mod comment;
mod notification;
mod post;
mod team;
mod votes;

pub use team::member_docs;
pub use votes::{vote_columns, vote_sets_from_columns};
