//! # forum-gateway
//!
//! WebSocket gateway delivering real-time pushes to topic subscribers.
//! Connections authenticate with a bearer token at the handshake, follow
//! their actor's personal topic automatically, and subscribe to post and
//! team topics on demand.

pub mod connection;
pub mod dispatch;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
