//! Connection management
//!
//! Tracks WebSocket connections, actor presence, and topic subscriptions.

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::ConnectionRegistry;
