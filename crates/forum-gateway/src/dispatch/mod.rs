//! Push dispatch
//!
//! Routes queued fan-out pushes to subscribed WebSocket connections.

mod dispatcher;

pub use dispatcher::PushDispatcher;
