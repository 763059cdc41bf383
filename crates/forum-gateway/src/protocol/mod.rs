//! Gateway protocol definitions
//!
//! Defines the WebSocket wire format: tagged JSON frames and close codes.

mod close_codes;
mod messages;

pub use close_codes::CloseCode;
pub use messages::{ClientMessage, ServerMessage};
