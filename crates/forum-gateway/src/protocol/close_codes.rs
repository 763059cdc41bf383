//! WebSocket close codes
//!
//! Defines gateway-specific close codes for WebSocket connections.

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
///
/// These codes are sent when closing a WebSocket connection to indicate the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Invalid payload encoding (JSON decode error or binary frame)
    DecodeError = 4002,
    /// No bearer token presented at the handshake
    NotAuthenticated = 4003,
    /// Invalid or expired token
    AuthenticationFailed = 4004,
    /// No heartbeat received within the timeout window
    HeartbeatTimeout = 4009,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4002 => Some(Self::DecodeError),
            4003 => Some(Self::NotAuthenticated),
            4004 => Some(Self::AuthenticationFailed),
            4009 => Some(Self::HeartbeatTimeout),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if the client should attempt to reconnect after this close code
    #[must_use]
    pub const fn should_reconnect(self) -> bool {
        matches!(
            self,
            Self::UnknownError | Self::DecodeError | Self::HeartbeatTimeout
        )
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::DecodeError => "Invalid payload encoding",
            Self::NotAuthenticated => "Not authenticated",
            Self::AuthenticationFailed => "Authentication failed",
            Self::HeartbeatTimeout => "Heartbeat timeout",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::DecodeError => "DecodeError",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::HeartbeatTimeout => "HeartbeatTimeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
