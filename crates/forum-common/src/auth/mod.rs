//! Authentication utilities

mod token;

pub use token::{AccessClaims, TokenVerifier};
