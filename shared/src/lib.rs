//! Shared types for CareLink
//!
//! Common types used by the server and its clients: error vocabulary,
//! API models and the real-time event envelope.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

pub use error::{AppError, AppResult, ErrorCode};
pub use message::{ClientCommand, ServerEvent};
