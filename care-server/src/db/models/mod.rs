//! Database Models

// Serde helpers
pub mod serde_helpers;

pub mod chat;
pub mod checkin;
pub mod emergency;
pub mod forum;
pub mod grocery;
pub mod health;
pub mod prescription;
pub mod rating;
pub mod task;
pub mod user;
pub mod voice;

// Re-exports
pub use chat::{ChatMessage, ChatRoom};
pub use checkin::CheckIn;
pub use emergency::EmergencyAlert;
pub use forum::{ForumComment, ForumPost};
pub use grocery::GroceryOrder;
pub use health::HealthLog;
pub use prescription::Prescription;
pub use rating::Rating;
pub use task::{Task, TaskId};
pub use user::{User, UserId};
pub use voice::VoiceCommand;
