//! API models shared between the server and its clients
//!
//! Record ids are rendered as `"table:key"` strings, timestamps as Unix millis.

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

pub use chat::{ChatMessage, ChatMessageCreate, ChatRoom, ChatRoomCreate};
pub use checkin::{CheckIn, CheckInCreate};
pub use emergency::{EmergencyAlert, EmergencyTrigger};
pub use forum::{ForumComment, ForumCommentCreate, ForumPost, ForumPostCreate, ForumPostUpdate};
pub use grocery::{GroceryOrder, GroceryOrderCreate, GroceryStatus, GroceryStatusUpdate};
pub use health::{HealthLog, HealthLogCreate, HealthLogUpdate};
pub use prescription::{Prescription, PrescriptionCreate};
pub use rating::{Rating, RatingCreate, RatingSummary};
pub use task::{Task, TaskCreate, TaskStatus, TaskStatusUpdate};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, UserRole};
pub use voice::{VoiceCommand, VoiceCommandCreate};
