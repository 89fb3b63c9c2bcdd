//! Forum Models

use serde::{Deserialize, Serialize};

/// Forum post with its comments, oldest comment first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: Option<String>,
    pub author: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<ForumComment>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPostCreate {
    pub title: String,
    pub content: String,
}

/// Partial update; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumPostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumComment {
    pub id: Option<String>,
    /// "forum_post:xyz"
    pub post: String,
    pub author: String,
    pub content: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumCommentCreate {
    pub content: String,
}
