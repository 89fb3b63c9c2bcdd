//! Forum Repository

use serde_json::{Map, Value, json};
use shared::models::{ForumPostCreate, ForumPostUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, qualified_id, record_id};
use crate::db::models::{ForumComment, ForumPost};
use crate::utils::validation::{MAX_POST_LEN, MAX_TITLE_LEN, validate_required_text};

pub const POST_TABLE: &str = "forum_post";
const COMMENT_TABLE: &str = "forum_comment";

fn check(value: &str, field: &str, max_len: usize) -> RepoResult<()> {
    validate_required_text(value, field, max_len).map_err(|e| RepoError::Validation(e.message))
}

#[derive(Clone)]
pub struct ForumRepository {
    base: BaseRepository,
}

impl ForumRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create_post(&self, author: &str, data: ForumPostCreate) -> RepoResult<ForumPost> {
        check(&data.title, "title", MAX_TITLE_LEN)?;
        check(&data.content, "content", MAX_POST_LEN)?;

        let now = now_millis();
        let post = ForumPost {
            id: None,
            author: author.to_string(),
            title: data.title.trim().to_string(),
            content: data.content.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        let created: Option<ForumPost> = self.base.db().create(POST_TABLE).content(post).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create forum post".to_string()))
    }

    pub async fn find_post(&self, id: &str) -> RepoResult<Option<ForumPost>> {
        let post: Option<ForumPost> = self.base.db().select(record_id(POST_TABLE, id)).await?;
        Ok(post)
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> RepoResult<Vec<ForumPost>> {
        let posts: Vec<ForumPost> = self
            .base
            .db()
            .query("SELECT * FROM forum_post ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(posts)
    }

    /// Merge the provided fields; an empty update only bumps `updated_at`
    pub async fn update_post(&self, id: &str, data: ForumPostUpdate) -> RepoResult<ForumPost> {
        let mut changes = Map::new();
        if let Some(title) = &data.title {
            check(title, "title", MAX_TITLE_LEN)?;
            changes.insert("title".into(), json!(title.trim()));
        }
        if let Some(content) = &data.content {
            check(content, "content", MAX_POST_LEN)?;
            changes.insert("content".into(), json!(content.trim()));
        }
        changes.insert("updated_at".into(), json!(now_millis()));

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", record_id(POST_TABLE, id)))
            .bind(("data", Value::Object(changes)))
            .await?;
        let updated: Vec<ForumPost> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Forum post {} not found", id)))
    }

    /// Delete a post together with its comments
    pub async fn delete_post(&self, id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE forum_comment WHERE post = $post; DELETE $thing RETURN BEFORE")
            .bind(("post", qualified_id(POST_TABLE, id)))
            .bind(("thing", record_id(POST_TABLE, id)))
            .await?;
        let deleted: Vec<ForumPost> = result.take(1)?;
        Ok(!deleted.is_empty())
    }

    /// Comment on an existing post (existence is checked by the caller)
    pub async fn add_comment(
        &self,
        post_id: &str,
        author: &str,
        content: &str,
    ) -> RepoResult<ForumComment> {
        check(content, "content", MAX_POST_LEN)?;

        let comment = ForumComment {
            id: None,
            post: qualified_id(POST_TABLE, post_id),
            author: author.to_string(),
            content: content.trim().to_string(),
            created_at: now_millis(),
        };

        let created: Option<ForumComment> =
            self.base.db().create(COMMENT_TABLE).content(comment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create forum comment".to_string()))
    }

    pub async fn find_comment(&self, id: &str) -> RepoResult<Option<ForumComment>> {
        let comment: Option<ForumComment> =
            self.base.db().select(record_id(COMMENT_TABLE, id)).await?;
        Ok(comment)
    }

    /// Comments of the given posts, oldest first
    pub async fn comments_for_posts(&self, post_ids: Vec<String>) -> RepoResult<Vec<ForumComment>> {
        let posts: Vec<String> = post_ids
            .iter()
            .map(|id| qualified_id(POST_TABLE, id))
            .collect();
        let comments: Vec<ForumComment> = self
            .base
            .db()
            .query("SELECT * FROM forum_comment WHERE post IN $posts ORDER BY created_at ASC")
            .bind(("posts", posts))
            .await?
            .take(0)?;
        Ok(comments)
    }

    pub async fn delete_comment(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<ForumComment> =
            self.base.db().delete(record_id(COMMENT_TABLE, id)).await?;
        Ok(deleted.is_some())
    }
}
