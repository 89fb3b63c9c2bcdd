//! Forum API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ForumComment, ForumCommentCreate, ForumPost, ForumPostCreate, ForumPostUpdate};
use shared::{AppError, AppResult, ErrorCode};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models as db;

async fn load_post(state: &ServerState, id: &str) -> AppResult<db::ForumPost> {
    state.forum.find_post(id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ForumPostNotFound,
            format!("Forum post {} not found", id),
        )
    })
}

fn ensure_author(author: &str, current_user: &CurrentUser, what: &str) -> AppResult<()> {
    if author != current_user.id {
        return Err(AppError::permission_denied(format!(
            "Only the author can modify this {what}"
        )));
    }
    Ok(())
}

/// 帖子 + 评论 (评论按时间升序)
async fn with_comments(state: &ServerState, posts: Vec<db::ForumPost>) -> AppResult<Vec<ForumPost>> {
    let ids: Vec<String> = posts.iter().map(|p| p.id_string()).collect();
    let mut by_post: HashMap<String, Vec<ForumComment>> = HashMap::new();
    for comment in state.forum.comments_for_posts(ids).await? {
        by_post
            .entry(comment.post.clone())
            .or_default()
            .push(comment.into());
    }

    Ok(posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id_string()).unwrap_or_default();
            ForumPost {
                comments,
                ..post.into()
            }
        })
        .collect())
}

async fn post_with_comments(state: &ServerState, post: db::ForumPost) -> AppResult<ForumPost> {
    let comments = state.forum.comments_for_posts(vec![post.id_string()]).await?;
    Ok(ForumPost {
        comments: convert_all(comments),
        ..post.into()
    })
}

/// POST /api/forum/posts - 发帖
pub async fn create_post(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ForumPostCreate>,
) -> AppResult<Json<ForumPost>> {
    let post = state.forum.create_post(&current_user.id, payload).await?;
    tracing::info!(post_id = %post.id_string(), author = %current_user.id, "Forum post created");
    Ok(Json(post.into()))
}

/// GET /api/forum/posts - 所有帖子，最新的在前
pub async fn list_posts(State(state): State<ServerState>) -> AppResult<Json<Vec<ForumPost>>> {
    let posts = state.forum.list_posts().await?;
    Ok(Json(with_comments(&state, posts).await?))
}

/// GET /api/forum/posts/{id}
pub async fn get_post(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ForumPost>> {
    let post = load_post(&state, &id).await?;
    Ok(Json(post_with_comments(&state, post).await?))
}

/// PUT /api/forum/posts/{id} - 作者修改标题或正文
pub async fn update_post(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ForumPostUpdate>,
) -> AppResult<Json<ForumPost>> {
    let post = load_post(&state, &id).await?;
    ensure_author(&post.author, &current_user, "post")?;

    let post = state.forum.update_post(&id, payload).await?;
    tracing::info!(post_id = %post.id_string(), "Forum post updated");
    Ok(Json(post_with_comments(&state, post).await?))
}

/// DELETE /api/forum/posts/{id} - 作者删除帖子，评论一并删除
pub async fn delete_post(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let post = load_post(&state, &id).await?;
    ensure_author(&post.author, &current_user, "post")?;

    let deleted = state.forum.delete_post(&id).await?;
    tracing::info!(post_id = %post.id_string(), deleted, "Forum post deleted");
    Ok(Json(deleted))
}

/// POST /api/forum/posts/{id}/comments - 评论
pub async fn add_comment(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ForumCommentCreate>,
) -> AppResult<Json<ForumComment>> {
    load_post(&state, &id).await?;
    let comment = state
        .forum
        .add_comment(&id, &current_user.id, &payload.content)
        .await?;
    tracing::debug!(post = %comment.post, author = %current_user.id, "Forum comment added");
    Ok(Json(comment.into()))
}

/// GET /api/forum/posts/{id}/comments - 评论，按时间升序
pub async fn list_comments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ForumComment>>> {
    let post = load_post(&state, &id).await?;
    let comments = state.forum.comments_for_posts(vec![post.id_string()]).await?;
    Ok(Json(convert_all(comments)))
}

/// DELETE /api/forum/comments/{id} - 作者删除评论
pub async fn delete_comment(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let comment = state.forum.find_comment(&id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ForumCommentNotFound,
            format!("Forum comment {} not found", id),
        )
    })?;
    ensure_author(&comment.author, &current_user, "comment")?;

    let deleted = state.forum.delete_comment(&id).await?;
    Ok(Json(deleted))
}
