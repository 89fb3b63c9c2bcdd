//! Forum API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/forum/posts | GET / POST | 帖子列表 (含评论) / 发帖 |
//! | /api/forum/posts/{id} | GET / PUT / DELETE | 单帖；修改和删除仅限作者 |
//! | /api/forum/posts/{id}/comments | GET / POST | 评论 |
//! | /api/forum/comments/{id} | DELETE | 删除评论 (仅限作者) |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/forum", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/posts", get(handler::list_posts).post(handler::create_post))
        .route(
            "/posts/{id}",
            get(handler::get_post)
                .put(handler::update_post)
                .delete(handler::delete_post),
        )
        .route(
            "/posts/{id}/comments",
            get(handler::list_comments).post(handler::add_comment),
        )
        .route("/comments/{id}", delete(handler::delete_comment))
}
