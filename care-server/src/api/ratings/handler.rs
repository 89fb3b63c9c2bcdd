//! Rating API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Rating, RatingCreate, RatingSummary};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::qualified_id;
use crate::db::repository::rating::{MAX_RATING, MIN_RATING};

/// POST /api/ratings - 给其他用户打分 (1-5)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RatingCreate>,
) -> AppResult<Json<Rating>> {
    if !(MIN_RATING..=MAX_RATING).contains(&payload.value) {
        return Err(AppError::new(ErrorCode::RatingOutOfRange).with_detail("value", payload.value));
    }
    let rated = payload.rated_user_id.trim();
    if rated.is_empty() {
        return Err(AppError::required_field("rated_user_id"));
    }
    if qualified_id("user", rated) == current_user.id {
        return Err(AppError::new(ErrorCode::SelfRating));
    }
    if state.users.find_by_id(rated).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::UserNotFound,
            format!("User {} not found", rated),
        )
        .with_detail("field", "rated_user_id"));
    }

    let rating = state.ratings.create(&current_user.id, payload).await?;
    tracing::info!(
        rated_user = %rating.rated_user,
        rater = %current_user.id,
        value = rating.value,
        "Rating submitted"
    );
    Ok(Json(rating.into()))
}

/// GET /api/ratings/{user_id} - 平均分与评分数
pub async fn summary(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RatingSummary>> {
    Ok(Json(state.ratings.summary_for(&user_id).await?))
}
