use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Session;
use crate::community::levels::{level_for, LevelProgress};
use crate::community::models::{CommentRow, ContentForm, LikeState, PostRow};
use crate::errors::AppError;
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// `(limit, offset)` with limit in `1..=MAX_PAGE_SIZE` and a non-negative offset.
    pub fn bounds(&self) -> (i64, i64) {
        (
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            self.offset.unwrap_or(0).max(0),
        )
    }
}

fn post_not_found(post_id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {post_id} não encontrado"))
}

/// GET /api/v1/community/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    session: Option<Session>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<PostRow>>, AppError> {
    let (limit, offset) = page.bounds();
    let viewer = session.map(|s| s.user_id);
    Ok(Json(state.community.list_posts(viewer, limit, offset).await?))
}

/// POST /api/v1/community/posts
pub async fn handle_create_post(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ContentForm>,
) -> Result<(StatusCode, Json<PostRow>), AppError> {
    let content = form.validated().map_err(AppError::Validation)?;
    let post = state.community.create_post(session.user_id, content).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/v1/community/posts/:id/like
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeState>, AppError> {
    state
        .community
        .toggle_like(post_id, session.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| post_not_found(post_id))
}

/// GET /api/v1/community/posts/:id/comments
pub async fn handle_list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentRow>>, AppError> {
    state
        .community
        .list_comments(post_id)
        .await?
        .map(Json)
        .ok_or_else(|| post_not_found(post_id))
}

/// POST /api/v1/community/posts/:id/comments
pub async fn handle_add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(post_id): Path<Uuid>,
    Json(form): Json<ContentForm>,
) -> Result<(StatusCode, Json<CommentRow>), AppError> {
    let content = form.validated().map_err(AppError::Validation)?;
    let comment = state
        .community
        .add_comment(post_id, session.user_id, content)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/community/me
pub async fn handle_my_level(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<LevelProgress>, AppError> {
    let points = state.community.total_points(session.user_id).await?;
    Ok(Json(level_for(points)))
}
