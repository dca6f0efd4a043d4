use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AdminSession, Session};
use crate::errors::AppError;
use crate::site::models::{BannerForm, BannerPlacement, BannerRow, SettingKey, SettingRow};
use crate::site::targeting::{select_banners, Viewer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlacementQuery {
    pub placement: String,
}

fn banner_not_found(banner_id: Uuid) -> AppError {
    AppError::NotFound(format!("Banner {banner_id} não encontrado"))
}

/// Candidate profile wins when a user somehow holds both.
async fn resolve_viewer(state: &AppState, session: Option<&Session>) -> Result<Viewer, AppError> {
    let Some(session) = session else {
        return Ok(Viewer::Guest);
    };
    if state.candidates.by_user(session.user_id).await?.is_some() {
        return Ok(Viewer::Candidate);
    }
    if state.companies.by_user(session.user_id).await?.is_some() {
        return Ok(Viewer::Company);
    }
    Ok(Viewer::Member)
}

/// GET /api/v1/site/banners?placement=home
pub async fn handle_live_banners(
    State(state): State<AppState>,
    session: Option<Session>,
    Query(query): Query<PlacementQuery>,
) -> Result<Json<Vec<BannerRow>>, AppError> {
    let placement: BannerPlacement = query.placement.parse().map_err(AppError::Validation)?;
    let viewer = resolve_viewer(&state, session.as_ref()).await?;
    let candidates = state.banners.list_for_placement(placement.as_str()).await?;
    Ok(Json(select_banners(
        &candidates,
        placement.as_str(),
        viewer,
        Utc::now(),
    )))
}

/// GET /api/v1/site/settings
pub async fn handle_site_settings(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Value>>, AppError> {
    let settings = state
        .settings
        .all()
        .await?
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect();
    Ok(Json(settings))
}

/// GET /api/v1/admin/banners
pub async fn handle_admin_list_banners(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<BannerRow>>, AppError> {
    Ok(Json(state.banners.list_all().await?))
}

/// POST /api/v1/admin/banners
pub async fn handle_admin_create_banner(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(form): Json<BannerForm>,
) -> Result<(StatusCode, Json<BannerRow>), AppError> {
    let form = form.normalized().map_err(AppError::Validation)?;
    let banner = state.banners.create(&form).await?;
    info!("Admin {} created banner {}", admin.user_id, banner.id);
    Ok((StatusCode::CREATED, Json(banner)))
}

/// PUT /api/v1/admin/banners/:id
pub async fn handle_admin_update_banner(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(banner_id): Path<Uuid>,
    Json(form): Json<BannerForm>,
) -> Result<Json<BannerRow>, AppError> {
    let form = form.normalized().map_err(AppError::Validation)?;
    state
        .banners
        .update(banner_id, &form)
        .await?
        .map(Json)
        .ok_or_else(|| banner_not_found(banner_id))
}

/// DELETE /api/v1/admin/banners/:id
pub async fn handle_admin_delete_banner(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(banner_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.banners.soft_delete(banner_id).await? {
        return Err(banner_not_found(banner_id));
    }
    info!("Admin {} deleted banner {banner_id}", admin.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/settings/:key
pub async fn handle_admin_put_setting(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<SettingRow>, AppError> {
    let key: SettingKey = key.parse().map_err(AppError::NotFound)?;
    let value = key.validate(value).map_err(AppError::Validation)?;
    let row = state.settings.put(key.as_str(), &value, admin.user_id).await?;
    info!("Admin {} updated setting {}", admin.user_id, key.as_str());
    Ok(Json(row))
}
