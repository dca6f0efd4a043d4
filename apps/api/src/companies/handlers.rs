//! Axum route handlers for company users: their postings and applicants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::models::{ApplicantRow, ApplicationRow, ReviewForm};
use crate::auth::Session;
use crate::companies::models::CompanyRow;
use crate::errors::AppError;
use crate::jobs::gateway::{invalidate_listings, to_listing};
use crate::jobs::models::{JobListing, JobPostingForm, JobPostingRow, JobStatus};
use crate::realtime::{ApplicationEvent, ChangeKind};
use crate::state::AppState;

/// A posting as its owner sees it: the public shape plus its status.
#[derive(Debug, Serialize)]
pub struct CompanyJobView {
    #[serde(flatten)]
    pub job: JobListing,
    pub status: JobStatus,
}

impl From<JobPostingRow> for CompanyJobView {
    fn from(row: JobPostingRow) -> Self {
        let status = JobStatus::from_db(&row.status);
        Self {
            job: to_listing(row),
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

async fn acting_company(state: &AppState, session: &Session) -> Result<CompanyRow, AppError> {
    state
        .companies
        .by_user(session.user_id)
        .await?
        .ok_or(AppError::Forbidden)
}

fn job_not_found(job_id: Uuid) -> AppError {
    AppError::NotFound(format!("Vaga {job_id} não encontrada"))
}

/// GET /api/v1/company/jobs
pub async fn handle_list_company_jobs(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<CompanyJobView>>, AppError> {
    let company = acting_company(&state, &session).await?;
    let rows = state.jobs.list_for_company(company.id).await?;
    Ok(Json(rows.into_iter().map(CompanyJobView::from).collect()))
}

/// POST /api/v1/company/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<JobPostingForm>,
) -> Result<(StatusCode, Json<CompanyJobView>), AppError> {
    let company = acting_company(&state, &session).await?;
    let form = form.normalized().map_err(AppError::Validation)?;

    let row = state.jobs.create(company.id, &form).await?;
    invalidate_listings(state.listing_cache.as_ref()).await;

    info!("Company {} created job {}", company.id, row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// PUT /api/v1/company/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<Uuid>,
    Json(form): Json<JobPostingForm>,
) -> Result<Json<CompanyJobView>, AppError> {
    let company = acting_company(&state, &session).await?;
    let form = form.normalized().map_err(AppError::Validation)?;

    let row = state
        .jobs
        .update(company.id, job_id, &form)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    invalidate_listings(state.listing_cache.as_ref()).await;

    info!("Company {} updated job {job_id}", company.id);
    Ok(Json(row.into()))
}

/// PATCH /api/v1/company/jobs/:id/status
pub async fn handle_set_job_status(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<CompanyJobView>, AppError> {
    let company = acting_company(&state, &session).await?;

    let row = state
        .jobs
        .set_status(company.id, job_id, update.status)
        .await?
        .ok_or_else(|| job_not_found(job_id))?;
    invalidate_listings(state.listing_cache.as_ref()).await;

    info!(
        "Company {} set job {job_id} to {}",
        company.id,
        update.status.as_str()
    );
    Ok(Json(row.into()))
}

/// DELETE /api/v1/company/jobs/:id
///
/// Soft delete: the row stays, `deleted_at` is set.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let company = acting_company(&state, &session).await?;

    if !state.jobs.soft_delete(company.id, job_id).await? {
        return Err(job_not_found(job_id));
    }
    invalidate_listings(state.listing_cache.as_ref()).await;

    info!("Company {} deleted job {job_id}", company.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/company/jobs/:id/applications
///
/// Jobs owned by another company yield an empty list.
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    let company = acting_company(&state, &session).await?;
    Ok(Json(state.applications.list_for_job(company.id, job_id).await?))
}

/// PATCH /api/v1/company/applications/:id
pub async fn handle_review_application(
    State(state): State<AppState>,
    session: Session,
    Path(application_id): Path<Uuid>,
    Json(form): Json<ReviewForm>,
) -> Result<Json<ApplicationRow>, AppError> {
    let company = acting_company(&state, &session).await?;
    let feedback = form
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let application = state
        .applications
        .review(company.id, application_id, form.status, feedback)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidatura {application_id} não encontrada"))
        })?;

    state.realtime.publish(ApplicationEvent {
        kind: ChangeKind::Update,
        application_id: application.id,
        job_id: application.job_id,
        candidate_id: application.candidate_id,
    });

    info!(
        "Company {} marked application {application_id} as {}",
        company.id,
        form.status.as_str()
    );
    Ok(Json(application))
}
