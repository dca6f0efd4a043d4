//! Axum route handlers for the public job board.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::applications::models::ApplicationRow;
use crate::auth::Session;
use crate::errors::AppError;
use crate::jobs::apply::{apply_to_job, ApplyRequest};
use crate::jobs::filter::{FacetSelection, FilterField, FilterState, JobFilter, MultiFacetFilter};
use crate::jobs::gateway::{fetch_active_listings, to_listing};
use crate::jobs::listing::{FetchState, ListingView};
use crate::jobs::models::JobListing;
use crate::state::AppState;

/// Single-select list filters. A facet given as `all` (or omitted) is unconstrained.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    pub seniority: Option<String>,
    pub contract: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> FilterState {
        FilterState::default()
            .with_query(self.q.as_deref().unwrap_or_default())
            .select(
                FilterField::WorkType,
                FacetSelection::parse(self.work_type.as_deref()),
            )
            .select(
                FilterField::Seniority,
                FacetSelection::parse(self.seniority.as_deref()),
            )
            .select(
                FilterField::ContractType,
                FacetSelection::parse(self.contract.as_deref()),
            )
    }
}

async fn render_listing<F: JobFilter + Sync>(state: &AppState, filter: &F) -> ListingView {
    let fetch = match fetch_active_listings(state.jobs.as_ref(), state.listing_cache.as_ref()).await
    {
        Ok(jobs) => FetchState::Ready(jobs),
        Err(e) => {
            error!("Failed to fetch job list: {e}");
            FetchState::Failed(Some(e.to_string()))
        }
    };
    ListingView::from_fetch(fetch, filter)
}

/// GET /api/v1/jobs
///
/// Always 200: fetch failures are reported through the `error` view state.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListingView> {
    let filter = query.into_filter();
    Json(render_listing(&state, &filter).await)
}

/// POST /api/v1/jobs/search
///
/// Multi-select variant used by the filter bar.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Json(filter): Json<MultiFacetFilter>,
) -> Json<ListingView> {
    let filter = filter.normalized();
    Json(render_listing(&state, &filter).await)
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobListing>, AppError> {
    let row = state
        .jobs
        .get_public(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaga {job_id} não encontrada")))?;

    if let Err(e) = state.jobs.record_view(job_id).await {
        warn!("Failed to record view for job {job_id}: {e}");
    }

    Ok(Json(to_listing(row)))
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    session: Option<Session>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let application = apply_to_job(&state, session.as_ref(), job_id, request).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_maps_all_sentinel_and_values() {
        let filter = ListQuery {
            q: Some(" spark ".into()),
            work_type: Some("all".into()),
            seniority: Some("senior".into()),
            contract: None,
        }
        .into_filter();
        assert_eq!(filter.query(), "spark");
        assert_eq!(filter.work_type, FacetSelection::All);
        assert_eq!(filter.seniority, FacetSelection::Only("senior".into()));
        assert_eq!(filter.contract_type, FacetSelection::All);
    }
}
