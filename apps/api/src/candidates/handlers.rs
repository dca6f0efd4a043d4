//! Axum route handlers for candidate users.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::models::{CandidateApplicationRow, DashboardCounts};
use crate::applications::store::ApplicationStore;
use crate::auth::Session;
use crate::candidates::completeness::{compute_completeness_report, CompletenessReport};
use crate::candidates::models::{CandidateProfileForm, CandidateRow};
use crate::errors::AppError;
use crate::jobs::gateway::invalidate_listings;
use crate::realtime::{ApplicationEvent, ChangeKind};
use crate::state::AppState;

async fn acting_candidate(state: &AppState, session: &Session) -> Result<CandidateRow, AppError> {
    state
        .candidates
        .by_user(session.user_id)
        .await?
        .ok_or(AppError::ProfileRequired)
}

/// GET /api/v1/candidate/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CandidateRow>, AppError> {
    state
        .candidates
        .by_user(session.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Perfil de candidato não encontrado".to_string()))
}

/// PUT /api/v1/candidate/profile
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CandidateProfileForm>,
) -> Result<Json<CandidateRow>, AppError> {
    let form = form.normalized().map_err(AppError::Validation)?;
    let profile = state.candidates.upsert(session.user_id, &form).await?;
    info!("Saved candidate profile {} for user {}", profile.id, session.user_id);
    Ok(Json(profile))
}

/// GET /api/v1/candidate/profile/completeness
pub async fn handle_profile_completeness(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CompletenessReport>, AppError> {
    let profile = acting_candidate(&state, &session).await?;
    Ok(Json(compute_completeness_report(&profile)))
}

/// GET /api/v1/candidate/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<CandidateApplicationRow>>, AppError> {
    let candidate = acting_candidate(&state, &session).await?;
    Ok(Json(state.applications.list_for_candidate(candidate.id).await?))
}

/// DELETE /api/v1/candidate/applications/:id
pub async fn handle_withdraw_application(
    State(state): State<AppState>,
    session: Session,
    Path(application_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let candidate = acting_candidate(&state, &session).await?;
    let application = state
        .applications
        .withdraw(candidate.id, application_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidatura {application_id} não encontrada"))
        })?;

    invalidate_listings(state.listing_cache.as_ref()).await;
    state.realtime.publish(ApplicationEvent {
        kind: ChangeKind::Delete,
        application_id: application.id,
        job_id: application.job_id,
        candidate_id: candidate.id,
    });

    info!("Candidate {} withdrew application {application_id}", candidate.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/candidate/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardCounts>, AppError> {
    let candidate = acting_candidate(&state, &session).await?;
    let rows = state.applications.status_counts(candidate.id).await?;
    Ok(Json(DashboardCounts::from_rows(&rows)))
}

/// GET /api/v1/candidate/dashboard/stream
///
/// Sends `counts` immediately, then again after every change to this candidate's applications.
pub async fn handle_dashboard_stream(
    State(state): State<AppState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let candidate = acting_candidate(&state, &session).await?;
    let stream = dashboard_events(
        state.realtime.subscribe(),
        state.applications.clone(),
        candidate.id,
    );
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

struct DashboardFeed {
    rx: broadcast::Receiver<ApplicationEvent>,
    store: Arc<dyn ApplicationStore>,
    candidate_id: Uuid,
    primed: bool,
}

/// Waits for the next event concerning `candidate_id`. `false` once the hub is gone.
async fn next_relevant(rx: &mut broadcast::Receiver<ApplicationEvent>, candidate_id: Uuid) -> bool {
    loop {
        match rx.recv().await {
            Ok(event) if event.candidate_id == candidate_id => return true,
            Ok(_) => continue,
            // Missed events may have concerned us; refetch.
            Err(RecvError::Lagged(_)) => return true,
            Err(RecvError::Closed) => return false,
        }
    }
}

fn dashboard_events(
    rx: broadcast::Receiver<ApplicationEvent>,
    store: Arc<dyn ApplicationStore>,
    candidate_id: Uuid,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let feed = DashboardFeed {
        rx,
        store,
        candidate_id,
        primed: false,
    };
    stream::unfold(feed, |mut feed| async move {
        if feed.primed && !next_relevant(&mut feed.rx, feed.candidate_id).await {
            return None;
        }
        feed.primed = true;

        let event = match feed.store.status_counts(feed.candidate_id).await {
            Ok(rows) => Event::default()
                .event("counts")
                .json_data(DashboardCounts::from_rows(&rows))
                .unwrap_or_else(|_| Event::default().event("error")),
            Err(e) => {
                warn!("Dashboard refetch failed for {}: {e}", feed.candidate_id);
                Event::default().event("error").data("refetch failed")
            }
        };
        Some((Ok(event), feed))
    })
}
