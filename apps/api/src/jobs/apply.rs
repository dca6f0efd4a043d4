//! Job Detail/Apply Flow.
//!
//! Checks run in order: session, job visibility, candidate profile, cover
//! letter. The one-application-per-pair rule lives in the database; a unique
//! violation on insert is reported as `AppError::AlreadyApplied`.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::models::ApplicationRow;
use crate::auth::Session;
use crate::errors::AppError;
use crate::jobs::gateway::invalidate_listings;
use crate::realtime::{ApplicationEvent, ChangeKind};
use crate::state::AppState;
use crate::store::StoreError;

pub const MAX_COVER_LETTER_CHARS: usize = 5000;

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub cover_letter: String,
}

pub async fn apply_to_job(
    state: &AppState,
    session: Option<&Session>,
    job_id: Uuid,
    request: ApplyRequest,
) -> Result<ApplicationRow, AppError> {
    let session = session.ok_or(AppError::Unauthorized)?;

    state
        .jobs
        .get_public(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaga {job_id} não encontrada")))?;

    let candidate = state
        .candidates
        .by_user(session.user_id)
        .await?
        .ok_or(AppError::ProfileRequired)?;

    let cover_letter = request.cover_letter.trim();
    if cover_letter.chars().count() > MAX_COVER_LETTER_CHARS {
        return Err(AppError::Validation(format!(
            "A carta de apresentação deve ter no máximo {MAX_COVER_LETTER_CHARS} caracteres"
        )));
    }
    let cover_letter = (!cover_letter.is_empty()).then_some(cover_letter);

    let application = match state
        .applications
        .insert(job_id, candidate.id, cover_letter)
        .await
    {
        Ok(application) => application,
        Err(StoreError::UniqueViolation { .. }) => {
            info!("Candidate {} already applied to job {job_id}", candidate.id);
            return Err(AppError::AlreadyApplied);
        }
        Err(e) => return Err(e.into()),
    };

    // The job's applications_count changed; the cached list must not outlive the write.
    invalidate_listings(state.listing_cache.as_ref()).await;
    state.realtime.publish(ApplicationEvent {
        kind: ChangeKind::Insert,
        application_id: application.id,
        job_id,
        candidate_id: candidate.id,
    });

    info!(
        "Candidate {} <{}> applied to job {job_id} (application {})",
        candidate.id,
        session.email.as_deref().unwrap_or("-"),
        application.id
    );
    Ok(application)
}
