use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown application status '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub feedback_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An application as the candidate sees it in their list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub feedback_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An application as the hiring company sees it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub headline: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Company review payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewForm {
    pub status: ApplicationStatus,
    pub feedback: Option<String>,
}

/// Per-status totals for the candidate dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub total: i64,
    pub pending: i64,
    pub reviewed: i64,
    pub accepted: i64,
    pub rejected: i64,
}

impl DashboardCounts {
    /// Folds `(status, count)` rows; unknown statuses count toward `total` only.
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = DashboardCounts::default();
        for (status, n) in rows {
            counts.total += n;
            match status.parse::<ApplicationStatus>() {
                Ok(ApplicationStatus::Pending) => counts.pending += n,
                Ok(ApplicationStatus::Reviewed) => counts.reviewed += n,
                Ok(ApplicationStatus::Accepted) => counts.accepted += n,
                Ok(ApplicationStatus::Rejected) => counts.rejected += n,
                Err(_) => {}
            }
        }
        counts
    }
}
