use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::applications::models::{
    ApplicantRow, ApplicationRow, ApplicationStatus, CandidateApplicationRow,
};
use crate::store::StoreResult;

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Inserts a pending application and bumps the job's counter in one statement.
    /// A second live application for the same pair fails with `StoreError::UniqueViolation`.
    async fn insert(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        cover_letter: Option<&str>,
    ) -> StoreResult<ApplicationRow>;

    async fn list_for_candidate(&self, candidate_id: Uuid)
        -> StoreResult<Vec<CandidateApplicationRow>>;

    /// Live applications to a job owned by `company_id`.
    async fn list_for_job(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<Vec<ApplicantRow>>;

    async fn review(
        &self,
        company_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
        feedback: Option<&str>,
    ) -> StoreResult<Option<ApplicationRow>>;

    /// Soft-deletes the candidate's own application and decrements the job counter.
    async fn withdraw(
        &self,
        candidate_id: Uuid,
        application_id: Uuid,
    ) -> StoreResult<Option<ApplicationRow>>;

    async fn status_counts(&self, candidate_id: Uuid) -> StoreResult<Vec<(String, i64)>>;
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const APPLICATION_COLUMNS: &str =
    "id, job_id, candidate_id, cover_letter, status, feedback, feedback_at, created_at";

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn insert(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        cover_letter: Option<&str>,
    ) -> StoreResult<ApplicationRow> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO job_applications (job_id, candidate_id, cover_letter, status)
                VALUES ($1, $2, $3, 'pending')
                RETURNING {APPLICATION_COLUMNS}
            ), bumped AS (
                UPDATE job_postings SET applications_count = applications_count + 1
                WHERE id = $1
            )
            SELECT {APPLICATION_COLUMNS} FROM inserted
            "#
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(job_id)
            .bind(candidate_id)
            .bind(cover_letter)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> StoreResult<Vec<CandidateApplicationRow>> {
        Ok(sqlx::query_as::<_, CandidateApplicationRow>(
            r#"
            SELECT a.id, a.job_id, j.title AS job_title, c.name AS company_name,
                   a.status, a.feedback, a.feedback_at, a.created_at
            FROM job_applications a
            JOIN job_postings j ON j.id = a.job_id
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE a.candidate_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_for_job(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<Vec<ApplicantRow>> {
        Ok(sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT a.id, a.candidate_id, p.full_name AS candidate_name, p.headline,
                   p.resume_url, a.cover_letter, a.status, a.feedback, a.created_at
            FROM job_applications a
            JOIN job_postings j ON j.id = a.job_id
            JOIN candidates p ON p.id = a.candidate_id
            WHERE a.job_id = $1 AND j.company_id = $2 AND a.deleted_at IS NULL
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(job_id)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn review(
        &self,
        company_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
        feedback: Option<&str>,
    ) -> StoreResult<Option<ApplicationRow>> {
        let sql = format!(
            r#"
            UPDATE job_applications a SET
                status = $3,
                feedback = COALESCE($4, a.feedback),
                feedback_at = CASE WHEN $4 IS NULL THEN a.feedback_at ELSE now() END,
                updated_at = now()
            FROM job_postings j
            WHERE a.id = $1 AND j.id = a.job_id AND j.company_id = $2
              AND a.deleted_at IS NULL
            RETURNING a.{}
            "#,
            APPLICATION_COLUMNS.replace(", ", ", a.")
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application_id)
            .bind(company_id)
            .bind(status.as_str())
            .bind(feedback)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn withdraw(
        &self,
        candidate_id: Uuid,
        application_id: Uuid,
    ) -> StoreResult<Option<ApplicationRow>> {
        let sql = format!(
            r#"
            WITH withdrawn AS (
                UPDATE job_applications SET deleted_at = now(), updated_at = now()
                WHERE id = $1 AND candidate_id = $2 AND deleted_at IS NULL
                RETURNING {APPLICATION_COLUMNS}
            ), dropped AS (
                UPDATE job_postings SET applications_count = GREATEST(applications_count - 1, 0)
                WHERE id IN (SELECT job_id FROM withdrawn)
            )
            SELECT {APPLICATION_COLUMNS} FROM withdrawn
            "#
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application_id)
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn status_counts(&self, candidate_id: Uuid) -> StoreResult<Vec<(String, i64)>> {
        Ok(sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM job_applications
            WHERE candidate_id = $1 AND deleted_at IS NULL
            GROUP BY status
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
