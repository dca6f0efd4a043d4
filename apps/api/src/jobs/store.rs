use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::jobs::models::{JobPostingForm, JobPostingRow, JobStatus};
use crate::store::StoreResult;

/// Persistence seam for job postings.
///
/// Carried in `AppState` as `Arc<dyn JobStore>`; tests substitute an in-memory store.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Active, non-deleted postings, newest first.
    async fn list_public(&self) -> StoreResult<Vec<JobPostingRow>>;

    async fn get_public(&self, job_id: Uuid) -> StoreResult<Option<JobPostingRow>>;

    async fn record_view(&self, job_id: Uuid) -> StoreResult<()>;

    /// All non-deleted postings of one company, any status.
    async fn list_for_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPostingRow>>;

    async fn create(&self, company_id: Uuid, form: &JobPostingForm) -> StoreResult<JobPostingRow>;

    async fn update(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        form: &JobPostingForm,
    ) -> StoreResult<Option<JobPostingRow>>;

    async fn set_status(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> StoreResult<Option<JobPostingRow>>;

    /// Sets `deleted_at`; returns false when nothing matched.
    async fn soft_delete(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<bool>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Projection shared by every query that returns `JobPostingRow`, applied to alias `j`.
const JOB_COLUMNS: &str = r#"
    j.id, j.company_id, j.title, j.description, j.work_model, j.seniority,
    j.contract_type, j.salary_range, j.benefits, j.application_link,
    j.views_count, j.applications_count, j.status, j.created_at,
    c.name AS company_name, c.location AS company_location
"#;

#[async_trait]
impl JobStore for PgJobStore {
    async fn list_public(&self) -> StoreResult<Vec<JobPostingRow>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM job_postings j
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE j.status = 'active' AND j.deleted_at IS NULL
            ORDER BY j.created_at DESC
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_public(&self, job_id: Uuid) -> StoreResult<Option<JobPostingRow>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM job_postings j
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE j.id = $1 AND j.status = 'active' AND j.deleted_at IS NULL
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn record_view(&self, job_id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE job_postings SET views_count = views_count + 1 WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPostingRow>> {
        let sql = format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM job_postings j
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE j.company_id = $1 AND j.deleted_at IS NULL
            ORDER BY j.created_at DESC
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(&self, company_id: Uuid, form: &JobPostingForm) -> StoreResult<JobPostingRow> {
        let sql = format!(
            r#"
            WITH j AS (
                INSERT INTO job_postings
                    (company_id, title, description, work_model, seniority,
                     contract_type, salary_range, benefits, application_link, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active')
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j
            LEFT JOIN companies c ON c.id = j.company_id
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .bind(company_id)
            .bind(&form.title)
            .bind(&form.description)
            .bind(&form.work_model)
            .bind(&form.seniority)
            .bind(&form.contract_type)
            .bind(&form.salary_range)
            .bind(form.benefits_json())
            .bind(&form.application_link)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        form: &JobPostingForm,
    ) -> StoreResult<Option<JobPostingRow>> {
        let sql = format!(
            r#"
            WITH j AS (
                UPDATE job_postings SET
                    title = $3, description = $4, work_model = $5, seniority = $6,
                    contract_type = $7, salary_range = $8, benefits = $9,
                    application_link = $10, updated_at = now()
                WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j
            LEFT JOIN companies c ON c.id = j.company_id
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .bind(job_id)
            .bind(company_id)
            .bind(&form.title)
            .bind(&form.description)
            .bind(&form.work_model)
            .bind(&form.seniority)
            .bind(&form.contract_type)
            .bind(&form.salary_range)
            .bind(form.benefits_json())
            .bind(&form.application_link)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_status(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> StoreResult<Option<JobPostingRow>> {
        let sql = format!(
            r#"
            WITH j AS (
                UPDATE job_postings SET status = $3, updated_at = now()
                WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j
            LEFT JOIN companies c ON c.id = j.company_id
            "#
        );
        Ok(sqlx::query_as::<_, JobPostingRow>(&sql)
            .bind(job_id)
            .bind(company_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn soft_delete(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(job_id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
