use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::candidates::models::{CandidateProfileForm, CandidateRow};
use crate::store::StoreResult;

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CandidateRow>>;

    async fn upsert(&self, user_id: Uuid, form: &CandidateProfileForm) -> StoreResult<CandidateRow>;
}

pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CandidateRow>> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert(&self, user_id: Uuid, form: &CandidateProfileForm) -> StoreResult<CandidateRow> {
        Ok(sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (user_id, full_name, headline, bio, location, seniority, skills,
                 linkedin_url, github_url, portfolio_url, resume_url, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                seniority = EXCLUDED.seniority,
                skills = EXCLUDED.skills,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                portfolio_url = EXCLUDED.portfolio_url,
                resume_url = EXCLUDED.resume_url,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&form.full_name)
        .bind(&form.headline)
        .bind(&form.bio)
        .bind(&form.location)
        .bind(&form.seniority)
        .bind(&form.skills)
        .bind(&form.linkedin_url)
        .bind(&form.github_url)
        .bind(&form.portfolio_url)
        .bind(&form.resume_url)
        .bind(&form.avatar_url)
        .fetch_one(&self.pool)
        .await?)
    }
}
