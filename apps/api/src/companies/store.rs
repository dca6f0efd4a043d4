use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::companies::models::CompanyRow;
use crate::store::StoreResult;

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CompanyRow>>;
}

pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CompanyRow>> {
        Ok(
            sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
