use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::site::models::{BannerForm, BannerRow, SettingRow};
use crate::store::StoreResult;

#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Every non-deleted banner, for the admin list.
    async fn list_all(&self) -> StoreResult<Vec<BannerRow>>;

    /// Active, non-deleted banners in one placement. Window and audience are
    /// applied by `targeting::select_banners`.
    async fn list_for_placement(&self, placement: &str) -> StoreResult<Vec<BannerRow>>;

    async fn create(&self, form: &BannerForm) -> StoreResult<BannerRow>;

    async fn update(&self, banner_id: Uuid, form: &BannerForm) -> StoreResult<Option<BannerRow>>;

    async fn soft_delete(&self, banner_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait SiteSettingsStore: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<SettingRow>>;

    /// Inserts or replaces one setting.
    async fn put(&self, key: &str, value: &Value, updated_by: Uuid) -> StoreResult<SettingRow>;
}

const BANNER_COLUMNS: &str = r#"
    id, title, image_url, link_url, placement, audience, priority, active,
    starts_at, ends_at, created_at
"#;

pub struct PgBannerStore {
    pool: PgPool,
}

impl PgBannerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BannerStore for PgBannerStore {
    async fn list_all(&self) -> StoreResult<Vec<BannerRow>> {
        let sql = format!(
            "SELECT {BANNER_COLUMNS} FROM banners WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, BannerRow>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_for_placement(&self, placement: &str) -> StoreResult<Vec<BannerRow>> {
        let sql = format!(
            r#"
            SELECT {BANNER_COLUMNS} FROM banners
            WHERE placement = $1 AND active AND deleted_at IS NULL
            "#
        );
        Ok(sqlx::query_as::<_, BannerRow>(&sql)
            .bind(placement)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(&self, form: &BannerForm) -> StoreResult<BannerRow> {
        let sql = format!(
            r#"
            INSERT INTO banners
                (title, image_url, link_url, placement, audience, priority, active, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BANNER_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, BannerRow>(&sql)
            .bind(&form.title)
            .bind(&form.image_url)
            .bind(&form.link_url)
            .bind(form.placement.as_str())
            .bind(form.audience.as_str())
            .bind(form.priority)
            .bind(form.active)
            .bind(form.starts_at)
            .bind(form.ends_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(&self, banner_id: Uuid, form: &BannerForm) -> StoreResult<Option<BannerRow>> {
        let sql = format!(
            r#"
            UPDATE banners SET
                title = $2, image_url = $3, link_url = $4, placement = $5, audience = $6,
                priority = $7, active = $8, starts_at = $9, ends_at = $10, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {BANNER_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, BannerRow>(&sql)
            .bind(banner_id)
            .bind(&form.title)
            .bind(&form.image_url)
            .bind(&form.link_url)
            .bind(form.placement.as_str())
            .bind(form.audience.as_str())
            .bind(form.priority)
            .bind(form.active)
            .bind(form.starts_at)
            .bind(form.ends_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn soft_delete(&self, banner_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE banners SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(banner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgSiteSettingsStore {
    pool: PgPool,
}

impl PgSiteSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteSettingsStore for PgSiteSettingsStore {
    async fn all(&self) -> StoreResult<Vec<SettingRow>> {
        Ok(sqlx::query_as::<_, SettingRow>(
            "SELECT key, value, updated_at FROM site_settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn put(&self, key: &str, value: &Value, updated_by: Uuid) -> StoreResult<SettingRow> {
        Ok(sqlx::query_as::<_, SettingRow>(
            r#"
            INSERT INTO site_settings (key, value, updated_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value, updated_by = EXCLUDED.updated_by, updated_at = now()
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?)
    }
}
