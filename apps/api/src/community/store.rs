use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::community::levels::{like_award, LikeChange, PointReason};
use crate::community::models::{CommentRow, LikeState, PostRow};
use crate::store::StoreResult;

/// Every write that earns points records its ledger entry in the same transaction.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Newest first. `liked_by_me` is false for anonymous viewers.
    async fn list_posts(&self, viewer: Option<Uuid>, limit: i64, offset: i64)
        -> StoreResult<Vec<PostRow>>;

    async fn create_post(&self, author_id: Uuid, content: &str) -> StoreResult<PostRow>;

    /// `None` when the post is missing or deleted.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<LikeState>>;

    /// Oldest first. `None` when the post is missing or deleted.
    async fn list_comments(&self, post_id: Uuid) -> StoreResult<Option<Vec<CommentRow>>>;

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<CommentRow>>;

    async fn total_points(&self, user_id: Uuid) -> StoreResult<i64>;
}

pub struct PgCommunityStore {
    pool: PgPool,
}

impl PgCommunityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends one ledger entry. Runs on the caller's transaction.
async fn award_points(conn: &mut PgConnection, user_id: Uuid, reason: PointReason) -> StoreResult<()> {
    sqlx::query("INSERT INTO community_points (user_id, reason, points) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(reason.as_str())
        .bind(reason.points())
        .execute(conn)
        .await?;
    Ok(())
}

async fn live_post_author(conn: &mut PgConnection, post_id: Uuid) -> StoreResult<Option<Uuid>> {
    Ok(sqlx::query_scalar::<_, Uuid>(
        "SELECT author_id FROM community_posts WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .fetch_optional(conn)
    .await?)
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.content, p.created_at,
           (SELECT COUNT(*) FROM community_likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM community_comments c WHERE c.post_id = p.id) AS comment_count,
           EXISTS (SELECT 1 FROM community_likes l WHERE l.post_id = p.id AND l.user_id = $1)
               AS liked_by_me
    FROM community_posts p
"#;

#[async_trait]
impl CommunityStore for PgCommunityStore {
    async fn list_posts(
        &self,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<PostRow>> {
        let sql = format!(
            "{POST_SELECT} WHERE p.deleted_at IS NULL ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        Ok(sqlx::query_as::<_, PostRow>(&sql)
            .bind(viewer)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_post(&self, author_id: Uuid, content: &str) -> StoreResult<PostRow> {
        let mut tx = self.pool.begin().await?;

        let post_id: Uuid = sqlx::query_scalar(
            "INSERT INTO community_posts (author_id, content) VALUES ($1, $2) RETURNING id",
        )
        .bind(author_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;
        award_points(&mut tx, author_id, PointReason::PostCreated).await?;

        let sql = format!("{POST_SELECT} WHERE p.id = $2");
        let post = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author_id)
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("User {author_id} created post {post_id}");
        Ok(post)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<LikeState>> {
        let mut tx = self.pool.begin().await?;
        let Some(author_id) = live_post_author(&mut tx, post_id).await? else {
            return Ok(None);
        };

        let removed = sqlx::query("DELETE FROM community_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        let change = if removed {
            LikeChange::Removed
        } else {
            // A concurrent toggle may have inserted the row first.
            let inserted = sqlx::query(
                "INSERT INTO community_likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
                > 0;
            if inserted {
                LikeChange::Added
            } else {
                LikeChange::Unchanged
            }
        };

        if let Some(reason) = like_award(author_id, user_id, change) {
            award_points(&mut tx, author_id, reason).await?;
        }

        let like_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM community_likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some(LikeState {
            liked: change != LikeChange::Removed,
            like_count,
        }))
    }

    async fn list_comments(&self, post_id: Uuid) -> StoreResult<Option<Vec<CommentRow>>> {
        let mut conn = self.pool.acquire().await?;
        if live_post_author(&mut conn, post_id).await?.is_none() {
            return Ok(None);
        }
        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, content, created_at
            FROM community_comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(Some(comments))
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<CommentRow>> {
        let mut tx = self.pool.begin().await?;
        if live_post_author(&mut tx, post_id).await?.is_none() {
            return Ok(None);
        }

        let comment = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO community_comments (post_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, author_id, content, created_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;
        award_points(&mut tx, author_id, PointReason::CommentAdded).await?;

        tx.commit().await?;
        Ok(Some(comment))
    }

    async fn total_points(&self, user_id: Uuid) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(points), 0)::BIGINT FROM community_points WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
