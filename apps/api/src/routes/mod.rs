pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::community::handlers as community;
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::site::handlers as site;
use crate::state::AppState;
use crate::storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public job board
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/search", post(jobs::handle_search_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/apply", post(jobs::handle_apply))
        // Company side
        .route(
            "/api/v1/company/jobs",
            get(companies::handle_list_company_jobs).post(companies::handle_create_job),
        )
        .route(
            "/api/v1/company/jobs/:id",
            put(companies::handle_update_job).delete(companies::handle_delete_job),
        )
        .route(
            "/api/v1/company/jobs/:id/status",
            patch(companies::handle_set_job_status),
        )
        .route(
            "/api/v1/company/jobs/:id/applications",
            get(companies::handle_list_applicants),
        )
        .route(
            "/api/v1/company/applications/:id",
            patch(companies::handle_review_application),
        )
        // Candidate side
        .route(
            "/api/v1/candidate/profile",
            get(candidates::handle_get_profile).put(candidates::handle_upsert_profile),
        )
        .route(
            "/api/v1/candidate/profile/completeness",
            get(candidates::handle_profile_completeness),
        )
        .route(
            "/api/v1/candidate/applications",
            get(candidates::handle_list_applications),
        )
        .route(
            "/api/v1/candidate/applications/:id",
            delete(candidates::handle_withdraw_application),
        )
        .route("/api/v1/candidate/dashboard", get(candidates::handle_dashboard))
        .route(
            "/api/v1/candidate/dashboard/stream",
            get(candidates::handle_dashboard_stream),
        )
        // Object storage
        .route(
            "/api/v1/storage/:bucket",
            post(storage::handle_upload)
                .layer(DefaultBodyLimit::max(storage::MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        // Community
        .route(
            "/api/v1/community/posts",
            get(community::handle_list_posts).post(community::handle_create_post),
        )
        .route(
            "/api/v1/community/posts/:id/like",
            post(community::handle_toggle_like),
        )
        .route(
            "/api/v1/community/posts/:id/comments",
            get(community::handle_list_comments).post(community::handle_add_comment),
        )
        .route("/api/v1/community/me", get(community::handle_my_level))
        // Site content
        .route("/api/v1/site/banners", get(site::handle_live_banners))
        .route("/api/v1/site/settings", get(site::handle_site_settings))
        .route(
            "/api/v1/admin/banners",
            get(site::handle_admin_list_banners).post(site::handle_admin_create_banner),
        )
        .route(
            "/api/v1/admin/banners/:id",
            put(site::handle_admin_update_banner).delete(site::handle_admin_delete_banner),
        )
        .route(
            "/api/v1/admin/settings/:key",
            put(site::handle_admin_put_setting),
        )
        .with_state(state)
}
