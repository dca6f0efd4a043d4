mod applications;
mod auth;
mod candidates;
mod community;
mod companies;
mod config;
mod db;
mod errors;
mod jobs;
mod realtime;
mod routes;
mod site;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::store::PgApplicationStore;
use crate::candidates::store::PgCandidateStore;
use crate::community::store::PgCommunityStore;
use crate::companies::store::PgCompanyStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::cache::RedisListingCache;
use crate::jobs::store::PgJobStore;
use crate::realtime::RealtimeHub;
use crate::routes::build_router;
use crate::site::store::{PgBannerStore, PgSiteSettingsStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Data Hire Club API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (migrations run inside create_pool)
    let db = create_pool(&config.database_url).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let state = AppState {
        s3,
        config: config.clone(),
        jobs: Arc::new(PgJobStore::new(db.clone())),
        applications: Arc::new(PgApplicationStore::new(db.clone())),
        candidates: Arc::new(PgCandidateStore::new(db.clone())),
        companies: Arc::new(PgCompanyStore::new(db.clone())),
        community: Arc::new(PgCommunityStore::new(db.clone())),
        banners: Arc::new(PgBannerStore::new(db.clone())),
        settings: Arc::new(PgSiteSettingsStore::new(db)),
        listing_cache: Arc::new(RedisListingCache::new(redis, config.job_cache_ttl_secs)),
        realtime: RealtimeHub::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// S3 client for MinIO locally or AWS in production. Path-style addressing
/// keeps object URLs in the `{base}/{bucket}/{key}` shape.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "datahire-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
