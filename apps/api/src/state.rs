use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::applications::store::ApplicationStore;
use crate::candidates::store::CandidateStore;
use crate::community::store::CommunityStore;
use crate::companies::store::CompanyStore;
use crate::config::Config;
use crate::jobs::cache::ListingCache;
use crate::jobs::store::JobStore;
use crate::realtime::RealtimeHub;
use crate::site::store::{BannerStore, SiteSettingsStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub s3: S3Client,
    pub config: Config,
    pub jobs: Arc<dyn JobStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub candidates: Arc<dyn CandidateStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub community: Arc<dyn CommunityStore>,
    pub banners: Arc<dyn BannerStore>,
    pub settings: Arc<dyn SiteSettingsStore>,
    /// Public job list cache. Invalidated after every mutation that changes the list.
    pub listing_cache: Arc<dyn ListingCache>,
    pub realtime: RealtimeHub,
}
