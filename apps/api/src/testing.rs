//! In-memory stores and fixtures shared by unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use uuid::Uuid;

use crate::applications::models::{
    ApplicantRow, ApplicationRow, ApplicationStatus, CandidateApplicationRow,
};
use crate::applications::store::ApplicationStore;
use crate::auth::Claims;
use crate::candidates::models::{CandidateProfileForm, CandidateRow};
use crate::candidates::store::CandidateStore;
use crate::community::levels::{like_award, LikeChange, PointReason};
use crate::community::models::{CommentRow, LikeState, PostRow};
use crate::community::store::CommunityStore;
use crate::companies::models::CompanyRow;
use crate::companies::store::CompanyStore;
use crate::config::Config;
use crate::jobs::cache::ListingCache;
use crate::jobs::models::{JobListing, JobPostingForm, JobPostingRow, JobStatus};
use crate::jobs::store::JobStore;
use crate::realtime::RealtimeHub;
use crate::site::models::{BannerForm, BannerRow, SettingRow};
use crate::site::store::{BannerStore, SiteSettingsStore};
use crate::state::AppState;
use crate::store::{StoreError, StoreResult};

pub const TEST_JWT_SECRET: &str = "datahire-test-secret";

/// The only user listed in `test_config().admin_user_ids`.
pub const ADMIN_ID: Uuid = Uuid::from_u128(0xad_0000_0000_0000_0000_0000_0000_0001);

pub fn job_row(title: &str) -> JobPostingRow {
    JobPostingRow {
        id: Uuid::new_v4(),
        company_id: None,
        title: title.to_string(),
        description: None,
        work_model: None,
        seniority: None,
        contract_type: None,
        salary_range: None,
        benefits: None,
        application_link: None,
        views_count: 0,
        applications_count: 0,
        status: "active".to_string(),
        created_at: Utc::now(),
        company_name: None,
        company_location: None,
    }
}

pub fn candidate_row(user_id: Uuid) -> CandidateRow {
    CandidateRow {
        id: Uuid::new_v4(),
        user_id,
        full_name: "Ana Souza".to_string(),
        headline: None,
        bio: None,
        location: None,
        seniority: None,
        skills: vec![],
        linkedin_url: None,
        github_url: None,
        portfolio_url: None,
        resume_url: None,
        avatar_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn company_row(user_id: Uuid) -> CompanyRow {
    CompanyRow {
        id: Uuid::new_v4(),
        user_id,
        name: "Acme Dados".to_string(),
        location: Some("São Paulo".to_string()),
        website: None,
        logo_url: None,
        created_at: Utc::now(),
    }
}

/// A signed session token for `user_id`, valid for an hour.
pub fn bearer(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        email: None,
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

struct StoredJob {
    row: JobPostingRow,
    deleted: bool,
}

struct StoredApplication {
    row: ApplicationRow,
    deleted: bool,
}

struct StoredPost {
    id: Uuid,
    author_id: Uuid,
    content: String,
    created_at: chrono::DateTime<Utc>,
    deleted: bool,
}

struct StoredBanner {
    row: BannerRow,
    deleted: bool,
}

#[derive(Default)]
struct Inner {
    jobs: Vec<StoredJob>,
    candidates: Vec<CandidateRow>,
    companies: Vec<CompanyRow>,
    applications: Vec<StoredApplication>,
    posts: Vec<StoredPost>,
    likes: Vec<(Uuid, Uuid)>,
    comments: Vec<CommentRow>,
    points: Vec<(Uuid, i32)>,
    banners: Vec<StoredBanner>,
    settings: BTreeMap<String, SettingRow>,
}

impl Inner {
    fn joined(&self, row: &JobPostingRow) -> JobPostingRow {
        let mut row = row.clone();
        if let Some(company) = self
            .companies
            .iter()
            .find(|c| Some(c.id) == row.company_id)
        {
            row.company_name = Some(company.name.clone());
            row.company_location = company.location.clone();
        }
        row
    }

    fn live_post(&self, post_id: Uuid) -> Option<&StoredPost> {
        self.posts.iter().find(|p| p.id == post_id && !p.deleted)
    }

    fn post_row(&self, post: &StoredPost, viewer: Option<Uuid>) -> PostRow {
        PostRow {
            id: post.id,
            author_id: post.author_id,
            content: post.content.clone(),
            like_count: self.likes.iter().filter(|(p, _)| *p == post.id).count() as i64,
            comment_count: self.comments.iter().filter(|c| c.post_id == post.id).count() as i64,
            liked_by_me: viewer.is_some_and(|v| self.likes.contains(&(post.id, v))),
            created_at: post.created_at,
        }
    }

    fn award(&mut self, user_id: Uuid, reason: PointReason) {
        self.points.push((user_id, reason.points()));
    }

    fn owned_job_mut(&mut self, company_id: Uuid, job_id: Uuid) -> Option<&mut StoredJob> {
        self.jobs
            .iter_mut()
            .find(|j| j.row.id == job_id && j.row.company_id == Some(company_id) && !j.deleted)
    }
}

/// Implements every store trait over one shared in-memory dataset.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    fail_reads: AtomicBool,
}

impl MemoryBackend {
    pub fn add_job(&self, row: JobPostingRow) {
        self.inner.lock().unwrap().jobs.push(StoredJob { row, deleted: false });
    }

    pub fn add_candidate(&self, row: CandidateRow) {
        self.inner.lock().unwrap().candidates.push(row);
    }

    pub fn add_company(&self, row: CompanyRow) {
        self.inner.lock().unwrap().companies.push(row);
    }

    pub fn mark_deleted(&self, job_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.row.id == job_id) {
            job.deleted = true;
        }
    }

    pub fn is_deleted(&self, job_id: Uuid) -> bool {
        self.inner
            .lock()
            .unwrap()
            .jobs
            .iter()
            .any(|j| j.row.id == job_id && j.deleted)
    }

    /// Inserts a post directly, without awarding points.
    pub fn add_post(&self, author_id: Uuid, content: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().posts.push(StoredPost {
            id,
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
            deleted: false,
        });
        id
    }

    pub fn mark_post_deleted(&self, post_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == post_id) {
            post.deleted = true;
        }
    }

    /// Live (non-withdrawn) applications.
    pub fn application_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .applications
            .iter()
            .filter(|a| !a.deleted)
            .count()
    }

    /// Makes every subsequent public job read fail like an unreachable database.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn check_reads(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

fn apply_form(row: &mut JobPostingRow, form: &JobPostingForm) {
    row.title = form.title.clone();
    row.description = form.description.clone();
    row.work_model = form.work_model.clone();
    row.seniority = form.seniority.clone();
    row.contract_type = form.contract_type.clone();
    row.salary_range = form.salary_range.clone();
    row.benefits = form.benefits_json();
    row.application_link = form.application_link.clone();
}

#[async_trait]
impl JobStore for MemoryBackend {
    async fn list_public(&self) -> StoreResult<Vec<JobPostingRow>> {
        self.check_reads()?;
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<JobPostingRow> = inner
            .jobs
            .iter()
            .rev()
            .filter(|j| !j.deleted && j.row.status == "active")
            .map(|j| inner.joined(&j.row))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_public(&self, job_id: Uuid) -> StoreResult<Option<JobPostingRow>> {
        self.check_reads()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .jobs
            .iter()
            .find(|j| j.row.id == job_id && !j.deleted && j.row.status == "active")
            .map(|j| inner.joined(&j.row)))
    }

    async fn record_view(&self, job_id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.row.id == job_id) {
            job.row.views_count += 1;
        }
        Ok(())
    }

    async fn list_for_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPostingRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .jobs
            .iter()
            .rev()
            .filter(|j| !j.deleted && j.row.company_id == Some(company_id))
            .map(|j| inner.joined(&j.row))
            .collect())
    }

    async fn create(&self, company_id: Uuid, form: &JobPostingForm) -> StoreResult<JobPostingRow> {
        let mut inner = self.inner.lock().unwrap();
        let mut row = job_row(&form.title);
        row.company_id = Some(company_id);
        apply_form(&mut row, form);
        let joined = inner.joined(&row);
        inner.jobs.push(StoredJob { row, deleted: false });
        Ok(joined)
    }

    async fn update(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        form: &JobPostingForm,
    ) -> StoreResult<Option<JobPostingRow>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(job) = inner.owned_job_mut(company_id, job_id) else {
            return Ok(None);
        };
        apply_form(&mut job.row, form);
        let row = job.row.clone();
        Ok(Some(inner.joined(&row)))
    }

    async fn set_status(
        &self,
        company_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> StoreResult<Option<JobPostingRow>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(job) = inner.owned_job_mut(company_id, job_id) else {
            return Ok(None);
        };
        job.row.status = status.as_str().to_string();
        let row = job.row.clone();
        Ok(Some(inner.joined(&row)))
    }

    async fn soft_delete(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.owned_job_mut(company_id, job_id) {
            Some(job) => {
                job.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ApplicationStore for MemoryBackend {
    async fn insert(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        cover_letter: Option<&str>,
    ) -> StoreResult<ApplicationRow> {
        let mut inner = self.inner.lock().unwrap();
        let duplicate = inner.applications.iter().any(|a| {
            !a.deleted && a.row.job_id == job_id && a.row.candidate_id == candidate_id
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: "job_applications_job_candidate_key".to_string(),
            });
        }
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            cover_letter: cover_letter.map(str::to_string),
            status: ApplicationStatus::Pending.as_str().to_string(),
            feedback: None,
            feedback_at: None,
            created_at: Utc::now(),
        };
        inner.applications.push(StoredApplication {
            row: row.clone(),
            deleted: false,
        });
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.row.id == job_id) {
            job.row.applications_count += 1;
        }
        Ok(row)
    }

    async fn list_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> StoreResult<Vec<CandidateApplicationRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .applications
            .iter()
            .rev()
            .filter(|a| !a.deleted && a.row.candidate_id == candidate_id)
            .filter_map(|a| {
                let job = inner.jobs.iter().find(|j| j.row.id == a.row.job_id)?;
                let job = inner.joined(&job.row);
                Some(CandidateApplicationRow {
                    id: a.row.id,
                    job_id: job.id,
                    job_title: job.title,
                    company_name: job.company_name,
                    status: a.row.status.clone(),
                    feedback: a.row.feedback.clone(),
                    feedback_at: a.row.feedback_at,
                    created_at: a.row.created_at,
                })
            })
            .collect())
    }

    async fn list_for_job(&self, company_id: Uuid, job_id: Uuid) -> StoreResult<Vec<ApplicantRow>> {
        let inner = self.inner.lock().unwrap();
        let owned = inner
            .jobs
            .iter()
            .any(|j| j.row.id == job_id && j.row.company_id == Some(company_id));
        if !owned {
            return Ok(vec![]);
        }
        Ok(inner
            .applications
            .iter()
            .rev()
            .filter(|a| !a.deleted && a.row.job_id == job_id)
            .filter_map(|a| {
                let candidate = inner.candidates.iter().find(|c| c.id == a.row.candidate_id)?;
                Some(ApplicantRow {
                    id: a.row.id,
                    candidate_id: candidate.id,
                    candidate_name: candidate.full_name.clone(),
                    headline: candidate.headline.clone(),
                    resume_url: candidate.resume_url.clone(),
                    cover_letter: a.row.cover_letter.clone(),
                    status: a.row.status.clone(),
                    feedback: a.row.feedback.clone(),
                    created_at: a.row.created_at,
                })
            })
            .collect())
    }

    async fn review(
        &self,
        company_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
        feedback: Option<&str>,
    ) -> StoreResult<Option<ApplicationRow>> {
        let mut inner = self.inner.lock().unwrap();
        let owned_jobs: Vec<Uuid> = inner
            .jobs
            .iter()
            .filter(|j| j.row.company_id == Some(company_id))
            .map(|j| j.row.id)
            .collect();
        let Some(app) = inner.applications.iter_mut().find(|a| {
            a.row.id == application_id && !a.deleted && owned_jobs.contains(&a.row.job_id)
        }) else {
            return Ok(None);
        };
        app.row.status = status.as_str().to_string();
        if let Some(feedback) = feedback {
            app.row.feedback = Some(feedback.to_string());
            app.row.feedback_at = Some(Utc::now());
        }
        Ok(Some(app.row.clone()))
    }

    async fn withdraw(
        &self,
        candidate_id: Uuid,
        application_id: Uuid,
    ) -> StoreResult<Option<ApplicationRow>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(app) = inner.applications.iter_mut().find(|a| {
            a.row.id == application_id && a.row.candidate_id == candidate_id && !a.deleted
        }) else {
            return Ok(None);
        };
        app.deleted = true;
        let row = app.row.clone();
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.row.id == row.job_id) {
            job.row.applications_count = (job.row.applications_count - 1).max(0);
        }
        Ok(Some(row))
    }

    async fn status_counts(&self, candidate_id: Uuid) -> StoreResult<Vec<(String, i64)>> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for app in inner
            .applications
            .iter()
            .filter(|a| !a.deleted && a.row.candidate_id == candidate_id)
        {
            *counts.entry(app.row.status.clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl CandidateStore for MemoryBackend {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CandidateRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.candidates.iter().find(|c| c.user_id == user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, form: &CandidateProfileForm) -> StoreResult<CandidateRow> {
        let mut inner = self.inner.lock().unwrap();
        let existing = inner.candidates.iter().position(|c| c.user_id == user_id);
        let mut row = match existing {
            Some(idx) => inner.candidates.remove(idx),
            None => candidate_row(user_id),
        };
        row.full_name = form.full_name.clone();
        row.headline = form.headline.clone();
        row.bio = form.bio.clone();
        row.location = form.location.clone();
        row.seniority = form.seniority.clone();
        row.skills = form.skills.clone();
        row.linkedin_url = form.linkedin_url.clone();
        row.github_url = form.github_url.clone();
        row.portfolio_url = form.portfolio_url.clone();
        row.resume_url = form.resume_url.clone();
        row.avatar_url = form.avatar_url.clone();
        row.updated_at = Utc::now();
        inner.candidates.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CompanyStore for MemoryBackend {
    async fn by_user(&self, user_id: Uuid) -> StoreResult<Option<CompanyRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.companies.iter().find(|c| c.user_id == user_id).cloned())
    }
}

#[async_trait]
impl CommunityStore for MemoryBackend {
    async fn list_posts(
        &self,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<PostRow>> {
        let inner = self.inner.lock().unwrap();
        let mut live: Vec<&StoredPost> = inner.posts.iter().filter(|p| !p.deleted).collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(live
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| inner.post_row(p, viewer))
            .collect())
    }

    async fn create_post(&self, author_id: Uuid, content: &str) -> StoreResult<PostRow> {
        let mut inner = self.inner.lock().unwrap();
        let post = StoredPost {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
            deleted: false,
        };
        let row = inner.post_row(&post, Some(author_id));
        inner.posts.push(post);
        inner.award(author_id, PointReason::PostCreated);
        Ok(row)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<LikeState>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(author_id) = inner.live_post(post_id).map(|p| p.author_id) else {
            return Ok(None);
        };
        let key = (post_id, user_id);
        let change = match inner.likes.iter().position(|l| *l == key) {
            Some(idx) => {
                inner.likes.remove(idx);
                LikeChange::Removed
            }
            None => {
                inner.likes.push(key);
                LikeChange::Added
            }
        };
        if let Some(reason) = like_award(author_id, user_id, change) {
            inner.award(author_id, reason);
        }
        Ok(Some(LikeState {
            liked: change == LikeChange::Added,
            like_count: inner.likes.iter().filter(|(p, _)| *p == post_id).count() as i64,
        }))
    }

    async fn list_comments(&self, post_id: Uuid) -> StoreResult<Option<Vec<CommentRow>>> {
        let inner = self.inner.lock().unwrap();
        if inner.live_post(post_id).is_none() {
            return Ok(None);
        }
        Ok(Some(
            inner
                .comments
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect(),
        ))
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<CommentRow>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.live_post(post_id).is_none() {
            return Ok(None);
        }
        let comment = CommentRow {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        inner.comments.push(comment.clone());
        inner.award(author_id, PointReason::CommentAdded);
        Ok(Some(comment))
    }

    async fn total_points(&self, user_id: Uuid) -> StoreResult<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .points
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, p)| i64::from(*p))
            .sum())
    }
}

fn banner_from_form(id: Uuid, form: &BannerForm, created_at: chrono::DateTime<Utc>) -> BannerRow {
    BannerRow {
        id,
        title: form.title.clone(),
        image_url: form.image_url.clone(),
        link_url: form.link_url.clone(),
        placement: form.placement.as_str().to_string(),
        audience: form.audience.as_str().to_string(),
        priority: form.priority,
        active: form.active,
        starts_at: form.starts_at,
        ends_at: form.ends_at,
        created_at,
    }
}

#[async_trait]
impl BannerStore for MemoryBackend {
    async fn list_all(&self) -> StoreResult<Vec<BannerRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .banners
            .iter()
            .rev()
            .filter(|b| !b.deleted)
            .map(|b| b.row.clone())
            .collect())
    }

    async fn list_for_placement(&self, placement: &str) -> StoreResult<Vec<BannerRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .banners
            .iter()
            .filter(|b| !b.deleted && b.row.active && b.row.placement == placement)
            .map(|b| b.row.clone())
            .collect())
    }

    async fn create(&self, form: &BannerForm) -> StoreResult<BannerRow> {
        let row = banner_from_form(Uuid::new_v4(), form, Utc::now());
        self.inner.lock().unwrap().banners.push(StoredBanner {
            row: row.clone(),
            deleted: false,
        });
        Ok(row)
    }

    async fn update(&self, banner_id: Uuid, form: &BannerForm) -> StoreResult<Option<BannerRow>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(banner) = inner
            .banners
            .iter_mut()
            .find(|b| b.row.id == banner_id && !b.deleted)
        else {
            return Ok(None);
        };
        banner.row = banner_from_form(banner_id, form, banner.row.created_at);
        Ok(Some(banner.row.clone()))
    }

    async fn soft_delete(&self, banner_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .banners
            .iter_mut()
            .find(|b| b.row.id == banner_id && !b.deleted)
        {
            Some(banner) => {
                banner.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SiteSettingsStore for MemoryBackend {
    async fn all(&self) -> StoreResult<Vec<SettingRow>> {
        Ok(self.inner.lock().unwrap().settings.values().cloned().collect())
    }

    async fn put(&self, key: &str, value: &Value, _updated_by: Uuid) -> StoreResult<SettingRow> {
        let row = SettingRow {
            key: key.to_string(),
            value: value.clone(),
            updated_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .settings
            .insert(key.to_string(), row.clone());
        Ok(row)
    }
}

/// Listing cache held in a mutex; `failing()` errors on every call.
#[derive(Default)]
pub struct MemoryCache {
    slot: Mutex<Option<Vec<JobListing>>>,
    generation: AtomicU64,
    failing: bool,
}

impl MemoryCache {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Option<Vec<JobListing>> {
        self.slot.lock().unwrap().clone()
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing {
            Err(anyhow!("cache unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ListingCache for MemoryCache {
    async fn get(&self) -> anyhow::Result<Option<Vec<JobListing>>> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn generation(&self) -> anyhow::Result<u64> {
        self.check()?;
        Ok(self.generation.load(Ordering::SeqCst))
    }

    async fn put(&self, jobs: &[JobListing], generation: u64) -> anyhow::Result<bool> {
        self.check()?;
        let mut slot = self.slot.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(false);
        }
        *slot = Some(jobs.to_vec());
        Ok(true)
    }

    async fn invalidate(&self) -> anyhow::Result<()> {
        self.check()?;
        let mut slot = self.slot.lock().unwrap();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = None;
        Ok(())
    }
}

/// One in-memory dataset plus cache, shareable across several `AppState`s.
pub struct TestBackend {
    pub store: Arc<MemoryBackend>,
    pub cache: Arc<MemoryCache>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryBackend::default()),
            cache: Arc::new(MemoryCache::default()),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/datahire_test".to_string(),
        redis_url: "redis://localhost".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_public_url: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        job_cache_ttl_secs: 60,
        port: 0,
        rust_log: "debug".to_string(),
        admin_user_ids: vec![ADMIN_ID],
    }
}

/// `AppState` over the in-memory backend.
pub fn test_state(backend: &TestBackend) -> AppState {
    let config = test_config();
    let s3_config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();

    AppState {
        s3: aws_sdk_s3::Client::from_conf(s3_config),
        config,
        jobs: backend.store.clone(),
        applications: backend.store.clone(),
        candidates: backend.store.clone(),
        companies: backend.store.clone(),
        community: backend.store.clone(),
        banners: backend.store.clone(),
        settings: backend.store.clone(),
        listing_cache: backend.cache.clone(),
        realtime: RealtimeHub::new(),
    }
}
