//! Job Fetch Gateway: one joined read of the public postings, mapped into
//! the flat `JobListing` shape with display fallbacks.

use tracing::{debug, warn};

use crate::jobs::cache::ListingCache;
use crate::jobs::models::{JobListing, JobPostingRow, SalaryBounds};
use crate::jobs::store::JobStore;
use crate::store::StoreResult;

pub const FALLBACK_COMPANY: &str = "Empresa não especificada";
pub const FALLBACK_LOCATION: &str = "Localização não especificada";
pub const FALLBACK_UNSPECIFIED: &str = "Não especificado";
pub const FALLBACK_SALARY: &str = "A combinar";

/// Returns the public job list, served from cache when possible.
///
/// Cache failures are logged and fall through to the store; store failures are returned as-is.
/// A list read while an invalidation lands is returned but not cached.
pub async fn fetch_active_listings(
    store: &dyn JobStore,
    cache: &dyn ListingCache,
) -> StoreResult<Vec<JobListing>> {
    match cache.get().await {
        Ok(Some(jobs)) => {
            debug!("Job list served from cache ({} jobs)", jobs.len());
            return Ok(jobs);
        }
        Ok(None) => {}
        Err(e) => warn!("Job list cache read failed: {e}"),
    }

    // Read before the store so a concurrent invalidation is detected at put time.
    let generation = match cache.generation().await {
        Ok(generation) => Some(generation),
        Err(e) => {
            warn!("Job list cache generation read failed: {e}");
            None
        }
    };

    let rows = store.list_public().await?;
    let jobs: Vec<JobListing> = rows.into_iter().map(to_listing).collect();

    if let Some(generation) = generation {
        match cache.put(&jobs, generation).await {
            Ok(true) => {}
            Ok(false) => debug!("Job list changed during fetch; not caching"),
            Err(e) => warn!("Job list cache write failed: {e}"),
        }
    }
    Ok(jobs)
}

/// Drops the cached job list after a mutation that changes it.
pub async fn invalidate_listings(cache: &dyn ListingCache) {
    if let Err(e) = cache.invalidate().await {
        warn!("Job list cache invalidation failed: {e}");
    }
}

pub fn to_listing(row: JobPostingRow) -> JobListing {
    let benefits = row.benefits.as_deref().and_then(|raw| parse_benefits(raw, row.id));
    let salary_bounds = row.salary_range.as_deref().and_then(parse_salary_bounds);

    JobListing {
        id: row.id,
        title: row.title,
        description: row.description.unwrap_or_default(),
        company: row
            .company_name
            .unwrap_or_else(|| FALLBACK_COMPANY.to_string()),
        location: row
            .company_location
            .unwrap_or_else(|| FALLBACK_LOCATION.to_string()),
        work_type: or_unspecified(row.work_model),
        seniority: or_unspecified(row.seniority),
        contract_type: or_unspecified(row.contract_type),
        salary_range: row
            .salary_range
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_SALARY.to_string()),
        salary_bounds,
        benefits,
        application_link: row.application_link,
        views_count: row.views_count,
        applications_count: row.applications_count,
        created_at: row.created_at,
    }
}

fn or_unspecified(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_UNSPECIFIED.to_string())
}

/// Ill-formed payloads mean "no benefits", never an error.
fn parse_benefits(raw: &str, job_id: uuid::Uuid) -> Option<Vec<String>> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) if list.is_empty() => None,
        Ok(list) => Some(list),
        Err(e) => {
            warn!("Ignoring malformed benefits on job {job_id}: {e}");
            None
        }
    }
}

/// Parses `"5000-8000"` (whitespace and thousands dots allowed) into bounds.
fn parse_salary_bounds(raw: &str) -> Option<SalaryBounds> {
    let (lo, hi) = raw.split_once('-')?;
    let parse = |s: &str| -> Option<u32> {
        let digits: String = s.trim().chars().filter(|c| *c != '.').collect();
        digits.parse().ok()
    };
    let (min, max) = (parse(lo)?, parse(hi)?);
    (min <= max).then_some(SalaryBounds { min, max })
}
