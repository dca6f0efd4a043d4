//! Job List Renderer: the view state a client renders for the job list.
//!
//! `loading → {error, empty, populated}`. The view is recomputed from scratch on
//! every filter change; nothing here is asynchronous.

use serde::Serialize;

use crate::jobs::filter::{facet_options, filter_jobs, ActiveFilter, FacetOptions, JobFilter};
use crate::jobs::models::JobListing;

/// Number of skeleton cards shown while the fetch is in flight.
pub const SKELETON_COUNT: usize = 6;

pub const FALLBACK_ERROR_MESSAGE: &str = "Erro ao carregar vagas. Tente novamente mais tarde.";

/// Outcome of the underlying fetch.
#[derive(Debug, Clone)]
pub enum FetchState {
    /// Never produced by the server, which always resolves the fetch before
    /// answering. Clients render `Loading` for this while their request is in flight.
    #[allow(dead_code)]
    Pending,
    Failed(Option<String>),
    Ready(Vec<JobListing>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToAction {
    pub label: &'static str,
    pub href: &'static str,
}

const SIGNUP_CTA: CallToAction = CallToAction {
    label: "Cadastre-se",
    href: "/cadastro",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListingView {
    Loading {
        skeletons: usize,
    },
    Error {
        message: String,
    },
    Empty {
        facets: FacetOptions,
        active_filters: Vec<ActiveFilter>,
        cta: CallToAction,
    },
    Populated {
        total: usize,
        jobs: Vec<JobListing>,
        facets: FacetOptions,
        active_filters: Vec<ActiveFilter>,
    },
}

impl ListingView {
    pub fn from_fetch<F: JobFilter + ?Sized>(fetch: FetchState, filter: &F) -> Self {
        let all_jobs = match fetch {
            FetchState::Pending => {
                return ListingView::Loading {
                    skeletons: SKELETON_COUNT,
                }
            }
            FetchState::Failed(message) => {
                return ListingView::Error {
                    message: message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
                }
            }
            FetchState::Ready(jobs) => jobs,
        };

        let facets = facet_options(&all_jobs);
        let active_filters = filter.active_filters();
        let jobs = filter_jobs(&all_jobs, filter);

        if jobs.is_empty() {
            ListingView::Empty {
                facets,
                active_filters,
                cta: SIGNUP_CTA,
            }
        } else {
            ListingView::Populated {
                total: jobs.len(),
                jobs,
                facets,
                active_filters,
            }
        }
    }
}
