//! Filter/Search Engine.
//!
//! Pure, synchronous filtering of an already-fetched job list. Stages run in a
//! fixed order (free text, work type, seniority, contract type) and every stage
//! preserves input order, so the server's recency order survives filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::jobs::gateway::FALLBACK_UNSPECIFIED;
use crate::jobs::models::JobListing;

/// Query-string value meaning "no constraint on this facet".
pub const ALL_SENTINEL: &str = "all";

/// Something a filter chip can refer to: the free-text query or one facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Query,
    WorkType,
    Seniority,
    ContractType,
}

impl FilterField {
    pub const FACETS: [FilterField; 3] = [
        FilterField::WorkType,
        FilterField::Seniority,
        FilterField::ContractType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Query => "Busca",
            FilterField::WorkType => "Tipo",
            FilterField::Seniority => "Senioridade",
            FilterField::ContractType => "Contrato",
        }
    }

    /// The job's value for a facet. `Query` has no single value.
    fn value_of<'a>(&self, job: &'a JobListing) -> Option<&'a str> {
        match self {
            FilterField::Query => None,
            FilterField::WorkType => Some(job.work_type.as_str()),
            FilterField::Seniority => Some(job.seniority.as_str()),
            FilterField::ContractType => Some(job.contract_type.as_str()),
        }
    }
}

/// A dismissible label summarizing one applied filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub field: FilterField,
    pub label: String,
    /// Search body with only this field reset, ready for `POST /api/v1/jobs/search`.
    pub clear: MultiFacetFilter,
}

impl ActiveFilter {
    fn new<F: JobFilter + Clone>(filter: &F, field: FilterField, value: &str) -> Self {
        let mut rest = filter.clone();
        rest.clear(field);
        Self {
            field,
            label: format!("{}: {}", field.label(), value),
            clear: rest.to_search(),
        }
    }
}

/// Distinct facet values present in the unfiltered list, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub work_types: Vec<String>,
    pub seniorities: Vec<String>,
    pub contract_types: Vec<String>,
}

pub fn facet_options(jobs: &[JobListing]) -> FacetOptions {
    let collect = |field: FilterField| -> Vec<String> {
        let mut seen = BTreeSet::new();
        jobs.iter()
            .filter_map(|job| field.value_of(job))
            .filter(|v| *v != FALLBACK_UNSPECIFIED && seen.insert(*v))
            .map(str::to_string)
            .collect()
    };
    FacetOptions {
        work_types: collect(FilterField::WorkType),
        seniorities: collect(FilterField::Seniority),
        contract_types: collect(FilterField::ContractType),
    }
}

/// Anything that can decide which jobs survive filtering.
pub trait JobFilter {
    /// Trimmed free-text query; empty means no text constraint.
    fn query(&self) -> &str;

    /// Whether `value` satisfies the selection for `facet`.
    fn accepts(&self, facet: FilterField, value: &str) -> bool;

    fn active_filters(&self) -> Vec<ActiveFilter>;

    /// Resets exactly one field to "no constraint".
    fn clear(&mut self, field: FilterField);

    /// The same constraints in multi-select form.
    fn to_search(&self) -> MultiFacetFilter;
}

/// Applies `filter` to `jobs`, keeping input order.
pub fn filter_jobs<F: JobFilter + ?Sized>(jobs: &[JobListing], filter: &F) -> Vec<JobListing> {
    let needle = filter.query().to_lowercase();
    jobs.iter()
        .filter(|job| needle.is_empty() || matches_text(job, &needle))
        .filter(|job| {
            FilterField::FACETS.iter().all(|facet| {
                facet
                    .value_of(job)
                    .map_or(true, |value| filter.accepts(*facet, value))
            })
        })
        .cloned()
        .collect()
}

fn matches_text(job: &JobListing, needle: &str) -> bool {
    [&job.title, &job.company, &job.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

// ────────────────────────────────────────────────────────────────────────────
// Single-select variant (base list view)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FacetSelection {
    #[default]
    All,
    Only(String),
}

impl FacetSelection {
    /// Absent, blank and `"all"` all mean no constraint.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => FacetSelection::All,
            Some(v) if v.eq_ignore_ascii_case(ALL_SENTINEL) => FacetSelection::All,
            Some(v) => FacetSelection::Only(v.to_string()),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            FacetSelection::All => true,
            FacetSelection::Only(selected) => selected == value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    pub work_type: FacetSelection,
    pub seniority: FacetSelection,
    pub contract_type: FacetSelection,
}

impl FilterState {
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_string();
        self
    }

    pub fn select(mut self, facet: FilterField, selection: FacetSelection) -> Self {
        if let Some(slot) = self.slot_mut(facet) {
            *slot = selection;
        }
        self
    }

    fn slot(&self, facet: FilterField) -> Option<&FacetSelection> {
        match facet {
            FilterField::Query => None,
            FilterField::WorkType => Some(&self.work_type),
            FilterField::Seniority => Some(&self.seniority),
            FilterField::ContractType => Some(&self.contract_type),
        }
    }

    fn slot_mut(&mut self, facet: FilterField) -> Option<&mut FacetSelection> {
        match facet {
            FilterField::Query => None,
            FilterField::WorkType => Some(&mut self.work_type),
            FilterField::Seniority => Some(&mut self.seniority),
            FilterField::ContractType => Some(&mut self.contract_type),
        }
    }
}

impl JobFilter for FilterState {
    fn query(&self) -> &str {
        &self.query
    }

    fn accepts(&self, facet: FilterField, value: &str) -> bool {
        self.slot(facet).map_or(true, |s| s.matches(value))
    }

    fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        if !self.query.is_empty() {
            chips.push(ActiveFilter::new(self, FilterField::Query, &self.query));
        }
        for facet in FilterField::FACETS {
            if let Some(FacetSelection::Only(value)) = self.slot(facet) {
                chips.push(ActiveFilter::new(self, facet, value));
            }
        }
        chips
    }

    fn clear(&mut self, field: FilterField) {
        match self.slot_mut(field) {
            Some(slot) => *slot = FacetSelection::All,
            None => self.query.clear(),
        }
    }

    fn to_search(&self) -> MultiFacetFilter {
        let set = |selection: &FacetSelection| match selection {
            FacetSelection::All => BTreeSet::new(),
            FacetSelection::Only(value) => BTreeSet::from([value.clone()]),
        };
        MultiFacetFilter {
            query: self.query.clone(),
            work_types: set(&self.work_type),
            seniorities: set(&self.seniority),
            contract_types: set(&self.contract_type),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Multi-select variant (filter bar)
// ────────────────────────────────────────────────────────────────────────────

/// Each facet holds a set of accepted values; an empty set accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiFacetFilter {
    pub query: String,
    pub work_types: BTreeSet<String>,
    pub seniorities: BTreeSet<String>,
    pub contract_types: BTreeSet<String>,
}

impl MultiFacetFilter {
    /// Trims the query and drops blank facet values.
    pub fn normalized(mut self) -> Self {
        self.query = self.query.trim().to_string();
        for set in [
            &mut self.work_types,
            &mut self.seniorities,
            &mut self.contract_types,
        ] {
            set.retain(|v| !v.trim().is_empty());
        }
        self
    }

    fn set(&self, facet: FilterField) -> Option<&BTreeSet<String>> {
        match facet {
            FilterField::Query => None,
            FilterField::WorkType => Some(&self.work_types),
            FilterField::Seniority => Some(&self.seniorities),
            FilterField::ContractType => Some(&self.contract_types),
        }
    }
}

impl JobFilter for MultiFacetFilter {
    fn query(&self) -> &str {
        &self.query
    }

    fn accepts(&self, facet: FilterField, value: &str) -> bool {
        self.set(facet)
            .map_or(true, |set| set.is_empty() || set.contains(value))
    }

    fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        if !self.query.is_empty() {
            chips.push(ActiveFilter::new(self, FilterField::Query, &self.query));
        }
        for facet in FilterField::FACETS {
            if let Some(set) = self.set(facet).filter(|s| !s.is_empty()) {
                let joined = set.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
                chips.push(ActiveFilter::new(self, facet, &joined));
            }
        }
        chips
    }

    fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Query => self.query.clear(),
            FilterField::WorkType => self.work_types.clear(),
            FilterField::Seniority => self.seniorities.clear(),
            FilterField::ContractType => self.contract_types.clear(),
        }
    }

    fn to_search(&self) -> MultiFacetFilter {
        self.clone()
    }
}
