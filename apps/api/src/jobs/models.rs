use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A posting joined with its owning company, as read from `job_postings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub work_model: Option<String>,
    pub seniority: Option<String>,
    pub contract_type: Option<String>,
    pub salary_range: Option<String>,
    /// JSON-encoded array of strings.
    pub benefits: Option<String>,
    pub application_link: Option<String>,
    pub views_count: i32,
    pub applications_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub company_name: Option<String>,
    pub company_location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Inactive,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Inactive => "inactive",
        }
    }

    /// Unknown stored values are treated as inactive.
    pub fn from_db(raw: &str) -> Self {
        if raw == "active" {
            JobStatus::Active
        } else {
            JobStatus::Inactive
        }
    }
}

/// Lower and upper bound parsed from a `"5000-8000"` style salary string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBounds {
    pub min: u32,
    pub max: u32,
}

/// Flat, display-ready job record. Never carries nulls for text the UI prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub work_type: String,
    pub seniority: String,
    pub contract_type: String,
    pub salary_range: String,
    pub salary_bounds: Option<SalaryBounds>,
    pub benefits: Option<Vec<String>>,
    pub application_link: Option<String>,
    pub views_count: i32,
    pub applications_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Company-side create/edit payload for a posting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingForm {
    pub title: String,
    pub description: Option<String>,
    pub work_model: Option<String>,
    pub seniority: Option<String>,
    pub contract_type: Option<String>,
    pub salary_range: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub application_link: Option<String>,
}

impl JobPostingForm {
    /// Trims free text and rejects an empty title.
    pub fn normalized(mut self) -> Result<Self, String> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err("O título da vaga é obrigatório".to_string());
        }
        for field in [
            &mut self.description,
            &mut self.work_model,
            &mut self.seniority,
            &mut self.contract_type,
            &mut self.salary_range,
            &mut self.application_link,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self.benefits = self
            .benefits
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        Ok(self)
    }

    /// Benefits as stored in the `benefits` text column.
    pub fn benefits_json(&self) -> Option<String> {
        if self.benefits.is_empty() {
            None
        } else {
            serde_json::to_string(&self.benefits).ok()
        }
    }
}
