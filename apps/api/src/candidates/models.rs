use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub seniority: Option<String>,
    pub skills: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement payload for the candidate profile form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateProfileForm {
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub seniority: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl CandidateProfileForm {
    pub fn normalized(mut self) -> Result<Self, String> {
        self.full_name = self.full_name.trim().to_string();
        if self.full_name.is_empty() {
            return Err("O nome completo é obrigatório".to_string());
        }
        for field in [
            &mut self.headline,
            &mut self.bio,
            &mut self.location,
            &mut self.seniority,
            &mut self.linkedin_url,
            &mut self.github_url,
            &mut self.portfolio_url,
            &mut self.resume_url,
            &mut self.avatar_url,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        let mut seen = HashSet::new();
        self.skills = self
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect();
        Ok(self)
    }
}
