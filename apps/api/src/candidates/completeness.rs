use serde::{Deserialize, Serialize};

use crate::candidates::models::CandidateRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldHealth {
    pub field: String,
    pub weight: f64,
    pub filled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// 0 – 100
    pub score: u32,
    pub status: ProfileStatus,
    pub fields: Vec<FieldHealth>,
    pub missing_fields: Vec<String>,
    pub recommendations: Vec<String>,
}

const FIELD_WEIGHTS: &[(&str, f64)] = &[
    ("full_name", 0.15),
    ("headline", 0.10),
    ("bio", 0.10),
    ("location", 0.05),
    ("seniority", 0.10),
    ("skills", 0.15),
    ("linkedin_url", 0.10),
    ("github_url", 0.05),
    ("portfolio_url", 0.05),
    ("resume_url", 0.10),
    ("avatar_url", 0.05),
];

/// Minimum number of skills for the skills field to count as filled.
const MIN_SKILLS: usize = 3;

fn is_filled(profile: &CandidateRow, field: &str) -> bool {
    let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    match field {
        "full_name" => !profile.full_name.trim().is_empty(),
        "headline" => text(&profile.headline),
        "bio" => text(&profile.bio),
        "location" => text(&profile.location),
        "seniority" => text(&profile.seniority),
        "skills" => profile.skills.len() >= MIN_SKILLS,
        "linkedin_url" => text(&profile.linkedin_url),
        "github_url" => text(&profile.github_url),
        "portfolio_url" => text(&profile.portfolio_url),
        "resume_url" => text(&profile.resume_url),
        "avatar_url" => text(&profile.avatar_url),
        _ => false,
    }
}

fn recommendation_for(field: &str) -> String {
    match field {
        "skills" => format!("Adicione pelo menos {MIN_SKILLS} habilidades"),
        "resume_url" => "Envie seu currículo em PDF".to_string(),
        "bio" => "Escreva uma breve apresentação sobre você".to_string(),
        "headline" => "Defina um título profissional, ex.: Analista de Dados".to_string(),
        other => format!("Preencha o campo {other}"),
    }
}

pub fn compute_completeness_report(profile: &CandidateRow) -> CompletenessReport {
    let mut fields = Vec::with_capacity(FIELD_WEIGHTS.len());
    let mut missing_fields = Vec::new();
    let mut filled_weight = 0.0;

    for (field, weight) in FIELD_WEIGHTS {
        let filled = is_filled(profile, field);
        if filled {
            filled_weight += weight;
        } else {
            missing_fields.push(field.to_string());
        }
        fields.push(FieldHealth {
            field: field.to_string(),
            weight: *weight,
            filled,
        });
    }

    let total_weight: f64 = FIELD_WEIGHTS.iter().map(|(_, w)| w).sum();
    let ratio = if total_weight > 0.0 {
        (filled_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let score = (ratio * 100.0).round() as u32;

    let status = match score {
        s if s >= 80 => ProfileStatus::Strong,
        s if s >= 50 => ProfileStatus::Moderate,
        _ => ProfileStatus::Weak,
    };

    let recommendations = missing_fields.iter().map(|f| recommendation_for(f)).collect();

    CompletenessReport {
        score,
        status,
        fields,
        missing_fields,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::candidate_row;

    #[test]
    fn test_name_only_profile_is_weak() {
        let profile = candidate_row(uuid::Uuid::new_v4());
        let report = compute_completeness_report(&profile);
        assert_eq!(report.score, 15);
        assert_eq!(report.status, ProfileStatus::Weak);
        assert_eq!(report.missing_fields.len(), FIELD_WEIGHTS.len() - 1);
        assert_eq!(report.recommendations.len(), report.missing_fields.len());
    }

    #[test]
    fn test_full_profile_scores_hundred() {
        let mut p = candidate_row(uuid::Uuid::new_v4());
        p.headline = Some("Engenheira de Dados".into());
        p.bio = Some("Pipelines em Spark".into());
        p.location = Some("São Paulo".into());
        p.seniority = Some("senior".into());
        p.skills = vec!["SQL".into(), "Python".into(), "dbt".into()];
        p.linkedin_url = Some("https://linkedin.com/in/ana".into());
        p.github_url = Some("https://github.com/ana".into());
        p.portfolio_url = Some("https://ana.dev".into());
        p.resume_url = Some("https://cdn.example.com/resumes/a.pdf".into());
        p.avatar_url = Some("https://cdn.example.com/avatars/a.png".into());

        let report = compute_completeness_report(&p);
        assert_eq!(report.score, 100);
        assert_eq!(report.status, ProfileStatus::Strong);
        assert!(report.missing_fields.is_empty());
    }

    #[test]
    fn test_too_few_skills_do_not_count() {
        let mut p = candidate_row(uuid::Uuid::new_v4());
        p.skills = vec!["SQL".into(), "Python".into()];
        let report = compute_completeness_report(&p);
        assert!(report.missing_fields.contains(&"skills".to_string()));
    }
}
