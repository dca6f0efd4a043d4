use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Page slot a banner is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPlacement {
    Home,
    JobsList,
    JobDetail,
    Community,
}

impl BannerPlacement {
    pub const ALL: [BannerPlacement; 4] = [
        BannerPlacement::Home,
        BannerPlacement::JobsList,
        BannerPlacement::JobDetail,
        BannerPlacement::Community,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerPlacement::Home => "home",
            BannerPlacement::JobsList => "jobs_list",
            BannerPlacement::JobDetail => "job_detail",
            BannerPlacement::Community => "community",
        }
    }
}

impl FromStr for BannerPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Posição de banner desconhecida: '{s}'"))
    }
}

/// Who a banner is meant for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerAudience {
    #[default]
    All,
    Guests,
    Candidates,
    Companies,
}

impl BannerAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerAudience::All => "all",
            BannerAudience::Guests => "guests",
            BannerAudience::Candidates => "candidates",
            BannerAudience::Companies => "companies",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BannerRow {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
    pub audience: String,
    pub priority: i32,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Admin create/edit payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BannerForm {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: BannerPlacement,
    #[serde(default)]
    pub audience: BannerAudience,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl BannerForm {
    pub fn normalized(mut self) -> Result<Self, String> {
        self.title = self.title.trim().to_string();
        self.image_url = self.image_url.trim().to_string();
        self.link_url = self
            .link_url
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        if self.title.is_empty() {
            return Err("O título do banner é obrigatório".to_string());
        }
        if self.image_url.is_empty() {
            return Err("A imagem do banner é obrigatória".to_string());
        }
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if end <= start {
                return Err("O fim da exibição deve ser posterior ao início".to_string());
            }
        }
        Ok(self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Site settings
// ────────────────────────────────────────────────────────────────────────────

/// Keys of the admin-editable site settings. Static pages are stored as settings too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Contact,
    Seo,
    AboutPage,
    TermsPage,
    PrivacyPage,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Contact,
        SettingKey::Seo,
        SettingKey::AboutPage,
        SettingKey::TermsPage,
        SettingKey::PrivacyPage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Contact => "contact",
            SettingKey::Seo => "seo",
            SettingKey::AboutPage => "about_page",
            SettingKey::TermsPage => "terms_page",
            SettingKey::PrivacyPage => "privacy_page",
        }
    }

    /// Checks `value` against the key's shape and returns it normalized.
    pub fn validate(&self, value: Value) -> Result<Value, String> {
        let invalid = |e: serde_json::Error| format!("Valor inválido para '{}': {e}", self.as_str());
        let normalized = match self {
            SettingKey::Contact => {
                let contact: ContactSettings = serde_json::from_value(value).map_err(invalid)?;
                contact.check()?;
                serde_json::to_value(contact)
            }
            SettingKey::Seo => {
                let seo: SeoSettings = serde_json::from_value(value).map_err(invalid)?;
                serde_json::to_value(seo)
            }
            SettingKey::AboutPage | SettingKey::TermsPage | SettingKey::PrivacyPage => {
                let page: PageContent = serde_json::from_value(value).map_err(invalid)?;
                page.check()?;
                serde_json::to_value(page)
            }
        };
        normalized.map_err(invalid)
    }
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Configuração desconhecida: '{s}'"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSettings {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
}

impl ContactSettings {
    fn check(&self) -> Result<(), String> {
        match self.email.as_deref() {
            Some(email) if !email.contains('@') => Err(format!("E-mail de contato inválido: '{email}'")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeoSettings {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Raw snippets injected into `<head>` (analytics, pixels).
    #[serde(default)]
    pub head_scripts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContent {
    pub title: String,
    /// Markdown.
    pub body: String,
}

impl PageContent {
    fn check(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("O título da página é obrigatório".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}
