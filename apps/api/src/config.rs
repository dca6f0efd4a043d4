use anyhow::{Context, Result};
use uuid::Uuid;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_endpoint: String,
    /// Base URL objects are publicly served from, e.g. `https://cdn.datahire.club`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// HS256 secret shared with the auth provider that issues session tokens.
    pub jwt_secret: String,
    /// Users allowed to manage banners and site settings (`ADMIN_USER_IDS`, comma-separated).
    pub admin_user_ids: Vec<Uuid>,
    pub job_cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_public_url: require_env("S3_PUBLIC_URL")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            admin_user_ids: parse_admin_ids(&std::env::var("ADMIN_USER_IDS").unwrap_or_default())?,
            job_cache_ttl_secs: std::env::var("JOB_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("JOB_CACHE_TTL_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_admin_ids(raw: &str) -> Result<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| Uuid::parse_str(id).with_context(|| format!("ADMIN_USER_IDS: '{id}' is not a UUID")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_ids_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(parse_admin_ids("").unwrap(), Vec::<Uuid>::new());
        assert_eq!(parse_admin_ids(&format!(" {id} ,")).unwrap(), vec![id]);
        assert!(parse_admin_ids("not-a-uuid").is_err());
    }
}
