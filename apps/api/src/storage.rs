//! Object storage: uploads keyed by a random name, served from a public base URL.

use std::str::FromStr;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::Session;
use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Resumes,
    Avatars,
    CompanyLogos,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Resumes => "resumes",
            Bucket::Avatars => "avatars",
            Bucket::CompanyLogos => "company-logos",
        }
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resumes" => Ok(Bucket::Resumes),
            "avatars" => Ok(Bucket::Avatars),
            "company-logos" => Ok(Bucket::CompanyLogos),
            other => Err(AppError::NotFound(format!("Bucket '{other}' does not exist"))),
        }
    }
}

/// Random object name that keeps the original extension, lowercased.
pub fn object_key(original_filename: &str) -> String {
    let id = Uuid::new_v4();
    match std::path::Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}

/// Public URL derived from base, bucket and key alone.
pub fn public_url(base: &str, bucket: Bucket, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket.as_str(), key)
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub bucket: Bucket,
    pub key: String,
    pub public_url: String,
}

/// POST /api/v1/storage/:bucket  (multipart field `file`)
pub async fn handle_upload(
    State(state): State<AppState>,
    session: Session,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let bucket: Bucket = bucket.parse()?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation("Arquivo vazio".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "O arquivo excede {} MB",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let key = object_key(&filename);
        state
            .s3
            .put_object()
            .bucket(bucket.as_str())
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Upload failed: {e}")))?;

        info!(
            "User {} uploaded s3://{}/{}",
            session.user_id,
            bucket.as_str(),
            key
        );

        let public_url = public_url(&state.config.s3_public_url, bucket, &key);
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                bucket,
                key,
                public_url,
            }),
        ));
    }

    Err(AppError::Validation("Campo 'file' ausente".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_lowercased_extension() {
        let key = object_key("Currículo Final.PDF");
        assert!(key.ends_with(".pdf"), "{key}");
        let stem = key.trim_end_matches(".pdf");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn test_object_key_without_extension_is_bare_uuid() {
        assert!(Uuid::parse_str(&object_key("avatar")).is_ok());
        assert!(Uuid::parse_str(&object_key("")).is_ok());
    }

    #[test]
    fn test_object_keys_are_unique() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }

    #[test]
    fn test_public_url_is_deterministic() {
        let url = public_url("https://cdn.datahire.club/", Bucket::Avatars, "abc.png");
        assert_eq!(url, "https://cdn.datahire.club/avatars/abc.png");
        assert_eq!(
            url,
            public_url("https://cdn.datahire.club", Bucket::Avatars, "abc.png")
        );
    }

    #[test]
    fn test_bucket_parsing() {
        assert_eq!("company-logos".parse::<Bucket>().unwrap(), Bucket::CompanyLogos);
        assert!("secrets".parse::<Bucket>().is_err());
    }
}
