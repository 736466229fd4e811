// src/services/media.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::{error::AppError, validation::FieldChecks};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Tipo na lista permitida e no máximo 10 MB.
pub fn validate_upload(file: &UploadedFile) -> Result<(), AppError> {
    let mut checks = FieldChecks::new();
    let content_type = file.content_type.trim().to_ascii_lowercase();

    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        checks.invalid(
            "file",
            "mime_type",
            format!("file type `{}` is not allowed", file.content_type),
        );
    }
    if file.bytes.is_empty() {
        checks.invalid("file", "empty", "file is empty".into());
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        checks.invalid("file", "too_large", "file is larger than 10 MB".into());
    }
    checks.finish()
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Sobe o arquivo e devolve a URL pública.
    async fn upload(&self, file: UploadedFile) -> Result<String, AppError>;
}

pub struct HttpMediaHost {
    client: reqwest::Client,
    endpoint: String,
    preset: Option<String>,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl HttpMediaHost {
    pub fn new(endpoint: String, preset: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            preset,
            api_key,
        }
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, file: UploadedFile) -> Result<String, AppError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(preset) = &self.preset {
            form = form.text("upload_preset", preset.clone());
        }

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        body.secure_url
            .or(body.url)
            .ok_or_else(|| AppError::Upstream("media host returned no url".into()))
    }
}

/// Usado quando `MEDIA_UPLOAD_URL` não está definido.
pub struct DisabledMediaHost;

#[async_trait]
impl MediaHost for DisabledMediaHost {
    async fn upload(&self, _file: UploadedFile) -> Result<String, AppError> {
        Err(AppError::Upstream("media host is not configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: "photo".into(),
            content_type: content_type.into(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn accepts_allowed_images() {
        for mime in ALLOWED_IMAGE_TYPES {
            assert!(validate_upload(&file(mime, 10)).is_ok(), "{mime}");
        }
        assert!(validate_upload(&file("IMAGE/PNG", 10)).is_ok());
    }

    #[test]
    fn rejects_other_types() {
        assert!(validate_upload(&file("application/pdf", 10)).is_err());
        assert!(validate_upload(&file("video/mp4", 10)).is_err());
    }

    #[test]
    fn size_limit_is_ten_megabytes() {
        assert!(validate_upload(&file("image/png", MAX_UPLOAD_BYTES)).is_ok());
        assert!(validate_upload(&file("image/png", MAX_UPLOAD_BYTES + 1)).is_err());
    }

    #[tokio::test]
    async fn disabled_host_is_an_upstream_failure() {
        let err = DisabledMediaHost.upload(file("image/png", 1)).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }
}
