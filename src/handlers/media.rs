// src/handlers/media.rs

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::{
    common::error::AppError,
    config::AppState,
    services::media::{validate_upload, UploadedFile, MAX_UPLOAD_BYTES},
};

/// Limite do corpo: o arquivo mais a folga do envelope multipart.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub ok: bool,
    pub url: String,
}

// POST /api/admin/upload (campo multipart "file")
#[utoipa::path(
    post,
    path = "/api/admin/upload",
    tag = "Media",
    responses(
        (status = 200, description = "URL pública do arquivo"),
        (status = 400, description = "Tipo ou tamanho não permitido"),
        (status = 502, description = "Falha no serviço de mídia")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = file.ok_or_else(|| AppError::BadRequest("multipart field `file` is required".into()))?;
    validate_upload(&file)?;

    let url = app_state.media_host.upload(file).await?;
    tracing::info!("🖼️ Arquivo enviado: {}", url);
    Ok(Json(Uploaded { ok: true, url }))
}
