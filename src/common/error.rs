// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro único. Cada variante corresponde a um "kind" que o
// frontend sabe interpretar.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("One or more fields are invalid")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Value already in use: {}", fields.join(", "))]
    Conflict { fields: Vec<String> },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{entity} still has {count} {dependency}")]
    Dependency {
        entity: &'static str,
        dependency: &'static str,
        count: i64,
    },

    #[error("Record is still referenced by other records")]
    ReferencedRecord(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("Upstream service failed: {0}")]
    Upstream(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Código estável que o cliente usa para decidir o que mostrar.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::Conflict { .. } => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Dependency { .. } | AppError::ReferencedRecord(_) => "dependency",
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::JwtError(_) => {
                "unauthorized"
            }
            AppError::BadRequest(_) => "bad_request",
            AppError::Upstream(_) => "upstream",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. }
            | AppError::Dependency { .. }
            | AppError::ReferencedRecord(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        AppError::Conflict {
            fields: vec![field.into()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let body = match &self {
            // Devolve todos os campos inválidos, não só o primeiro.
            AppError::ValidationError(errors) => {
                let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({ "ok": false, "kind": kind, "error": self.to_string(), "details": details })
            }
            AppError::Conflict { fields } => {
                json!({ "ok": false, "kind": kind, "error": self.to_string(), "fields": fields })
            }
            AppError::Dependency {
                dependency, count, ..
            } => json!({
                "ok": false,
                "kind": kind,
                "error": self.to_string(),
                "dependency": dependency,
                "count": count,
            }),
            AppError::Upstream(detail) => {
                tracing::warn!("Falha em serviço externo: {}", detail);
                json!({ "ok": false, "kind": kind, "error": self.to_string() })
            }
            // Erros internos: detalhe só no log, mensagem genérica para o cliente.
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                json!({ "ok": false, "kind": kind, "error": "An unexpected error occurred." })
            }
            _ => json!({ "ok": false, "kind": kind, "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn dependency_error_names_type_and_count() {
        let (status, body) = body_of(AppError::Dependency {
            entity: "Region",
            dependency: "destination(s)",
            count: 3,
        })
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "dependency");
        assert_eq!(body["count"], 3);
        assert_eq!(body["error"], "Region still has 3 destination(s)");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let (status, body) =
            body_of(AppError::InternalServerError(anyhow::anyhow!("pool exhausted at 10.0.0.3"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "internal");
        assert!(!body["error"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn conflict_lists_fields() {
        let (status, body) = body_of(AppError::conflict("key")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["fields"], serde_json::json!(["key"]));
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn not_found_message_names_entity() {
        let (status, body) = body_of(AppError::NotFound("Region")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Region not found");
    }
}
