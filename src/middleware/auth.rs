// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Claims};

/// Protege as rotas `/api/admin/*`: sem bearer válido, 401 antes de qualquer handler.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Authorization(bearer) = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let claims = app_state.auth_service.decode_token(bearer.token())?;

    // Insere as claims nos "extensions" da requisição
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}
