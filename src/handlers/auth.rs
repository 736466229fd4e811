// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, form::Payload},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, User},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Payload(payload): Payload<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/admin/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(app_state.auth_service.current_user(&claims).await?))
}
