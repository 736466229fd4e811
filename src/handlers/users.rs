// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, form::Payload},
    config::AppState,
    handlers::crud::{self, Saved},
    models::auth::{User, UserPayload},
};

// POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    Payload(payload): Payload<UserPayload>,
) -> Result<(StatusCode, Json<Saved<User>>), AppError> {
    let user = app_state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Saved::new(user))))
}

pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<UserPayload>,
) -> Result<Json<Saved<User>>, AppError> {
    let user = app_state.user_service.update(id, payload).await?;
    Ok(Json(Saved::new(user)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<User>).post(create))
        .route(
            "/{id}",
            get(crud::get_one::<User>)
                .put(update)
                .patch(update)
                .delete(crud::delete::<User>),
        )
}
