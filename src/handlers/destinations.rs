// src/handlers/destinations.rs

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
    models::destination::{Destination, DestinationPayload},
};

// POST /api/admin/destinations
#[utoipa::path(
    post,
    path = "/api/admin/destinations",
    tag = "Destinations",
    request_body = DestinationPayload,
    responses(
        (status = 201, description = "Destino criado", body = Destination),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Slug já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    Payload(payload): Payload<DestinationPayload>,
) -> Result<(StatusCode, Json<Saved<Destination>>), AppError> {
    let destination = app_state.destination_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Saved::new(destination))))
}

// PUT|PATCH /api/admin/destinations/{id}
#[utoipa::path(
    put,
    path = "/api/admin/destinations/{id}",
    tag = "Destinations",
    params(("id" = Uuid, Path, description = "ID do destino")),
    request_body = DestinationPayload,
    responses(
        (status = 200, description = "Destino atualizado", body = Destination),
        (status = 404, description = "Destination/Region not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<DestinationPayload>,
) -> Result<Json<Saved<Destination>>, AppError> {
    let destination = app_state.destination_service.update(id, payload).await?;
    Ok(Json(Saved::new(destination)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<Destination>).post(create))
        .route(
            "/{id}",
            get(crud::get_one::<Destination>)
                .put(update)
                .patch(update)
                .delete(crud::delete::<Destination>),
        )
}
