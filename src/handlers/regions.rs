// src/handlers/regions.rs

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::crud::{self, Deleted},
    models::region::Region,
};

// GET /api/admin/regions/by-key/{key}
#[utoipa::path(
    get,
    path = "/api/admin/regions/by-key/{key}",
    tag = "Regions",
    params(("key" = String, Path, description = "Chave da região (ex.: north)")),
    responses(
        (status = 200, description = "Região encontrada", body = Region),
        (status = 404, description = "Region not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_by_key(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Region>, AppError> {
    Ok(Json(app_state.region_service.get_by_key(&key).await?))
}

// DELETE /api/admin/regions/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/regions/{id}",
    tag = "Regions",
    params(("id" = Uuid, Path, description = "ID da região")),
    responses(
        (status = 200, description = "Região removida"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Ainda existem destinos ligados à região")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, AppError> {
    app_state.region_service.delete(id).await?;
    Ok(Json(Deleted::new(id)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<Region>).post(crud::create::<Region>))
        .route("/by-key/{key}", get(get_by_key))
        .route(
            "/{id}",
            get(crud::get_one::<Region>)
                .put(crud::update::<Region>)
                .patch(crud::update::<Region>)
                .delete(delete),
        )
}
