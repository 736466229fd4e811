// src/handlers/tours.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::{error::AppError, form::Payload},
    config::AppState,
    handlers::crud,
    models::tour::{ReorderGalleryPayload, ReplaceGalleryPayload, Tour, TourDetail, TourImage, TourPayload},
};

/// `{ ok, id, item }` com a galeria junto do tour.
#[derive(Debug, Serialize)]
pub struct SavedTour {
    pub ok: bool,
    pub id: Uuid,
    pub item: TourDetail,
}

impl From<TourDetail> for SavedTour {
    fn from(item: TourDetail) -> Self {
        Self {
            ok: true,
            id: item.tour.id,
            item,
        }
    }
}

// GET /api/admin/tours/{id}
#[utoipa::path(
    get,
    path = "/api/admin/tours/{id}",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses(
        (status = 200, description = "Tour com galeria", body = TourDetail),
        (status = 404, description = "Tour not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_one(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TourDetail>, AppError> {
    Ok(Json(app_state.tour_service.get_detail(id).await?))
}

// POST /api/admin/tours
#[utoipa::path(
    post,
    path = "/api/admin/tours",
    tag = "Tours",
    request_body = TourPayload,
    responses(
        (status = 201, description = "Tour criado", body = TourDetail),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 404, description = "Destination not found"),
        (status = 409, description = "Slug já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    Payload(payload): Payload<TourPayload>,
) -> Result<(StatusCode, Json<SavedTour>), AppError> {
    let detail = app_state.tour_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// PUT|PATCH /api/admin/tours/{id}
#[utoipa::path(
    put,
    path = "/api/admin/tours/{id}",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    request_body = TourPayload,
    responses(
        (status = 200, description = "Tour atualizado", body = TourDetail),
        (status = 404, description = "Tour not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<TourPayload>,
) -> Result<Json<SavedTour>, AppError> {
    let detail = app_state.tour_service.update(id, payload).await?;
    Ok(Json(detail.into()))
}

// GET /api/admin/tours/{id}/gallery
#[utoipa::path(
    get,
    path = "/api/admin/tours/{id}/gallery",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    responses((status = 200, description = "Galeria ordenada", body = [TourImage])),
    security(("api_jwt" = []))
)]
pub async fn gallery(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TourImage>>, AppError> {
    Ok(Json(app_state.tour_service.gallery(id).await?))
}

// PUT /api/admin/tours/{id}/gallery
#[utoipa::path(
    put,
    path = "/api/admin/tours/{id}/gallery",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    request_body = ReplaceGalleryPayload,
    responses((status = 200, description = "Galeria substituída", body = [TourImage])),
    security(("api_jwt" = []))
)]
pub async fn replace_gallery(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<ReplaceGalleryPayload>,
) -> Result<Json<Vec<TourImage>>, AppError> {
    let images = payload.gallery.unwrap_or_default();
    Ok(Json(app_state.tour_service.replace_gallery(id, images).await?))
}

// POST /api/admin/tours/{id}/gallery/reorder
#[utoipa::path(
    post,
    path = "/api/admin/tours/{id}/gallery/reorder",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do tour")),
    request_body = ReorderGalleryPayload,
    responses(
        (status = 200, description = "Galeria na nova ordem", body = [TourImage]),
        (status = 400, description = "Ids não pertencem ao tour")
    ),
    security(("api_jwt" = []))
)]
pub async fn reorder_gallery(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<ReorderGalleryPayload>,
) -> Result<Json<Vec<TourImage>>, AppError> {
    Ok(Json(app_state.tour_service.reorder(id, payload.ids).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<Tour>).post(create))
        .route(
            "/{id}",
            get(get_one).put(update).patch(update).delete(crud::delete::<Tour>),
        )
        .route("/{id}/gallery", get(gallery).put(replace_gallery))
        .route("/{id}/gallery/reorder", post(reorder_gallery))
}
