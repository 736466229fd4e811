// src/handlers/bookings.rs

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
    handlers::crud::{self, Deleted, Saved},
    models::booking::{Booking, BookingPayload},
};

// POST /api/admin/bookings
#[utoipa::path(
    post,
    path = "/api/admin/bookings",
    tag = "Bookings",
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Reserva criada", body = Booking),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 404, description = "Tour not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    Payload(payload): Payload<BookingPayload>,
) -> Result<(StatusCode, Json<Saved<Booking>>), AppError> {
    let booking = app_state.booking_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(Saved::new(booking))))
}

// PUT|PATCH /api/admin/bookings/{id}
#[utoipa::path(
    put,
    path = "/api/admin/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    request_body = BookingPayload,
    responses(
        (status = 200, description = "Reserva atualizada", body = Booking),
        (status = 404, description = "Booking/Tour not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<BookingPayload>,
) -> Result<Json<Saved<Booking>>, AppError> {
    let booking = app_state.booking_service.update(id, payload).await?;
    Ok(Json(Saved::new(booking)))
}

// DELETE /api/admin/bookings/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva removida"),
        (status = 404, description = "Booking not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, AppError> {
    app_state.booking_service.delete(id).await?;
    Ok(Json(Deleted::new(id)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<Booking>).post(create))
        .route(
            "/{id}",
            get(crud::get_one::<Booking>)
                .put(update)
                .patch(update)
                .delete(delete),
        )
}
