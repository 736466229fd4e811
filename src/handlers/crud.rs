// src/handlers/crud.rs

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        form::Payload,
        pagination::{ListQuery, Page},
    },
    config::AppState,
    db::crud_repo::Resource,
    services::crud_service::{CrudService, Writable},
};

/// Resposta de create/update: `{ ok: true, id, item }`.
#[derive(Debug, Serialize)]
pub struct Saved<T> {
    pub ok: bool,
    pub id: Uuid,
    pub item: T,
}

impl<T: Resource> Saved<T> {
    pub fn new(item: T) -> Self {
        Self {
            ok: true,
            id: item.id(),
            item,
        }
    }
}

/// Resposta de delete: `{ ok: true, id }`.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
    pub id: Uuid,
}

impl Deleted {
    pub fn new(id: Uuid) -> Self {
        Self { ok: true, id }
    }
}

fn service<R: Resource>(state: &AppState) -> CrudService<R> {
    CrudService::new(state.db_pool.clone())
}

// GET /
pub async fn list<R: Resource>(
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<R>>, AppError> {
    let query = ListQuery::from_params(params);
    Ok(Json(service::<R>(&app_state).list(&query).await?))
}

// GET /{id}
pub async fn get_one<R: Resource>(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<R>, AppError> {
    Ok(Json(service::<R>(&app_state).get(id).await?))
}

// POST /
pub async fn create<R: Writable>(
    State(app_state): State<AppState>,
    Payload(payload): Payload<R::Payload>,
) -> Result<(StatusCode, Json<Saved<R>>), AppError> {
    let item = service::<R>(&app_state).create(payload).await?;
    Ok((StatusCode::CREATED, Json(Saved::new(item))))
}

// PUT|PATCH /{id} (ou POST com _method)
pub async fn update<R: Writable>(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<R::Payload>,
) -> Result<Json<Saved<R>>, AppError> {
    let item = service::<R>(&app_state).update(id, payload).await?;
    Ok(Json(Saved::new(item)))
}

// DELETE /{id}
pub async fn delete<R: Resource>(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, AppError> {
    service::<R>(&app_state).delete(id).await?;
    Ok(Json(Deleted::new(id)))
}

/// As cinco operações padrão para um recurso.
pub fn routes<R: Writable>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(get_one::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(delete::<R>),
        )
}
