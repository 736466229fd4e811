// src/handlers/public.rs
// Leitura pública do site: sem token, só o que pode ir para a vitrine.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, Page},
    },
    config::AppState,
    db::crud_repo::Resource,
    models::{
        tour::{TourDetail, TourStatus},
        Banner, Destination, Region, Testimonial, Tour, TourPackage,
    },
    services::crud_service::CrudService,
};

async fn page_of<R: Resource>(app_state: &AppState, query: ListQuery) -> Result<Json<Page<R>>, AppError> {
    let service = CrudService::<R>::new(app_state.db_pool.clone());
    Ok(Json(service.list(&query).await?))
}

// GET /api/regions
#[utoipa::path(
    get,
    path = "/api/regions",
    tag = "Public",
    responses((status = 200, description = "Regiões em ordem"))
)]
pub async fn list_regions(
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Region>>, AppError> {
    page_of(&app_state, ListQuery::from_params(params)).await
}

// GET /api/regions/{key}
#[utoipa::path(
    get,
    path = "/api/regions/{key}",
    tag = "Public",
    params(("key" = String, Path, description = "Chave da região")),
    responses(
        (status = 200, description = "Região", body = Region),
        (status = 404, description = "Region not found")
    )
)]
pub async fn region_by_key(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Region>, AppError> {
    Ok(Json(app_state.region_service.get_by_key(&key).await?))
}

// GET /api/destinations?region=north&featured=true
#[utoipa::path(
    get,
    path = "/api/destinations",
    tag = "Public",
    params(
        ("region" = Option<String>, Query, description = "Chave da região"),
        ("featured" = Option<bool>, Query, description = "Só destaques")
    ),
    responses(
        (status = 200, description = "Destinos"),
        (status = 404, description = "Region not found")
    )
)]
pub async fn list_destinations(
    State(app_state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Destination>>, AppError> {
    let region = params.remove("region").filter(|k| !k.trim().is_empty());
    let mut query = ListQuery::from_params(params);
    if let Some(key) = region {
        let region_id = app_state.destination_service.region_id_for_key(&key).await?;
        query = query.with_filter("regionId", region_id.to_string());
    }
    page_of(&app_state, query).await
}

// GET /api/destinations/{slug}
#[utoipa::path(
    get,
    path = "/api/destinations/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug do destino")),
    responses(
        (status = 200, description = "Destino", body = Destination),
        (status = 404, description = "Destination not found")
    )
)]
pub async fn destination_by_slug(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Destination>, AppError> {
    Ok(Json(app_state.destination_service.get_by_slug(&slug).await?))
}

// GET /api/tours?destination=sapa&featured=true&search=
#[utoipa::path(
    get,
    path = "/api/tours",
    tag = "Public",
    params(
        ("destination" = Option<String>, Query, description = "Slug do destino"),
        ("featured" = Option<bool>, Query, description = "Só destaques"),
        ("search" = Option<String>, Query, description = "Busca por título/local")
    ),
    responses((status = 200, description = "Tours ativos"))
)]
pub async fn list_tours(
    State(app_state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Tour>>, AppError> {
    let destination = params.remove("destination").filter(|s| !s.trim().is_empty());
    // Rascunhos e inativos nunca aparecem no site
    let mut query = ListQuery::from_params(params).with_filter("status", TourStatus::Active.as_str());
    if let Some(slug) = destination {
        let destination = app_state.destination_service.get_by_slug(&slug).await?;
        query = query.with_filter("destinationId", destination.id.to_string());
    }
    page_of(&app_state, query).await
}

// GET /api/tours/{slug}
#[utoipa::path(
    get,
    path = "/api/tours/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug do tour")),
    responses(
        (status = 200, description = "Tour ativo com galeria", body = TourDetail),
        (status = 404, description = "Tour not found")
    )
)]
pub async fn tour_by_slug(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TourDetail>, AppError> {
    Ok(Json(app_state.tour_service.get_public(&slug).await?))
}

// GET /api/tour-packages
#[utoipa::path(get, path = "/api/tour-packages", tag = "Public", responses((status = 200, description = "Pacotes")))]
pub async fn list_tour_packages(
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<TourPackage>>, AppError> {
    page_of(&app_state, ListQuery::from_params(params)).await
}

// GET /api/banners
#[utoipa::path(get, path = "/api/banners", tag = "Public", responses((status = 200, description = "Banners ativos")))]
pub async fn list_banners(
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Banner>>, AppError> {
    page_of(&app_state, ListQuery::from_params(params).with_filter("active", "true")).await
}

// GET /api/testimonials
#[utoipa::path(get, path = "/api/testimonials", tag = "Public", responses((status = 200, description = "Depoimentos ativos")))]
pub async fn list_testimonials(
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Testimonial>>, AppError> {
    page_of(&app_state, ListQuery::from_params(params).with_filter("active", "true")).await
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(list_regions))
        .route("/regions/{key}", get(region_by_key))
        .route("/destinations", get(list_destinations))
        .route("/destinations/{slug}", get(destination_by_slug))
        .route("/tours", get(list_tours))
        .route("/tours/{slug}", get(tour_by_slug))
        .route("/tour-packages", get(list_tour_packages))
        .route("/banners", get(list_banners))
        .route("/testimonials", get(list_testimonials))
}
