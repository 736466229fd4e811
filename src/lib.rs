// src/lib.rs

use std::convert::Infallible;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware as axum_middleware,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tower::{Layer, Service};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::crud,
    middleware::{auth::auth_guard, method_override::method_override},
    models::{Banner, Contact, Customer, ProvinceCategory, Testimonial, TourPackage},
};

/// Todas as rotas, já com o estado aplicado.
pub fn build_router(app_state: AppState) -> Router {
    // Painel: tudo exige bearer válido
    let admin_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/upload",
            post(handlers::media::upload)
                .layer(DefaultBodyLimit::max(handlers::media::UPLOAD_BODY_LIMIT)),
        )
        .nest("/regions", handlers::regions::routes())
        .nest("/destinations", handlers::destinations::routes())
        .nest("/tours", handlers::tours::routes())
        .nest("/tour-packages", crud::routes::<TourPackage>())
        .nest("/bookings", handlers::bookings::routes())
        .nest("/customers", crud::routes::<Customer>())
        .nest("/contacts", crud::routes::<Contact>())
        .nest("/banners", crud::routes::<Banner>())
        .nest("/testimonials", crud::routes::<Testimonial>())
        .nest("/province-categories", crud::routes::<ProvinceCategory>())
        .nest("/users", handlers::users::routes())
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let public_routes = handlers::public::routes().route("/contact", post(handlers::contact::submit));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// O serviço completo: `method_override` por fora do roteamento.
pub fn app(
    app_state: AppState,
) -> impl Service<Request, Response = Response, Error = Infallible, Future: Send> + Clone + Send + 'static {
    axum_middleware::from_fn(method_override).layer(build_router(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        config::Config,
        models::auth::{AccountStatus, User, UserRole},
        services::auth::create_token,
    };

    const SECRET: &str = "test-secret";

    // Pool preguiçosa: nenhum teste aqui chega a abrir conexão.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/travel_test".into(),
            jwt_secret: SECRET.into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            token_ttl_hours: 1,
            mail_api_url: None,
            mail_api_key: None,
            mail_from: "no-reply@example.com".into(),
            admin_notify_email: "ops@example.com".into(),
            media_upload_url: None,
            media_upload_preset: None,
            media_api_key: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState::build(pool, config)
    }

    fn bearer() -> String {
        let user = User {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            name: None,
            password_hash: String::new(),
            role: UserRole::Admin,
            status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = create_token(&user, SECRET, chrono::Duration::hours(1)).unwrap();
        format!("Bearer {token}")
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_check() {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_routes_require_a_token() {
        let request = Request::get("/api/admin/regions").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let request = Request::delete(format!("/api/admin/regions/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_lists_every_missing_field() {
        let request = Request::post("/api/admin/regions")
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body["details"].as_object().unwrap();
        for field in ["key", "nameVi", "nameEn"] {
            assert!(details.contains_key(field), "missing {field}");
        }
    }

    #[tokio::test]
    async fn plain_post_on_item_is_not_allowed() {
        let request = Request::post(format!("/api/admin/regions/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("nameEn="))
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn form_method_field_reaches_the_update_route() {
        // nameEn vazio falha na validação antes de qualquer consulta
        let request = Request::post(format!("/api/admin/regions/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("_method=PUT&nameEn="))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["nameEn"].is_array());
    }

    #[tokio::test]
    async fn override_header_reaches_the_patch_route() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/admin/regions/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-http-method-override", "PATCH")
            .body(Body::from(r#"{"nameVi":"  "}"#))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["nameVi"].is_array());
    }

    #[tokio::test]
    async fn unsupported_override_verb_is_rejected() {
        let request = Request::post("/api/admin/regions")
            .header(header::AUTHORIZATION, bearer())
            .header("x-http-method-override", "TRACE")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contact_submission_validates_before_saving() {
        let request = Request::post("/api/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=hello"))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["fullName"].is_array());
        assert!(body["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn upload_without_media_host_is_bad_gateway() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG-BYTES\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/admin/upload")
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let request = Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/admin/tours/{id}/gallery/reorder"].is_object());
    }
}
