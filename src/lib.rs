//! Library lending backend
//!
//! Administration of a small lending library: catalog (categories, shelves,
//! books), reader profiles, checkouts and everything hanging off them,
//! served as a REST JSON API plus a few server-rendered staff pages.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Largest accepted request body (image uploads)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Accounts
        .route(
            "/accounts",
            get(api::accounts::list_accounts).post(api::accounts::create_account),
        )
        .route(
            "/accounts/:id",
            get(api::accounts::get_account).put(api::accounts::update_account),
        )
        // Catalog
        .route(
            "/categories",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route(
            "/categories/:id",
            get(api::categories::get_category).put(api::categories::update_category),
        )
        .route(
            "/shelves",
            get(api::shelves::list_shelves).post(api::shelves::create_shelf),
        )
        .route(
            "/shelves/:id",
            get(api::shelves::get_shelf).put(api::shelves::update_shelf),
        )
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book).put(api::books::update_book))
        .route("/books/:id/cover", post(api::books::upload_cover))
        // Readers
        .route(
            "/user_profiles",
            get(api::user_profiles::list_profiles).post(api::user_profiles::create_profile),
        )
        .route(
            "/user_profiles/:id",
            get(api::user_profiles::get_profile).put(api::user_profiles::update_profile),
        )
        .route("/user_profiles/:id/avatar", post(api::user_profiles::upload_avatar))
        // Circulation
        .route(
            "/checkouts",
            get(api::checkouts::list_checkouts).post(api::checkouts::create_checkout),
        )
        .route(
            "/checkouts/:id",
            get(api::checkouts::get_checkout).put(api::checkouts::update_checkout),
        )
        .route("/checkouts/:id/return", post(api::checkouts::return_checkout))
        .route("/rents", get(api::rents::list_rents).post(api::rents::create_rent))
        .route("/rents/:id", get(api::rents::get_rent).put(api::rents::update_rent))
        .route("/shifts", get(api::shifts::list_shifts).post(api::shifts::create_shift))
        .route("/shifts/:id", get(api::shifts::get_shift).put(api::shifts::update_shift))
        // Reviews
        .route(
            "/comments",
            get(api::comments::list_comments).post(api::comments::create_comment),
        )
        .route(
            "/comments/:id",
            get(api::comments::get_comment).put(api::comments::update_comment),
        )
        .route("/notes", get(api::notes::list_notes).post(api::notes::create_note))
        .route("/notes/:id", get(api::notes::get_note).put(api::notes::update_note))
        .route(
            "/feedbacks",
            get(api::feedbacks::list_feedbacks).post(api::feedbacks::create_feedback),
        )
        .route(
            "/feedbacks/:id",
            get(api::feedbacks::get_feedback).put(api::feedbacks::update_feedback),
        )
        .route("/feedbacks/:id/reply", post(api::feedbacks::reply_feedback))
        // Batch actions
        .route("/batch/:resource/:action", post(api::batch::apply_action))
        .with_state(state.clone());

    let pages = Router::new()
        .route("/", get(api::pages::index))
        .route(
            "/admin/login",
            get(api::pages::login_form).post(api::pages::login_submit),
        )
        .route("/admin/logout", get(api::pages::logout))
        .route(api::pages::RETURN_PATH, get(api::pages::return_book))
        .with_state(state.clone());

    let media_url = state.config.media.url.trim_end_matches('/').to_string();
    let media = ServeDir::new(&state.config.media.root);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(pages)
        .nest_service(&media_url, media)
        .merge(api::openapi::create_openapi_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// Router over a pool that never connects; only routes that stay
    /// away from the database can be exercised.
    fn app() -> Router {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = services::Services::new(repository::Repository::new(pool), &config);
        create_router(AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }

    async fn get(uri: &str, extra: Option<(&str, &str)>) -> axum::response::Response {
        let mut request = Request::builder().uri(uri);
        if let Some((name, value)) = extra {
            request = request.header(name, value);
        }
        app().oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/api/v1/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_index_redirects_to_login() {
        let response = get("/", None).await;
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn test_return_page_requires_login() {
        let response = get("/return", None).await;
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/admin/login?next=/return");
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = get("/admin/login?next=/return", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Library Administration"));
        assert!(html.contains(r#"value="/return""#));
    }

    #[tokio::test]
    async fn test_admin_api_rejects_anonymous_and_bad_tokens() {
        let response = get("/api/v1/books", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = get("/api/v1/books", Some(("authorization", "Basic abc"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = get("/api/v1/books", Some(("authorization", "Bearer not-a-jwt"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
