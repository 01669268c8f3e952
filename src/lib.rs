pub mod api;
pub mod config;
pub mod entities;
pub mod i18n;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::SiteConfig;
use crate::services::storage::ObjectStore;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::content::list_categories,
        api::handlers::content::list_menu_images,
        api::handlers::content::list_gallery_images,
        api::handlers::content::list_promo_items,
        api::handlers::categories::create_category,
        api::handlers::categories::delete_category,
        api::handlers::menu_images::upload_menu_image,
        api::handlers::menu_images::sign_menu_upload,
        api::handlers::menu_images::complete_menu_image,
        api::handlers::menu_images::delete_menu_image,
        api::handlers::menu_images::sync_menu_images,
        api::handlers::gallery::upload_gallery_image,
        api::handlers::gallery::delete_gallery_image,
        api::handlers::promo::upload_promo_item,
        api::handlers::promo::sign_promo_upload,
        api::handlers::promo::complete_promo_item,
        api::handlers::promo::delete_promo_item,
        api::handlers::mirror::run_mirror,
        api::handlers::images::serve_image,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::auth::LoginRequest,
            api::handlers::auth::MessageResponse,
            api::handlers::content::CategoryItem,
            api::handlers::content::CategoryListResponse,
            api::handlers::content::MenuImageItem,
            api::handlers::content::MenuImageListResponse,
            api::handlers::content::GalleryImageItem,
            api::handlers::content::GalleryListResponse,
            api::handlers::content::PromoItemView,
            api::handlers::content::PromoListResponse,
            api::handlers::categories::CreateCategoryRequest,
            api::handlers::categories::CategoryResponse,
            api::handlers::categories::DeleteCategoryRequest,
            api::handlers::categories::OkResponse,
            api::handlers::menu_images::MenuImageResponse,
            api::handlers::menu_images::SignUploadRequest,
            api::handlers::menu_images::SignUploadResponse,
            api::handlers::menu_images::CompleteMenuImageRequest,
            api::handlers::menu_images::DeleteImageRequest,
            api::handlers::menu_images::DeleteImageResponse,
            api::handlers::menu_images::SyncRequest,
            api::handlers::menu_images::SyncResponse,
            api::handlers::gallery::GalleryImageResponse,
            api::handlers::promo::PromoItemResponse,
            api::handlers::promo::CompletePromoItemRequest,
            api::handlers::mirror::MirrorRequest,
            api::handlers::health::HealthResponse,
            entities::categories::Model,
            entities::menu_images::Model,
            entities::gallery_images::Model,
            entities::promo_items::Model,
            services::mirror::MirrorReport,
        )
    ),
    tags(
        (name = "auth", description = "Admin session endpoints"),
        (name = "content", description = "Public content reads"),
        (name = "categories", description = "Category administration"),
        (name = "menu-images", description = "Menu image administration and sync"),
        (name = "gallery", description = "Gallery administration"),
        (name = "promo", description = "Promoted item administration"),
        (name = "mirror", description = "Static asset mirroring"),
        (name = "images", description = "Local-first image delivery"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn ObjectStore>,
    /// Client for the image delivery route's proxy fallback
    pub http: reqwest::Client,
    pub config: SiteConfig,
}

pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/categories",
            post(api::handlers::categories::create_category)
                .delete(api::handlers::categories::delete_category),
        )
        .route(
            "/menu-images",
            post(api::handlers::menu_images::upload_menu_image)
                .delete(api::handlers::menu_images::delete_menu_image),
        )
        .route(
            "/menu-images/sign",
            post(api::handlers::menu_images::sign_menu_upload),
        )
        .route(
            "/menu-images/complete",
            post(api::handlers::menu_images::complete_menu_image),
        )
        .route(
            "/menu-images/sync",
            post(api::handlers::menu_images::sync_menu_images),
        )
        .route(
            "/gallery-images",
            post(api::handlers::gallery::upload_gallery_image)
                .delete(api::handlers::gallery::delete_gallery_image),
        )
        .route(
            "/promo-items",
            post(api::handlers::promo::upload_promo_item)
                .delete(api::handlers::promo::delete_promo_item),
        )
        .route(
            "/promo-items/sign",
            post(api::handlers::promo::sign_promo_upload),
        )
        .route(
            "/promo-items/complete",
            post(api::handlers::promo::complete_promo_item),
        )
        .route("/mirror", post(api::handlers::mirror::run_mirror))
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::require_admin,
        ));

    let static_pages = ServeDir::new(&state.config.static_root)
        .not_found_service(ServeFile::new(state.config.static_root.join("index.html")));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/api/login", post(api::handlers::auth::login))
        .route("/api/logout", post(api::handlers::auth::logout))
        .route(
            "/api/categories",
            get(api::handlers::content::list_categories),
        )
        .route(
            "/api/menu-images",
            get(api::handlers::content::list_menu_images),
        )
        .route(
            "/api/gallery-images",
            get(api::handlers::content::list_gallery_images),
        )
        .route(
            "/api/promo-items",
            get(api::handlers::content::list_promo_items),
        )
        .nest("/api/admin", admin)
        .route("/images/:bucket/*key", get(api::handlers::images::serve_image))
        .fallback_service(static_pages)
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::edge::edge_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(25 * 1024 * 1024))
        .with_state(state)
}
