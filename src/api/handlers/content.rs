use axum::{
    Json,
    extract::{Query, State},
};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{categories, menu_images, prelude::*};
use crate::i18n::{DEFAULT_LOCALE, Locale};
use crate::models::MenuSection;
use crate::utils::icons::resolve_icon;
use crate::utils::image_url::resolve_image_origin;
use crate::utils::slug::anchor_slug;

#[derive(Deserialize, IntoParams)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryItem {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub href: String,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub items: Vec<CategoryItem>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(LocaleQuery),
    responses(
        (status = 200, description = "Categories ordered by localized name", body = CategoryListResponse),
        (status = 500, description = "Content store unavailable")
    ),
    tag = "content"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let locale = query
        .locale
        .as_deref()
        .and_then(Locale::parse)
        .unwrap_or(DEFAULT_LOCALE);

    let order_column = match locale {
        Locale::Ro => categories::Column::NameRo,
        Locale::Ru => categories::Column::NameRu,
        Locale::En => categories::Column::NameEn,
    };

    let rows = Categories::find()
        .order_by_with_nulls(order_column, Order::Asc, NullOrdering::Last)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Persistence(format!("Failed to load categories: {e}")))?;

    let items = rows
        .into_iter()
        .map(|c| {
            let name = c.localized_name(locale).to_string();
            let anchor = anchor_slug(&name);
            CategoryItem {
                id: c.id,
                name,
                icon: resolve_icon(c.icon.as_deref()).to_string(),
                href: format!("/{locale}/menu#{anchor}"),
            }
        })
        .collect();

    Ok(Json(CategoryListResponse { items }))
}

#[derive(Deserialize, IntoParams)]
pub struct MenuImagesQuery {
    /// Restrict to one physical menu
    pub menu: Option<String>,
    /// Restrict to one category
    pub category_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct MenuImageItem {
    pub id: i32,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub category_id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct MenuImageListResponse {
    pub items: Vec<MenuImageItem>,
}

#[utoipa::path(
    get,
    path = "/api/menu-images",
    params(MenuImagesQuery),
    responses(
        (status = 200, description = "Menu images; empty when the store is unavailable", body = MenuImageListResponse)
    ),
    tag = "content"
)]
pub async fn list_menu_images(
    State(state): State<AppState>,
    Query(query): Query<MenuImagesQuery>,
) -> Json<MenuImageListResponse> {
    let host = state.config.object_store_host();

    let rows = load_menu_images(&state, &query).await.unwrap_or_else(|e| {
        tracing::warn!("📭 Menu images unavailable, serving empty set: {e}");
        Vec::new()
    });

    let items = rows
        .into_iter()
        .map(|m| MenuImageItem {
            id: m.id,
            image_url: resolve_image_origin(host.as_deref(), &m.image_url),
            alt_text: m.alt_text,
            category_id: m.category_id,
        })
        .collect();

    Json(MenuImageListResponse { items })
}

async fn load_menu_images(
    state: &AppState,
    query: &MenuImagesQuery,
) -> Result<Vec<menu_images::Model>, AppError> {
    let mut finder = MenuImages::find();

    if let Some(category_id) = query.category_id {
        finder = finder.filter(menu_images::Column::CategoryId.eq(category_id));
    }

    if let Some(menu) = query.menu.as_deref() {
        let menu = MenuSection::parse(menu)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid menu '{menu}'")))?;
        let category_ids = Categories::find()
            .filter(categories::Column::Menu.eq(menu.as_str()))
            .select_only()
            .column(categories::Column::Id)
            .into_tuple::<i32>()
            .all(&state.db)
            .await?;
        finder = finder.filter(menu_images::Column::CategoryId.is_in(category_ids));
    }

    Ok(finder.all(&state.db).await?)
}

#[derive(Serialize, ToSchema)]
pub struct GalleryImageItem {
    pub id: i32,
    pub image_url: String,
    pub alt_text: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GalleryListResponse {
    pub items: Vec<GalleryImageItem>,
}

#[utoipa::path(
    get,
    path = "/api/gallery-images",
    responses(
        (status = 200, description = "Gallery images; empty when the store is unavailable", body = GalleryListResponse)
    ),
    tag = "content"
)]
pub async fn list_gallery_images(State(state): State<AppState>) -> Json<GalleryListResponse> {
    let host = state.config.object_store_host();

    let rows = GalleryImages::find()
        .all(&state.db)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("📭 Gallery unavailable, serving empty set: {e}");
            Vec::new()
        });

    let items = rows
        .into_iter()
        .map(|g| GalleryImageItem {
            id: g.id,
            image_url: resolve_image_origin(host.as_deref(), &g.image_url),
            alt_text: g.alt_text,
        })
        .collect();

    Json(GalleryListResponse { items })
}

#[derive(Serialize, ToSchema)]
pub struct PromoItemView {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub image_url: String,
}

#[derive(Serialize, ToSchema)]
pub struct PromoListResponse {
    pub items: Vec<PromoItemView>,
}

#[utoipa::path(
    get,
    path = "/api/promo-items",
    responses(
        (status = 200, description = "Promoted items; empty when the store is unavailable", body = PromoListResponse)
    ),
    tag = "content"
)]
pub async fn list_promo_items(State(state): State<AppState>) -> Json<PromoListResponse> {
    let host = state.config.object_store_host();

    let rows = PromoItems::find().all(&state.db).await.unwrap_or_else(|e| {
        tracing::warn!("📭 Promo items unavailable, serving empty set: {e}");
        Vec::new()
    });

    let items = rows
        .into_iter()
        .map(|p| PromoItemView {
            id: p.id,
            title: p.title,
            price: p.price,
            image_url: resolve_image_origin(host.as_deref(), &p.image_url),
        })
        .collect();

    Json(PromoListResponse { items })
}
