use axum::{Json, extract::State};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{categories, menu_images, prelude::*};
use crate::models::MenuSection;
use crate::utils::icons::is_known_icon;

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name_ro: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name_ru: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name_en: Option<String>,
    pub icon: Option<String>,
    pub menu: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryResponse {
    pub item: categories::Model,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteCategoryRequest {
    pub id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name, icon or menu"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Romanian is the canonical display name
    let base_name = req
        .name_ro
        .clone()
        .or_else(|| req.name.clone())
        .ok_or_else(|| AppError::BadRequest("Missing name_ro (or name)".to_string()))?;

    let menu = match req.menu.as_deref() {
        None => MenuSection::Taverna,
        Some(tag) => MenuSection::parse(tag).ok_or_else(|| {
            AppError::BadRequest("Invalid menu. Allowed: taverna, bar, sushi".to_string())
        })?,
    };

    if let Some(icon) = req.icon.as_deref() {
        if !is_known_icon(icon) {
            return Err(AppError::BadRequest(format!("Unknown icon '{icon}'")));
        }
    }

    let item = categories::ActiveModel {
        name: Set(base_name),
        name_ro: Set(req.name_ro),
        name_ru: Set(req.name_ru),
        name_en: Set(req.name_en),
        icon: Set(req.icon),
        menu: Set(menu.as_str().to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("Create failed: {e}")))?;

    Ok(Json(CategoryResponse { item }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories",
    request_body = DeleteCategoryRequest,
    responses(
        (status = 200, description = "Category deleted", body = OkResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Json(req): Json<DeleteCategoryRequest>,
) -> Result<Json<OkResponse>, AppError> {
    // Best-effort: drop dependent menu-image rows first (no storage cleanup)
    if let Err(e) = MenuImages::delete_many()
        .filter(menu_images::Column::CategoryId.eq(req.id))
        .exec(&state.db)
        .await
    {
        tracing::warn!("🧹 Failed to delete images of category {}: {e}", req.id);
    }

    Categories::delete_by_id(req.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::Persistence(format!("Delete failed: {e}")))?;

    Ok(Json(OkResponse { ok: true }))
}
