use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{menu_images, prelude::*};
use crate::models::MenuSection;
use crate::services::images::{MAX_MENU_IMAGE_WIDTH, reencode_webp};
use crate::services::sync;

/// Uploaded originals live for a year on the store's CDN.
const OBJECT_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Presigned upload URLs stay valid for one hour.
const SIGN_TTL: Duration = Duration::from_secs(3600);

#[derive(Serialize, ToSchema)]
pub struct MenuImageResponse {
    pub item: menu_images::Model,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu-images",
    responses(
        (status = 200, description = "Image stored and registered", body = MenuImageResponse),
        (status = 400, description = "Missing file or category_id"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Image processing or storage failure")
    ),
    tag = "menu-images"
)]
pub async fn upload_menu_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MenuImageResponse>, AppError> {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut category_id: Option<i32> = None;
    let mut alt_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((data.to_vec(), file_name));
            }
            "category_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid category_id: {e}")))?;
                category_id = Some(
                    text.parse()
                        .map_err(|_| AppError::BadRequest("Invalid category_id".to_string()))?,
                );
            }
            "alt_text" => {
                alt_text = field.text().await.ok().filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let (Some((data, file_name)), Some(category_id)) = (file, category_id) else {
        return Err(AppError::BadRequest(
            "Missing file or category_id".to_string(),
        ));
    };

    // Menu photos are normalized to bounded-width WebP before storage
    let webp = reencode_webp(&data, MAX_MENU_IMAGE_WIDTH)
        .map_err(|e| AppError::Storage(format!("Image processing failed: {e}")))?;

    let key = format!("{}.webp", Uuid::new_v4());
    state
        .storage
        .upload(
            &state.config.menu_bucket,
            &key,
            webp,
            "image/webp",
            OBJECT_CACHE_CONTROL,
        )
        .await
        .map_err(|e| AppError::Storage(format!("Storage upload failed: {e}")))?;

    let item = menu_images::ActiveModel {
        image_url: Set(state.storage.public_url(&state.config.menu_bucket, &key)),
        category_id: Set(category_id),
        alt_text: Set(alt_text.or(file_name)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("DB insert failed: {e}")))?;

    Ok(Json(MenuImageResponse { item }))
}

#[derive(Deserialize, ToSchema)]
pub struct SignUploadRequest {
    pub filename: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SignUploadResponse {
    /// Storage key the client must PUT to
    pub path: String,
    /// Presigned upload URL
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu-images/sign",
    request_body = SignUploadRequest,
    responses(
        (status = 200, description = "Presigned upload URL", body = SignUploadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Signing failed")
    ),
    tag = "menu-images"
)]
pub async fn sign_menu_upload(
    State(state): State<AppState>,
    Json(req): Json<SignUploadRequest>,
) -> Result<Json<SignUploadResponse>, AppError> {
    let ext = req
        .filename
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("bin");
    let path = format!("{}.{ext}", Uuid::new_v4());

    let url = state
        .storage
        .presigned_upload_url(&state.config.menu_bucket, &path, SIGN_TTL)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create signed URL: {e}")))?;

    Ok(Json(SignUploadResponse { path, url }))
}

#[derive(Deserialize, ToSchema)]
pub struct CompleteMenuImageRequest {
    pub path: String,
    pub category_id: i32,
    pub alt_text: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu-images/complete",
    request_body = CompleteMenuImageRequest,
    responses(
        (status = 200, description = "Uploaded object registered", body = MenuImageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "menu-images"
)]
pub async fn complete_menu_image(
    State(state): State<AppState>,
    Json(req): Json<CompleteMenuImageRequest>,
) -> Result<Json<MenuImageResponse>, AppError> {
    if req.path.is_empty() {
        return Err(AppError::BadRequest(
            "Missing path or category_id".to_string(),
        ));
    }

    let alt = req.alt_text.clone().unwrap_or_else(|| req.path.clone());
    let item = menu_images::ActiveModel {
        image_url: Set(state
            .storage
            .public_url(&state.config.menu_bucket, &req.path)),
        category_id: Set(req.category_id),
        alt_text: Set(Some(alt)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("DB insert failed: {e}")))?;

    Ok(Json(MenuImageResponse { item }))
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteImageRequest {
    pub id: i32,
    pub image_url: String,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteImageResponse {
    pub ok: bool,
    /// False when the metadata row was removed but the stored object was
    /// not; the two deletes are independent, at-least-one-completes.
    pub storage_removed: bool,
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu-images",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Image deleted", body = DeleteImageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "menu-images"
)]
pub async fn delete_menu_image(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let storage_removed =
        remove_stored_object(&state, &state.config.menu_bucket, &req.image_url).await;

    MenuImages::delete_by_id(req.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::Persistence(format!("DB delete failed: {e}")))?;

    Ok(Json(DeleteImageResponse {
        ok: true,
        storage_removed,
    }))
}

/// Best-effort removal of the stored object behind a metadata row; the key
/// is the URL's final segment. Failure is reported, not fatal.
pub(crate) async fn remove_stored_object(state: &AppState, bucket: &str, image_url: &str) -> bool {
    let Some(file_name) = image_url.rsplit('/').next().filter(|s| !s.is_empty()) else {
        return false;
    };

    match state.storage.delete(bucket, file_name).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("🧹 Storage object removal failed for {bucket}/{file_name}: {e}");
            false
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SyncRequest {
    pub menu: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SyncResponse {
    pub ok: bool,
    pub inserted: u64,
    pub updated: u64,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu-images/sync",
    request_body = SyncRequest,
    responses(
        (status = 200, description = "Folders reconciled", body = SyncResponse),
        (status = 400, description = "Missing or invalid menu"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Metadata write failed")
    ),
    tag = "menu-images"
)]
pub async fn sync_menu_images(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let menu = req
        .menu
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'menu'".to_string()))?;
    let menu = MenuSection::parse(menu).ok_or_else(|| {
        AppError::BadRequest("Invalid menu. Allowed: taverna, bar, sushi".to_string())
    })?;

    let report = sync::sync_menu(
        &state.db,
        state.storage.as_ref(),
        &state.config.menu_bucket,
        menu,
    )
    .await?;

    Ok(Json(SyncResponse {
        ok: true,
        inserted: report.inserted,
        updated: report.updated,
    }))
}
