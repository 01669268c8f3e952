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
use crate::entities::{prelude::*, promo_items};

use super::menu_images::{
    DeleteImageRequest, DeleteImageResponse, SignUploadRequest, SignUploadResponse,
    remove_stored_object,
};

/// Promo artwork shares the menu bucket and its signing TTL.
const SIGN_TTL: Duration = Duration::from_secs(3600);

#[derive(Serialize, ToSchema)]
pub struct PromoItemResponse {
    pub item: promo_items::Model,
}

#[utoipa::path(
    post,
    path = "/api/admin/promo-items",
    responses(
        (status = 200, description = "Promo item created", body = PromoItemResponse),
        (status = 400, description = "Missing file, title or price"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure")
    ),
    tag = "promo"
)]
pub async fn upload_promo_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PromoItemResponse>, AppError> {
    let mut file: Option<(Vec<u8>, Option<String>, Option<String>)> = None;
    let mut title: Option<String> = None;
    let mut price: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            "title" => title = field.text().await.ok().filter(|s| !s.is_empty()),
            "price" => price = field.text().await.ok().filter(|s| !s.is_empty()),
            _ => {}
        }
    }

    let (Some((data, file_name, content_type)), Some(title), Some(price)) = (file, title, price)
    else {
        return Err(AppError::BadRequest(
            "Missing file, title or price".to_string(),
        ));
    };

    let ext = file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("bin");
    let key = format!("{}.{ext}", Uuid::new_v4());

    state
        .storage
        .upload(
            &state.config.menu_bucket,
            &key,
            data,
            content_type
                .as_deref()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref()),
            "public, max-age=31536000",
        )
        .await
        .map_err(|e| AppError::Storage(format!("Storage upload failed: {e}")))?;

    let item = promo_items::ActiveModel {
        title: Set(title),
        price: Set(price),
        image_url: Set(state.storage.public_url(&state.config.menu_bucket, &key)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("DB insert failed: {e}")))?;

    Ok(Json(PromoItemResponse { item }))
}

#[utoipa::path(
    post,
    path = "/api/admin/promo-items/sign",
    request_body = SignUploadRequest,
    responses(
        (status = 200, description = "Presigned upload URL", body = SignUploadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Signing failed")
    ),
    tag = "promo"
)]
pub async fn sign_promo_upload(
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
pub struct CompletePromoItemRequest {
    pub path: String,
    pub title: String,
    pub price: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/promo-items/complete",
    request_body = CompletePromoItemRequest,
    responses(
        (status = 200, description = "Uploaded object registered", body = PromoItemResponse),
        (status = 400, description = "Missing path, title or price"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "promo"
)]
pub async fn complete_promo_item(
    State(state): State<AppState>,
    Json(req): Json<CompletePromoItemRequest>,
) -> Result<Json<PromoItemResponse>, AppError> {
    if req.path.is_empty() || req.title.is_empty() || req.price.is_empty() {
        return Err(AppError::BadRequest(
            "Missing path, title or price".to_string(),
        ));
    }

    let item = promo_items::ActiveModel {
        title: Set(req.title),
        price: Set(req.price),
        image_url: Set(state
            .storage
            .public_url(&state.config.menu_bucket, &req.path)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("DB insert failed: {e}")))?;

    Ok(Json(PromoItemResponse { item }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/promo-items",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Promo item deleted", body = DeleteImageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "promo"
)]
pub async fn delete_promo_item(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let storage_removed =
        remove_stored_object(&state, &state.config.menu_bucket, &req.image_url).await;

    PromoItems::delete_by_id(req.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::Persistence(format!("DB delete failed: {e}")))?;

    Ok(Json(DeleteImageResponse {
        ok: true,
        storage_removed,
    }))
}
