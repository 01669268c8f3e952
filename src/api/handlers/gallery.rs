use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{gallery_images, prelude::*};

use super::menu_images::{DeleteImageRequest, DeleteImageResponse, remove_stored_object};

#[derive(Serialize, ToSchema)]
pub struct GalleryImageResponse {
    pub item: gallery_images::Model,
}

#[utoipa::path(
    post,
    path = "/api/admin/gallery-images",
    responses(
        (status = 200, description = "Image stored and registered", body = GalleryImageResponse),
        (status = 400, description = "Missing file"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure")
    ),
    tag = "gallery"
)]
pub async fn upload_gallery_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GalleryImageResponse>, AppError> {
    let mut file: Option<(Vec<u8>, Option<String>, Option<String>)> = None;
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
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            "alt_text" => {
                alt_text = field.text().await.ok().filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let Some((data, file_name, content_type)) = file else {
        return Err(AppError::BadRequest("Missing file".to_string()));
    };

    // Gallery shots keep their original encoding
    let ext = file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("bin");
    let key = format!("{}.{ext}", Uuid::new_v4());

    state
        .storage
        .upload(
            &state.config.gallery_bucket,
            &key,
            data,
            content_type
                .as_deref()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref()),
            "public, max-age=31536000",
        )
        .await
        .map_err(|e| AppError::Storage(format!("Storage upload failed: {e}")))?;

    let item = gallery_images::ActiveModel {
        image_url: Set(state
            .storage
            .public_url(&state.config.gallery_bucket, &key)),
        alt_text: Set(alt_text.or(file_name)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::Persistence(format!("DB insert failed: {e}")))?;

    Ok(Json(GalleryImageResponse { item }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/gallery-images",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Image deleted", body = DeleteImageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "gallery"
)]
pub async fn delete_gallery_image(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let storage_removed =
        remove_stored_object(&state, &state.config.gallery_bucket, &req.image_url).await;

    GalleryImages::delete_by_id(req.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::Persistence(format!("DB delete failed: {e}")))?;

    Ok(Json(DeleteImageResponse {
        ok: true,
        storage_removed,
    }))
}
