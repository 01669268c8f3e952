use axum::{Json, extract::State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::AppError;
use crate::services::mirror::{MirrorReport, mirror_bucket};

#[derive(Deserialize, ToSchema)]
pub struct MirrorRequest {
    /// Bucket to mirror; defaults to the menu bucket
    pub bucket: Option<String>,
    /// Mirror only keys under this folder
    pub prefix: Option<String>,
    /// Skip everything that is not WebP
    #[serde(default)]
    pub only_webp: bool,
}

#[utoipa::path(
    post,
    path = "/api/admin/mirror",
    request_body = MirrorRequest,
    responses(
        (status = 200, description = "Bucket mirrored into local static hosting", body = MirrorReport),
        (status = 400, description = "Unknown bucket"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "mirror"
)]
pub async fn run_mirror(
    State(state): State<AppState>,
    Json(req): Json<MirrorRequest>,
) -> Result<Json<MirrorReport>, AppError> {
    let bucket = req
        .bucket
        .unwrap_or_else(|| state.config.menu_bucket.clone());
    if bucket != state.config.menu_bucket && bucket != state.config.gallery_bucket {
        return Err(AppError::BadRequest(format!("Unknown bucket '{bucket}'")));
    }

    let report = mirror_bucket(
        state.storage.as_ref(),
        &bucket,
        &state.config.static_root,
        req.prefix.as_deref(),
        req.only_webp,
    )
    .await;

    Ok(Json(report))
}
