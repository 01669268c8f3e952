use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::AppState;
use crate::api::error::AppError;
use crate::utils::image_url::public_object_url;

/// Content type inferred from the key's extension; unknown extensions fall
/// back to an opaque byte stream.
fn content_type_for(key: &str) -> &'static str {
    let lower = key.to_ascii_lowercase();
    if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".png") {
        mime::IMAGE_PNG.as_ref()
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        mime::IMAGE_JPEG.as_ref()
    } else if lower.ends_with(".gif") {
        mime::IMAGE_GIF.as_ref()
    } else {
        mime::APPLICATION_OCTET_STREAM.as_ref()
    }
}

fn is_safe_component(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

#[utoipa::path(
    get,
    path = "/images/{bucket}/{key}",
    params(
        ("bucket" = String, Path, description = "Storage bucket"),
        ("key" = String, Path, description = "Object key, may contain slashes")
    ),
    responses(
        (status = 200, description = "Image bytes, local mirror or proxied fallback"),
        (status = 400, description = "Malformed bucket or key"),
        (status = 404, description = "Object missing locally and upstream")
    ),
    tag = "images"
)]
pub async fn serve_image(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Response {
    if !is_safe_component(&bucket) || !key.split('/').all(is_safe_component) {
        return AppError::BadRequest("Invalid image path".to_string()).into_response();
    }

    // Local mirror first; the static tree is the fast, CDN-friendly path.
    let local = state.config.static_root.join(&bucket).join(&key);
    match tokio::fs::read(&local).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type_for(&key).to_string()),
                (
                    header::CACHE_CONTROL,
                    format!(
                        "public, max-age={}, immutable",
                        state.config.local_cache_max_age
                    ),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => proxy_fallback(&state, &bucket, &key).await,
    }
}

/// Stream the object from the store's public URL. The response is cacheable
/// for a bounded period only, since the local mirror may catch up later.
async fn proxy_fallback(state: &AppState, bucket: &str, key: &str) -> Response {
    let encoded_key = key
        .split('/')
        .map(|seg| utf8_percent_encode(seg, NON_ALPHANUMERIC).to_string())
        .collect::<Vec<_>>()
        .join("/");
    let upstream = public_object_url(&state.config.object_store_url, bucket, &encoded_key);

    match state.http.get(&upstream).send().await {
        Ok(resp) if resp.status().is_success() => {
            let mut response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type_for(key))
                .header(
                    header::CACHE_CONTROL,
                    format!("public, max-age={}", state.config.proxy_cache_max_age),
                );
            if let Some(len) = resp.content_length() {
                response = response.header(header::CONTENT_LENGTH, len);
            }
            match response.body(Body::from_stream(resp.bytes_stream())) {
                Ok(response) => response,
                Err(e) => {
                    AppError::Internal(format!("Failed to build proxy response: {e}"))
                        .into_response()
                }
            }
        }
        Ok(resp) => {
            tracing::warn!("🛰️  Upstream {} for {}", resp.status(), upstream);
            AppError::Upstream(resp.status().as_u16()).into_response()
        }
        Err(e) => {
            tracing::error!("🛰️  Proxy fetch failed for {upstream}: {e}");
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(serde_json::json!({ "error": format!("Proxy failed: {e}") })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_covers_image_formats() {
        assert_eq!(content_type_for("a/b.webp"), "image/webp");
        assert_eq!(content_type_for("a/B.PNG"), "image/png");
        assert_eq!(content_type_for("x.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("x.jpg"), "image/jpeg");
        assert_eq!(content_type_for("x.gif"), "image/gif");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[test]
    fn rejects_traversal_components() {
        assert!(is_safe_component("file.webp"));
        assert!(!is_safe_component(".."));
        assert!(!is_safe_component("."));
        assert!(!is_safe_component(""));
    }
}
