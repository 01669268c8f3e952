mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::test_state;
use taverna_backend::create_app;

fn image_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn header_value<'a>(
    response: &'a axum::http::Response<Body>,
    name: header::HeaderName,
) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn local_hit_is_served_immutable() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("menu")).unwrap();
    std::fs::write(root.path().join("menu/dish.webp"), b"local-bytes").unwrap();

    let (state, _) = test_state(root.path().to_path_buf()).await;
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/dish.webp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, header::CONTENT_TYPE), "image/webp");
    let cache = header_value(&response, header::CACHE_CONTROL).to_string();
    assert!(cache.contains("immutable"), "local hits are immutable: {cache}");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"local-bytes");
}

#[tokio::test]
async fn nested_keys_resolve_under_the_bucket_folder() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("menu/taverna/ciorbe")).unwrap();
    std::fs::write(root.path().join("menu/taverna/ciorbe/a.webp"), b"nested").unwrap();

    let (state, _) = test_state(root.path().to_path_buf()).await;
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/taverna/ciorbe/a.webp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"nested");
}

/// Throwaway upstream standing in for the object store's public endpoint.
async fn spawn_upstream() -> String {
    async fn serve_object(
        axum::extract::Path((_bucket, key)): axum::extract::Path<(String, String)>,
    ) -> axum::response::Response {
        if key == "remote.webp" {
            (StatusCode::OK, b"remote-bytes".to_vec()).into_response()
        } else {
            StatusCode::NOT_FOUND.into_response()
        }
    }

    let upstream: Router = Router::new().route(
        "/storage/v1/object/public/:bucket/*key",
        get(serve_object),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn local_miss_falls_back_to_proxy_with_bounded_cache() {
    let root = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(root.path().to_path_buf()).await;
    state.config.object_store_url = spawn_upstream().await;
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/remote.webp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cache = header_value(&response, header::CACHE_CONTROL).to_string();
    assert!(!cache.contains("immutable"), "proxied hits are not immutable");
    assert!(cache.contains("max-age=86400"), "bounded lifetime: {cache}");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"remote-bytes");
}

#[tokio::test]
async fn missing_everywhere_propagates_upstream_status() {
    let root = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(root.path().to_path_buf()).await;
    state.config.object_store_url = spawn_upstream().await;
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/absent.webp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    let root = tempfile::tempdir().unwrap();
    let (mut state, _) = test_state(root.path().to_path_buf()).await;
    // Nothing listens here.
    state.config.object_store_url = "http://127.0.0.1:9".to_string();
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/any.webp"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn traversal_components_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    let (state, _) = test_state(root.path().to_path_buf()).await;
    let app = create_app(state);

    let response = app
        .oneshot(image_request("/images/menu/../secrets.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
