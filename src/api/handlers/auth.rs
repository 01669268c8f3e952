use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::AppError;
use crate::utils::auth::create_session_token;
use crate::utils::cookies::{clear_session_cookie, session_cookie};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = MessageResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    if req.username != state.config.admin_username
        || req.password != state.config.admin_password
    {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = create_session_token(&req.username, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Failed to mint session token: {e}")))?;

    tracing::info!("🔐 Admin session opened for '{}'", req.username);

    let response = (
        [(
            header::SET_COOKIE,
            session_cookie(&token, state.config.secure_cookies),
        )],
        Json(MessageResponse {
            message: "Login successful".to_string(),
        }),
    );
    Ok(response.into_response())
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.config.secure_cookies),
        )],
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
        .into_response()
}
