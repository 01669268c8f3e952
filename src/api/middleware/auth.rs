use crate::AppState;
use crate::api::error::AppError;
use crate::utils::auth::validate_session_token;
use crate::utils::cookies::{AUTH_COOKIE, get_cookie};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Admin API guard: the dashboard talks to `/api/admin/*` with the session
/// cookie, and an absent or invalid session answers 401 (page-level
/// redirects are the edge interceptor's job).
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = get_cookie(req.headers(), AUTH_COOKIE)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    let claims = validate_session_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
