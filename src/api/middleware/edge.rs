use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;
use crate::i18n::{self, LOCALE_COOKIE};
use crate::utils::auth::validate_session_token;
use crate::utils::cookies::{AUTH_COOKIE, get_cookie};

/// Prefixes the interceptor never touches: static assets, the API, the
/// image delivery route, and the service's own tooling surfaces.
const EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/images",
    "/assets",
    "/swagger-ui",
    "/api-docs",
    "/health",
];

/// Whether the admin session credential is present and valid for this
/// request. Threaded into the gate as a plain value so the decision logic
/// stays a pure function.
#[derive(Copy, Clone, Debug)]
pub struct AuthContext {
    pub authenticated: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RouteAction {
    Pass,
    Redirect(String),
}

/// Paths the interceptor leaves alone entirely.
pub fn is_excluded(path: &str) -> bool {
    if EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
    {
        return true;
    }
    // Any dotted final segment is a file request.
    path.rsplit('/').next().is_some_and(|seg| seg.contains('.'))
}

/// Admin-area gate over a path with any locale prefix already stripped.
pub fn gate(path_without_locale: &str, auth: AuthContext) -> GateDecision {
    let is_dashboard = path_without_locale.starts_with("/dashboard");
    let is_login =
        path_without_locale == "/login" || path_without_locale.starts_with("/login/");

    if is_dashboard && !auth.authenticated {
        GateDecision::RedirectToLogin
    } else if is_login && auth.authenticated {
        GateDecision::RedirectToDashboard
    } else {
        GateDecision::Allow
    }
}

/// The full per-request decision: exclusion, gate, then locale rewriting.
///
/// Gate redirects win over locale rewriting. Their target locale comes
/// from the path's own prefix when it carried one, otherwise it is
/// resolved once, so the redirect lands in its final form in a single hop.
pub fn route_decision(
    path: &str,
    auth: AuthContext,
    locale_cookie: Option<&str>,
    accept_language: Option<&str>,
) -> RouteAction {
    if is_excluded(path) {
        return RouteAction::Pass;
    }

    let (path_locale, without_locale) = i18n::split_locale_prefix(path);
    let resolve = || path_locale.unwrap_or_else(|| i18n::resolve_locale(locale_cookie, accept_language));

    match gate(without_locale, auth) {
        GateDecision::RedirectToLogin => {
            return RouteAction::Redirect(format!("/{}/login", resolve()));
        }
        GateDecision::RedirectToDashboard => {
            return RouteAction::Redirect(format!("/{}/dashboard", resolve()));
        }
        GateDecision::Allow => {}
    }

    if path_locale.is_some() {
        RouteAction::Pass
    } else {
        let locale = i18n::resolve_locale(locale_cookie, accept_language);
        RouteAction::Redirect(i18n::with_locale_prefix(locale, path))
    }
}

/// Edge interceptor applied to every request before routing to pages.
pub async fn edge_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let headers = req.headers();

    let authenticated = get_cookie(headers, AUTH_COOKIE)
        .map(|token| validate_session_token(token, &state.config.jwt_secret).is_ok())
        .unwrap_or(false);
    let locale_cookie = get_cookie(headers, LOCALE_COOKIE);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let action = route_decision(
        req.uri().path(),
        AuthContext { authenticated },
        locale_cookie,
        accept_language,
    );

    match action {
        RouteAction::Pass => next.run(req).await,
        RouteAction::Redirect(target) => {
            tracing::debug!("↪️  {} -> {}", req.uri().path(), target);
            Redirect::temporary(&target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: AuthContext = AuthContext {
        authenticated: false,
    };
    const ADMIN: AuthContext = AuthContext {
        authenticated: true,
    };

    #[test]
    fn excludes_assets_api_and_files() {
        assert!(is_excluded("/_next/static/chunk.js"));
        assert!(is_excluded("/api/login"));
        assert!(is_excluded("/favicon.ico"));
        assert!(is_excluded("/assets/app.css"));
        assert!(is_excluded("/images/menu/a.webp"));
        assert!(!is_excluded("/menu"));
        assert!(!is_excluded("/ro/dashboard"));
    }

    #[test]
    fn gate_protects_dashboard() {
        assert_eq!(gate("/dashboard", ANON), GateDecision::RedirectToLogin);
        assert_eq!(
            gate("/dashboard/settings", ANON),
            GateDecision::RedirectToLogin
        );
        assert_eq!(gate("/dashboard", ADMIN), GateDecision::Allow);
    }

    #[test]
    fn gate_bounces_logged_in_visitors_off_login() {
        assert_eq!(gate("/login", ADMIN), GateDecision::RedirectToDashboard);
        assert_eq!(gate("/login/totp", ADMIN), GateDecision::RedirectToDashboard);
        assert_eq!(gate("/login", ANON), GateDecision::Allow);
        // `/loginish` is not the login page
        assert_eq!(gate("/loginish", ADMIN), GateDecision::Allow);
    }

    #[test]
    fn gate_is_idempotent() {
        let paths = ["/", "/menu", "/dashboard", "/login", "/dashboard/x"];
        for path in paths {
            for auth in [ANON, ADMIN] {
                assert_eq!(gate(path, auth), gate(path, auth));
            }
        }
    }

    #[test]
    fn unprefixed_dashboard_redirects_to_default_locale_login() {
        let action = route_decision("/dashboard", ANON, None, None);
        assert_eq!(action, RouteAction::Redirect("/ro/login".to_string()));
    }

    #[test]
    fn auth_redirect_keeps_existing_path_locale() {
        let action = route_decision("/en/dashboard", ANON, Some("ru"), None);
        assert_eq!(action, RouteAction::Redirect("/en/login".to_string()));
    }

    #[test]
    fn root_redirects_using_cookie_locale() {
        let action = route_decision("/", ANON, Some("ru"), None);
        assert_eq!(action, RouteAction::Redirect("/ru".to_string()));
    }

    #[test]
    fn prefixed_paths_pass_through() {
        assert_eq!(route_decision("/ru/menu", ANON, None, None), RouteAction::Pass);
        assert_eq!(
            route_decision("/ru/dashboard", ADMIN, None, None),
            RouteAction::Pass
        );
    }

    #[test]
    fn single_redirect_convergence() {
        // First hop adds the locale, second hop passes.
        let RouteAction::Redirect(target) = route_decision("/menu", ANON, None, Some("en-US"))
        else {
            panic!("expected a redirect");
        };
        assert_eq!(target, "/en/menu");
        assert_eq!(
            route_decision(&target, ANON, None, Some("en-US")),
            RouteAction::Pass
        );

        // Gate redirect also converges in one hop.
        let RouteAction::Redirect(target) = route_decision("/dashboard", ANON, Some("ru"), None)
        else {
            panic!("expected a redirect");
        };
        assert_eq!(target, "/ru/login");
        assert_eq!(
            route_decision(&target, ANON, Some("ru"), None),
            RouteAction::Pass
        );
    }

    #[test]
    fn gate_redirect_wins_over_locale_rewrite() {
        // An authenticated visitor on the bare login path goes straight to
        // the dashboard, not to `/{locale}/login` first.
        let action = route_decision("/login", ADMIN, None, None);
        assert_eq!(action, RouteAction::Redirect("/ro/dashboard".to_string()));
    }

    #[test]
    fn excluded_paths_never_redirect() {
        for path in ["/_next/static/chunk.js", "/api/login", "/favicon.ico"] {
            assert_eq!(route_decision(path, ANON, Some("ru"), None), RouteAction::Pass);
            assert_eq!(route_decision(path, ADMIN, None, None), RouteAction::Pass);
        }
    }
}
