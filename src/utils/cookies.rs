use axum::http::{HeaderMap, header};

/// Name of the admin session cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// Session cookie lifetime, matching the signed token's expiry.
pub const AUTH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24;

/// Find a cookie value in the request headers. Multiple `Cookie` headers
/// are all inspected; the first match wins.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
        .next()
}

/// `Set-Cookie` value establishing the admin session.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{AUTH_COOKIE}={token}; Max-Age={AUTH_COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax{secure}"
    )
}

/// `Set-Cookie` value clearing the admin session.
pub fn clear_session_cookie(secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{AUTH_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax{secure}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_many() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("locale=ru; auth_token=abc; theme=dark"),
        );
        assert_eq!(get_cookie(&headers, "auth_token"), Some("abc"));
        assert_eq!(get_cookie(&headers, "locale"), Some("ru"));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn handles_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("locale=en"));
        headers.append(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(get_cookie(&headers, "auth_token"), Some("xyz"));
    }

    #[test]
    fn session_cookie_flags() {
        let cookie = session_cookie("tok", true);
        assert!(cookie.starts_with("auth_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("Secure"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.contains("Max-Age=0"));
        assert!(!cleared.contains("Secure"));
    }
}
