use std::env;
use std::path::PathBuf;

/// Site-wide configuration, loaded once at startup and carried in
/// [`crate::AppState`].
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Admin login name checked by `/api/login`
    pub admin_username: String,

    /// Admin password checked by `/api/login`
    pub admin_password: String,

    /// Secret signing the session token cookie (Required in production)
    pub jwt_secret: String,

    /// Public base URL of the object store, e.g. `https://store.example.com`
    pub object_store_url: String,

    /// Bucket holding menu and promo images (default: "menu")
    pub menu_bucket: String,

    /// Bucket holding gallery images (default: "gallery")
    pub gallery_bucket: String,

    /// Root of locally served static files; mirrored objects land under
    /// `{static_root}/{bucket}/...` (default: "public")
    pub static_root: PathBuf,

    /// Set the `Secure` flag on session cookies (default: false)
    pub secure_cookies: bool,

    /// Cache lifetime for locally served images, seconds (default: 1 year)
    pub local_cache_max_age: u32,

    /// Cache lifetime for proxied fallback images, seconds (default: 1 day)
    pub proxy_cache_max_age: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            jwt_secret: "secret".to_string(),
            object_store_url: "http://127.0.0.1:9000".to_string(),
            menu_bucket: "menu".to_string(),
            gallery_bucket: "gallery".to_string(),
            static_root: PathBuf::from("public"),
            secure_cookies: false,
            local_cache_max_age: 31_536_000,
            proxy_cache_max_age: 86_400,
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(default.admin_username),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(default.admin_password),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            object_store_url: env::var("OBJECT_STORE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.object_store_url),

            menu_bucket: env::var("MENU_BUCKET").unwrap_or(default.menu_bucket),

            gallery_bucket: env::var("GALLERY_BUCKET").unwrap_or(default.gallery_bucket),

            static_root: env::var("STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.static_root),

            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.secure_cookies),

            local_cache_max_age: env::var("LOCAL_CACHE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.local_cache_max_age),

            proxy_cache_max_age: env::var("PROXY_CACHE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.proxy_cache_max_age),
        }
    }

    /// Host component of the object store URL, used to recognize stored
    /// public-object URLs.
    pub fn object_store_host(&self) -> Option<String> {
        url::Url::parse(&self.object_store_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}
