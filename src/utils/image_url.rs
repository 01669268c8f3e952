use url::Url;

/// Path prefix under which the object store exposes public objects. What
/// follows it is `{bucket}/{key...}`.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public/";

/// Local delivery route prefix for mirrored/proxied images.
pub const IMAGE_ROUTE_PREFIX: &str = "/images/";

/// Build the object store's public URL for a bucket/key pair.
pub fn public_object_url(base: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}{}{}/{}",
        base.trim_end_matches('/'),
        PUBLIC_OBJECT_PREFIX,
        bucket,
        key
    )
}

/// Rewrite a stored public-object URL to the local delivery route.
///
/// Anything that is not a public object on the configured store host passes
/// through unchanged: foreign hosts, unparsable values, and store URLs
/// outside the public-object prefix.
pub fn resolve_image_origin(object_store_host: Option<&str>, stored_url: &str) -> String {
    let Some(host) = object_store_host else {
        return stored_url.to_string();
    };
    let Ok(parsed) = Url::parse(stored_url) else {
        return stored_url.to_string();
    };
    if parsed.host_str() != Some(host) {
        return stored_url.to_string();
    }
    let Some(rest) = parsed.path().strip_prefix(PUBLIC_OBJECT_PREFIX) else {
        return stored_url.to_string();
    };

    format!("{IMAGE_ROUTE_PREFIX}{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Option<&str> = Some("store.example.com");

    #[test]
    fn rewrites_public_object_urls() {
        let url = "https://store.example.com/storage/v1/object/public/menu/taverna/ciorba.webp";
        assert_eq!(
            resolve_image_origin(HOST, url),
            "/images/menu/taverna/ciorba.webp"
        );
    }

    #[test]
    fn foreign_hosts_pass_through() {
        let url = "https://cdn.other.com/storage/v1/object/public/menu/a.webp";
        assert_eq!(resolve_image_origin(HOST, url), url);
    }

    #[test]
    fn non_public_store_paths_pass_through() {
        let url = "https://store.example.com/storage/v1/object/sign/menu/a.webp";
        assert_eq!(resolve_image_origin(HOST, url), url);
    }

    #[test]
    fn relative_and_garbage_values_pass_through() {
        assert_eq!(resolve_image_origin(HOST, "/images/menu/a.webp"), "/images/menu/a.webp");
        assert_eq!(resolve_image_origin(HOST, "not a url"), "not a url");
    }

    #[test]
    fn unknown_host_config_passes_through() {
        let url = "https://store.example.com/storage/v1/object/public/menu/a.webp";
        assert_eq!(resolve_image_origin(None, url), url);
    }

    #[test]
    fn round_trips_with_public_object_url() {
        let public = public_object_url("https://store.example.com/", "menu", "bar/b.webp");
        assert_eq!(
            public,
            "https://store.example.com/storage/v1/object/public/menu/bar/b.webp"
        );
        assert_eq!(resolve_image_origin(HOST, &public), "/images/menu/bar/b.webp");
    }
}
