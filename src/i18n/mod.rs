use serde::{Deserialize, Serialize};

/// Languages the site is served in. `Ro` is the default everywhere a locale
/// has to be picked without input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ro,
    Ru,
    En,
}

/// Detection priority order, not alphabetical: Romanian first, then Russian,
/// then English.
pub const SUPPORTED_LOCALES: [Locale; 3] = [Locale::Ro, Locale::Ru, Locale::En];

pub const DEFAULT_LOCALE: Locale = Locale::Ro;

/// Cookie that persists the visitor's language choice.
pub const LOCALE_COOKIE: &str = "locale";

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ro => "ro",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ro" => Some(Locale::Ro),
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the locale for a request.
///
/// Order: valid preference cookie, then `Accept-Language` scanned for each
/// supported tag in priority order, then the default. Never fails.
pub fn resolve_locale(cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(tag) = cookie {
        if let Some(locale) = Locale::parse(tag) {
            return locale;
        }
    }

    if let Some(header) = accept_language {
        for locale in SUPPORTED_LOCALES {
            if header_mentions(header, locale.as_str()) {
                return locale;
            }
        }
    }

    DEFAULT_LOCALE
}

/// A tag counts only as a standalone alphanumeric token, so `ru` matches
/// `ru-RU;q=0.8` but not `crude`.
fn header_mentions(header: &str, tag: &str) -> bool {
    header
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token.eq_ignore_ascii_case(tag))
}

/// Split a request path into its locale prefix (if the first segment is a
/// supported tag) and the remainder. The remainder always starts with `/`.
pub fn split_locale_prefix(path: &str) -> (Option<Locale>, &str) {
    let Some(trimmed) = path.strip_prefix('/') else {
        return (None, path);
    };
    let first = trimmed.split('/').next().unwrap_or("");

    match Locale::parse(first) {
        Some(locale) => {
            let remainder = &path[1 + first.len()..];
            let remainder = if remainder.is_empty() { "/" } else { remainder };
            (Some(locale), remainder)
        }
        None => (None, path),
    }
}

/// Prepend a locale segment to a path. The root path maps to `/{locale}`
/// with no trailing slash.
pub fn with_locale_prefix(locale: Locale, path: &str) -> String {
    if path == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_wins_over_header() {
        let locale = resolve_locale(Some("ru"), Some("en-US,en;q=0.9"));
        assert_eq!(locale, Locale::Ru);
    }

    #[test]
    fn invalid_cookie_falls_through_to_header() {
        let locale = resolve_locale(Some("de"), Some("en-US,en;q=0.9"));
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn header_priority_is_fixed_not_header_order() {
        // English listed first, but Romanian has higher priority.
        let locale = resolve_locale(None, Some("en-US,en;q=0.9,ro;q=0.5"));
        assert_eq!(locale, Locale::Ro);
    }

    #[test]
    fn header_matches_region_subtags() {
        assert_eq!(resolve_locale(None, Some("ru-RU;q=0.8")), Locale::Ru);
    }

    #[test]
    fn header_does_not_match_inside_words() {
        assert_eq!(resolve_locale(None, Some("crude-nonsense")), Locale::Ro);
    }

    #[test]
    fn resolution_is_total() {
        let cookies = [None, Some(""), Some("xx"), Some("ro"), Some("ru"), Some("en")];
        let headers = [None, Some(""), Some("*;q=]["), Some("fr-FR"), Some("en")];
        for cookie in cookies {
            for header in headers {
                let locale = resolve_locale(cookie, header);
                assert!(SUPPORTED_LOCALES.contains(&locale));
            }
        }
    }

    #[test]
    fn split_detects_prefix() {
        assert_eq!(split_locale_prefix("/ro/menu"), (Some(Locale::Ro), "/menu"));
        assert_eq!(split_locale_prefix("/ru"), (Some(Locale::Ru), "/"));
        assert_eq!(split_locale_prefix("/dashboard"), (None, "/dashboard"));
        assert_eq!(split_locale_prefix("/"), (None, "/"));
        // `romania` is not the `ro` segment
        assert_eq!(split_locale_prefix("/romania"), (None, "/romania"));
    }

    #[test]
    fn prefixing_root_has_no_trailing_slash() {
        assert_eq!(with_locale_prefix(Locale::Ru, "/"), "/ru");
        assert_eq!(with_locale_prefix(Locale::Ro, "/menu"), "/ro/menu");
    }
}
