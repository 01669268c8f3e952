use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a storage-folder / anchor slug from a display name.
///
/// Decomposes to NFKD and drops combining marks, so Romanian diacritics
/// reduce to their base letters. Runs of anything non-alphanumeric collapse
/// to a single `-`, with no leading or trailing separator.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Page-anchor slug for category links. Unlike [`slugify`] this keeps
/// non-Latin scripts intact, so Russian names still anchor.
pub fn anchor_slug(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
