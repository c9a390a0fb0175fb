//! Minimal `Content-Type` inspection
//!
//! Only what body classification needs: the media type, the `charset`
//! parameter, and whether the type is JSON or textual.

/// Media type without parameters, trimmed.
#[must_use]
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
}

/// Value of the `charset` parameter, if present.
#[must_use]
pub fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// `application/json` or any `+json` structured syntax suffix.
#[must_use]
pub fn is_json(content_type: &str) -> bool {
    let media = media_type(content_type);
    media.eq_ignore_ascii_case("application/json")
        || media
            .get(media.len().saturating_sub(5)..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case("+json"))
}

/// Textual bodies are `text/*` types or anything declaring a charset.
#[must_use]
pub fn is_textual(content_type: &str) -> bool {
    let media = media_type(content_type);
    media
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"))
        || charset(content_type).is_some()
}
