//! Content-Type classification
//!
//! Media types are compared without parameters and case-insensitively, so
//! `Application/JSON; charset=utf-8` is treated as `application/json`.

/// Default accepted request content types for a route
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["application/json"];

/// Strip parameters and normalise case
pub fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// JSON or a structured `+json` suffix type (e.g. `application/problem+json`)
pub fn is_json(media_type: &str) -> bool {
    media_type == "application/json"
        || (media_type.starts_with("application/") && media_type.ends_with("+json"))
}

/// Whether `media_type` is one of `accepted`; `*/*` accepts anything
pub fn is_accepted(media_type: &str, accepted: &[String]) -> bool {
    accepted.iter().any(|a| {
        let a = self::media_type(a);
        a == "*/*"
            || a == media_type
            || a.strip_suffix("/*")
                .is_some_and(|major| media_type.split('/').next() == Some(major))
    })
}
