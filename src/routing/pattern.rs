//! Path template parsing
//!
//! Templates look like `/users/{id}/orders`. A placeholder always covers a
//! whole segment. The root template `/` is the only one allowed to end in a
//! slash.

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parsed route template
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = raw.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };

        if rest.is_empty() {
            return Ok(Self {
                raw: raw.to_string(),
                segments: vec![Segment::Literal(String::new())],
            });
        }
        if rest.ends_with('/') {
            return Err(invalid("must not end with a trailing slash"));
        }

        let mut segments = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Err(invalid("contains an empty segment"));
            }
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(invalid("placeholder has no name"));
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid("placeholder names may only use [A-Za-z0-9_]"));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                {
                    return Err(invalid(&format!("placeholder '{name}' is used twice")));
                }
                segments.push(Segment::Param(name.to_string()));
            } else if part.contains(['{', '}']) {
                return Err(invalid("a placeholder must span a whole segment"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Same literals, placeholders in the same positions. Names are ignored.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Match request path segments, returning bound placeholders in template order.
    pub fn match_segments(&self, segments: &[&str]) -> Option<Vec<(String, String)>> {
        if segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (pattern, actual) in self.segments.iter().zip(segments) {
            match pattern {
                Segment::Literal(lit) if lit == actual => {}
                Segment::Param(name) if !actual.is_empty() => {
                    params.push((name.clone(), (*actual).to_string()));
                }
                _ => return None,
            }
        }
        Some(params)
    }

    /// Ordering key for precedence: at the first differing position a
    /// literal segment outranks a placeholder.
    pub fn specificity(&self) -> Vec<bool> {
        self.segments
            .iter()
            .map(|s| matches!(s, Segment::Literal(_)))
            .collect()
    }
}

/// Split a request path (query already removed) into segments.
///
/// One trailing slash is dropped from non-root paths, so `/users/` and
/// `/users` address the same resource.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/')
        .filter(|trimmed| !trimmed.is_empty())
        .unwrap_or(path)
        .split('/')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert_eq!(pattern.match_segments(&split_path("/")), Some(vec![]));
        assert!(pattern.match_segments(&split_path("/users")).is_none());
    }

    #[test]
    fn test_parse_rejects_bad_templates() {
        for bad in [
            "users",
            "/users/",
            "/a//b",
            "/{}",
            "/user-{id}",
            "/{id}/{id}",
            "/{na-me}",
        ] {
            assert!(
                matches!(PathPattern::parse(bad), Err(RouteError::InvalidPattern { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_match_binds_placeholders() {
        let pattern = PathPattern::parse("/hello/{name}").unwrap();
        assert_eq!(
            pattern.match_segments(&split_path("/hello/alice")),
            Some(vec![("name".to_string(), "alice".to_string())])
        );
        assert!(pattern.match_segments(&split_path("/hello/")).is_none());
        assert!(pattern.match_segments(&split_path("/hello")).is_none());
        assert!(pattern.match_segments(&split_path("/hello/alice/bob")).is_none());
    }

    #[test]
    fn test_single_trailing_slash_is_stripped() {
        let pattern = PathPattern::parse("/users").unwrap();
        assert!(pattern.match_segments(&split_path("/users")).is_some());
        assert!(pattern.match_segments(&split_path("/users/")).is_some());
        assert!(pattern.match_segments(&split_path("/users//")).is_none());
        assert_eq!(split_path("/"), vec![""]);
    }

    #[test]
    fn test_same_shape_ignores_names() {
        let a = PathPattern::parse("/users/{id}").unwrap();
        let b = PathPattern::parse("/users/{user_id}").unwrap();
        let c = PathPattern::parse("/users/me").unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
        assert_eq!(b.param_names().collect::<Vec<_>>(), vec!["user_id"]);
    }

    #[test]
    fn test_specificity_prefers_literals() {
        let literal = PathPattern::parse("/users/me").unwrap();
        let param = PathPattern::parse("/users/{id}").unwrap();
        assert!(literal.specificity() > param.specificity());

        let early_literal = PathPattern::parse("/a/{x}").unwrap();
        let late_literal = PathPattern::parse("/{x}/b").unwrap();
        assert!(early_literal.specificity() > late_literal.specificity());
    }
}
