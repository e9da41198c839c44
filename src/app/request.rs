use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::Method;
use serde_json::Value;

/// The request as a handler sees it
///
/// Built fresh for every dispatch and dropped once the handler returns.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) uri_params: Vec<(String, String)>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) headers: HeaderMap,
    pub(crate) json_body: Option<Value>,
    pub(crate) raw_body: Bytes,
    pub(crate) stage: String,
}

impl Request {
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Placeholder bindings in template order
    pub fn uri_params(&self) -> &[(String, String)] {
        &self.uri_params
    }

    pub fn uri_param(&self, name: &str) -> Option<&str> {
        self.uri_params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Last value for `name` when the key is repeated; see
    /// [`query_params`](Self::query_params) for all of them
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text; lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded body, present only for a non-empty JSON request
    pub const fn json_body(&self) -> Option<&Value> {
        self.json_body.as_ref()
    }

    pub const fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Stage name from the gateway configuration
    pub fn stage(&self) -> &str {
        &self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> Request {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "secret".parse().unwrap());
        Request {
            method: Method::GET,
            path: "/hello/alice".to_string(),
            uri_params: vec![("name".to_string(), "alice".to_string())],
            query_params: vec![
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ],
            headers,
            json_body: None,
            raw_body: Bytes::new(),
            stage: "api".to_string(),
        }
    }

    #[test]
    fn test_accessors() {
        let req = make_request();
        assert_eq!(req.uri_param("name"), Some("alice"));
        assert_eq!(req.uri_param("missing"), None);
        assert_eq!(req.query_param("tag"), Some("b"));
        assert_eq!(req.query_params().len(), 2);
        assert_eq!(req.header("X-Api-Key"), Some("secret"));
        assert!(req.json_body().is_none());
    }
}
