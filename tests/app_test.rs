use local_gateway::{demo, GatewayConfig, LocalGateway, Response, NO_HEADERS};
use serde_json::{json, Value};

const JSON_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

fn gateway_factory(config: Option<GatewayConfig>) -> LocalGateway {
    let app = demo::app().unwrap();
    LocalGateway::new(app, config.unwrap_or_default())
}

fn body(response: &Response) -> Value {
    response.json().unwrap()
}

#[test]
fn test_index() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("GET", "/", NO_HEADERS, "");
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(body(&response), json!({"hello": "world"}));
}

#[test]
fn test_hello() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("GET", "/hello/alice", NO_HEADERS, "");
    assert_eq!(response.status_code(), 200);
    assert_eq!(body(&response), json!({"hello": "alice"}));
}

#[test]
fn test_hello_name_is_bound_verbatim() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("GET", "/hello/a%20b", NO_HEADERS, "");
    assert_eq!(body(&response), json!({"hello": "a%20b"}));
}

#[test]
fn test_users_with_trailing_slash() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("POST", "/users/", JSON_HEADERS, r#"["carol"]"#);
    assert_eq!(response.status_code(), 200);
    assert_eq!(body(&response), json!({"user": ["carol"]}));
}

#[test]
fn test_users() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("POST", "/users", JSON_HEADERS, r#"["alice","bob"]"#);
    assert_eq!(response.status_code(), 200);
    assert_eq!(body(&response), json!({"user": ["alice", "bob"]}));
}

#[test]
fn test_unknown_path_is_404() {
    let gateway = gateway_factory(None);
    for method in ["GET", "POST", "DELETE"] {
        let response = gateway.dispatch(method, "/nope", NO_HEADERS, "");
        assert_eq!(response.status_code(), 404);
        assert_eq!(body(&response)["Code"], "NotFoundError");
    }
}

#[test]
fn test_wrong_method_is_405() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("GET", "/users", NO_HEADERS, "");
    assert_eq!(response.status_code(), 405);
    assert_eq!(response.header("allow"), Some("POST"));
}

#[test]
fn test_malformed_json_is_400() {
    let gateway = gateway_factory(None);
    let response = gateway.dispatch("POST", "/users", JSON_HEADERS, "{not json");
    assert_eq!(response.status_code(), 400);
    assert_eq!(body(&response)["Code"], "BadRequestError");
}

#[test]
fn test_hello_needs_a_name_segment() {
    let gateway = gateway_factory(None);
    assert_eq!(gateway.dispatch("GET", "/hello", NO_HEADERS, "").status_code(), 404);
    assert_eq!(gateway.dispatch("GET", "/hello/a/b", NO_HEADERS, "").status_code(), 404);
}

#[test]
fn test_dispatch_is_repeatable() {
    let gateway = gateway_factory(None);
    let first = gateway.dispatch("POST", "/users", JSON_HEADERS, r#"{"name":"carol"}"#);
    let second = gateway.dispatch("POST", "/users", JSON_HEADERS, r#"{"name":"carol"}"#);
    assert_eq!(first, second);
}

#[test]
fn test_body_limit_from_config() {
    let config = GatewayConfig {
        max_body_size: 4,
        ..GatewayConfig::default()
    };
    let gateway = gateway_factory(Some(config));
    let response = gateway.dispatch("POST", "/users", JSON_HEADERS, r#"["alice"]"#);
    assert_eq!(response.status_code(), 413);
}
