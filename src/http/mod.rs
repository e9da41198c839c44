//! HTTP protocol layer module
//!
//! The response envelope plus content-type handling.

pub mod content_type;
pub mod response;

pub use response::{
    apply_cors_headers, build_404_response, build_405_response, build_413_response,
    build_error_response, build_json_response, build_preflight_response, Response,
};
