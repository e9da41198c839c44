//! Routing module
//!
//! Path template parsing and the route table used by the gateway:
//! - Literal and `{placeholder}` segments
//! - Resource-first lookup with literal-over-placeholder precedence
//! - Conflict detection at registration time

mod matcher;
mod pattern;

pub use matcher::RouteTable;
pub use pattern::PathPattern;
