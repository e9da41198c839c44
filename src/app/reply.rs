use serde::Serialize;
use serde_json::Value;

use crate::error::HandlerError;
use crate::http::Response;

/// What a handler hands back to the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Serialized as JSON into a 200 response
    Json(Value),
    /// Returned as-is: custom status, headers and body
    Response(Response),
}

impl Reply {
    /// Serialize any value into a JSON reply
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(HandlerError::internal)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
