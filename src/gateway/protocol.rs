// Ciphergate — JSON-RPC 2.0 Wire Format
//
// One request or response document per line. A request names one of the
// gateway methods and carries its arguments as a named-parameter object.
// Failures are rendered from `GatewayError`: the variant picks the code and
// its Display string is the message.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::GatewayError;

pub const VERSION: &str = "2.0";

// Envelope-level codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Gateway codes
pub const INVALID_KEY: i32 = -32010;
pub const MISSING_DATA: i32 = -32011;
pub const DECRYPTION_FAILED: i32 = -32012;
pub const ENCRYPTION_FAILED: i32 = -32013;

// ─── Methods ─────────────────────────────────────────────────────────────────

/// The operations reachable over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Encrypt,
    Decrypt,
    ListLogs,
    ClearLogs,
    Health,
    InspectKey,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Encrypt => "encrypt",
            Method::Decrypt => "decrypt",
            Method::ListLogs => "list_logs",
            Method::ClearLogs => "clear_logs",
            Method::Health => "health",
            Method::InspectKey => "inspect_key",
        }
    }
}

impl FromStr for Method {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encrypt" => Ok(Method::Encrypt),
            "decrypt" => Ok(Method::Decrypt),
            "list_logs" => Ok(Method::ListLogs),
            "clear_logs" => Ok(Method::ClearLogs),
            "health" => Ok(Method::Health),
            "inspect_key" => Ok(Method::InspectKey),
            other => Err(GatewayError::NotFound(other.to_string())),
        }
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl RpcRequest {
    /// Decode one request line. On failure the returned response is ready to
    /// send: unparseable JSON, a bad envelope, or positional params.
    pub fn parse(line: &str) -> Result<Self, RpcResponse> {
        let request: RpcRequest = serde_json::from_str(line).map_err(|e| {
            RpcResponse::rejected(Value::Null, PARSE_ERROR, format!("Parse error: {}", e))
        })?;

        if request.jsonrpc != VERSION {
            return Err(RpcResponse::rejected(
                request.id,
                INVALID_REQUEST,
                "jsonrpc must be \"2.0\"",
            ));
        }
        if request.method.is_empty() {
            return Err(RpcResponse::rejected(
                request.id,
                INVALID_REQUEST,
                "method must not be empty",
            ));
        }
        if !(request.params.is_object() || request.params.is_null()) {
            return Err(RpcResponse::rejected(
                request.id,
                INVALID_PARAMS,
                "params must be an object",
            ));
        }

        Ok(request)
    }

    pub fn method(&self) -> Result<Method, GatewayError> {
        self.method.parse()
    }

    pub fn params(&self) -> Params<'_> {
        Params(&self.params)
    }
}

/// Read-only view of a request's named parameters.
///
/// Members of the wrong JSON type count as absent, so a numeric `key`
/// surfaces as a missing key rather than a protocol error.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a Value);

impl<'a> Params<'a> {
    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Integers, truncated floats, and decimal strings.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: VERSION,
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Render a gateway failure.
    pub fn failure(id: Value, err: &GatewayError) -> Self {
        Self::with_error(id, RpcError::from(err))
    }

    /// Reject a request before it reaches the gateway.
    pub fn rejected(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self::with_error(
            id,
            RpcError {
                code,
                message: message.into(),
            },
        )
    }

    fn with_error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: VERSION,
            result: None,
            error: Some(error),
            id,
        }
    }
}

impl From<&GatewayError> for RpcError {
    fn from(err: &GatewayError) -> Self {
        let code = match err {
            GatewayError::InputMalformed(_) => INVALID_PARAMS,
            GatewayError::InvalidKey { .. } => INVALID_KEY,
            GatewayError::MissingData => MISSING_DATA,
            GatewayError::DecryptionFailed => DECRYPTION_FAILED,
            GatewayError::EncryptionFailed => ENCRYPTION_FAILED,
            GatewayError::StorageUnavailable(_) | GatewayError::Internal(_) => INTERNAL_ERROR,
            GatewayError::NotFound(_) => METHOD_NOT_FOUND,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
