//! Hand-written wire types for the handful of CDP commands we actually use
//!
//! These replace generated protocol bindings with a minimal set that's just
//! enough for cookie work over the debug port.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Fixed request id. Only one command is ever in flight per connection,
/// so there is no id allocation and no pending-request table.
pub const REQUEST_ID: u64 = 1;

/// Outbound command frame: `{"id": 1, "method": "...", "params": {...}}`.
///
/// `params` is omitted entirely (not serialized as `null`) when absent,
/// matching what the browser expects for parameterless commands.
#[derive(Debug, Clone, Serialize)]
pub struct CommandEnvelope {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl CommandEnvelope {
    /// Create a parameterless command
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: REQUEST_ID,
            method: method.into(),
            params: None,
        }
    }

    /// Create a command with a params object
    pub fn with_params(method: impl Into<String>, params: Value) -> Self {
        Self {
            id: REQUEST_ID,
            method: method.into(),
            params: Some(params),
        }
    }
}

/// Error member of a response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CdpErrorPayload {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Inbound response frame: `{"id": n, "result": {...}}` or
/// `{"id": n, "error": {"code": ..., "message": ...}}`.
///
/// Every field decodes via defaults; a sparse or empty response object is
/// not a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<CdpErrorPayload>,
}

impl ResponseEnvelope {
    /// Decode a response envelope from a raw text frame payload
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Deserialize the result payload into a typed shape
    pub fn result_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.result.clone())?)
    }

    /// Convert the error member, if present, into an `Error::Cdp`
    pub fn check_error(&self) -> Result<()> {
        match &self.error {
            Some(e) => Err(Error::cdp(e.code, e.message.clone())),
            None => Ok(()),
        }
    }
}

/// Result payload of `Storage.getCookies` / `Network.getAllCookies`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CookieListResult {
    #[serde(default)]
    pub cookies: Vec<Cookie>,
}

/// Full protocol cookie record, mirrored verbatim from the browser.
///
/// All fields are optional from our side: whatever the browser omits
/// decodes to the field's default instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: String,
    /// Expiration as fractional epoch seconds; -1 for session cookies
    #[serde(default)]
    pub expires: f64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub session: bool,
    #[serde(default)]
    pub same_site: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}
