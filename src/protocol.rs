//! Wire format for the volume driver protocol.
//!
//! Each exchange is one JSON-encoded request and one JSON-encoded response.
//! [`DriverRequest`] decodes an operation from its method name and request
//! body; [`DriverResponse`] is the single envelope shape shared by every
//! response, carrying either a payload or a non-empty `Err` string.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::DriverError;
use crate::types::{Capabilities, VolumeRecord, VolumeSummary};

/// Method name for the capabilities query.
pub const METHOD_CAPABILITIES: &str = "VolumeDriver.Capabilities";
/// Method name for listing volumes.
pub const METHOD_LIST: &str = "VolumeDriver.List";
/// Method name for creating a volume.
pub const METHOD_CREATE: &str = "VolumeDriver.Create";
/// Method name for removing a volume.
pub const METHOD_REMOVE: &str = "VolumeDriver.Remove";
/// Method name for inspecting a volume.
pub const METHOD_GET: &str = "VolumeDriver.Get";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of a `VolumeDriver.Create` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Requested volume name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Creation-time parameters forwarded to the backend.
    /// Older clients send this field as `Opts`.
    #[serde(rename = "Options", alias = "Opts", default)]
    pub options: HashMap<String, String>,
}

/// Body of a request that addresses one volume by name (`Remove`, `Get`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRequest {
    /// Volume name.
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// A decoded protocol operation.
#[derive(Debug, Clone)]
pub enum DriverRequest {
    /// Query driver capabilities.
    Capabilities,
    /// List all registered volumes.
    List,
    /// Create a named volume.
    Create(CreateRequest),
    /// Remove a named volume.
    Remove(NameRequest),
    /// Inspect a named volume.
    Get(NameRequest),
}

impl DriverRequest {
    /// Decode an operation from its method name and JSON request body.
    ///
    /// An unknown method or a body that fails to deserialize is a
    /// [`DriverError::Protocol`] — the protocol contract itself was
    /// violated, so this is the one failure class that does not go through
    /// the response envelope.
    ///
    /// Operations without request fields accept any body, including an empty
    /// one: clients conventionally send `{}`.
    pub fn parse(method: &str, body: &[u8]) -> Result<Self, DriverError> {
        match method {
            METHOD_CAPABILITIES => Ok(Self::Capabilities),
            METHOD_LIST => Ok(Self::List),
            METHOD_CREATE => {
                let req: CreateRequest = serde_json::from_slice(body)
                    .map_err(|e| DriverError::Protocol(format!("malformed request: {e}")))?;
                Ok(Self::Create(req))
            }
            METHOD_REMOVE => {
                let req: NameRequest = serde_json::from_slice(body)
                    .map_err(|e| DriverError::Protocol(format!("malformed request: {e}")))?;
                Ok(Self::Remove(req))
            }
            METHOD_GET => {
                let req: NameRequest = serde_json::from_slice(body)
                    .map_err(|e| DriverError::Protocol(format!("malformed request: {e}")))?;
                Ok(Self::Get(req))
            }
            other => Err(DriverError::Protocol(format!("unknown method: {other}"))),
        }
    }
}

impl fmt::Display for DriverRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capabilities => f.write_str("Capabilities"),
            Self::List => f.write_str("List"),
            Self::Create(req) => write!(f, "Create(name={})", req.name),
            Self::Remove(req) => write!(f, "Remove(name={})", req.name),
            Self::Get(req) => write!(f, "Get(name={})", req.name),
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// The uniform response envelope.
///
/// Exactly one payload field is populated on success (or none, for `Create`
/// and `Remove`); `err` is non-empty exactly when the operation failed.
/// Unused payload fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverResponse {
    /// Full record returned by `Get`.
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeRecord>,
    /// Summaries returned by `List`.
    #[serde(rename = "Volumes", default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeSummary>>,
    /// Capabilities returned by `Capabilities`.
    #[serde(
        rename = "Capabilities",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub capabilities: Option<Capabilities>,
    /// Error message; empty on success.
    #[serde(rename = "Err", default)]
    pub err: String,
}

impl DriverResponse {
    /// Successful response with no payload (`Create`, `Remove`).
    pub fn ok() -> Self {
        Self::default()
    }

    /// Failure response carrying the error message in the `Err` field.
    pub fn error(err: &DriverError) -> Self {
        Self {
            err: err.to_string(),
            ..Self::default()
        }
    }

    /// Successful `Get` response.
    pub fn with_volume(record: VolumeRecord) -> Self {
        Self {
            volume: Some(record),
            ..Self::default()
        }
    }

    /// Successful `List` response.
    pub fn with_volumes(volumes: Vec<VolumeSummary>) -> Self {
        Self {
            volumes: Some(volumes),
            ..Self::default()
        }
    }

    /// Successful `Capabilities` response.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities: Some(capabilities),
            ..Self::default()
        }
    }
}
