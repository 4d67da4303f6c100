//! Driver error types.
//!
//! All errors in the `libvolume` crate are represented by the
//! [`DriverError`] enum, which derives [`thiserror::Error`] for ergonomic
//! error handling and also implements [`Serialize`]/[`Deserialize`] so
//! errors can be embedded in structured diagnostics.
//!
//! Only [`DriverError::Protocol`] is allowed to surface past the dispatcher
//! as a transport-level failure; every other variant is flattened into the
//! response envelope's `Err` string at the protocol boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for volume driver operations.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The caller supplied a malformed or missing required field.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A volume with the requested name already exists.
    #[error("volume {0} already exists")]
    AlreadyExists(String),

    /// The requested volume was not found.
    #[error("volume {0} not found")]
    NotFound(String),

    /// The storage backend failed to provision or tear down a volume.
    #[error("backend error: {0}")]
    BackendError(String),

    /// The wire envelope itself could not be decoded or encoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl DriverError {
    /// Create a [`DriverError::BackendError`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn backend<E: std::fmt::Display>(e: E) -> Self {
        Self::BackendError(e.to_string())
    }

    /// Create a [`DriverError::Protocol`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn protocol<E: std::fmt::Display>(e: E) -> Self {
        Self::Protocol(e.to_string())
    }

    /// Whether this error must surface as a transport failure instead of
    /// being reported through the response envelope.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DriverError::NotFound("vol-123".into());
        assert_eq!(err.to_string(), "volume vol-123 not found");

        let err = DriverError::AlreadyExists("data".into());
        assert_eq!(err.to_string(), "volume data already exists");
    }

    #[test]
    fn error_serde_roundtrip() {
        let err = DriverError::BackendError("disk full".into());
        let json = serde_json::to_string(&err).expect("serialize");
        let de: DriverError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(err, de);
    }

    #[test]
    fn transport_classification() {
        assert!(DriverError::protocol("bad json").is_transport());
        assert!(!DriverError::NotFound("x".into()).is_transport());
        assert!(!DriverError::backend("io").is_transport());
    }
}
