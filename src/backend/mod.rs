//! Pluggable storage backends.
//!
//! The registry delegates all physical provisioning and teardown to a
//! [`VolumeBackend`].  Two implementations ship with the crate:
//! [`local::LocalDirBackend`] backs each volume with a directory on the
//! local filesystem, and [`memory::MemoryBackend`] is a pure in-memory
//! variant for exercising registry logic without filesystem access.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::DriverError;

pub mod local;
pub mod memory;

pub use local::LocalDirBackend;
pub use memory::MemoryBackend;

/// Capability interface for physical volume storage.
///
/// The registry treats implementations as pure delegates: a backend owns no
/// registry state, and on its own failure it is responsible for cleaning up
/// whatever partial resources it allocated.
#[async_trait]
pub trait VolumeBackend: Send + Sync {
    /// Allocate physical storage for a new volume and return its mount point.
    async fn provision(
        &self,
        name: &str,
        options: &HashMap<String, String>,
    ) -> Result<PathBuf, DriverError>;

    /// Release the physical storage behind a volume.
    async fn teardown(&self, name: &str) -> Result<(), DriverError>;

    /// Report backend-side metadata for a volume.
    ///
    /// Best-effort: unknown names yield an empty mapping rather than an
    /// error, since status is advisory.
    async fn describe(&self, name: &str) -> HashMap<String, serde_json::Value>;
}
