//! Local-directory storage backend.
//!
//! [`LocalDirBackend`] backs each volume with a directory under a
//! configurable data root:
//!
//! ```text
//! <data_root>/
//!   <volume-name>/    # mount point handed to the container runtime
//! ```
//!
//! No mounting is performed; the directory itself is the volume.  Status
//! reporting includes the provision timestamp and the free capacity of the
//! filesystem holding the data root.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, instrument};

use crate::config::DriverConfig;
use crate::error::DriverError;

use super::VolumeBackend;

/// Backend that provisions one directory per volume under a data root.
pub struct LocalDirBackend {
    /// Root directory for all volume directories.
    data_root: PathBuf,
    /// Provision timestamps, keyed by volume name.
    provisioned: DashMap<String, SystemTime>,
}

impl LocalDirBackend {
    /// Create a backend rooted at the configured data directory.
    ///
    /// The data root itself is created lazily on the first provision.
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            data_root: config.data_root.clone(),
            provisioned: DashMap::new(),
        }
    }

    /// Resolve the on-disk directory for a volume.
    fn volume_path(&self, name: &str) -> PathBuf {
        self.data_root.join(name)
    }

    /// Reject names that would escape the data root.
    ///
    /// Volume names become path components, so separators and parent
    /// references are never acceptable here regardless of what the registry
    /// validated.
    fn check_name(name: &str) -> Result<(), DriverError> {
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(DriverError::InvalidArgument(format!(
                "volume name {name:?} is not a valid path component"
            )));
        }
        Ok(())
    }

    /// Free capacity in bytes of the filesystem holding the data root.
    fn free_capacity(&self) -> Option<u64> {
        let stat = nix::sys::statvfs::statvfs(&self.data_root).ok()?;
        Some(stat.fragment_size() * stat.blocks_available())
    }
}

#[async_trait]
impl VolumeBackend for LocalDirBackend {
    #[instrument(skip(self, _options))]
    async fn provision(
        &self,
        name: &str,
        _options: &HashMap<String, String>,
    ) -> Result<PathBuf, DriverError> {
        Self::check_name(name)?;

        let path = self.volume_path(name);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| DriverError::BackendError(format!("create dir {}: {e}", path.display())))?;

        self.provisioned.insert(name.to_owned(), SystemTime::now());
        info!(path = %path.display(), "volume directory provisioned");
        Ok(path)
    }

    #[instrument(skip(self))]
    async fn teardown(&self, name: &str) -> Result<(), DriverError> {
        Self::check_name(name)?;

        let path = self.volume_path(name);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {}
            // Already gone counts as torn down.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "volume directory already absent");
            }
            Err(e) => {
                return Err(DriverError::BackendError(format!(
                    "remove dir {}: {e}",
                    path.display()
                )));
            }
        }

        self.provisioned.remove(name);
        info!(path = %path.display(), "volume directory removed");
        Ok(())
    }

    async fn describe(&self, name: &str) -> HashMap<String, serde_json::Value> {
        let mut status = HashMap::new();

        let exists = tokio::fs::metadata(self.volume_path(name))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        status.insert("mounted".to_owned(), serde_json::json!(exists));

        if let Some(ts) = self.provisioned.get(name) {
            if let Ok(since_epoch) = ts.duration_since(UNIX_EPOCH) {
                status.insert(
                    "provisioned_at".to_owned(),
                    serde_json::json!(since_epoch.as_secs()),
                );
            }
        }

        if let Some(free) = self.free_capacity() {
            status.insert("free_bytes".to_owned(), serde_json::json!(free));
        }

        status
    }
}
