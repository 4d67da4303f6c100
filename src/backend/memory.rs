//! In-memory mock backend.
//!
//! [`MemoryBackend`] allocates no real storage: mount points are synthetic
//! paths under a virtual root.  It exists so registry concurrency and
//! rollback behavior can be tested without touching the filesystem, and it
//! supports failure injection for both provision and teardown.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::DriverError;

use super::VolumeBackend;

/// Backend that tracks volumes purely in memory.
#[derive(Default)]
pub struct MemoryBackend {
    /// Synthetic mount points, keyed by volume name.
    mounts: DashMap<String, PathBuf>,
    /// When set, the next and all following provisions fail.
    fail_provision: AtomicBool,
    /// When set, the next and all following teardowns fail.
    fail_teardown: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle provision failure injection.
    pub fn set_fail_provision(&self, fail: bool) {
        self.fail_provision.store(fail, Ordering::SeqCst);
    }

    /// Toggle teardown failure injection.
    pub fn set_fail_teardown(&self, fail: bool) {
        self.fail_teardown.store(fail, Ordering::SeqCst);
    }

    /// Number of volumes currently provisioned.
    pub fn provisioned_count(&self) -> usize {
        self.mounts.len()
    }
}

#[async_trait]
impl VolumeBackend for MemoryBackend {
    async fn provision(
        &self,
        name: &str,
        _options: &HashMap<String, String>,
    ) -> Result<PathBuf, DriverError> {
        if self.fail_provision.load(Ordering::SeqCst) {
            return Err(DriverError::BackendError(format!(
                "injected provision failure for {name}"
            )));
        }
        let mount_point = PathBuf::from("/mnt/volumes").join(name);
        self.mounts.insert(name.to_owned(), mount_point.clone());
        Ok(mount_point)
    }

    async fn teardown(&self, name: &str) -> Result<(), DriverError> {
        if self.fail_teardown.load(Ordering::SeqCst) {
            return Err(DriverError::BackendError(format!(
                "injected teardown failure for {name}"
            )));
        }
        self.mounts.remove(name);
        Ok(())
    }

    async fn describe(&self, name: &str) -> HashMap<String, serde_json::Value> {
        let provisioned = self.mounts.contains_key(name);
        HashMap::from([("provisioned".to_owned(), serde_json::json!(provisioned))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provision_and_teardown() {
        let backend = MemoryBackend::new();
        let path = backend.provision("v1", &HashMap::new()).await.unwrap();
        assert_eq!(path, PathBuf::from("/mnt/volumes/v1"));
        assert_eq!(backend.provisioned_count(), 1);

        let status = backend.describe("v1").await;
        assert_eq!(status.get("provisioned"), Some(&serde_json::json!(true)));

        backend.teardown("v1").await.unwrap();
        assert_eq!(backend.provisioned_count(), 0);
    }

    #[tokio::test]
    async fn failure_injection() {
        let backend = MemoryBackend::new();

        backend.set_fail_provision(true);
        let err = backend.provision("v1", &HashMap::new()).await.unwrap_err();
        assert!(matches!(err, DriverError::BackendError(_)));
        assert_eq!(backend.provisioned_count(), 0);

        backend.set_fail_provision(false);
        backend.provision("v1", &HashMap::new()).await.unwrap();

        backend.set_fail_teardown(true);
        let err = backend.teardown("v1").await.unwrap_err();
        assert!(matches!(err, DriverError::BackendError(_)));
        assert_eq!(backend.provisioned_count(), 1);
    }
}
