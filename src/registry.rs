//! The volume registry: sole authority over the name→record mapping.
//!
//! [`VolumeRegistry`] serializes all mutations behind a single async mutex
//! held across the whole validate → backend-call → mutate sequence, so
//! concurrent creates and removes of the same name are linearized and
//! readers never observe a half-inserted or half-removed record.  A global
//! lock is deliberate at this scale; the map is small and backend calls are
//! the only await points inside the critical section.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::backend::VolumeBackend;
use crate::error::DriverError;
use crate::types::{Capabilities, VolumeRecord, VolumeSummary};

/// Concurrency-safe registry mapping volume names to volume records.
///
/// Construct one per driver instance and share it via [`Arc`]; it is never
/// a process-wide singleton, so tests can run isolated instances side by
/// side.
pub struct VolumeRegistry {
    backend: Arc<dyn VolumeBackend>,
    /// `BTreeMap` keeps `list` output in name order, deterministic across
    /// the process lifetime.
    volumes: Mutex<BTreeMap<String, VolumeRecord>>,
}

impl VolumeRegistry {
    /// Create an empty registry delegating physical storage to `backend`.
    pub fn new(backend: Arc<dyn VolumeBackend>) -> Self {
        Self {
            backend,
            volumes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create a named volume.
    ///
    /// Fails with [`DriverError::InvalidArgument`] on an empty name,
    /// [`DriverError::AlreadyExists`] on a duplicate, and
    /// [`DriverError::BackendError`] when provisioning fails — in which
    /// case no record is inserted, so the name is either fully present with
    /// a usable mount point or absent.
    #[instrument(skip(self, options))]
    pub async fn create(
        &self,
        name: &str,
        options: HashMap<String, String>,
    ) -> Result<(), DriverError> {
        if name.is_empty() {
            warn!("create rejected: empty volume name");
            return Err(DriverError::InvalidArgument(
                "volume name must not be empty".into(),
            ));
        }

        // Hold the lock across validate → provision → insert so a
        // concurrent create of the same name cannot interleave.
        let mut volumes = self.volumes.lock().await;

        if volumes.contains_key(name) {
            warn!(name, "create rejected: name already registered");
            return Err(DriverError::AlreadyExists(name.to_owned()));
        }

        let mount_point = self.backend.provision(name, &options).await?;

        volumes.insert(
            name.to_owned(),
            VolumeRecord {
                name: name.to_owned(),
                mount_point: mount_point.to_string_lossy().into_owned(),
                options,
                status: HashMap::new(),
            },
        );

        info!(name, "volume created");
        Ok(())
    }

    /// Remove a named volume.
    ///
    /// Fails with [`DriverError::NotFound`] when the name is absent, and
    /// with [`DriverError::BackendError`] when teardown fails — in which
    /// case the record is retained, so registry state is never silently
    /// lost on a backend failure.
    #[instrument(skip(self))]
    pub async fn remove(&self, name: &str) -> Result<(), DriverError> {
        let mut volumes = self.volumes.lock().await;

        if !volumes.contains_key(name) {
            warn!(name, "remove rejected: name not registered");
            return Err(DriverError::NotFound(name.to_owned()));
        }

        // Tear down physical storage first; the record is deleted only once
        // the backend is clean, so a failed teardown can be retried.
        self.backend.teardown(name).await?;
        volumes.remove(name);

        info!(name, "volume removed");
        Ok(())
    }

    /// Summaries of all registered volumes, in name order.
    pub async fn list(&self) -> Vec<VolumeSummary> {
        let volumes = self.volumes.lock().await;
        volumes.values().map(VolumeSummary::from).collect()
    }

    /// Full record for a named volume, with `status` refreshed from the
    /// backend.
    pub async fn get(&self, name: &str) -> Result<VolumeRecord, DriverError> {
        let record = {
            let volumes = self.volumes.lock().await;
            volumes
                .get(name)
                .cloned()
                .ok_or_else(|| DriverError::NotFound(name.to_owned()))?
        };

        // Status is advisory and owned by the backend; refreshing it
        // outside the lock keeps reads from serializing behind mutations.
        let status = self.backend.describe(name).await;
        Ok(VolumeRecord { status, ..record })
    }

    /// Static driver capabilities.  Volumes managed here are host-scoped.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Number of registered volumes.
    pub async fn len(&self) -> usize {
        self.volumes.lock().await.len()
    }

    /// Whether the registry holds no volumes.
    pub async fn is_empty(&self) -> bool {
        self.volumes.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::types::Scope;

    fn make_registry() -> (Arc<MemoryBackend>, VolumeRegistry) {
        let backend = Arc::new(MemoryBackend::new());
        let registry = VolumeRegistry::new(backend.clone());
        (backend, registry)
    }

    #[tokio::test]
    async fn capabilities_scope_is_local() {
        let (_, registry) = make_registry();
        assert_eq!(registry.capabilities().scope, Scope::Local);
    }

    #[tokio::test]
    async fn create_list_get_remove() {
        let (_, registry) = make_registry();

        registry
            .create("data", HashMap::from([("size".into(), "1g".into())]))
            .await
            .unwrap();

        let list = registry.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "data");
        assert!(!list[0].mount_point.is_empty());

        let record = registry.get("data").await.unwrap();
        assert_eq!(record.name, "data");
        assert_eq!(record.options.get("size").map(String::as_str), Some("1g"));
        assert_eq!(
            record.status.get("provisioned"),
            Some(&serde_json::json!(true))
        );

        registry.remove("data").await.unwrap();
        assert!(registry.is_empty().await);
        assert!(matches!(
            registry.get("data").await,
            Err(DriverError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_empty_name_rejected() {
        let (backend, registry) = make_registry();
        let err = registry.create("", HashMap::new()).await.unwrap_err();
        assert!(matches!(err, DriverError::InvalidArgument(_)));
        assert!(registry.is_empty().await);
        assert_eq!(backend.provisioned_count(), 0);
    }

    #[tokio::test]
    async fn create_duplicate_rejected_without_overwrite() {
        let (backend, registry) = make_registry();
        registry
            .create("dup", HashMap::from([("k".into(), "v1".into())]))
            .await
            .unwrap();

        let err = registry
            .create("dup", HashMap::from([("k".into(), "v2".into())]))
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::AlreadyExists(_)));

        // Exactly one record survives, and it is the original.
        assert_eq!(registry.len().await, 1);
        let record = registry.get("dup").await.unwrap();
        assert_eq!(record.options.get("k").map(String::as_str), Some("v1"));
        assert_eq!(backend.provisioned_count(), 1);
    }

    #[tokio::test]
    async fn remove_missing_rejected() {
        let (_, registry) = make_registry();
        registry.create("keep", HashMap::new()).await.unwrap();

        let err = registry.remove("missing").await.unwrap_err();
        assert!(matches!(err, DriverError::NotFound(_)));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn provision_failure_rolls_back() {
        let (backend, registry) = make_registry();
        backend.set_fail_provision(true);

        let err = registry.create("doomed", HashMap::new()).await.unwrap_err();
        assert!(matches!(err, DriverError::BackendError(_)));
        assert!(registry.is_empty().await);

        // The name must be reusable once the backend recovers.
        backend.set_fail_provision(false);
        registry.create("doomed", HashMap::new()).await.unwrap();
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn teardown_failure_retains_record() {
        let (backend, registry) = make_registry();
        registry.create("sticky", HashMap::new()).await.unwrap();

        backend.set_fail_teardown(true);
        let err = registry.remove("sticky").await.unwrap_err();
        assert!(matches!(err, DriverError::BackendError(_)));
        assert_eq!(registry.len().await, 1);
        assert!(registry.get("sticky").await.is_ok());

        backend.set_fail_teardown(false);
        registry.remove("sticky").await.unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn removed_name_is_reusable() {
        let (_, registry) = make_registry();
        registry.create("cycle", HashMap::new()).await.unwrap();
        registry.remove("cycle").await.unwrap();
        registry.create("cycle", HashMap::new()).await.unwrap();
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn list_is_name_ordered() {
        let (_, registry) = make_registry();
        for name in ["zeta", "alpha", "mid"] {
            registry.create(name, HashMap::new()).await.unwrap();
        }
        let names: Vec<_> = registry.list().await.into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn concurrent_distinct_creates_all_succeed() {
        let backend = Arc::new(MemoryBackend::new());
        let registry = Arc::new(VolumeRegistry::new(backend));

        let mut handles = Vec::new();
        for i in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.create(&format!("vol-{i}"), HashMap::new()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(registry.len().await, 16);
    }

    #[tokio::test]
    async fn concurrent_same_name_creates_yield_one_winner() {
        let backend = Arc::new(MemoryBackend::new());
        let registry = Arc::new(VolumeRegistry::new(backend));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.create("contended", HashMap::new()).await
            }));
        }

        let mut ok = 0;
        let mut already_exists = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(DriverError::AlreadyExists(_)) => already_exists += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(already_exists, 15);
        assert_eq!(registry.len().await, 1);
    }
}
