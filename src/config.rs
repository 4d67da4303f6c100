//! Driver configuration.
//!
//! Environment variables:
//! - `LIBVOLUME_DATA_ROOT`: base directory under which the local backend
//!   provisions volume directories.  Defaults to
//!   `/var/lib/libvolume/volumes`.

use std::path::PathBuf;

use serde::Deserialize;

/// Default data root for the local-directory backend.
pub const DEFAULT_DATA_ROOT: &str = "/var/lib/libvolume/volumes";

/// Configuration for a driver instance.
///
/// Constructed explicitly and passed to the backend, never read from a
/// process-wide global, so multiple isolated driver instances can coexist
/// in one process.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Base directory for volume storage.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
}

fn default_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_ROOT)
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
        }
    }
}

impl DriverConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let data_root = std::env::var_os("LIBVOLUME_DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_root);
        Self { data_root }
    }
}
