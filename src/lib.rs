//! # libvolume — named-volume lifecycle driver core
//!
//! `libvolume` implements the driver side of a narrow JSON volume protocol
//! that a container runtime uses to create, enumerate, inspect, and remove
//! named storage volumes.  It provides a concurrency-safe registry mapping
//! volume names to volume records, a stateless request dispatcher producing
//! the protocol's uniform response envelope, and a pluggable storage backend
//! abstraction (Tokio async runtime, `tracing` for observability,
//! `thiserror` for structured errors).
//!
//! Transport setup (HTTP listener, routing, plugin discovery handshake) is
//! deliberately out of scope: embedders feed raw method names and JSON
//! request bodies into [`Dispatcher::handle`] and write the returned bytes
//! back to the caller.
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | Core data model: `VolumeRecord`, summaries, capabilities. |
//! | [`error`] | [`DriverError`] enum covering all failure modes. |
//! | [`protocol`] | Wire format: request parsing and the response envelope. |
//! | [`registry`] | [`VolumeRegistry`] — the name→record map and its locking. |
//! | [`dispatch`] | [`Dispatcher`] — protocol operation → registry call. |
//! | [`backend`] | Pluggable storage backends (local directory, in-memory). |
//! | [`config`] | Driver configuration with environment overrides. |

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod types;

// Re-export the most commonly used items at crate root for convenience.
pub use backend::VolumeBackend;
pub use config::DriverConfig;
pub use dispatch::Dispatcher;
pub use error::DriverError;
pub use protocol::{DriverRequest, DriverResponse};
pub use registry::VolumeRegistry;
pub use types::*;
