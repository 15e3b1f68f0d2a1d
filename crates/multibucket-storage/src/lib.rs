//! Multibucket Storage Library
//!
//! This crate constructs configured S3 storage backends from the multibucket
//! settings snapshot. A [`BackendDef`] binds a resolution strategy (module
//! name or setting key) and a captured set of default parameters; each
//! instantiation resolves the snapshot, merges caller overrides on top, and
//! hands the final parameter set to the external S3 client.
//!
//! Construction performs no network I/O; the underlying client connects
//! lazily on first use.

pub mod backend;
pub mod error;
pub mod factory;
pub mod s3;

// Re-export commonly used types
pub use backend::{BackendDef, ResolveBy};
pub use error::{StorageError, StorageResult};
pub use factory::{create_backend_class, sanitize_class_label};
pub use multibucket_core::{BucketConfig, KeyLookup, StorageParams, StorageSettings};
pub use s3::S3Backend;
