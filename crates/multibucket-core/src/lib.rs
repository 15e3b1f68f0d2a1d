//! Multibucket Core Library
//!
//! This crate provides the configuration model shared by all multibucket
//! components: the process-wide settings snapshot, the per-module and
//! per-setting-key resolvers, and the construction-parameter record that
//! backend instantiation merges over.
//!
//! # Resolution model
//!
//! The settings snapshot is populated once at startup (from the environment
//! or by the application's own configuration loader) and treated as
//! immutable afterwards. Every resolver borrows the snapshot; nothing here
//! reads ambient state at resolution time, so concurrent reads are safe
//! without locking.

pub mod params;
pub mod settings;

// Re-export commonly used types
pub use params::StorageParams;
pub use settings::{BucketConfig, KeyLookup, StorageEntry, StorageSettings};
