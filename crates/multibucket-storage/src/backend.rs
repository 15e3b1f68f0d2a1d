//! Backend definitions: reusable blueprints binding a resolution strategy
//! and a captured set of default parameters.

use multibucket_core::{KeyLookup, StorageParams, StorageSettings};

use crate::error::StorageResult;
use crate::factory::sanitize_class_label;
use crate::s3::S3Backend;

/// How a backend definition resolves its base configuration record.
///
/// Exactly one strategy per definition; module and setting-key resolution
/// are never combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveBy {
    /// Look the module up in the bucket table, falling back to the flat
    /// defaults (without credentials or region).
    Module(String),
    /// Resolve a single named setting to a bucket identifier.
    SettingKey { key: String, lookup: KeyLookup },
    /// Use the full default configuration, credentials and region included.
    Defaults,
}

/// A named, reusable backend blueprint.
///
/// Created once and instantiated any number of times; every instance
/// resolves the same module name or setting key but may receive different
/// per-call overrides. The captured defaults are immutable from creation
/// time onward.
#[derive(Debug, Clone)]
pub struct BackendDef {
    label: String,
    strategy: ResolveBy,
    defaults: StorageParams,
}

impl BackendDef {
    pub fn new(label: impl Into<String>, strategy: ResolveBy, defaults: StorageParams) -> Self {
        BackendDef {
            label: label.into(),
            strategy,
            defaults,
        }
    }

    /// Display label for this definition. Never used for resolution.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategy(&self) -> &ResolveBy {
        &self.strategy
    }

    pub fn defaults(&self) -> &StorageParams {
        &self.defaults
    }

    /// Media files: `media` prefix, existing objects are never overwritten.
    pub fn media() -> Self {
        BackendDef::new(
            "MediaStorage",
            ResolveBy::Module("media".to_string()),
            StorageParams::new()
                .with_location("media")
                .with_file_overwrite(false),
        )
    }

    /// Static assets: `static` prefix.
    pub fn static_assets() -> Self {
        BackendDef::new(
            "StaticStorage",
            ResolveBy::Module("static".to_string()),
            StorageParams::new().with_location("static"),
        )
    }

    /// Documents: `documents` prefix, private ACL, no overwrites.
    pub fn documents() -> Self {
        BackendDef::new(
            "DocumentStorage",
            ResolveBy::Module("documents".to_string()),
            StorageParams::new()
                .with_location("documents")
                .with_default_acl("private")
                .with_file_overwrite(false),
        )
    }

    /// Private files: `private` prefix, private ACL, no overwrites.
    pub fn private_files() -> Self {
        BackendDef::new(
            "PrivateStorage",
            ResolveBy::Module("private".to_string()),
            StorageParams::new()
                .with_location("private")
                .with_default_acl("private")
                .with_file_overwrite(false),
        )
    }

    /// Public files: `public` prefix, public-read ACL.
    pub fn public_files() -> Self {
        BackendDef::new(
            "PublicStorage",
            ResolveBy::Module("public".to_string()),
            StorageParams::new()
                .with_location("public")
                .with_default_acl("public-read"),
        )
    }

    /// Backend resolved through a named setting key rather than the module
    /// table. Signed access URLs are the default for these buckets.
    pub fn for_setting_key(key: impl Into<String>, lookup: KeyLookup) -> Self {
        let key = key.into();
        BackendDef::new(
            sanitize_class_label(&key),
            ResolveBy::SettingKey { key, lookup },
            StorageParams::new().with_querystring_auth(true),
        )
    }

    /// Backend bound to the full default configuration.
    pub fn defaults_only() -> Self {
        BackendDef::new(
            "DefaultStorage",
            ResolveBy::Defaults,
            StorageParams::new(),
        )
    }

    /// Produce the final construction parameter set for one instantiation.
    ///
    /// The resolved configuration record is the base; the definition's
    /// defaults fill only fields the record left unspecified, and caller
    /// overrides are applied unconditionally on top.
    pub fn resolve_params(
        &self,
        settings: &StorageSettings,
        overrides: StorageParams,
    ) -> StorageParams {
        let mut params: StorageParams = match &self.strategy {
            ResolveBy::Module(name) => settings.resolve_module_config(name).into(),
            ResolveBy::SettingKey { key, lookup } => settings.resolve_key_config(key, *lookup),
            ResolveBy::Defaults => settings.resolve_default_config().into(),
        };
        params.merge_absent(&self.defaults);
        params.apply(overrides);
        params
    }

    /// Resolve, merge, and construct a backend instance.
    pub fn instantiate(
        &self,
        settings: &StorageSettings,
        overrides: StorageParams,
    ) -> StorageResult<S3Backend> {
        let params = self.resolve_params(settings, overrides);

        tracing::debug!(
            label = %self.label,
            bucket = ?params.bucket_name,
            location = ?params.location,
            "constructing storage backend"
        );

        S3Backend::construct(params)
    }
}
