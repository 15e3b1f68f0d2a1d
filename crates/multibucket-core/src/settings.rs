//! Process-wide storage settings snapshot and resolvers.
//!
//! The snapshot is populated once at process start, either from the
//! environment via [`StorageSettings::from_env`] or assembled by the
//! application's configuration loader, and is read-only from then on. All
//! resolution is a pure lookup over the snapshot.

use std::collections::HashMap;
use std::env;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::params::StorageParams;

/// Partial configuration record for one module.
///
/// Entries in the module table may set any subset of these fields; missing
/// fields are filled in later during the construction merge, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub bucket_name: Option<String>,
    pub location: Option<String>,
    pub default_acl: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
}

/// One entry in the setting-key table.
///
/// Mirrors the `{"OPTIONS": {...}}` shape of the external configuration
/// format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    #[serde(rename = "OPTIONS", default)]
    pub options: StorageParams,
}

/// Which sources the setting-key resolver consults.
///
/// Two lookup styles exist; a backend definition picks exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    /// Setting-key table `OPTIONS` first, then the flat named setting,
    /// then the default bucket.
    Layered,
    /// Flat named setting only, then the default bucket.
    Flat,
}

/// Immutable snapshot of all storage-related settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Module name -> partial configuration record.
    pub buckets: HashMap<String, BucketConfig>,
    /// Setting key -> `OPTIONS` record.
    pub storages: HashMap<String, StorageEntry>,
    /// Flat named settings: setting key -> bucket identifier.
    pub named_buckets: HashMap<String, String>,
    pub default_bucket: Option<String>,
    pub default_location: String,
    pub default_acl: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
}

impl StorageSettings {
    /// Load the snapshot from environment variables.
    ///
    /// Flat defaults come from `S3_BUCKET`, `S3_LOCATION`, `S3_DEFAULT_ACL`,
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `S3_REGION` (falling
    /// back to `AWS_REGION`). The nested tables are read as JSON objects
    /// from `STORAGE_BUCKETS`, `STORAGES` and `NAMED_BUCKETS`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(StorageSettings {
            buckets: json_table_from_env("STORAGE_BUCKETS")?,
            storages: json_table_from_env("STORAGES")?,
            named_buckets: json_table_from_env("NAMED_BUCKETS")?,
            default_bucket: env::var("S3_BUCKET").ok(),
            default_location: env::var("S3_LOCATION").unwrap_or_default(),
            default_acl: env::var("S3_DEFAULT_ACL").ok(),
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
        })
    }

    pub fn with_module(mut self, name: impl Into<String>, config: BucketConfig) -> Self {
        self.buckets.insert(name.into(), config);
        self
    }

    pub fn with_storage_entry(mut self, key: impl Into<String>, options: StorageParams) -> Self {
        self.storages.insert(key.into(), StorageEntry { options });
        self
    }

    pub fn with_named_bucket(mut self, key: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.named_buckets.insert(key.into(), bucket.into());
        self
    }

    pub fn with_default_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.default_bucket = Some(bucket.into());
        self
    }

    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = location.into();
        self
    }

    pub fn with_default_acl(mut self, acl: impl Into<String>) -> Self {
        self.default_acl = Some(acl.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Resolve the configuration record for a module.
    ///
    /// A module present in the bucket table is returned verbatim, partial
    /// fields included. Unknown (or empty) module names fall back to the
    /// flat defaults; credentials and region are left absent on that path,
    /// callers that need them layer [`StorageSettings::resolve_default_config`]
    /// underneath.
    pub fn resolve_module_config(&self, module_name: &str) -> BucketConfig {
        if !module_name.is_empty() {
            if let Some(config) = self.buckets.get(module_name) {
                return config.clone();
            }
        }

        tracing::debug!(
            module = %module_name,
            "module not in bucket table, falling back to default settings"
        );

        BucketConfig {
            bucket_name: self.default_bucket.clone(),
            location: Some(self.default_location.clone()),
            default_acl: self.default_acl.clone(),
            ..BucketConfig::default()
        }
    }

    /// Resolve the full default configuration, credentials and region
    /// included.
    pub fn resolve_default_config(&self) -> BucketConfig {
        BucketConfig {
            bucket_name: self.default_bucket.clone(),
            location: Some(self.default_location.clone()),
            default_acl: self.default_acl.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            region: self.region.clone(),
        }
    }

    /// Resolve a bucket identifier for a named setting key.
    ///
    /// First hit wins. An empty key skips the per-key sources and goes
    /// straight to the default bucket.
    pub fn resolve_bucket_identifier(
        &self,
        setting_key: &str,
        lookup: KeyLookup,
    ) -> Option<String> {
        if !setting_key.is_empty() {
            if lookup == KeyLookup::Layered {
                if let Some(bucket) = self
                    .storages
                    .get(setting_key)
                    .and_then(|entry| entry.options.bucket_name.clone())
                {
                    return Some(bucket);
                }
            }
            if let Some(bucket) = self.named_buckets.get(setting_key) {
                return Some(bucket.clone());
            }
        }
        self.default_bucket.clone()
    }

    /// Resolve the construction parameters for a setting key.
    ///
    /// With [`KeyLookup::Layered`] the entire `OPTIONS` record of the table
    /// entry participates in the merge, with the bucket identifier replaced
    /// by the fallback-chain result. [`KeyLookup::Flat`] ignores the table
    /// and carries only the chain result.
    pub fn resolve_key_config(&self, setting_key: &str, lookup: KeyLookup) -> StorageParams {
        let mut params = match lookup {
            KeyLookup::Layered if !setting_key.is_empty() => self
                .storages
                .get(setting_key)
                .map(|entry| entry.options.clone())
                .unwrap_or_default(),
            _ => StorageParams::default(),
        };
        params.bucket_name = self.resolve_bucket_identifier(setting_key, lookup);
        params
    }
}

fn json_table_from_env<T>(var: &str) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned + Default,
{
    match env::var(var) {
        Ok(raw) => serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("{} must be a valid JSON object: {}", var, e)),
        Err(_) => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_defaults() -> StorageSettings {
        StorageSettings::default()
            .with_default_bucket("default-bucket")
            .with_default_location("default/")
            .with_default_acl("private")
            .with_credentials("AKID", "SECRET")
            .with_region("eu-west-1")
    }

    #[test]
    fn test_resolve_module_config_existing_module() {
        let settings = settings_with_defaults().with_module(
            "media",
            BucketConfig {
                bucket_name: Some("test-media-bucket".to_string()),
                location: Some("media/".to_string()),
                default_acl: Some("public-read".to_string()),
                ..BucketConfig::default()
            },
        );

        let config = settings.resolve_module_config("media");

        assert_eq!(config.bucket_name.as_deref(), Some("test-media-bucket"));
        assert_eq!(config.location.as_deref(), Some("media/"));
        assert_eq!(config.default_acl.as_deref(), Some("public-read"));
    }

    #[test]
    fn test_resolve_module_config_returns_partial_record_verbatim() {
        let settings = settings_with_defaults().with_module(
            "uploads",
            BucketConfig {
                bucket_name: Some("uploads-bucket".to_string()),
                ..BucketConfig::default()
            },
        );

        let config = settings.resolve_module_config("uploads");

        // No field synthesis for table hits: partial stays partial.
        assert_eq!(config.bucket_name.as_deref(), Some("uploads-bucket"));
        assert!(config.location.is_none());
        assert!(config.default_acl.is_none());
    }

    #[test]
    fn test_resolve_module_config_unknown_module_falls_back() {
        let settings = settings_with_defaults();

        let config = settings.resolve_module_config("nonexistent");

        assert_eq!(config.bucket_name.as_deref(), Some("default-bucket"));
        assert_eq!(config.location.as_deref(), Some("default/"));
        assert_eq!(config.default_acl.as_deref(), Some("private"));
        // The module fallback path deliberately omits credentials and region.
        assert!(config.access_key.is_none());
        assert!(config.secret_key.is_none());
        assert!(config.region.is_none());
    }

    #[test]
    fn test_resolve_module_config_empty_name_falls_back() {
        let settings = settings_with_defaults().with_module(
            "",
            BucketConfig {
                bucket_name: Some("never-returned".to_string()),
                ..BucketConfig::default()
            },
        );

        let config = settings.resolve_module_config("");

        assert_eq!(config.bucket_name.as_deref(), Some("default-bucket"));
    }

    #[test]
    fn test_resolve_module_config_empty_settings() {
        let config = StorageSettings::default().resolve_module_config("media");

        assert!(config.bucket_name.is_none());
        assert_eq!(config.location.as_deref(), Some(""));
        assert!(config.default_acl.is_none());
    }

    #[test]
    fn test_resolve_default_config_includes_credentials() {
        let config = settings_with_defaults().resolve_default_config();

        assert_eq!(config.bucket_name.as_deref(), Some("default-bucket"));
        assert_eq!(config.location.as_deref(), Some("default/"));
        assert_eq!(config.default_acl.as_deref(), Some("private"));
        assert_eq!(config.access_key.as_deref(), Some("AKID"));
        assert_eq!(config.secret_key.as_deref(), Some("SECRET"));
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_resolve_bucket_identifier_layered_table_hit() {
        let settings = settings_with_defaults().with_storage_entry(
            "import_export",
            StorageParams::new().with_bucket_name("A"),
        );

        let bucket = settings.resolve_bucket_identifier("import_export", KeyLookup::Layered);

        assert_eq!(bucket.as_deref(), Some("A"));
    }

    #[test]
    fn test_resolve_bucket_identifier_flat_setting() {
        let settings = settings_with_defaults().with_named_bucket("ANALYTICS_BUCKET", "B");

        let bucket = settings.resolve_bucket_identifier("ANALYTICS_BUCKET", KeyLookup::Layered);

        assert_eq!(bucket.as_deref(), Some("B"));
    }

    #[test]
    fn test_resolve_bucket_identifier_default_fallback() {
        let bucket =
            settings_with_defaults().resolve_bucket_identifier("UNKNOWN_KEY", KeyLookup::Layered);

        assert_eq!(bucket.as_deref(), Some("default-bucket"));
    }

    #[test]
    fn test_resolve_bucket_identifier_empty_key_skips_lookups() {
        let settings = settings_with_defaults().with_named_bucket("", "never-returned");

        let bucket = settings.resolve_bucket_identifier("", KeyLookup::Layered);

        assert_eq!(bucket.as_deref(), Some("default-bucket"));
    }

    #[test]
    fn test_resolve_bucket_identifier_flat_ignores_table() {
        let settings = settings_with_defaults()
            .with_storage_entry("import_export", StorageParams::new().with_bucket_name("A"))
            .with_named_bucket("import_export", "flat-bucket");

        let layered = settings.resolve_bucket_identifier("import_export", KeyLookup::Layered);
        let flat = settings.resolve_bucket_identifier("import_export", KeyLookup::Flat);

        assert_eq!(layered.as_deref(), Some("A"));
        assert_eq!(flat.as_deref(), Some("flat-bucket"));
    }

    #[test]
    fn test_resolve_bucket_identifier_table_without_bucket_falls_through() {
        let settings = settings_with_defaults()
            .with_storage_entry("import_export", StorageParams::new().with_location("ie/"))
            .with_named_bucket("import_export", "flat-bucket");

        let bucket = settings.resolve_bucket_identifier("import_export", KeyLookup::Layered);

        assert_eq!(bucket.as_deref(), Some("flat-bucket"));
    }

    #[test]
    fn test_resolve_key_config_carries_options() {
        let settings = settings_with_defaults().with_storage_entry(
            "import_export",
            StorageParams::new()
                .with_bucket_name("A")
                .with_location("exports/")
                .with_querystring_auth(false),
        );

        let params = settings.resolve_key_config("import_export", KeyLookup::Layered);

        assert_eq!(params.bucket_name.as_deref(), Some("A"));
        assert_eq!(params.location.as_deref(), Some("exports/"));
        assert_eq!(params.querystring_auth, Some(false));
    }

    #[test]
    fn test_resolve_key_config_flat_ignores_options() {
        let settings = settings_with_defaults().with_storage_entry(
            "import_export",
            StorageParams::new()
                .with_bucket_name("A")
                .with_location("exports/"),
        );

        let params = settings.resolve_key_config("import_export", KeyLookup::Flat);

        assert_eq!(params.bucket_name.as_deref(), Some("default-bucket"));
        assert!(params.location.is_none());
    }

    #[test]
    fn test_settings_deserialize_from_json() {
        let raw = r#"{
            "buckets": {
                "media": { "bucket_name": "media-bucket", "location": "media/" }
            },
            "storages": {
                "import_export": { "OPTIONS": { "bucket_name": "ie-bucket" } }
            },
            "named_buckets": { "ANALYTICS_BUCKET": "analytics" },
            "default_bucket": "default-bucket"
        }"#;

        let settings: StorageSettings = serde_json::from_str(raw).unwrap();

        assert_eq!(
            settings.buckets["media"].bucket_name.as_deref(),
            Some("media-bucket")
        );
        assert_eq!(
            settings.storages["import_export"]
                .options
                .bucket_name
                .as_deref(),
            Some("ie-bucket")
        );
        assert_eq!(settings.named_buckets["ANALYTICS_BUCKET"], "analytics");
        assert_eq!(settings.default_bucket.as_deref(), Some("default-bucket"));
        assert_eq!(settings.default_location, "");
    }
}
