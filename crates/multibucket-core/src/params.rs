//! Construction-parameter record for storage backends.
//!
//! Every field is optional: `None` means "not specified" and is dropped
//! before the parameters reach the backend library, so its own default
//! applies. An explicit empty string is a meaningful value and survives
//! every merge step.

use serde::{Deserialize, Serialize};

use crate::settings::BucketConfig;

/// Parameters handed to storage backend construction.
///
/// Merging follows a fixed precedence: caller overrides always win,
/// definition defaults fill only fields the resolved configuration left
/// unspecified, and anything still unspecified falls through to the backend
/// library's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageParams {
    pub bucket_name: Option<String>,
    pub location: Option<String>,
    pub default_acl: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint_url: Option<String>,
    pub custom_domain: Option<String>,
    pub querystring_auth: Option<bool>,
    pub file_overwrite: Option<bool>,
}

impl StorageParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket_name(mut self, bucket: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_default_acl(mut self, acl: impl Into<String>) -> Self {
        self.default_acl = Some(acl.into());
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }

    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }

    pub fn with_querystring_auth(mut self, enabled: bool) -> Self {
        self.querystring_auth = Some(enabled);
        self
    }

    pub fn with_file_overwrite(mut self, enabled: bool) -> Self {
        self.file_overwrite = Some(enabled);
        self
    }

    /// Fill every field that is currently unspecified from `defaults`.
    ///
    /// Fields that already carry a value, including an explicit empty
    /// string, are never replaced.
    pub fn merge_absent(&mut self, defaults: &StorageParams) {
        if self.bucket_name.is_none() {
            self.bucket_name = defaults.bucket_name.clone();
        }
        if self.location.is_none() {
            self.location = defaults.location.clone();
        }
        if self.default_acl.is_none() {
            self.default_acl = defaults.default_acl.clone();
        }
        if self.access_key.is_none() {
            self.access_key = defaults.access_key.clone();
        }
        if self.secret_key.is_none() {
            self.secret_key = defaults.secret_key.clone();
        }
        if self.region.is_none() {
            self.region = defaults.region.clone();
        }
        if self.endpoint_url.is_none() {
            self.endpoint_url = defaults.endpoint_url.clone();
        }
        if self.custom_domain.is_none() {
            self.custom_domain = defaults.custom_domain.clone();
        }
        if self.querystring_auth.is_none() {
            self.querystring_auth = defaults.querystring_auth;
        }
        if self.file_overwrite.is_none() {
            self.file_overwrite = defaults.file_overwrite;
        }
    }

    /// Overwrite every field that `overrides` specifies.
    ///
    /// Unspecified override fields leave the current value untouched.
    pub fn apply(&mut self, overrides: StorageParams) {
        if overrides.bucket_name.is_some() {
            self.bucket_name = overrides.bucket_name;
        }
        if overrides.location.is_some() {
            self.location = overrides.location;
        }
        if overrides.default_acl.is_some() {
            self.default_acl = overrides.default_acl;
        }
        if overrides.access_key.is_some() {
            self.access_key = overrides.access_key;
        }
        if overrides.secret_key.is_some() {
            self.secret_key = overrides.secret_key;
        }
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if overrides.endpoint_url.is_some() {
            self.endpoint_url = overrides.endpoint_url;
        }
        if overrides.custom_domain.is_some() {
            self.custom_domain = overrides.custom_domain;
        }
        if overrides.querystring_auth.is_some() {
            self.querystring_auth = overrides.querystring_auth;
        }
        if overrides.file_overwrite.is_some() {
            self.file_overwrite = overrides.file_overwrite;
        }
    }
}

impl From<BucketConfig> for StorageParams {
    fn from(config: BucketConfig) -> Self {
        StorageParams {
            bucket_name: config.bucket_name,
            location: config.location,
            default_acl: config.default_acl,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region: config.region,
            ..StorageParams::default()
        }
    }
}
