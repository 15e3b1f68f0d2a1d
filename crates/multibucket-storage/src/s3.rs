use multibucket_core::StorageParams;
use object_store::aws::{AmazonS3, AmazonS3Builder};

use crate::error::StorageResult;

// Library defaults applied when the merged parameters leave a behavioral
// field unspecified.
const DEFAULT_QUERYSTRING_AUTH: bool = true;
const DEFAULT_FILE_OVERWRITE: bool = true;

/// S3 storage backend bound to one resolved bucket and parameter set.
///
/// Owns a built [`AmazonS3`] client plus the behavioral parameters the
/// client itself does not model (location prefix, default ACL, custom
/// domain, auth-query and overwrite flags). Instances are immutable and
/// cheap to clone; each construction is independent.
#[derive(Clone, Debug)]
pub struct S3Backend {
    store: AmazonS3,
    bucket: Option<String>,
    location: String,
    default_acl: Option<String>,
    region: Option<String>,
    endpoint_url: Option<String>,
    custom_domain: Option<String>,
    querystring_auth: bool,
    file_overwrite: bool,
}

impl S3Backend {
    /// Construct a backend from a merged parameter set.
    ///
    /// Unspecified fields are simply not applied, so the client builder's
    /// own defaults (including anything it picks up from the environment)
    /// stay in effect. Builder errors, a missing bucket identifier
    /// included, propagate unchanged.
    pub fn construct(params: StorageParams) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env();

        if let Some(ref bucket) = params.bucket_name {
            builder = builder.with_bucket_name(bucket.clone());
        }
        if let Some(ref region) = params.region {
            builder = builder.with_region(region.clone());
        }
        if let Some(ref access_key) = params.access_key {
            builder = builder.with_access_key_id(access_key.clone());
        }
        if let Some(ref secret_key) = params.secret_key {
            builder = builder.with_secret_access_key(secret_key.clone());
        }
        if let Some(ref endpoint) = params.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder.build()?;

        Ok(S3Backend {
            store,
            bucket: params.bucket_name,
            location: params.location.unwrap_or_default(),
            default_acl: params.default_acl,
            region: params.region,
            endpoint_url: params.endpoint_url,
            custom_domain: params.custom_domain,
            querystring_auth: params.querystring_auth.unwrap_or(DEFAULT_QUERYSTRING_AUTH),
            file_overwrite: params.file_overwrite.unwrap_or(DEFAULT_FILE_OVERWRITE),
        })
    }

    /// Apply the location prefix to an object name.
    pub fn object_key(&self, name: &str) -> String {
        if self.location.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.location.trim_end_matches('/'), name)
        }
    }

    /// Generate the public URL for an object key.
    ///
    /// A custom domain takes precedence. Otherwise a custom endpoint yields
    /// the path-style form `{endpoint}/{bucket}/{key}`, and plain AWS the
    /// virtual-hosted form; both of those need a bucket identifier, so
    /// `None` is returned when the backend was constructed without one.
    pub fn object_url(&self, key: &str) -> Option<String> {
        if let Some(ref domain) = self.custom_domain {
            return Some(format!("https://{}/{}", domain.trim_end_matches('/'), key));
        }

        let bucket = self.bucket.as_deref()?;
        if let Some(ref endpoint) = self.endpoint_url {
            Some(format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                bucket,
                key
            ))
        } else {
            // us-east-1 is the AWS default region.
            let region = self.region.as_deref().unwrap_or("us-east-1");
            Some(format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket, region, key
            ))
        }
    }

    /// The underlying object-store client.
    pub fn store(&self) -> &AmazonS3 {
        &self.store
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn default_acl(&self) -> Option<&str> {
        self.default_acl.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn custom_domain(&self) -> Option<&str> {
        self.custom_domain.as_deref()
    }

    /// Whether generated access URLs should carry auth query parameters.
    pub fn querystring_auth(&self) -> bool {
        self.querystring_auth
    }

    /// Whether writes may replace an existing object with the same key.
    pub fn file_overwrite(&self) -> bool {
        self.file_overwrite
    }
}
