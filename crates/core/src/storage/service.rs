//! Storage service implementation using Apache OpenDAL.
//!
//! Uploads always land on the local upload directory first; when an S3
//! target is configured, admin uploads are additionally forwarded and the
//! returned URL points at the object store. The local copy is the durable
//! fallback and is never cleaned up on forward failure.

use opendal::{Operator, services};

use super::error::StorageError;

/// S3-compatible forwarding target.
#[derive(Debug, Clone)]
pub struct S3Target {
    /// Bucket name.
    pub bucket: String,
    /// Region.
    pub region: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Endpoint override for R2/MinIO style providers.
    pub endpoint: Option<String>,
    /// Public base URL for returned object URLs.
    pub base_url: Option<String>,
}

impl S3Target {
    fn public_url(&self, key: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
            None => format!("https://{}.s3.{}.amazonaws.com/{key}", self.bucket, self.region),
        }
    }
}

/// Storage service for uploaded files.
pub struct StorageService {
    operator: Operator,
    target: S3Target,
}

impl StorageService {
    /// Creates a storage service forwarding to an S3-compatible bucket.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if the operator cannot be
    /// built from the target.
    pub fn from_s3(target: S3Target) -> Result<Self, StorageError> {
        let mut builder = services::S3::default()
            .bucket(&target.bucket)
            .region(&target.region)
            .access_key_id(&target.access_key_id)
            .secret_access_key(&target.secret_access_key);
        if let Some(endpoint) = &target.endpoint {
            builder = builder.endpoint(endpoint);
        }

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::Configuration(e.to_string()))?
            .finish();

        Ok(Self { operator, target })
    }

    /// Stores a file under `uploads/<key>` and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the object write fails.
    pub async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let object_key = format!("uploads/{key}");
        self.operator.write(&object_key, bytes).await?;
        Ok(self.target.public_url(&object_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(base_url: Option<&str>) -> S3Target {
        S3Target {
            bucket: "terralot-media".into(),
            region: "eu-west-1".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            endpoint: None,
            base_url: base_url.map(Into::into),
        }
    }

    #[test]
    fn public_url_defaults_to_virtual_hosted_style() {
        let url = target(None).public_url("uploads/a.png");
        assert_eq!(
            url,
            "https://terralot-media.s3.eu-west-1.amazonaws.com/uploads/a.png"
        );
    }

    #[test]
    fn public_url_honors_base_url() {
        let url = target(Some("https://cdn.terralot.ci/")).public_url("uploads/a.png");
        assert_eq!(url, "https://cdn.terralot.ci/uploads/a.png");
    }
}
