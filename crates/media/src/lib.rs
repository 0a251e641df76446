//! Media upload collaborator.
//!
//! Handlers talk to the [`MediaStore`] trait; production wires in
//! [`S3MediaStore`], tests substitute an in-memory implementation. Uploads
//! either succeed with a public URL or fail with a typed error -- there is
//! no silent degradation.

use async_trait::async_trait;

/// Errors surfaced by a media store.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media upload failed: {0}")]
    Upload(String),
}

/// A successfully stored media object.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Publicly reachable URL, stored on the owning record.
    pub url: String,
    /// Object key within the store.
    pub key: String,
}

/// Abstraction over the external media-upload service.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a file and return its public location.
    async fn upload(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedMedia, MediaError>;
}

/// Media store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Target S3 bucket.
    pub bucket: String,
    /// Base URL under which uploaded objects are publicly served.
    pub public_base_url: String,
    /// Key prefix for all uploads (default: `uploads`).
    pub key_prefix: String,
}

impl MediaConfig {
    /// Load media configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default   |
    /// |-------------------------|----------|-----------|
    /// | `MEDIA_BUCKET`          | **yes**  | --        |
    /// | `MEDIA_PUBLIC_BASE_URL` | **yes**  | --        |
    /// | `MEDIA_KEY_PREFIX`      | no       | `uploads` |
    ///
    /// AWS credentials and region come from the standard SDK environment.
    ///
    /// # Panics
    ///
    /// Panics if a required variable is not set.
    pub fn from_env() -> Self {
        let bucket = std::env::var("MEDIA_BUCKET").expect("MEDIA_BUCKET must be set");
        let public_base_url =
            std::env::var("MEDIA_PUBLIC_BASE_URL").expect("MEDIA_PUBLIC_BASE_URL must be set");
        let key_prefix =
            std::env::var("MEDIA_KEY_PREFIX").unwrap_or_else(|_| "uploads".to_string());

        Self {
            bucket,
            public_base_url,
            key_prefix,
        }
    }
}

/// S3-backed media store.
pub struct S3MediaStore {
    client: aws_sdk_s3::Client,
    config: MediaConfig,
}

impl S3MediaStore {
    /// Build a store from the ambient AWS environment and the given config.
    pub async fn from_env(config: MediaConfig) -> Self {
        let aws_config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&aws_config);
        Self { client, config }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedMedia, MediaError> {
        let key = object_key(&self.config.key_prefix, filename);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        let url = format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        );
        tracing::info!(%key, %url, "Media uploaded");

        Ok(UploadedMedia { url, key })
    }
}

/// Build a unique object key: `{prefix}/{millis}-{sanitized filename}`.
///
/// The timestamp prevents collisions between uploads of identically named
/// files; sanitization keeps keys URL-safe.
fn object_key(prefix: &str, filename: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}/{stamp}-{safe}")
}
