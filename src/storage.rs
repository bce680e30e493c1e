use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3 as s3;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

// 1. StorageService Contract
/// StorageService
///
/// The blob storage collaborator. Handlers hand it the bytes of an upload and
/// record the opaque path it returns; deleting a record hands the same path
/// back for removal. The concrete backend (local disk, S3, in-memory mock) is
/// chosen at startup.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Prepares the backend (creates the upload directory or bucket). Safe to
    /// call repeatedly.
    async fn ensure_ready(&self) -> Result<()>;

    /// Stores one uploaded file and returns the path to record on the owning
    /// record. `original_name` only contributes its extension.
    async fn store(&self, original_name: &str, data: &[u8]) -> Result<String>;

    /// Removes a previously stored file.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// StorageState
///
/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;

/// Builds a fresh object name such as `DOC-1718000000000-3f2a9c1b.pdf`.
///
/// The millisecond timestamp keeps names roughly ordered; the random suffix
/// keeps two uploads in the same millisecond apart.
pub fn generate_object_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let unique = Uuid::new_v4().simple().to_string();
    let unique = &unique[..8];

    match file_extension(original_name) {
        Some(ext) => format!("DOC-{millis}-{unique}.{ext}"),
        None => format!("DOC-{millis}-{unique}"),
    }
}

/// The lowercase alphanumeric extension of a client supplied file name, if any.
fn file_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) and empty segments
/// from a stored path before it is turned back into a filesystem location or
/// object key.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// URL prefix under which stored files are referenced and served.
pub const UPLOADS_PREFIX: &str = "uploads";

// 2. Local disk implementation (default)
/// LocalDiskStorage
///
/// Writes uploads below a single directory. Returned paths have the form
/// `uploads/<object name>`, which is also the URL path the static file
/// responder serves them under, wherever the directory actually lives.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    base_dir: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Maps a stored path back onto the upload directory. Only the final file
    /// name is honored, so nothing outside the directory can be addressed.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf> {
        let sanitized = sanitize_key(stored_path);
        let file_name = Path::new(&sanitized)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .last()
            .context("stored path has no file name")?;
        Ok(self.base_dir.join(file_name))
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    async fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .with_context(|| format!("failed to create {}", self.base_dir.display()))
    }

    async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        self.ensure_ready().await?;

        let object_name = generate_object_name(original_name);
        let path = self.base_dir.join(&object_name);

        let mut file = fs::File::create(&path)
            .await
            .context("failed to create file")?;
        file.write_all(data).await.context("failed to write file")?;
        file.flush().await.context("failed to flush file")?;

        debug!(path = ?path, size = data.len(), "upload stored");
        Ok(format!("{UPLOADS_PREFIX}/{object_name}"))
    }

    async fn delete(&self, stored_path: &str) -> Result<()> {
        let path = self.resolve(stored_path)?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("failed to delete {}", path.display()))?;
        debug!(path = ?path, "upload deleted");
        Ok(())
    }
}

// 3. S3-compatible implementation
/// S3StorageClient
///
/// Stores uploads as objects in an S3-compatible bucket (AWS, MinIO). The
/// returned path is the object key, `uploads/<object name>`.
///
/// `force_path_style(true)` is required for MinIO compatibility.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
}

impl S3StorageClient {
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// CreateBucket is idempotent for the bucket owner; an "already owned"
    /// answer is not an error worth stopping startup for.
    async fn ensure_ready(&self) -> Result<()> {
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            warn!(bucket = %self.bucket_name, error = %e, "create_bucket failed");
        }
        Ok(())
    }

    async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let key = format!("{UPLOADS_PREFIX}/{}", generate_object_name(original_name));

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(s3::primitives::ByteStream::from(data.to_vec()))
            .send()
            .await
            .context("failed to upload to S3")?;

        debug!(key = %key, size = data.len(), "upload stored in S3");
        Ok(key)
    }

    async fn delete(&self, stored_path: &str) -> Result<()> {
        let key = sanitize_key(stored_path);

        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .send()
            .await
            .context("failed to delete from S3")?;

        debug!(key = %key, "upload deleted from S3");
        Ok(())
    }
}

// 4. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory stand-in used by the test suite. Records every store and delete
/// request and can be told to fail them.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, every store and delete fails.
    pub should_fail: bool,
    /// Paths whose deletion fails even when `should_fail` is false.
    pub failing_paths: Vec<String>,
    stored: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Deletion of any of `paths` fails; everything else succeeds.
    pub fn failing_deletes_for(paths: &[&str]) -> Self {
        Self {
            failing_paths: paths.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Paths handed out by `store`, in order.
    pub fn stored_paths(&self) -> Vec<String> {
        self.stored.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Paths passed to `delete`, in order of arrival, failed ones included.
    pub fn delete_requests(&self) -> Vec<String> {
        self.deleted.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn store(&self, original_name: &str, _data: &[u8]) -> Result<String> {
        if self.should_fail {
            anyhow::bail!("Mock Storage Error: Simulation requested");
        }

        let path = format!("{UPLOADS_PREFIX}/{}", generate_object_name(original_name));
        if let Ok(mut stored) = self.stored.lock() {
            stored.push(path.clone());
        }
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(path.to_string());
        }

        if self.should_fail || self.failing_paths.iter().any(|p| p == path) {
            anyhow::bail!("Mock Storage Error: cannot delete {path}");
        }
        Ok(())
    }
}
