use sha2::{Digest, Sha256};
use sinkhole_domain::DomainError;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// On-disk cache of downloaded list bodies, one file per URL.
///
/// Every failure on the read or write side is a miss; only creating the
/// directory itself is reported to the caller.
#[derive(Debug, Clone)]
pub struct SourceCache {
    dir: PathBuf,
    ttl: Duration,
}

impl SourceCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// `<dir>/<sha256(url) hex>.txt`
    pub fn path_for(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2 + 4);
        for byte in digest {
            let _ = write!(name, "{:02x}", byte);
        }
        name.push_str(".txt");
        self.dir.join(name)
    }

    pub async fn ensure_dir(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::CacheDirUnavailable {
                path: self.dir.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Cached body for `url` if it was written less than `ttl` ago.
    pub async fn read_fresh(&self, url: &str) -> Option<String> {
        let path = self.path_for(url);
        let metadata = tokio::fs::metadata(&path).await.ok()?;
        let modified = metadata.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            debug!(url = %url, age_secs = age.as_secs(), "Cache entry expired");
            return None;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cache entry unreadable");
                None
            }
        }
    }

    pub async fn write(&self, url: &str, body: &str) {
        let path = self.path_for(url);
        if let Err(e) = tokio::fs::write(&path, body).await {
            debug!(path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }

    /// Remove the whole cache directory. A missing directory is not an error.
    pub async fn clear(&self) -> Result<(), DomainError> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::IoError(format!(
                "failed to remove {}: {}",
                self.dir.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_is_sha256_hex() {
        let cache = SourceCache::new("/tmp/lists", Duration::from_secs(60));
        let path = cache.path_for("https://example.com/hosts.txt");
        let name = path.file_name().unwrap().to_str().unwrap();

        assert_eq!(name.len(), 64 + 4);
        assert!(name.ends_with(".txt"));
        assert!(name[..64].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(path, cache.path_for("https://example.com/other.txt"));
    }

    #[tokio::test]
    async fn test_write_then_read_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = SourceCache::new(dir.path(), Duration::from_secs(3600));
        cache.ensure_dir().await.unwrap();

        assert!(cache.read_fresh("https://a.test/list").await.is_none());
        cache.write("https://a.test/list", "0.0.0.0 a.example\n").await;

        assert_eq!(
            cache.read_fresh("https://a.test/list").await.as_deref(),
            Some("0.0.0.0 a.example\n")
        );
    }

    #[tokio::test]
    async fn test_zero_ttl_is_always_stale() {
        let dir = TempDir::new().unwrap();
        let cache = SourceCache::new(dir.path(), Duration::ZERO);
        cache.write("https://a.test/list", "body").await;

        assert!(cache.read_fresh("https://a.test/list").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_missing_dir_is_ok() {
        let dir = TempDir::new().unwrap();
        let cache = SourceCache::new(dir.path().join("never-created"), Duration::from_secs(1));
        assert!(cache.clear().await.is_ok());
    }
}
