//! Downloads photo previews and keeps them in an on-disk cache.

use iced::widget::image::Handle;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Semaphore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageLoaderError {
    #[error("image not found")]
    NotFound,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("semaphore closed")]
    SemaphoreClosed,
}

impl From<reqwest::Error> for ImageLoaderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ImageLoaderError::Timeout
        } else {
            ImageLoaderError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    cache_dir: PathBuf,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl ImageLoader {
    /// `concurrency` bounds the number of downloads in flight.
    pub fn new(cache_dir: PathBuf, concurrency: usize) -> Self {
        Self::build(cache_dir, reqwest::Client::new(), concurrency)
    }

    pub fn with_client(cache_dir: PathBuf, client: reqwest::Client) -> Self {
        Self::build(cache_dir, client, 4)
    }

    fn build(cache_dir: PathBuf, client: reqwest::Client, concurrency: usize) -> Self {
        Self {
            cache_dir,
            client,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub async fn load_thumbnail(&self, photo_id: &str, url: &str) -> Result<Handle, ImageLoaderError> {
        self.load("thumbnails", photo_id, url).await
    }

    /// Full-size image for the detail view, cached separately from thumbnails.
    pub async fn load_full_image(&self, photo_id: &str, url: &str) -> Result<Handle, ImageLoaderError> {
        self.load("full", photo_id, url).await
    }

    async fn load(&self, kind: &str, photo_id: &str, url: &str) -> Result<Handle, ImageLoaderError> {
        let start = Instant::now();
        let cache_path = self.cache_dir.join(kind).join(cache_file_name(photo_id));
        if cache_path.exists() {
            return Ok(Handle::from_path(&cache_path));
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ImageLoaderError::SemaphoreClosed)?;

        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ImageLoaderError::NotFound);
        }
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ImageLoaderError::Io(e.to_string()))?;
        }
        fs::write(&cache_path, &bytes)
            .await
            .map_err(|e| ImageLoaderError::Io(e.to_string()))?;

        tracing::info!("image_time_ms" = %start.elapsed().as_millis(), "kind" = kind, "id" = photo_id);
        Ok(Handle::from_path(&cache_path))
    }
}

/// Photo ids come from the backend, keep only path-safe characters. The
/// FNV-1a hash of the raw id keeps ids that sanitise alike apart.
fn cache_file_name(photo_id: &str) -> String {
    let safe: String = photo_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let hash = photo_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3));
    format!("{}-{:016x}.img", safe, hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_cache_file_name_is_path_safe() {
        let name = cache_file_name("../etc/passwd");
        assert!(name.starts_with("___etc_passwd-"));
        assert!(name.ends_with(".img"));
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_cache_file_name_keeps_distinct_ids_apart() {
        assert_ne!(cache_file_name("a/b"), cache_file_name("a_b"));
        assert_ne!(cache_file_name("a b"), cache_file_name("a_b"));
        assert_eq!(cache_file_name("abc-123"), cache_file_name("abc-123"));
    }

    #[tokio::test]
    async fn test_load_thumbnail() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/thumb.jpg");
            then.status(200).body("img");
        });
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().to_path_buf(), 2);
        let url = server.url("/thumb.jpg");
        let _ = loader.load_thumbnail("1", &url).await.unwrap();
        assert!(dir.path().join("thumbnails").join(cache_file_name("1")).exists());
        mock.assert();
    }
}
