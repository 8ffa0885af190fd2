use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model not found at {0} and no download URL configured")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve the classifier model file.
///
/// Resolution order:
/// 1. `model_path` itself
/// 2. Cached copy named after `model_path` in the user cache directory
/// 3. Download from `url` into the cache
pub fn resolve(
    model_path: &Path,
    url: Option<&str>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if model_path.exists() {
        return Ok(model_path.to_path_buf());
    }
    let Some(url) = url else {
        return Err(ModelResolveError::NotFound(model_path.to_path_buf()));
    };
    resolve_in(&model_cache_dir()?, model_path, url, progress)
}

fn resolve_in(
    cache_dir: &Path,
    model_path: &Path,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let name = model_path
        .file_name()
        .ok_or_else(|| ModelResolveError::NotFound(model_path.to_path_buf()))?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading model from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/moodcue/models/`
/// - Linux: `$XDG_CACHE_HOME/moodcue/models/` or `~/.cache/moodcue/models/`
/// - Windows: `%LOCALAPPDATA%/moodcue/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("moodcue").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("moodcue").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;

    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let write_err = |source| ModelResolveError::Write {
        path: temp_path.clone(),
        source,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_http::StubServer;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_returns_existing_path() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("emotion.onnx");
        fs::write(&model, b"model").unwrap();

        let resolved = resolve(&model, None, None).unwrap();
        assert_eq!(resolved, model);
    }

    #[test]
    fn test_resolve_missing_without_url_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("missing.onnx");
        let err = resolve(&model, None, None).unwrap_err();
        assert!(matches!(err, ModelResolveError::NotFound(p) if p == model));
    }

    #[test]
    fn test_resolve_in_prefers_cached_copy() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("emotion.onnx"), b"cached").unwrap();

        let resolved = resolve_in(
            &cache,
            Path::new("/nonexistent/emotion.onnx"),
            "http://127.0.0.1:9/unused",
            None,
        )
        .unwrap();
        assert_eq!(resolved, cache.join("emotion.onnx"));
    }

    #[test]
    fn test_resolve_in_downloads_into_cache() {
        let server = StubServer::respond(200, "model-bytes");
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let resolved = resolve_in(
            &cache,
            Path::new("/nonexistent/emotion.onnx"),
            &server.url(),
            Some(Box::new(move |_done, _total| {
                flag.store(true, Ordering::Relaxed);
            })),
        )
        .unwrap();

        assert_eq!(resolved, cache.join("emotion.onnx"));
        assert_eq!(fs::read(&resolved).unwrap(), b"model-bytes");
        assert!(called.load(Ordering::Relaxed));
        assert!(!resolved.with_extension("part").exists());
    }

    #[test]
    fn test_download_http_error_leaves_no_files() {
        let server = StubServer::respond(404, "missing");
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");

        let err = download(&server.url(), &dest, None).unwrap_err();
        assert!(matches!(err, ModelResolveError::Download { .. }));
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn test_model_cache_dir_is_app_scoped() {
        let path = model_cache_dir().unwrap();
        assert!(path.ends_with(Path::new("moodcue").join("models")));
    }
}
