//! Scoped temporary directories and file paths.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::error::Result;

/// A fresh directory removed recursively on drop, including during unwinding.
#[derive(Debug)]
pub struct TempDirScope {
    dir: Option<TempDir>,
}

impl TempDirScope {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("framecheck-").tempdir()?;
        tracing::debug!(path = %dir.path().display(), "created temp dir");
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        self.dir.as_ref().map_or_else(|| Path::new(""), TempDir::path)
    }

    /// A unique path inside the directory; no file is created.
    pub fn unique_path(&self) -> PathBuf {
        self.path().join(format!("tmp{}", Uuid::new_v4().simple()))
    }
}

impl Drop for TempDirScope {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!(path = %path.display(), "removed temp dir"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove temp dir"),
            }
        }
    }
}

/// Run `body` with a fresh directory and remove it before returning the
/// body's result. Removal failures are logged only.
pub fn with_temp_dir<T>(body: impl FnOnce(&Path) -> T) -> Result<T> {
    let scope = TempDirScope::new()?;
    let out = body(scope.path());
    drop(scope);
    Ok(out)
}

/// Run `body` with a unique, not yet existing file path inside a scoped
/// directory.
pub fn with_temp_file<T>(body: impl FnOnce(&Path) -> T) -> Result<T> {
    let scope = TempDirScope::new()?;
    let path = scope.unique_path();
    let out = body(&path);
    drop(scope);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directory_is_removed_after_body() {
        let mut seen = PathBuf::new();
        let n = with_temp_dir(|dir| {
            fs::create_dir_all(dir.join("nested/deeper")).unwrap();
            fs::write(dir.join("nested/deeper/x.txt"), "x").unwrap();
            seen = dir.to_path_buf();
            3
        })
        .unwrap();
        assert_eq!(n, 3);
        assert!(!seen.exists());
    }

    #[test]
    fn failing_body_still_cleans_up() {
        let mut seen = PathBuf::new();
        let result: Result<std::io::Result<()>> = with_temp_dir(|dir| {
            seen = dir.to_path_buf();
            Err(std::io::Error::new(std::io::ErrorKind::Other, "body failed"))
        });
        assert!(result.unwrap().is_err());
        assert!(!seen.exists());
    }

    #[test]
    fn temp_file_path_does_not_exist_yet() {
        let mut parent = PathBuf::new();
        with_temp_file(|path| {
            assert!(!path.exists());
            parent = path.parent().unwrap().to_path_buf();
            assert!(parent.is_dir());
            fs::write(path, "data").unwrap();
        })
        .unwrap();
        assert!(!parent.exists());
    }
}
