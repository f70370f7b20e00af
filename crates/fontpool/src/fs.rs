//! Filesystem access facade.
//!
//! The scanner and pool only see this trait, which keeps the walk logic
//! testable and keeps platform details in one place.

use std::ffi::OsString;
use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{FontError, Result};

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns true if the path exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Lists the entry names of a directory.
    ///
    /// Fails with [`FontError::PathNotFound`] or
    /// [`FontError::PermissionDenied`] when the directory cannot be read.
    async fn list_dir(&self, path: &Path) -> Result<Vec<OsString>>;

    /// Returns true if the path is a directory.
    async fn is_dir(&self, path: &Path) -> bool;
}

/// Production filesystem backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFs;

#[async_trait]
impl FileSystem for TokioFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<OsString>> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|err| classify_io(path, err))?;
        let mut names = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|err| classify_io(path, err))?
        {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}

fn classify_io(path: &Path, err: io::Error) -> FontError {
    match err.kind() {
        io::ErrorKind::NotFound => FontError::PathNotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => FontError::PermissionDenied(path.to_path_buf()),
        _ => FontError::Io(err),
    }
}

/// Returns the file name without its final extension, if it is valid UTF-8.
pub fn base_name_no_ext(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_directory_entries() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("a.ttf")).unwrap();
        File::create(temp.path().join("b.otf")).unwrap();

        let mut names = TokioFs.list_dir(temp.path()).await.unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("a.ttf"), OsString::from("b.otf")]);
    }

    #[tokio::test]
    async fn missing_directory_is_path_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");
        let err = TokioFs.list_dir(&missing).await.unwrap_err();
        assert!(matches!(err, FontError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn exists_and_is_dir() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("file.ttf")).unwrap();

        assert!(TokioFs.exists(temp.path()).await);
        assert!(TokioFs.is_dir(temp.path()).await);
        assert!(TokioFs.exists(&temp.path().join("file.ttf")).await);
        assert!(!TokioFs.is_dir(&temp.path().join("file.ttf")).await);
        assert!(!TokioFs.exists(&temp.path().join("gone")).await);
    }

    #[test]
    fn base_name_strips_one_extension() {
        assert_eq!(base_name_no_ext(Path::new("/x/NotoSans-Bold.ttf")), Some("NotoSans-Bold"));
        assert_eq!(base_name_no_ext(Path::new("Foo.Bar.otf")), Some("Foo.Bar"));
        assert_eq!(base_name_no_ext(Path::new("plain")), Some("plain"));
    }
}
