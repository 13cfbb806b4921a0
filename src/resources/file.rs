//! Whole-file read/write helpers with backup-on-first-write.
use std::io::ErrorKind;
use std::path::Path;

use crate::error::FileError;

/// Read the whole file at `path`.
///
/// # Errors
///
/// Returns [`FileError::NotFound`] if `path` does not exist and
/// [`FileError::Read`] for any other failure.
pub fn read(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            FileError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FileError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read `path`, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns [`FileError::Read`] if the file exists but cannot be read.
pub fn read_optional(path: &Path) -> Result<Option<String>, FileError> {
    match read(path) {
        Ok(content) => Ok(Some(content)),
        Err(FileError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite `path` with `content`.
///
/// When `backup` is given, does not exist yet, and `path` exists, the current
/// contents of `path` are first copied to `backup`. The copy is a plain read
/// then write, so an existing backup is never touched again.
///
/// # Errors
///
/// Returns [`FileError::Backup`] if the backup cannot be made and
/// [`FileError::Write`] if `path` (or its parent directory) cannot be written.
pub fn write(path: &Path, content: &str, backup: Option<&Path>) -> Result<(), FileError> {
    if let Some(backup) = backup
        && !backup.exists()
        && path.exists()
    {
        let original = read(path)?;
        std::fs::write(backup, original).map_err(|source| FileError::Backup {
            path: path.to_path_buf(),
            backup: backup.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
    }

    #[test]
    fn read_optional_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn read_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn write_without_backup_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostname");
        fs::write(&path, "old-name-that-is-longer\n").unwrap();
        write(&path, "pi\n", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pi\n");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etc").join("wpa_supplicant").join("x.conf");
        write(&path, "content", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn backup_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wpa.conf");
        let backup = dir.path().join("wpa.conf.backup");
        fs::write(&path, "original").unwrap();

        write(&path, "first", Some(&backup)).unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write(&path, "second", Some(&backup)).unwrap();
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "original",
            "existing backup must not be overwritten"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn no_backup_when_target_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wpa.conf");
        let backup = dir.path().join("wpa.conf.backup");
        write(&path, "fresh", Some(&backup)).unwrap();
        assert!(!backup.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }
}
