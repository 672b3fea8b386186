use std::{
    ffi::OsString,
    fs::File,
    io::{self, ErrorKind, Write},
    path::Path,
};

use fs4::fs_std::FileExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// Runs `operation` while holding an advisory lock on `lock_path`. The lock file is created if
/// needed and is never removed, so every process agrees on the same inode.
pub fn with_lock<T>(
    lock_path: &Path,
    mode: LockMode,
    operation: impl FnOnce() -> io::Result<T>,
) -> io::Result<T> {
    let lock = File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    match mode {
        LockMode::Shared => FileExt::lock_shared(&lock)?,
        LockMode::Exclusive => FileExt::lock_exclusive(&lock)?,
    }
    let result = operation();
    FileExt::unlock(&lock)?;
    result
}

/// Replaces the contents of `path` with `contents`. Data goes to a sibling `.tmp` file first and
/// is renamed over the target, so readers see either the previous or the new value.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(OsString::from)
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let write = || -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.flush()?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)
    };

    write().inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp_path);
    })
}

/// Reads the whole file, mapping a missing file to `None`.
pub fn read_if_exists(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Removes the file, treating an already missing file as success.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{read_if_exists, remove_if_exists, replace_file, with_lock, LockMode};

    #[test]
    fn test_replace_file_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("value.json");

        replace_file(&path, b"first")?;
        replace_file(&path, b"second")?;

        assert_eq!(fs::read(&path)?, b"second");
        assert!(!dir.path().join("value.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_replace_file_missing_parent_cleans_up() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing").join("value.json");

        assert!(replace_file(&path, b"data").is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_read_and_remove_missing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent");

        assert_eq!(read_if_exists(&path)?, None);
        remove_if_exists(&path)?;
        remove_if_exists(&path)?;
        Ok(())
    }

    #[test]
    fn test_with_lock_returns_operation_result() -> Result<()> {
        let dir = tempdir()?;
        let lock = dir.path().join(".lock");

        let shared = with_lock(&lock, LockMode::Shared, || Ok(1))?;
        let exclusive = with_lock(&lock, LockMode::Exclusive, || Ok(2))?;
        assert_eq!(shared + exclusive, 3);
        assert!(lock.exists());

        let failed = with_lock(&lock, LockMode::Exclusive, || -> std::io::Result<()> {
            Err(std::io::Error::other("boom"))
        });
        assert!(failed.is_err());
        // Lock must have been released even though the operation failed.
        with_lock(&lock, LockMode::Exclusive, || Ok(()))?;
        Ok(())
    }
}
