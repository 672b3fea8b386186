use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use tracing::debug;

use crate::fs::operations::{read_if_exists, remove_if_exists, replace_file, with_lock, LockMode};

/// Namespace shared by the main view and the status indicator.
pub const SHARED_NAMESPACE: &str = "group.Boundrel.Dimer";

const LOCK_FILE: &str = ".lock";
const VALUE_EXTENSION: &str = "json";

/// Minimal get/set/delete-by-key contract the timer store is built on. Implementations must make
/// values written by one process visible to every other process using the same namespace.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Raw value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing whatever was there.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<T: Deref> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.deref().set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.deref().delete(key)
    }
}

/// Stores every key as `<namespace_dir>/<key>.json`. Readers take a shared lock and writers an
/// exclusive one on `<namespace_dir>/.lock`; writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    namespace_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(namespace_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&namespace_dir)?;

        Ok(Self { namespace_dir })
    }

    /// Opens [SHARED_NAMESPACE] inside the application directory.
    pub fn shared(application_dir: &Path) -> Result<Self, std::io::Error> {
        Self::new(application_dir.join(SHARED_NAMESPACE))
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self
            .namespace_dir
            .join(format!("{key}.{VALUE_EXTENSION}")))
    }

    fn lock_path(&self) -> PathBuf {
        self.namespace_dir.join(LOCK_FILE)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.value_path(key)?;
        debug!("Reading {path:?}");
        Ok(with_lock(&self.lock_path(), LockMode::Shared, || {
            read_if_exists(&path)
        })?)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.value_path(key)?;
        debug!("Writing {} bytes into {path:?}", value.len());
        Ok(with_lock(&self.lock_path(), LockMode::Exclusive, || {
            replace_file(&path, value)
        })?)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.value_path(key)?;
        debug!("Removing {path:?}");
        Ok(with_lock(&self.lock_path(), LockMode::Exclusive, || {
            remove_if_exists(&path)
        })?)
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("Key can't be empty");
    }
    if key.starts_with('.') {
        bail!("Key {key:?} can't start with a dot");
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        bail!("Key {key:?} contains illegal character {c:?}");
    }
    Ok(())
}
