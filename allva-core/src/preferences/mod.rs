//! Durable key/value preferences backed by a flat file.
//!
//! The store keeps every entry in memory and mirrors the whole map to disk
//! after each mutation. Disk failures never reach callers: they are logged
//! and the in-memory cache keeps serving reads, so a broken preferences file
//! degrades to defaults instead of blocking a login.

pub mod codec;
pub mod value;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

pub use value::{FromPreference, ToPreference};

/// Keys written by the login core.
pub mod keys {
    /// User number of the last remembered login.
    pub const LAST_USER: &str = "last_user";
    /// Office code of the last remembered login.
    pub const LAST_OFFICE: &str = "last_office";
    /// `true` or `false`.
    pub const REMEMBER_SESSION: &str = "remember_session";
    /// Installation id reported in the device context.
    pub const DEVICE_UUID: &str = "device_uuid";
}

/// Disk failure behind the store. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// The file exists but could not be read as UTF-8 text.
    #[error("failed to read preferences from {path}")]
    Read {
        /// Preference file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be created or written.
    #[error("failed to write preferences to {path}")]
    Write {
        /// Preference file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not replace the preference file.
    #[error("failed to move preferences into place at {path}")]
    Persist {
        /// Preference file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Process-wide preference cache with an on-disk mirror.
///
/// Construct one at startup and share it behind an `Arc`. The mutex covers
/// both the cache and the file rewrite so concurrent writers cannot
/// interleave partial files.
#[derive(Debug)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    cache: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore {
    /// Open the store at `path`, reading whatever is already there.
    ///
    /// A missing file yields an empty store. An unreadable one is logged and
    /// also yields an empty store; the next mutation will overwrite it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match read_entries(&path) {
            Ok(entries) => {
                log::debug!(
                    "[PreferenceStore] Loaded {} entries from {}",
                    entries.len(),
                    path.display()
                );
                entries
            }
            Err(err) => {
                log::warn!("[PreferenceStore] {err}; starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            cache: Mutex::new(cache),
        }
    }

    /// Store with no backing file, for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored value for `key`, or `default` when absent or unparseable.
    pub fn get<T: FromPreference>(&self, key: &str, default: T) -> T {
        self.cache
            .lock()
            .get(key)
            .and_then(|raw| T::from_preference(raw))
            .unwrap_or(default)
    }

    /// String value for `key`, or `default`.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key, default.to_string())
    }

    /// Whether `key` has a stored value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.cache.lock().contains_key(key)
    }

    /// Store `value` under `key` and rewrite the file.
    pub fn set(&self, key: impl Into<String>, value: impl ToPreference) {
        let mut cache = self.cache.lock();
        cache.insert(key.into(), value.to_preference());
        self.flush(&cache);
    }

    /// Drop `key` and rewrite the file.
    pub fn remove(&self, key: &str) {
        let mut cache = self.cache.lock();
        cache.remove(key);
        self.flush(&cache);
    }

    /// Remove several keys with a single rewrite.
    pub fn remove_all(&self, keys: &[&str]) {
        let mut cache = self.cache.lock();
        for key in keys {
            cache.remove(*key);
        }
        self.flush(&cache);
    }

    /// Stable identifier of this installation, created on first use.
    pub fn device_id(&self) -> String {
        let mut cache = self.cache.lock();
        if let Some(existing) = cache
            .get(keys::DEVICE_UUID)
            .filter(|id| !id.trim().is_empty())
        {
            return existing.clone();
        }

        let id = Uuid::new_v4().to_string();
        cache.insert(keys::DEVICE_UUID.to_string(), id.clone());
        self.flush(&cache);
        log::info!("[PreferenceStore] Generated device id {}", &id[..8]);
        id
    }

    /// Copy of every entry, mostly for diagnostics.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.cache.lock().clone()
    }

    fn flush(&self, cache: &BTreeMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = write_entries(path, cache) {
            log::warn!("[PreferenceStore] {err}; keeping in-memory values");
        }
    }
}

fn read_entries(
    path: &Path,
) -> Result<BTreeMap<String, String>, PreferenceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BTreeMap::new());
        }
        Err(source) => {
            return Err(PreferenceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    Ok(codec::decode_all(&contents).collect())
}

/// Replace the file with the full contents of `entries`.
///
/// Writes a sibling temp file, syncs it and renames it over the target so a
/// crash mid-write leaves the previous file intact.
fn write_entries(
    path: &Path,
    entries: &BTreeMap<String, String>,
) -> Result<(), PreferenceError> {
    let write_err = |source: std::io::Error| PreferenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut body = String::new();
    for (key, value) in entries {
        body.push_str(&codec::encode_line(key, value));
        body.push('\n');
    }

    let tmp_path =
        path.with_extension(format!("tmp.{}", Uuid::new_v4().simple()));
    let written = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()
    })();
    if let Err(source) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    if let Err(source) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(PreferenceError::Persist {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_get_remove_round_trip() {
        let store = PreferenceStore::in_memory();
        store.set("k", "v");
        assert_eq!(store.get_str("k", "default"), "v");

        store.remove("k");
        assert_eq!(store.get_str("k", "default"), "default");
    }

    #[test]
    fn bool_parse_failure_falls_back_to_default() {
        let store = PreferenceStore::in_memory();
        store.set(keys::REMEMBER_SESSION, "maybe");
        assert!(store.get(keys::REMEMBER_SESSION, true));
        assert!(!store.get(keys::REMEMBER_SESSION, false));

        store.set(keys::REMEMBER_SESSION, true);
        assert!(store.get(keys::REMEMBER_SESSION, false));
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempdir().expect("tempdir");
        let store = PreferenceStore::load(dir.path().join("absent.dat"));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn unreadable_file_is_an_empty_store() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.dat");
        std::fs::create_dir(&path).expect("dir in place of file");

        let store = PreferenceStore::load(&path);
        assert!(store.entries().is_empty());

        store.set(keys::LAST_USER, "1001");
        assert_eq!(store.get_str(keys::LAST_USER, ""), "1001");
        assert!(path.is_dir());
    }

    #[test]
    fn non_utf8_file_is_an_empty_store() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.dat");
        std::fs::write(&path, [0xff, 0xfe, b'=', 0x80]).expect("write");

        let store = PreferenceStore::load(&path);
        assert!(store.entries().is_empty());
        store.set(keys::REMEMBER_SESSION, true);
        assert!(store.get(keys::REMEMBER_SESSION, false));
    }

    #[test]
    fn writes_replace_the_whole_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preferences.dat");
        let store = PreferenceStore::load(&path);

        store.set("b", "2");
        store.set("a", "1");
        store.remove("b");

        let contents = std::fs::read_to_string(&path).expect("file written");
        assert_eq!(contents, "a=1\n");
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let dir = tempdir().expect("tempdir");
        let store = PreferenceStore::load(dir.path().join("preferences.dat"));
        store.set("a", "1");
        store.set("a", "2");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| {
                entry.expect("entry").file_name().to_string_lossy().into_owned()
            })
            .collect();
        assert_eq!(names, vec!["preferences.dat"]);
    }

    #[test]
    fn unwritable_location_degrades_to_memory() {
        let dir = tempdir().expect("tempdir");
        // A directory where the file should be makes every rename fail.
        let path = dir.path().join("preferences.dat");
        std::fs::create_dir_all(path.join("occupied")).expect("mkdir");

        let store = PreferenceStore::load(&path);
        store.set("k", "v");
        assert_eq!(store.get_str("k", "default"), "v");
    }

    #[test]
    fn device_id_is_created_once() {
        let store = PreferenceStore::in_memory();
        let first = store.device_id();
        let second = store.device_id();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(store.get_str(keys::DEVICE_UUID, ""), first);
    }
}
