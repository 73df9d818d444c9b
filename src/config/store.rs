//! Key/value configuration store.
//!
//! Settings and small pieces of persisted state (such as the last update
//! check) live in a flat map of string keys to string values, saved as
//! YAML under the footprint home directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FootprintError, Result};

/// Environment variable overriding the footprint home directory.
pub const HOME_ENV: &str = "FOOTPRINT_HOME";

/// Get/set access to persisted configuration values.
pub trait ConfigStore {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory holding footprint's configuration.
///
/// `$FOOTPRINT_HOME` when set, otherwise `~/.footprint`.
pub fn home_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".footprint")
}

/// A [`ConfigStore`] backed by a YAML file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileConfigStore {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        home_dir().join("config.yml")
    }

    /// Open the store at the default location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let values = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            let raw: BTreeMap<String, serde_yaml::Value> =
                serde_yaml::from_str(&content).map_err(|e| FootprintError::ConfigParseError {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            raw.into_iter()
                .map(|(key, value)| match scalar_to_string(value) {
                    Some(value) => Ok((key, value)),
                    None => Err(FootprintError::ConfigParseError {
                        path: path.clone(),
                        message: format!("value of '{}' must be a string, number or boolean", key),
                    }),
                })
                .collect::<Result<_>>()?
        };

        Ok(Self { path, values })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored entries, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Save to disk using atomic write.
    ///
    /// Uses the write-to-temp-then-rename pattern to prevent corruption.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&self.values).map_err(|e| {
            FootprintError::ConfigValidationError {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Render a scalar YAML value the way it would be typed on the command line.
///
/// Hand-edited files may hold `update.notify: false` rather than `'false'`.
fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

/// An in-memory [`ConfigStore`], used when nothing should touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    values: BTreeMap<String, String>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileConfigStore::open(temp.path().join("config.yml")).unwrap();
        assert_eq!(store.entries().count(), 0);
        assert!(store.get("update.notify").is_none());
    }

    #[test]
    fn set_and_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yml");

        let mut store = FileConfigStore::open(&path).unwrap();
        store.set("update.latest_version", "v1.2.0").unwrap();
        store.set("update.notify", "false").unwrap();

        let reopened = FileConfigStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("update.latest_version").as_deref(),
            Some("v1.2.0")
        );
        assert_eq!(reopened.get("update.notify").as_deref(), Some("false"));
    }

    #[test]
    fn set_overwrites() {
        let temp = TempDir::new().unwrap();
        let mut store = FileConfigStore::open(temp.path().join("config.yml")).unwrap();
        store.set("key", "one").unwrap();
        store.set("key", "two").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("two"));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        let mut store = FileConfigStore::open(&path).unwrap();
        store.set("key", "value").unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("yml.tmp").exists());
    }

    #[test]
    fn entries_are_sorted() {
        let mut store = FileConfigStore {
            path: PathBuf::from("/unused"),
            values: BTreeMap::new(),
        };
        store.values.insert("b".into(), "2".into());
        store.values.insert("a".into(), "1".into());

        let keys: Vec<&str> = store.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn open_rejects_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "- just\n- a list\n").unwrap();

        let err = FileConfigStore::open(&path).unwrap_err();
        assert!(matches!(err, FootprintError::ConfigParseError { .. }));
    }

    #[test]
    fn open_accepts_unquoted_scalars() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "update.notify: false\nretries: 3\nupdate.latest_version: v1.2.0\n")
            .unwrap();

        let store = FileConfigStore::open(&path).unwrap();
        assert_eq!(store.get("update.notify").as_deref(), Some("false"));
        assert_eq!(store.get("retries").as_deref(), Some("3"));
        assert_eq!(
            store.get("update.latest_version").as_deref(),
            Some("v1.2.0")
        );
        assert!(crate::config::UpdateSettings::notice_disabled_in(&store));
    }

    #[test]
    fn open_rejects_nested_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "update:\n  notify: false\n").unwrap();

        let err = FileConfigStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("update"));
        assert!(matches!(err, FootprintError::ConfigParseError { .. }));
    }

    #[test]
    fn open_empty_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "").unwrap();

        let store = FileConfigStore::open(&path).unwrap();
        assert_eq!(store.entries().count(), 0);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryConfigStore::new();
        assert!(store.get("a").is_none());
        store.set("a", "b").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("b"));
    }
}
