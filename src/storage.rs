//! Persistent key-value storage for user preferences.
//!
//! Values are plain strings. The file-backed store writes through on every
//! `set`, so a crash never loses a preference the user already changed.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// String key-value store
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value and persist it immediately
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store persisted as a flat TOML table (`prefs.toml`)
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TomlFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Ignoring malformed preferences file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Could not read preferences file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        tracing::debug!("Loaded {} preference entries from {:?}", entries.len(), path);
        Self { path, entries }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let contents =
            toml::to_string_pretty(&self.entries).context("Failed to serialize preferences")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Volatile store for `--no-save` sessions (and tests)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
