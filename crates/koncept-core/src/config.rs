use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::clients::{ClientMap, UNKNOWN_CLIENT};
use crate::error::Result;

const DEFAULT_TOP_N: usize = 20;

/// Settings read from `koncept.toml`.
///
/// ```toml
/// default_top_n = 20
///
/// [clients]
/// C1 = "Interceramic"
/// C2 = "Home Depot"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub clients: ClientDirectory,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clients: ClientDirectory::default(),
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str::<AppConfig>(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists and falls back to the built-in settings otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// The client directory when one is configured, the built-in labels otherwise.
    pub fn client_map(&self) -> ClientMap {
        if self.clients.is_empty() {
            ClientMap::builtin()
        } else {
            ClientMap::from_directory(&self.clients)
        }
    }
}

/// Client display names keyed by identifier (`C1`..`C11`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ClientDirectory {
    entries: BTreeMap<String, String>,
}

impl ClientDirectory {
    pub fn insert(&mut self, code: impl Into<String>, display_name: impl Into<String>) {
        self.entries.insert(code.into(), display_name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Never fails: an identifier without an entry resolves to [`UNKNOWN_CLIENT`].
    pub fn resolve(&self, code: &str) -> &str {
        match self.entries.get(code) {
            Some(name) => name.as_str(),
            None => {
                debug!(code, "client identifier not configured");
                UNKNOWN_CLIENT
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClientDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut directory = ClientDirectory::default();
        for (code, name) in iter {
            directory.insert(code, name);
        }
        directory
    }
}
