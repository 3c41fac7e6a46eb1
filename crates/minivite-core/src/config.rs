//! Dev server configuration.
//!
//! Values come from three layers, lowest priority first: built-in defaults,
//! an optional `minivite.config.json` in the project root, then CLI flags.
//!
//! ```json
//! { "port": 8080, "host": "0.0.0.0", "root": "./app", "rewriteComponentImports": true }
//! ```

use crate::error::{Error, Result};
use crate::pipeline::ChainSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "minivite.config.json";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "localhost";

/// Effective dev server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Host to bind.
    pub host: String,
    /// Project root; the base for every path computation.
    pub root: PathBuf,
    /// Also rewrite bare imports in compiled components.
    pub rewrite_component_imports: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            rewrite_component_imports: false,
        }
    }
}

impl DevConfig {
    /// Defaults rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_rewrite_component_imports(mut self, enabled: bool) -> Self {
        self.rewrite_component_imports = enabled;
        self
    }

    /// Overlay values set in a config file. A relative `root` is taken
    /// relative to `base`, the directory holding the file.
    #[must_use]
    pub fn merge_file(mut self, file: FileConfig, base: &Path) -> Self {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(root) = file.root {
            self.root = base.join(root);
        }
        if let Some(enabled) = file.rewrite_component_imports {
            self.rewrite_component_imports = enabled;
        }
        self
    }

    /// Resolve `root` to an absolute, symlink-free directory.
    pub fn canonicalize_root(mut self) -> Result<Self> {
        let root = std::fs::canonicalize(&self.root).map_err(|_| Error::RootNotFound {
            path: self.root.clone(),
        })?;
        if !root.is_dir() {
            return Err(Error::RootNotFound { path: root });
        }
        self.root = root;
        Ok(self)
    }

    /// `host:port`, for binding.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn chain_settings(&self) -> ChainSettings {
        ChainSettings {
            root: self.root.clone(),
            rewrite_component_imports: self.rewrite_component_imports,
        }
    }
}

/// Contents of `minivite.config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub root: Option<PathBuf>,
    pub rewrite_component_imports: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The config file in `root`, if there is one.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    let path = root.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Defaults overlaid with the config file at `explicit`, or with the one
/// discovered in `root`. CLI overrides are applied by the caller.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DevConfig> {
    let config = DevConfig::new(root.to_path_buf());

    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(root),
    };
    let Some(path) = path else {
        return Ok(config);
    };

    let file = FileConfig::load(&path)?;
    let base = path.parent().unwrap_or(root);
    Ok(config.merge_file(file, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = DevConfig::new(PathBuf::from("/p"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "localhost");
        assert!(!config.rewrite_component_imports);
        assert_eq!(config.address(), "localhost:3000");
    }

    #[test]
    fn test_no_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config, DevConfig::new(dir.path().to_path_buf()));
    }

    #[test]
    fn test_discovered_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"port": 8080, "root": "app", "rewriteComponentImports": true}"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.root, dir.path().join("app"));
        assert!(config.rewrite_component_imports);
    }

    #[test]
    fn test_explicit_file_wins_over_discovery() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"port": 1}"#).unwrap();
        let other = dir.path().join("other.json");
        fs::write(&other, r#"{"port": 2}"#).unwrap();

        let config = load_config(dir.path(), Some(&other)).unwrap();
        assert_eq!(config.port, 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"prot": 1}"#).unwrap();

        let err = load_config(dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let err = load_config(dir.path(), Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_canonicalize_root() {
        let dir = tempdir().unwrap();
        let config = DevConfig::new(dir.path().join(".")).canonicalize_root().unwrap();
        assert_eq!(config.root, fs::canonicalize(dir.path()).unwrap());

        let missing = DevConfig::new(dir.path().join("missing")).canonicalize_root();
        assert!(matches!(missing, Err(Error::RootNotFound { .. })));
    }
}
