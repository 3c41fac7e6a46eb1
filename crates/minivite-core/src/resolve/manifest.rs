//! The subset of `package.json` needed to find a browser entry point.

use crate::error::ResolveError;
use serde::Deserialize;
use std::path::Path;

/// Entry file used when a manifest names neither `module` nor `main`.
pub const DEFAULT_ENTRY: &str = "index.js";

/// Package manifest fields consulted during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    /// ES module entry, preferred for the browser.
    #[serde(default)]
    pub module: Option<String>,
    /// CommonJS entry.
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Read and parse a manifest from disk. No caching: every call hits the file system.
    pub fn read(path: &Path) -> Result<Self, ResolveError> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::InvalidManifest {
            manifest: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| ResolveError::InvalidManifest {
            manifest: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse manifest JSON.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Entry file in priority order: `module`, `main`, then `index.js`.
    ///
    /// Empty strings count as absent.
    #[must_use]
    pub fn entry(&self) -> &str {
        [self.module.as_deref(), self.main.as_deref()]
            .into_iter()
            .flatten()
            .find(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_ENTRY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_prefers_module() {
        let m = PackageManifest::parse(r#"{"module": "dist/x.esm.js", "main": "dist/x.cjs"}"#)
            .unwrap();
        assert_eq!(m.entry(), "dist/x.esm.js");
    }

    #[test]
    fn test_entry_falls_back_to_main() {
        let m = PackageManifest::parse(r#"{"name": "x", "main": "lib/index.js"}"#).unwrap();
        assert_eq!(m.entry(), "lib/index.js");
    }

    #[test]
    fn test_entry_default() {
        let m = PackageManifest::parse(r#"{"name": "x", "version": "1.0.0"}"#).unwrap();
        assert_eq!(m.entry(), DEFAULT_ENTRY);
    }

    #[test]
    fn test_empty_module_is_ignored() {
        let m = PackageManifest::parse(r#"{"module": "", "main": "main.js"}"#).unwrap();
        assert_eq!(m.entry(), "main.js");
    }

    #[test]
    fn test_parse_rejects_non_string_entry() {
        assert!(PackageManifest::parse(r#"{"main": 42}"#).is_err());
    }
}
