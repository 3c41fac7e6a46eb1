//! Bare specifier resolution against `<root>/node_modules`.
//!
//! Resolution is uncached: each call re-reads the package
//! manifest, so edits under `node_modules` are picked up on the next request.

mod manifest;

pub use manifest::{PackageManifest, DEFAULT_ENTRY};

use crate::error::ResolveError;
use crate::specifier::split_bare;
use std::path::{Path, PathBuf};

/// A bare specifier mapped to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub absolute_path: PathBuf,
}

/// Resolve a bare specifier to the package's browser-servable entry file.
///
/// For `pkg`: read `<root>/node_modules/pkg/package.json`, pick `module`,
/// `main` or `index.js`, and fall back to `index.js` when the chosen entry
/// does not exist. For `pkg/sub/path`: serve `sub/path` (or `sub/path.js`)
/// from the package directory.
pub fn resolve_package(spec: &str, root: &Path) -> Result<ResolvedModule, ResolveError> {
    let (name, subpath) = split_bare(spec);
    let package_dir = root.join("node_modules").join(name);
    let manifest_path = package_dir.join("package.json");

    if let Some(sub) = subpath {
        if !package_dir.is_dir() {
            return Err(ResolveError::PackageNotFound {
                name: name.to_string(),
                manifest: manifest_path,
            });
        }
        return resolve_subpath(name, &package_dir, sub);
    }

    if !manifest_path.is_file() {
        return Err(ResolveError::PackageNotFound {
            name: name.to_string(),
            manifest: manifest_path,
        });
    }

    let manifest = PackageManifest::read(&manifest_path)?;
    let entry = package_dir.join(manifest.entry().trim_start_matches("./"));
    if entry.is_file() {
        return Ok(ResolvedModule {
            absolute_path: entry,
        });
    }

    let index = package_dir.join(DEFAULT_ENTRY);
    if index.is_file() {
        return Ok(ResolvedModule {
            absolute_path: index,
        });
    }

    Err(ResolveError::EntryNotFound {
        name: name.to_string(),
        package_dir,
    })
}

fn resolve_subpath(name: &str, package_dir: &Path, sub: &str) -> Result<ResolvedModule, ResolveError> {
    let target = package_dir.join(sub);
    if target.is_file() {
        return Ok(ResolvedModule {
            absolute_path: target,
        });
    }

    let with_ext = PathBuf::from(format!("{}.js", target.display()));
    if with_ext.is_file() {
        return Ok(ResolvedModule {
            absolute_path: with_ext,
        });
    }

    Err(ResolveError::EntryNotFound {
        name: format!("{name}/{sub}"),
        package_dir: package_dir.to_path_buf(),
    })
}
