use std::path::PathBuf;
use thiserror::Error;

/// Core error type for minivite operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Transform failed for {path}: {message}")]
    Transform { path: String, message: String },
}

impl Error {
    /// Build a `Read` error for `path`.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Why a bare specifier could not be mapped to a servable file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("package `{name}` not found (no {manifest})")]
    PackageNotFound { name: String, manifest: PathBuf },

    #[error("invalid package manifest {manifest}: {message}")]
    InvalidManifest { manifest: PathBuf, message: String },

    #[error("entry file for `{name}` not found in {package_dir}")]
    EntryNotFound { name: String, package_dir: PathBuf },

    #[error("{path} lies outside the project root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Failure reported by a component compiler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("{file}: unclosed <{tag}> block starting at byte {offset}")]
    UnclosedBlock {
        file: String,
        tag: String,
        offset: usize,
    },

    #[error("{file}: a component may contain only one <{tag}> block")]
    DuplicateBlock { file: String, tag: String },

    #[error("{file}: <script setup> is not supported")]
    ScriptSetup { file: String },

    #[error("{file}: {message}")]
    Invalid { file: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
