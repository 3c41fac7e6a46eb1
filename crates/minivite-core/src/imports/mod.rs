//! Import statement scanning.

pub mod scan;

pub use scan::{scan_imports, ImportKind, ImportSpecifier};
