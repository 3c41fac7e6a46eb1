#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Core of the minivite dev server.
//!
//! Nothing here knows about HTTP: the [`pipeline::TransformChain`] takes a
//! request path and produces a status, a content type and a body. The CLI
//! crate puts it behind a socket.

pub mod config;
pub mod error;
pub mod hmr;
pub mod imports;
pub mod mime;
pub mod pipeline;
pub mod resolve;
pub mod rewrite;
pub mod sfc;
pub mod specifier;
pub mod url;
pub mod version;

pub use config::{load_config, DevConfig};
pub use error::{CompileError, Error, ResolveError, Result};
pub use imports::{scan_imports, ImportKind, ImportSpecifier};
pub use pipeline::{Body, ChainSettings, RequestContext, Stage, TransformChain};
pub use resolve::{resolve_package, ResolvedModule};
pub use rewrite::{ImportRewriter, RewriteOutcome};
pub use specifier::{classify, PathKind};
pub use version::VERSION;
