//! Bare import rewriting for unbundled dev serving.
//!
//! Every bare specifier (`vue`) is replaced by a double-quoted root-relative
//! URL of the package entry (`"/node_modules/vue/dist/vue.esm-browser.js"`).
//! Relative and absolute specifiers are never touched.

use crate::error::ResolveError;
use crate::imports::{scan_imports, ImportSpecifier};
use crate::resolve::resolve_package;
use crate::specifier::classify;
use crate::url::path_to_url;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of rewriting one module.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
    /// The rewritten source.
    pub code: String,
    /// Number of specifiers replaced.
    pub rewritten: usize,
    /// Bare specifiers left as written, with the reason.
    pub unresolved: Vec<(String, ResolveError)>,
}

/// Import rewriter for dev server module serving.
#[derive(Debug, Clone)]
pub struct ImportRewriter {
    /// Project root directory.
    root: PathBuf,
}

impl ImportRewriter {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan `source` for imports and rewrite it.
    #[must_use]
    pub fn rewrite_source(&self, source: &str, importer: &str) -> RewriteOutcome {
        let specifiers = scan_imports(source);
        self.rewrite(source, &specifiers, importer)
    }

    /// Rewrite the bare specifiers among `specifiers`, which must have been
    /// scanned from exactly `source`.
    ///
    /// Splices are applied last-to-first so that the offsets of specifiers
    /// not yet processed stay valid. Resolution failures are logged and the
    /// specifier is left as written.
    #[must_use]
    pub fn rewrite(&self, source: &str, specifiers: &[ImportSpecifier], importer: &str) -> RewriteOutcome {
        let mut ordered: Vec<&ImportSpecifier> = specifiers.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut outcome = RewriteOutcome {
            code: source.to_string(),
            ..RewriteOutcome::default()
        };
        // Start of the lowest span already spliced.
        let mut floor = source.len();

        for spec in ordered {
            if spec.end > floor || source.get(spec.start..spec.end).is_none() {
                warn!(importer, specifier = %spec.raw, "skipping import with invalid span");
                continue;
            }

            if !classify(&spec.raw).is_bare() {
                continue;
            }

            match self.resolve_url(&spec.raw) {
                Ok(url) => {
                    let literal = serde_json::to_string(&url).unwrap_or_else(|_| format!("\"{url}\""));
                    outcome.code.replace_range(spec.start..spec.end, &literal);
                    outcome.rewritten += 1;
                    floor = spec.start;
                    debug!(importer, specifier = %spec.raw, %url, "rewrote bare import");
                }
                Err(reason) => {
                    warn!(importer, specifier = %spec.raw, %reason, "could not resolve bare import");
                    outcome.unresolved.push((spec.raw.clone(), reason));
                }
            }
        }

        outcome.unresolved.reverse();
        outcome
    }

    /// Resolve a bare specifier to the URL the browser should fetch.
    pub fn resolve_url(&self, spec: &str) -> Result<String, ResolveError> {
        let resolved = resolve_package(spec, &self.root)?;
        path_to_url(&resolved.absolute_path, &self.root)
    }
}
