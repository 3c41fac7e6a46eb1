use super::{Body, Next, RequestContext, Stage};
use crate::error::{Error, Result};
use crate::mime;
use crate::rewrite::ImportRewriter;
use crate::url::url_to_path;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, error};

/// Script suffixes handled by [`ScriptStage`].
const SCRIPT_SUFFIXES: &[&str] = &[".js", ".mjs"];

/// Serves script files with their bare imports rewritten.
#[derive(Debug, Clone)]
pub struct ScriptStage {
    rewriter: ImportRewriter,
}

impl ScriptStage {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            rewriter: ImportRewriter::new(root),
        }
    }

    async fn transform(&self, ctx: &RequestContext, file: &std::path::Path) -> Result<String> {
        let bytes = tokio::fs::read(file).await.map_err(|e| Error::read(file, e))?;
        let source = String::from_utf8(bytes).map_err(|e| Error::Transform {
            path: ctx.path.clone(),
            message: format!("source is not valid UTF-8 ({e})"),
        })?;

        let outcome = self.rewriter.rewrite_source(&source, &ctx.path);
        debug!(
            path = %ctx.path,
            rewritten = outcome.rewritten,
            unresolved = outcome.unresolved.len(),
            "transformed script"
        );
        Ok(outcome.code)
    }
}

#[async_trait]
impl Stage for ScriptStage {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()> {
        if !is_script(&ctx.path) {
            return next.run(ctx).await;
        }

        let Some(file) = url_to_path(&ctx.path, self.rewriter.root()) else {
            return next.run(ctx).await;
        };
        if !tokio::fs::metadata(&file).await.is_ok_and(|m| m.is_file()) {
            return next.run(ctx).await;
        }

        match self.transform(ctx, &file).await {
            Ok(code) => ctx.respond(mime::JAVASCRIPT, Body::Text(code)),
            Err(err) => {
                error!(path = %ctx.path, error = %err, "script transform failed");
                ctx.fail(500, mime::PLAIN_TEXT, err.to_string());
            }
        }
        Ok(())
    }
}

fn is_script(path: &str) -> bool {
    SCRIPT_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}
