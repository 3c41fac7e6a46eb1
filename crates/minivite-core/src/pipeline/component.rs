use super::{Body, ChainSettings, Next, RequestContext, Stage};
use crate::error::Result;
use crate::mime;
use crate::rewrite::ImportRewriter;
use crate::sfc::{self, ComponentCompiler};
use crate::url::url_to_path;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

const COMPONENT_SUFFIX: &str = ".vue";

/// Compiles `.vue` requests into JavaScript modules.
///
/// Compiled output keeps its bare imports unless the chain was configured
/// with `rewrite_component_imports`.
pub struct ComponentStage {
    root: PathBuf,
    compiler: Arc<dyn ComponentCompiler>,
    rewriter: Option<ImportRewriter>,
}

impl ComponentStage {
    #[must_use]
    pub fn new(settings: &ChainSettings, compiler: Arc<dyn ComponentCompiler>) -> Self {
        Self {
            root: settings.root.clone(),
            compiler,
            rewriter: settings
                .rewrite_component_imports
                .then(|| ImportRewriter::new(settings.root.clone())),
        }
    }
}

#[async_trait]
impl Stage for ComponentStage {
    fn name(&self) -> &'static str {
        "component"
    }

    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()> {
        if !ctx.path.ends_with(COMPONENT_SUFFIX) {
            return next.run(ctx).await;
        }

        let Some(file) = url_to_path(&ctx.path, &self.root) else {
            return next.run(ctx).await;
        };
        if !tokio::fs::metadata(&file).await.is_ok_and(|m| m.is_file()) {
            return next.run(ctx).await;
        }

        match sfc::compile_component(self.compiler.as_ref(), &file, &ctx.path).await {
            Ok(code) => {
                let code = match &self.rewriter {
                    Some(rewriter) => rewriter.rewrite_source(&code, &ctx.path).code,
                    None => code,
                };
                debug!(path = %ctx.path, "compiled component");
                ctx.respond(mime::JAVASCRIPT, Body::Text(code));
            }
            Err(err) => {
                error!(path = %ctx.path, error = %err, "component compilation failed");
                ctx.fail(500, mime::JAVASCRIPT, failure_module(&err.to_string()));
            }
        }

        // Handled either way; nothing downstream sees a component request.
        Ok(())
    }
}

/// A module that reports a compile error in the browser console.
fn failure_module(message: &str) -> String {
    format!(
        "// component compilation failed\nconsole.error({});\n",
        sfc::js_string(message)
    )
}
