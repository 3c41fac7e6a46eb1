//! Per-request transform chain.
//!
//! Every request flows through an ordered list of [`Stage`]s. A stage may
//! answer the request itself, let the rest of the chain run and then adjust
//! the result, or simply defer by calling [`Next::run`]. A request that no
//! stage answers ends with status 404.
//!
//! The standard chain is:
//!
//! ```text
//! ErrorBoundary → HtmlInjection → ComponentStage → ScriptStage → StaticStage
//! ```

mod boundary;
mod component;
mod html;
mod script;
mod static_files;

pub use boundary::ErrorBoundary;
pub use component::ComponentStage;
pub use html::HtmlInjection;
pub use script::ScriptStage;
pub use static_files::StaticStage;

use crate::error::Result;
use crate::sfc::BuiltinCompiler;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

/// Response body produced by the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

/// Mutable per-request state threaded through the stages.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// URL path of the request, without query or fragment.
    pub path: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Option<Body>,
}

impl RequestContext {
    #[must_use]
    pub fn new(path: &str) -> Self {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        Self {
            path: path.to_string(),
            status: 404,
            content_type: None,
            body: None,
        }
    }

    /// Answer the request successfully.
    pub fn respond(&mut self, content_type: impl Into<String>, body: Body) {
        self.status = 200;
        self.content_type = Some(content_type.into());
        self.body = Some(body);
    }

    /// Answer the request with an error status and a text body.
    pub fn fail(&mut self, status: u16, content_type: impl Into<String>, message: impl Into<String>) {
        self.status = status;
        self.content_type = Some(content_type.into());
        self.body = Some(Body::Text(message.into()));
    }

    /// Whether some stage has produced a body.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.body.is_some()
    }
}

/// One interceptor in the chain.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Handle the request, calling `next.run(ctx)` to defer to the rest of
    /// the chain.
    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()>;
}

/// The stages after the current one.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Arc<dyn Stage>],
}

impl Next<'_> {
    /// Run the remaining stages. Past the last stage this does nothing.
    pub async fn run(self, ctx: &mut RequestContext) -> Result<()> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(ctx, Next { stages: rest }).await,
            None => Ok(()),
        }
    }
}

/// Settings shared by the standard stages.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    /// Project root; all request paths resolve below it.
    pub root: PathBuf,
    /// Also rewrite bare imports in compiled component output.
    pub rewrite_component_imports: bool,
}

impl ChainSettings {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            rewrite_component_imports: false,
        }
    }
}

/// An ordered, immutable list of stages.
#[derive(Clone)]
pub struct TransformChain {
    stages: Vec<Arc<dyn Stage>>,
}

impl TransformChain {
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder { stages: Vec::new() }
    }

    /// The dev server chain, in its fixed order.
    #[must_use]
    pub fn standard(settings: &ChainSettings) -> Self {
        Self::builder()
            .stage(ErrorBoundary)
            .stage(HtmlInjection)
            .stage(ComponentStage::new(settings, Arc::new(BuiltinCompiler)))
            .stage(ScriptStage::new(settings.root.clone()))
            .stage(StaticStage::new(settings.root.clone()))
            .build()
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run one request through the chain.
    pub async fn run(&self, path: &str) -> RequestContext {
        let mut ctx = RequestContext::new(path);

        if let Err(err) = (Next { stages: &self.stages }).run(&mut ctx).await {
            // Only reachable for chains built without an ErrorBoundary.
            error!(path = %ctx.path, error = %err, "unhandled transform error");
            ctx.fail(500, crate::mime::PLAIN_TEXT, err.to_string());
        }

        ctx
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformChain")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Append-only builder for [`TransformChain`].
pub struct ChainBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl ChainBuilder {
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    #[must_use]
    pub fn build(self) -> TransformChain {
        TransformChain { stages: self.stages }
    }
}
