use super::{Body, Next, RequestContext, Stage};
use crate::error::Result;
use crate::mime;
use crate::url::url_to_path;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

const INDEX_FILE: &str = "index.html";

/// Last-resort stage: serves files from the root verbatim.
///
/// A directory is served through its `index.html`. Anything else that is
/// not a regular file, or that cannot be read, is left unanswered.
#[derive(Debug, Clone)]
pub struct StaticStage {
    root: PathBuf,
}

impl StaticStage {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Stage for StaticStage {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()> {
        let Some(file) = find_file(&ctx.path, &self.root).await else {
            return next.run(ctx).await;
        };

        let Some(bytes) = read_static(&file).await else {
            return next.run(ctx).await;
        };
        trace!(path = %ctx.path, file = %file.display(), len = bytes.len(), "serving static file");
        ctx.respond(mime::content_type_for(&file), Body::Bytes(bytes));
        Ok(())
    }
}

/// A file that was found but cannot be read is logged and left unanswered.
async fn read_static(file: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(file).await {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            warn!(file = %file.display(), %error, "could not read static file");
            None
        }
    }
}

async fn find_file(url_path: &str, root: &Path) -> Option<PathBuf> {
    let path = url_to_path(url_path, root)?;
    let meta = tokio::fs::metadata(&path).await.ok()?;

    if meta.is_file() {
        return Some(path);
    }
    if meta.is_dir() {
        let index = path.join(INDEX_FILE);
        if tokio::fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
            return Some(index);
        }
    }
    None
}
