use super::{Body, Next, RequestContext, Stage};
use crate::error::Result;
use crate::{hmr, mime};
use async_trait::async_trait;
use tracing::trace;

/// Adds the reload client to HTML responses produced downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlInjection;

#[async_trait]
impl Stage for HtmlInjection {
    fn name(&self) -> &'static str {
        "html-injection"
    }

    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()> {
        next.run(ctx).await?;

        if !ctx.content_type.as_deref().is_some_and(mime::is_html) {
            return Ok(());
        }

        let html = match ctx.body.take() {
            Some(Body::Text(text)) => text,
            Some(Body::Bytes(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    // Not UTF-8; serve it untouched.
                    ctx.body = Some(Body::Bytes(err.into_bytes()));
                    return Ok(());
                }
            },
            None => return Ok(()),
        };

        trace!(path = %ctx.path, "injecting reload client");
        ctx.body = Some(Body::Text(hmr::inject_client(&html)));
        Ok(())
    }
}
