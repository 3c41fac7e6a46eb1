use super::{Next, RequestContext, Stage};
use crate::error::Result;
use crate::mime;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::error;

/// Turns failures anywhere downstream, including panics, into a 500
/// response. The server keeps running.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBoundary;

#[async_trait]
impl Stage for ErrorBoundary {
    fn name(&self) -> &'static str {
        "error-boundary"
    }

    async fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> Result<()> {
        let outcome = AssertUnwindSafe(next.run(ctx)).catch_unwind().await;

        let message = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => format!("panic: {}", panic_message(payload.as_ref())),
        };

        error!(path = %ctx.path, error = %message, "request failed");
        ctx.fail(500, mime::PLAIN_TEXT, message);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::{Body, TransformChain};

    struct Fails;

    #[async_trait]
    impl Stage for Fails {
        fn name(&self) -> &'static str {
            "fails"
        }

        async fn handle(&self, ctx: &mut RequestContext, _next: Next<'_>) -> Result<()> {
            ctx.respond("text/html", Body::Text("partial".to_string()));
            Err(Error::Transform {
                path: ctx.path.clone(),
                message: "disk on fire".to_string(),
            })
        }
    }

    struct Panics;

    #[async_trait]
    impl Stage for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        async fn handle(&self, _ctx: &mut RequestContext, _next: Next<'_>) -> Result<()> {
            panic!("stage exploded");
        }
    }

    #[tokio::test]
    async fn test_error_becomes_500() {
        let chain = TransformChain::builder().stage(ErrorBoundary).stage(Fails).build();
        let ctx = chain.run("/a").await;

        assert_eq!(ctx.status, 500);
        assert_eq!(ctx.content_type.as_deref(), Some(mime::PLAIN_TEXT));
        assert_eq!(
            ctx.body,
            Some(Body::Text("Transform failed for /a: disk on fire".to_string()))
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let chain = TransformChain::builder().stage(ErrorBoundary).stage(Panics).build();
        let ctx = chain.run("/a").await;

        assert_eq!(ctx.status, 500);
        let Some(Body::Text(body)) = ctx.body else {
            panic!("expected text body");
        };
        assert!(body.contains("stage exploded"));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let chain = TransformChain::builder().stage(ErrorBoundary).build();
        let ctx = chain.run("/a").await;
        assert_eq!(ctx.status, 404);
    }
}
