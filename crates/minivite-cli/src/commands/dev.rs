//! `minivite dev` command implementation.
//!
//! Serves a project directory over HTTP. Every request, whatever its method
//! or path, is answered by the core transform chain:
//!
//! ```text
//! GET /src/main.js
//!   → error boundary → HTML injection → component → script → static
//!   → status + content type + body
//! ```
//!
//! The server runs on a single-threaded runtime and stops on Ctrl+C.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use minivite_core::config::{load_config, DevConfig};
use minivite_core::mime;
use minivite_core::{RequestContext, TransformChain};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Dev server action, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct DevAction {
    /// Working directory; the project root when neither `--root` nor the
    /// config file names one.
    pub cwd: PathBuf,
    /// Root override (`--root`).
    pub root: Option<PathBuf>,
    /// Port override.
    pub port: Option<u16>,
    /// Host override.
    pub host: Option<String>,
    /// Explicit config file path (overrides auto-discovery).
    pub config: Option<PathBuf>,
    /// Rewrite bare imports in compiled components too.
    pub rewrite_component_imports: bool,
}

/// Merge defaults, the config file and CLI flags, in rising priority.
///
/// The config file is looked up in `--root` when given, else in the
/// working directory.
pub fn resolve_config(action: &DevAction) -> Result<DevConfig> {
    let base = action.root.as_deref().unwrap_or(&action.cwd);
    let mut config = load_config(base, action.config.as_deref()).into_diagnostic()?;

    if let Some(root) = &action.root {
        config = config.with_root(root.clone());
    }
    if let Some(port) = action.port {
        config = config.with_port(port);
    }
    if let Some(host) = &action.host {
        config = config.with_host(host.clone());
    }
    if action.rewrite_component_imports {
        config = config.with_rewrite_component_imports(true);
    }

    config.canonicalize_root().into_diagnostic()
}

/// The HTTP surface: one fallback handler in front of the chain.
pub fn build_router(chain: Arc<TransformChain>) -> Router {
    Router::new()
        .fallback(serve)
        .with_state(chain)
        .layer(TraceLayer::new_for_http())
}

async fn serve(State(chain): State<Arc<TransformChain>>, uri: Uri) -> Response {
    into_response(chain.run(uri.path()).await)
}

fn into_response(ctx: RequestContext) -> Response {
    let status = StatusCode::from_u16(ctx.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let Some(body) = ctx.body else {
        return (
            status,
            [(header::CONTENT_TYPE, mime::PLAIN_TEXT)],
            format!("Not Found: {}", ctx.path),
        )
            .into_response();
    };

    let content_type = ctx
        .content_type
        .unwrap_or_else(|| mime::OCTET_STREAM.to_string());

    (
        status,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        Body::from(body.into_bytes()),
    )
        .into_response()
}

/// Run the dev server until Ctrl+C.
pub async fn run(action: DevAction) -> Result<()> {
    let config = resolve_config(&action)?;
    let chain = Arc::new(TransformChain::standard(&config.chain_settings()));

    // Bind IPv4 loopback for `localhost` so the printed URL always works.
    let bind_host = if config.host == "localhost" {
        "127.0.0.1"
    } else {
        config.host.as_str()
    };
    let listener = tokio::net::TcpListener::bind((bind_host, config.port))
        .await
        .into_diagnostic()?;

    let url = format!("http://{}", config.address());
    info!(%url, root = %config.root.display(), "listening");
    println!();
    println!("  Dev server running at {url}");
    println!("  Serving {}", config.root.display());
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, build_router(chain))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
    println!("  Shutting down");
}
