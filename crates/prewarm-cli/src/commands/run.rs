//! `prewarm run`: warm a dev server running in another process.
//!
//! The dev server's port is polled. Every time it starts accepting
//! connections, the warm-up plugin is attached to a fresh server context and
//! `listening` is emitted, exactly as an in-process host would do it.
//!
//! ```text
//! poll host:port ──down→up──▶ HttpDevServer + HttpServer
//!                               configure_server → emit_listening
//!                             ──up→down──▶ wait for the next start
//! ```

use super::{load, OptionSources};
use crate::term::TermLogger;
use miette::{IntoDiagnostic, Result};
use prewarm_core::{
    warmup, Command, HttpDevServer, HttpServer, PluginContainer, ServerContext,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;

/// Run action.
#[derive(Debug, Clone)]
pub struct RunAction {
    /// Working directory the project root is searched from.
    pub cwd: PathBuf,
    /// Dev server host.
    pub host: String,
    /// Dev server port.
    pub port: u16,
    /// How often to probe the port.
    pub poll: Duration,
    pub sources: OptionSources,
}

/// Run the sidecar until Ctrl+C.
pub async fn run(action: RunAction, json: bool) -> Result<()> {
    let (root, options) = load(&action.cwd, &action.sources)?;
    if options.client_files.is_none() && options.ssr_files.is_none() {
        tracing::warn!("no clientFiles or ssrFiles configured, nothing will be warmed");
    }

    // expansion starts here and is reused for every server start
    let mut plugins = PluginContainer::new(Command::Serve);
    plugins.add(Box::new(warmup(options).into_diagnostic()?));

    let address = format!("{}:{}", action.host, action.port);
    let origin = format!("http://{address}");
    tracing::info!(%origin, root = %root.display(), "waiting for dev server");

    let mut ticks = tokio::time::interval(action.poll);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut up = false;
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.into_diagnostic()?;
                tracing::info!("shutting down");
                return Ok(());
            }
            _ = ticks.tick() => {
                let reachable = probe(&address, action.poll).await;
                match (up, reachable) {
                    (false, true) => {
                        tracing::info!(%origin, "dev server is listening, warming up");
                        attach(&plugins, &root, &origin, json)?;
                    }
                    (true, false) => tracing::info!(%origin, "dev server stopped"),
                    _ => {}
                }
                up = reachable;
            }
        }
    }
}

async fn probe(address: &str, limit: Duration) -> bool {
    matches!(
        tokio::time::timeout(limit, TcpStream::connect(address)).await,
        Ok(Ok(_))
    )
}

/// Wire the plugins to a newly started server and announce it as listening.
fn attach(plugins: &PluginContainer, root: &Path, origin: &str, json: bool) -> Result<()> {
    let server = HttpDevServer::new(root, origin);
    // JSON mode keeps stderr machine-readable
    let server = if json {
        server
    } else {
        server.with_logger(TermLogger)
    };

    let http_server = Arc::new(HttpServer::new());
    let ctx = ServerContext::new(Arc::new(server), Some(Arc::clone(&http_server)));
    plugins.call_configure_server(&ctx).into_diagnostic()?;
    http_server.emit_listening();
    Ok(())
}
