//! Dev server warm-up.
//!
//! Transforms a configured set of entry files as soon as the dev server
//! starts listening, so the first browser request finds them already
//! compiled.
//!
//! ```text
//! warmup(options)            expand client/ssr patterns (blocking pool)
//!   configure_server         subscribe to `listening`
//!     listening              await each expansion, spawn one task per file
//!       warmup_file          classify → transform_index_html | transform_request
//! ```
//!
//! Every file is its own task. A failure is logged through the server's
//! logger and never affects other files.

pub mod expand;
pub mod file;
pub mod url;

pub use expand::{expand, expand_patterns, ExpandError, PendingFiles};
pub use file::{classify, warmup_file, RenderMode, WarmupError, WarmupTarget};
pub use url::{markup_url, module_url, FS_PREFIX};

use crate::config::WarmupOptions;
use crate::plugin::{Apply, HookResult, Plugin, ServerContext};
use crate::server::{DevServer, Logger, Tone};
use crate::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Plugin name.
pub const PLUGIN_NAME: &str = "warmup";

/// Build the warm-up plugin. Shorthand for [`WarmupPlugin::new`].
pub fn warmup(options: WarmupOptions) -> Result<WarmupPlugin, Error> {
    WarmupPlugin::new(options)
}

/// Warms configured files when the dev server starts listening.
///
/// Clones share the same expansions.
#[derive(Debug, Clone)]
pub struct WarmupPlugin {
    runtime: Handle,
    client_files: Option<PendingFiles>,
    ssr_files: Option<PendingFiles>,
}

impl WarmupPlugin {
    /// Create the plugin and start expanding both file lists right away.
    ///
    /// Fails with [`Error::NoRuntime`] outside a Tokio runtime.
    pub fn new(options: WarmupOptions) -> Result<Self, Error> {
        let runtime = Handle::try_current()?;
        let glob = &options.glob_options;
        let start = |patterns: &Option<Vec<String>>| {
            patterns
                .as_deref()
                .and_then(|patterns| expand(&runtime, patterns, glob))
        };

        let client_files = start(&options.client_files);
        let ssr_files = start(&options.ssr_files);

        Ok(Self {
            runtime,
            client_files,
            ssr_files,
        })
    }

    /// Start warming every configured file against `server`.
    ///
    /// Returns immediately; the work runs on spawned tasks.
    pub fn warm(&self, server: &Arc<dyn DevServer>) {
        let lists = [
            (RenderMode::Client, &self.client_files),
            (RenderMode::Ssr, &self.ssr_files),
        ];
        for (mode, pending) in lists {
            if let Some(pending) = pending {
                self.runtime
                    .spawn(warm_list(Arc::clone(server), pending.clone(), mode));
            }
        }
    }
}

impl Plugin for WarmupPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn apply(&self) -> Apply {
        Apply::Serve
    }

    fn configure_server(&self, ctx: &ServerContext) -> HookResult<()> {
        let Some(http_server) = &ctx.http_server else {
            tracing::debug!("no http server (middleware mode), warm-up disabled");
            return Ok(());
        };

        let plugin = self.clone();
        let server = Arc::clone(&ctx.server);
        http_server.on_listening(move || plugin.warm(&server));
        Ok(())
    }
}

/// Wait for one list's expansion, then spawn a task per file.
async fn warm_list(server: Arc<dyn DevServer>, pending: PendingFiles, mode: RenderMode) {
    let files = match pending.wait().await {
        Ok(files) => files,
        Err(err) => {
            tracing::debug!(%mode, error = %err, "failed to expand warm-up files");
            report(
                server.logger(),
                &format!("Failed to expand {mode} warm-up files:"),
                &err,
            );
            return;
        }
    };

    tracing::debug!(%mode, count = files.len(), "warming up files");
    for file in files.iter().cloned() {
        tokio::spawn(warm_one(Arc::clone(&server), file, mode));
    }
}

async fn warm_one(server: Arc<dyn DevServer>, file: PathBuf, mode: RenderMode) {
    if let Err(err) = warmup_file(server.as_ref(), &file, mode).await {
        report_file_failure(server.as_ref(), &file, &err);
    }
}

fn report_file_failure(server: &dyn DevServer, file: &Path, err: &WarmupError) {
    tracing::debug!(file = %file.display(), error = %err, "failed to warm up file");
    let logger = server.logger();
    let file_label = logger.paint(&file.display().to_string(), Tone::Highlight);
    report(logger, &format!("Failed to warm up {file_label}:"), err);
}

/// Show a failure on the host's diagnostic channel. Painting stays here so
/// structured logs never carry styling.
fn report(logger: &dyn Logger, headline: &str, err: &dyn Display) {
    logger.error(&format!("{}\n{err}", logger.paint(headline, Tone::Error)));
}
