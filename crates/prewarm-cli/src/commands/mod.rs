//! Subcommand implementations.

pub mod resolve;
pub mod run;

use miette::{IntoDiagnostic, Result};
use prewarm_core::config::load_options;
use prewarm_core::paths::resolve_root;
use prewarm_core::WarmupOptions;
use std::path::{Path, PathBuf};

/// Pattern and config flags shared by `run` and `resolve`.
#[derive(Debug, Clone, Default)]
pub struct OptionSources {
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// `--client` patterns; replace `clientFiles` when non-empty.
    pub client: Vec<String>,
    /// `--ssr` patterns; replace `ssrFiles` when non-empty.
    pub ssr: Vec<String>,
}

/// Find the project root and assemble the effective options.
///
/// Relative patterns (and a relative `globOptions.cwd`) are anchored at the
/// project root.
pub fn load(cwd: &Path, sources: &OptionSources) -> Result<(PathBuf, WarmupOptions)> {
    let root = resolve_root(cwd).into_diagnostic()?;

    let mut options = match load_options(&root, sources.config.as_deref()).into_diagnostic()? {
        Some((path, options)) => {
            tracing::debug!(config = %path.display(), "loaded config");
            options
        }
        None => WarmupOptions::default(),
    };

    if !sources.client.is_empty() {
        options.client_files = Some(sources.client.clone());
    }
    if !sources.ssr.is_empty() {
        options.ssr_files = Some(sources.ssr.clone());
    }

    options.glob_options.cwd = Some(match options.glob_options.cwd.take() {
        Some(dir) if dir.is_relative() => root.join(dir),
        Some(dir) => dir,
        None => root.clone(),
    });

    Ok((root, options))
}
