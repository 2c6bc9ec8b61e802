//! Pattern expansion.
//!
//! Turns the configured file patterns into absolute file paths. Expansion
//! starts on the blocking pool as soon as the plugin is built, so the walk
//! overlaps with server startup; the shared result is awaited when the
//! server is ready.

use crate::config::GlobOptions;
use futures::future::{BoxFuture, FutureExt, Shared};
use glob::{MatchOptions, Pattern};
use prewarm_util::SlashPath;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Failure while expanding file patterns.
///
/// `Clone` so one failed expansion can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("cannot determine the working directory: {0}")]
    Cwd(String),

    #[error("pattern expansion did not finish: {0}")]
    Task(String),
}

/// Outcome of one expansion.
pub type ExpandResult = Result<Arc<[PathBuf]>, ExpandError>;

/// An expansion in flight.
///
/// Cheap to clone; every clone resolves to the same result and the walk
/// itself runs once.
#[derive(Clone)]
pub struct PendingFiles {
    inner: Shared<BoxFuture<'static, ExpandResult>>,
}

impl PendingFiles {
    /// Wait for the expansion to finish.
    pub async fn wait(self) -> ExpandResult {
        self.inner.await
    }
}

impl std::fmt::Debug for PendingFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFiles").finish_non_exhaustive()
    }
}

/// Start expanding `patterns` on `runtime`'s blocking pool.
///
/// Returns `None`, without starting any work, when there are no patterns.
pub fn expand(runtime: &Handle, patterns: &[String], options: &GlobOptions) -> Option<PendingFiles> {
    if patterns.is_empty() {
        return None;
    }

    let patterns = patterns.to_vec();
    let options = options.clone();
    let task = runtime.spawn_blocking(move || expand_patterns(&patterns, &options));

    Some(PendingFiles {
        inner: join_expansion(task).boxed().shared(),
    })
}

async fn join_expansion(task: JoinHandle<Result<Vec<PathBuf>, ExpandError>>) -> ExpandResult {
    match task.await {
        Ok(result) => result.map(Arc::from),
        Err(err) => Err(ExpandError::Task(err.to_string())),
    }
}

/// Expand `patterns` into absolute, deduplicated file paths.
///
/// - relative patterns are anchored at `options.cwd` (or the process cwd)
/// - `!pattern` entries and `options.ignore` remove matches
/// - dot-prefixed entries match like any other
/// - only regular files are returned, in first-match order
pub fn expand_patterns(
    patterns: &[String],
    options: &GlobOptions,
) -> Result<Vec<PathBuf>, ExpandError> {
    let base = match &options.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().map_err(|e| ExpandError::Cwd(e.to_string()))?,
    };

    let match_options = MatchOptions {
        case_sensitive: options.case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut includes = Vec::new();
    let mut ignores = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(negated) => ignores.push(compile(negated)?),
            None => includes.push(pattern.as_str()),
        }
    }
    for pattern in &options.ignore {
        ignores.push(compile(pattern)?);
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in includes {
        let anchored = anchor_pattern(&base, pattern);
        let entries =
            glob::glob_with(&anchored, match_options).map_err(|e| ExpandError::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        for entry in entries {
            let path = entry.map_err(|e| ExpandError::Io {
                path: e.path().to_path_buf(),
                message: e.error().to_string(),
            })?;

            if !path.is_file() || is_ignored(&path, &base, &ignores, match_options) {
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    tracing::trace!(patterns = ?patterns, matched = files.len(), "expanded patterns");
    Ok(files)
}

fn compile(pattern: &str) -> Result<Pattern, ExpandError> {
    Pattern::new(strip_dot_slash(pattern)).map_err(|e| ExpandError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn strip_dot_slash(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// Absolute patterns pass through; relative ones are joined to the escaped base.
fn anchor_pattern(base: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let base = Pattern::escape(&base.to_string_lossy());
    format!(
        "{}/{}",
        base.trim_end_matches(['/', '\\']),
        strip_dot_slash(pattern)
    )
}

/// Ignore patterns match either the base-relative or the absolute path.
fn is_ignored(path: &Path, base: &Path, ignores: &[Pattern], options: MatchOptions) -> bool {
    if ignores.is_empty() {
        return false;
    }
    let absolute = SlashPath::new(path);
    let relative = SlashPath::relative(base, path);
    ignores.iter().any(|ignore| {
        ignore.matches_with(absolute.as_str(), options)
            || relative
                .as_ref()
                .is_some_and(|rel| ignore.matches_with(rel.as_str(), options))
    })
}
