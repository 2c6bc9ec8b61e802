//! Warming a single file.

use super::url::{markup_url, module_url};
use crate::server::{DevServer, TransformError, TransformOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension that routes a file through the index-html pipeline.
const MARKUP_EXTENSION: &str = ".html";

/// Whether a module is prepared for the browser or for server rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Client,
    Ssr,
}

impl RenderMode {
    #[must_use]
    pub fn is_ssr(self) -> bool {
        self == Self::Ssr
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Ssr => "ssr",
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What warming a file amounts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WarmupTarget {
    /// An HTML page, sent through `transform_index_html`.
    Markup { url: String },
    /// A module, sent through `transform_request`.
    Module { url: String },
    /// An HTML page outside the root; nothing to do.
    Skipped,
}

/// Decide how `file` is warmed against `root`.
#[must_use]
pub fn classify(file: &Path, root: &Path) -> WarmupTarget {
    if file.to_string_lossy().ends_with(MARKUP_EXTENSION) {
        match markup_url(file, root) {
            Some(url) => WarmupTarget::Markup { url },
            None => WarmupTarget::Skipped,
        }
    } else {
        WarmupTarget::Module {
            url: module_url(file, root),
        }
    }
}

/// Failure warming one file.
#[derive(Debug, Error)]
pub enum WarmupError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Run `file` through the dev server's transform pipeline.
///
/// HTML pages go through `transform_index_html` with their contents, the same
/// way the server renders them for a browser, which also pre-transforms the
/// scripts they link. Everything else goes through `transform_request`.
///
/// An HTML page outside the root completes immediately without reading it.
pub async fn warmup_file(
    server: &dyn DevServer,
    file: &Path,
    mode: RenderMode,
) -> Result<(), WarmupError> {
    match classify(file, server.root()) {
        WarmupTarget::Markup { url } => {
            let html = tokio::fs::read_to_string(file)
                .await
                .map_err(|source| WarmupError::Read {
                    path: file.to_path_buf(),
                    source,
                })?;
            tracing::debug!(%url, "warming up html");
            server.transform_index_html(&url, html).await?;
        }
        WarmupTarget::Module { url } => {
            tracing::debug!(%url, %mode, "warming up module");
            let options = TransformOptions { ssr: mode.is_ssr() };
            server.transform_request(&url, options).await?;
        }
        WarmupTarget::Skipped => {
            tracing::trace!(file = %file.display(), "html outside root, skipping");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_classify() {
        let root = Path::new("/proj");
        assert_eq!(
            classify(Path::new("/proj/src/main.ts"), root),
            WarmupTarget::Module {
                url: "/src/main.ts".to_string()
            }
        );
        assert_eq!(
            classify(Path::new("/proj/index.html"), root),
            WarmupTarget::Markup {
                url: "/index.html".to_string()
            }
        );
        assert_eq!(
            classify(Path::new("/elsewhere/index.html"), root),
            WarmupTarget::Skipped
        );
        // only the exact lowercase extension counts as markup
        assert_eq!(
            classify(Path::new("/proj/legacy.HTML"), root),
            WarmupTarget::Module {
                url: "/legacy.HTML".to_string()
            }
        );
    }

    #[test]
    fn test_target_serializes_with_kind_tag() {
        let json = serde_json::to_value(WarmupTarget::Module {
            url: "/src/a.ts".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "module", "url": "/src/a.ts"}));

        let json = serde_json::to_value(WarmupTarget::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "skipped"}));
    }

    #[test]
    fn test_render_mode() {
        assert!(RenderMode::Ssr.is_ssr());
        assert!(!RenderMode::Client.is_ssr());
        assert_eq!(RenderMode::Client.to_string(), "client");
        assert_eq!(serde_json::to_value(RenderMode::Ssr).unwrap(), "ssr");
    }
}
