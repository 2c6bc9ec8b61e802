//! The dev-server capability consumed by warm-up.
//!
//! Warm-up never transforms anything itself. It hands URLs to whatever
//! implements [`DevServer`], which owns the transform pipeline and its cache.

use futures::future::BoxFuture;
use std::path::Path;

/// Options for a generic module transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Transform for server-side rendering instead of the browser.
    pub ssr: bool,
}

/// Error raised by a dev server's transform pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError {
    /// URL that was being transformed.
    pub url: String,
    /// Human-readable error message.
    pub message: String,
}

impl TransformError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransformError {}

/// How a piece of diagnostic text should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Headline of an error.
    Error,
    /// A file path or other value the reader should spot quickly.
    Highlight,
}

/// The host's diagnostic channel.
pub trait Logger: Send + Sync {
    /// Display an error. Must not fail.
    fn error(&self, message: &str);

    /// Style `text` for this logger's output. Plain by default.
    fn paint(&self, text: &str, _tone: Tone) -> String {
        text.to_owned()
    }
}

/// Logger that forwards diagnostics to `tracing` without styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// A running development server, as seen by plugins.
pub trait DevServer: Send + Sync {
    /// Project root the server resolves URLs against.
    fn root(&self) -> &Path;

    /// Run an HTML page through the index-html pipeline.
    ///
    /// Returns the transformed page.
    fn transform_index_html<'a>(
        &'a self,
        url: &'a str,
        html: String,
    ) -> BoxFuture<'a, Result<String, TransformError>>;

    /// Run a module URL through the transform pipeline, caching the result.
    fn transform_request<'a>(
        &'a self,
        url: &'a str,
        options: TransformOptions,
    ) -> BoxFuture<'a, Result<(), TransformError>>;

    /// Diagnostic channel for this server.
    fn logger(&self) -> &dyn Logger;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_display_is_message() {
        let err = TransformError::new("/src/main.ts", "Unexpected token (3:4)");
        assert_eq!(err.to_string(), "Unexpected token (3:4)");
        assert_eq!(err.url, "/src/main.ts");
    }

    #[test]
    fn test_default_paint_is_plain() {
        assert_eq!(TracingLogger.paint("index.html", Tone::Highlight), "index.html");
    }
}
