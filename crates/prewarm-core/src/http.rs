//! A [`DevServer`] reached over HTTP.
//!
//! Lets warm-up drive a dev server running in another process: requesting a
//! module URL makes the server transform and cache it exactly as it would
//! for a browser.

use crate::server::{DevServer, Logger, TracingLogger, TransformError, TransformOptions};
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};

/// Dev server at `origin` (e.g. `http://localhost:5173`).
pub struct HttpDevServer {
    root: PathBuf,
    origin: String,
    client: reqwest::Client,
    logger: Box<dyn Logger>,
}

impl HttpDevServer {
    /// Create a client for the server at `origin` serving `root`.
    pub fn new(root: impl Into<PathBuf>, origin: impl Into<String>) -> Self {
        let origin: String = origin.into();
        Self {
            root: root.into(),
            origin: origin.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            logger: Box::new(TracingLogger),
        }
    }

    /// Report diagnostics through `logger` instead of `tracing`.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// The origin requests are sent to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// GET `url` and return the body, mapping non-2xx responses to errors.
    async fn fetch(&self, url: &str) -> Result<String, TransformError> {
        let response = self
            .client
            .get(format!("{}{}", self.origin, url))
            .send()
            .await
            .map_err(|e| TransformError::new(url, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransformError::new(url, e.to_string()))?;

        if !status.is_success() {
            let detail = body.lines().map(str::trim).find(|l| !l.is_empty());
            let message = match detail {
                Some(detail) => format!("dev server responded with {status}: {detail}"),
                None => format!("dev server responded with {status}"),
            };
            return Err(TransformError::new(url, message));
        }

        Ok(body)
    }
}

impl std::fmt::Debug for HttpDevServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDevServer")
            .field("root", &self.root)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl DevServer for HttpDevServer {
    fn root(&self) -> &Path {
        &self.root
    }

    /// The server renders its own copy of the page, so `_html` is not sent.
    fn transform_index_html<'a>(
        &'a self,
        url: &'a str,
        _html: String,
    ) -> BoxFuture<'a, Result<String, TransformError>> {
        self.fetch(url).boxed()
    }

    /// Plain HTTP has no way to ask for an SSR transform; the request is the
    /// same in both modes.
    fn transform_request<'a>(
        &'a self,
        url: &'a str,
        options: TransformOptions,
    ) -> BoxFuture<'a, Result<(), TransformError>> {
        async move {
            if options.ssr {
                tracing::trace!(url, "ssr flag is not sent over http");
            }
            self.fetch(url).await.map(drop)
        }
        .boxed()
    }

    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }
}
