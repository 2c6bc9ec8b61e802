//! Host-side plugin interface.
//!
//! A trimmed, Vite-shaped plugin surface: a plugin declares which command it
//! applies to and gets a `configure_server` hook with access to the dev
//! server and its HTTP listener.
//!
//! ## Example
//!
//! ```ignore
//! use prewarm_core::plugin::{Apply, HookResult, Plugin, ServerContext};
//!
//! struct Announce;
//!
//! impl Plugin for Announce {
//!     fn name(&self) -> &str { "announce" }
//!     fn apply(&self) -> Apply { Apply::Serve }
//!
//!     fn configure_server(&self, ctx: &ServerContext) -> HookResult<()> {
//!         if let Some(http) = &ctx.http_server {
//!             http.on_listening(|| println!("ready"));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use crate::server::DevServer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Result type for plugin hooks.
pub type HookResult<T> = Result<T, PluginError>;

/// Error from a plugin.
#[derive(Debug)]
pub struct PluginError {
    /// Plugin name that caused the error.
    pub plugin: String,
    /// Hook that failed.
    pub hook: &'static str,
    /// Error message.
    pub message: String,
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.plugin, self.hook, self.message)
    }
}

impl std::error::Error for PluginError {}

/// The command the host is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Development serving.
    Serve,
    /// Static production build.
    Build,
}

/// Which commands a plugin takes part in. Mirrors Vite's `apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Apply {
    /// Only while serving.
    Serve,
    /// Only during builds.
    Build,
    #[default]
    Always,
}

impl Apply {
    #[must_use]
    pub fn applies_to(self, command: Command) -> bool {
        match self {
            Self::Always => true,
            Self::Serve => command == Command::Serve,
            Self::Build => command == Command::Build,
        }
    }
}

type ListeningCallback = Box<dyn FnOnce() + Send>;

/// The HTTP listener behind a dev server.
///
/// Plugins subscribe to its `listening` event, which the host emits once the
/// socket accepts connections. The event fires at most once per instance;
/// callbacks registered after that are dropped without running.
#[derive(Default)]
pub struct HttpServer {
    listening: Mutex<Vec<ListeningCallback>>,
    fired: AtomicBool,
}

impl HttpServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the `listening` event.
    pub fn on_listening(&self, callback: impl FnOnce() + Send + 'static) {
        let mut listening = self
            .listening
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.has_listened() {
            tracing::debug!("listening already emitted, dropping subscriber");
            return;
        }
        listening.push(Box::new(callback));
    }

    /// Emit `listening`, running every subscriber in registration order.
    ///
    /// Only the first call has an effect.
    pub fn emit_listening(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let callbacks = std::mem::take(
            &mut *self
                .listening
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for callback in callbacks {
            callback();
        }
    }

    /// Whether `listening` has been emitted.
    #[must_use]
    pub fn has_listened(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("fired", &self.has_listened())
            .finish_non_exhaustive()
    }
}

/// Context passed to the `configure_server` hook.
pub struct ServerContext {
    /// The dev server.
    pub server: Arc<dyn DevServer>,
    /// The HTTP listener; `None` when the server runs in middleware mode.
    pub http_server: Option<Arc<HttpServer>>,
}

impl ServerContext {
    /// Create a server context.
    pub fn new(server: Arc<dyn DevServer>, http_server: Option<Arc<HttpServer>>) -> Self {
        Self {
            server,
            http_server,
        }
    }
}

/// The main plugin trait.
///
/// Every hook has a default that does nothing, so a plugin implements only
/// what it needs.
pub trait Plugin: Send + Sync {
    /// Plugin name for debugging and error messages.
    fn name(&self) -> &str;

    /// Commands this plugin takes part in.
    fn apply(&self) -> Apply {
        Apply::Always
    }

    /// Configure the dev server.
    ///
    /// Called once per server instance, before it starts listening.
    fn configure_server(&self, _ctx: &ServerContext) -> HookResult<()> {
        Ok(())
    }
}

/// The plugins active for one command.
///
/// Plugins whose `apply` excludes the command are dropped on `add`.
/// Insertion order is preserved.
pub struct PluginContainer {
    command: Command,
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginContainer {
    /// Create an empty container for `command`.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            plugins: Vec::new(),
        }
    }

    /// Add a plugin if it applies to this container's command.
    ///
    /// Returns whether the plugin was kept.
    pub fn add(&mut self, plugin: Box<dyn Plugin>) -> bool {
        if !plugin.apply().applies_to(self.command) {
            tracing::debug!(
                plugin = plugin.name(),
                command = ?self.command,
                "plugin does not apply, skipping"
            );
            return false;
        }
        self.plugins.push(plugin);
        true
    }

    /// Names of the registered plugins, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }

    /// Check if any plugins are registered.
    #[must_use]
    pub fn has_plugins(&self) -> bool {
        !self.plugins.is_empty()
    }

    /// Call `configure_server` on all plugins, stopping at the first error.
    pub fn call_configure_server(&self, ctx: &ServerContext) -> HookResult<()> {
        for plugin in &self.plugins {
            plugin.configure_server(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Named(&'static str, Apply);

    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&self) -> Apply {
            self.1
        }
    }

    #[test]
    fn test_apply_matrix() {
        assert!(Apply::Serve.applies_to(Command::Serve));
        assert!(!Apply::Serve.applies_to(Command::Build));
        assert!(Apply::Build.applies_to(Command::Build));
        assert!(!Apply::Build.applies_to(Command::Serve));
        assert!(Apply::Always.applies_to(Command::Serve));
        assert!(Apply::Always.applies_to(Command::Build));
    }

    #[test]
    fn test_container_filters_by_command() {
        let mut serve = PluginContainer::new(Command::Serve);
        assert!(serve.add(Box::new(Named("a", Apply::Serve))));
        assert!(!serve.add(Box::new(Named("b", Apply::Build))));
        assert!(serve.add(Box::new(Named("c", Apply::Always))));
        assert_eq!(serve.names().collect::<Vec<_>>(), vec!["a", "c"]);

        let mut build = PluginContainer::new(Command::Build);
        assert!(!build.add(Box::new(Named("a", Apply::Serve))));
        assert!(!build.has_plugins());
    }

    #[test]
    fn test_listening_fires_once_in_order() {
        let http = HttpServer::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = Arc::clone(&log);
            http.on_listening(move || log.lock().unwrap().push(i));
        }

        assert!(!http.has_listened());
        http.emit_listening();
        http.emit_listening();

        assert!(http.has_listened());
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_late_subscriber_is_dropped() {
        let http = HttpServer::new();
        http.emit_listening();

        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        http.on_listening(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        http.emit_listening();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    struct Failing;

    impl Plugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn configure_server(&self, _ctx: &ServerContext) -> HookResult<()> {
            Err(PluginError {
                plugin: self.name().to_string(),
                hook: "configure_server",
                message: "port already in use".to_string(),
            })
        }
    }

    struct Subscriber(Arc<AtomicUsize>);

    impl Plugin for Subscriber {
        fn name(&self) -> &str {
            "subscriber"
        }

        fn configure_server(&self, _ctx: &ServerContext) -> HookResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct NullServer;

    impl DevServer for NullServer {
        fn root(&self) -> &std::path::Path {
            std::path::Path::new("/")
        }

        fn transform_index_html<'a>(
            &'a self,
            _url: &'a str,
            html: String,
        ) -> futures::future::BoxFuture<'a, Result<String, crate::TransformError>> {
            Box::pin(async move { Ok(html) })
        }

        fn transform_request<'a>(
            &'a self,
            _url: &'a str,
            _options: crate::TransformOptions,
        ) -> futures::future::BoxFuture<'a, Result<(), crate::TransformError>> {
            Box::pin(async { Ok(()) })
        }

        fn logger(&self) -> &dyn crate::Logger {
            &crate::TracingLogger
        }
    }

    #[test]
    fn test_configure_server_stops_at_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut plugins = PluginContainer::new(Command::Serve);
        plugins.add(Box::new(Subscriber(Arc::clone(&calls))));
        plugins.add(Box::new(Failing));
        plugins.add(Box::new(Subscriber(Arc::clone(&calls))));

        let ctx = ServerContext::new(Arc::new(NullServer), None);
        let err = plugins.call_configure_server(&ctx).unwrap_err();

        assert_eq!(err.plugin, "failing");
        assert_eq!(err.hook, "configure_server");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_plugin_error_display() {
        let err = PluginError {
            plugin: "warmup".to_string(),
            hook: "configure_server",
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "[warmup] configure_server: boom");
    }
}
