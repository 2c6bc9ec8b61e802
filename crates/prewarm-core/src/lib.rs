#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Dev server warm-up.
//!
//! Resolves configured entry files and pushes them through a dev server's
//! transform pipeline as soon as it starts listening. See [`warmup`] for the
//! pipeline and [`plugin`] for how it is wired into a host.

pub mod config;
pub mod error;
pub mod http;
pub mod paths;
pub mod plugin;
pub mod server;
pub mod warmup;

pub use config::{GlobOptions, WarmupOptions};
pub use error::Error;
pub use http::HttpDevServer;
pub use plugin::{Apply, Command, HttpServer, Plugin, PluginContainer, ServerContext};
pub use server::{DevServer, Logger, Tone, TracingLogger, TransformError, TransformOptions};
pub use warmup::{warmup, warmup_file, RenderMode, WarmupPlugin};
