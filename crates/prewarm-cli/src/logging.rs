//! Logging initialization for the CLI.
//!
//! Library crates only emit `tracing` events; the subscriber is installed
//! here. All output goes to stderr so stdout stays free for command output.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets raised by `-v`.
const TARGETS: &[&str] = &["prewarm", "prewarm_core"];

/// Level for our own targets: 0 = INFO, 1 = DEBUG, 2+ = TRACE.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn target_directives(level: LevelFilter) -> impl Iterator<Item = Directive> {
    TARGETS
        .iter()
        .filter_map(move |target| format!("{target}={level}").parse().ok())
}

/// Install the global subscriber.
///
/// `RUST_LOG` sets the baseline (`warn` when unset or invalid); `verbosity`
/// then applies to this workspace's targets. With `json`, events are written
/// as JSON lines.
pub fn init(verbosity: u8, json: bool) -> Result<(), TryInitError> {
    let filter = target_directives(level_for(verbosity)).fold(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
        EnvFilter::add_directive,
    );

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        registry
            .with(layer.json().with_current_span(true).with_span_list(false))
            .try_init()
    } else {
        registry.with(layer.with_target(false)).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::INFO);
        assert_eq!(level_for(1), LevelFilter::DEBUG);
        assert_eq!(level_for(2), LevelFilter::TRACE);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }

    #[test]
    fn test_every_target_gets_a_directive() {
        assert_eq!(target_directives(LevelFilter::DEBUG).count(), TARGETS.len());
        assert_eq!(target_directives(LevelFilter::TRACE).count(), TARGETS.len());
    }
}
