//! Terminal output for warm-up diagnostics.

use console::style;
use prewarm_core::{Logger, Tone};

/// Prints diagnostics to stderr, coloured when stderr is a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermLogger;

impl Logger for TermLogger {
    fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        let styled = style(text).for_stderr();
        match tone {
            Tone::Error => styled.red(),
            Tone::Highlight => styled.cyan(),
        }
        .to_string()
    }
}
