#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;
mod term;

use clap::Parser;
use commands::resolve::ResolveAction;
use commands::run::RunAction;
use commands::OptionSources;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "prewarm")]
#[command(author, version, about = "Warm a dev server's transform cache on startup", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags selecting which files to warm.
#[derive(clap::Args, Debug)]
struct FileArgs {
    /// Client file pattern (repeatable, replaces `clientFiles` from the config)
    #[arg(long = "client", value_name = "PATTERN")]
    client: Vec<String>,

    /// SSR file pattern (repeatable, replaces `ssrFiles` from the config)
    #[arg(long = "ssr", value_name = "PATTERN")]
    ssr: Vec<String>,

    /// Config file (default: prewarm.json in the project root)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl From<FileArgs> for OptionSources {
    fn from(args: FileArgs) -> Self {
        Self {
            config: args.config,
            client: args.client,
            ssr: args.ssr,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Watch a dev server and warm it up each time it starts listening
    Run {
        /// Dev server host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Dev server port
        #[arg(long, short, default_value_t = 5173)]
        port: u16,

        /// Port probe interval in milliseconds
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Print the files that would be warmed and how
    Resolve {
        #[command(flatten)]
        files: FileArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        // resolve prints its own output; keep stdout clean for --json
        Commands::Resolve { files } => {
            let action = ResolveAction {
                cwd,
                sources: files.into(),
            };
            commands::resolve::run(&action, cli.json)
        }
        Commands::Run {
            host,
            port,
            poll_ms,
            files,
        } => {
            logging::init(cli.verbose, cli.json).into_diagnostic()?;
            let action = RunAction {
                cwd,
                host,
                port,
                poll: Duration::from_millis(poll_ms.max(1)),
                sources: files.into(),
            };
            let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
            runtime.block_on(commands::run::run(action, cli.json))
        }
    }
}
