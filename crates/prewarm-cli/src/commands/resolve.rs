//! `prewarm resolve`: show what `run` would warm, without a server.

use super::{load, OptionSources};
use miette::{IntoDiagnostic, Result};
use prewarm_core::warmup::{classify, expand_patterns, WarmupTarget};
use prewarm_core::RenderMode;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Resolve action.
#[derive(Debug, Clone)]
pub struct ResolveAction {
    pub cwd: PathBuf,
    pub sources: OptionSources,
}

#[derive(Debug, Serialize)]
struct ResolveReport {
    root: PathBuf,
    files: Vec<ResolvedFile>,
}

#[derive(Debug, Serialize)]
struct ResolvedFile {
    mode: RenderMode,
    file: PathBuf,
    #[serde(flatten)]
    target: WarmupTarget,
}

/// Run the resolve command.
pub fn run(action: &ResolveAction, json: bool) -> Result<()> {
    let (root, options) = load(&action.cwd, &action.sources)?;

    let mut files = Vec::new();
    let lists = [
        (RenderMode::Client, &options.client_files),
        (RenderMode::Ssr, &options.ssr_files),
    ];
    for (mode, patterns) in lists {
        let Some(patterns) = patterns else { continue };
        let matched = expand_patterns(patterns, &options.glob_options)
            .map_err(|e| miette::miette!("failed to expand {mode} warm-up files: {e}"))?;
        files.extend(matched.into_iter().map(|file| ResolvedFile {
            mode,
            target: classify(&file, &root),
            file,
        }));
    }

    let report = ResolveReport { root, files };
    if json {
        print_json(&report)
    } else {
        print_human(&report)
    }
}

fn print_json(report: &ResolveReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &ResolveReport) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "root: {}", report.root.display()).into_diagnostic()?;
    if report.files.is_empty() {
        writeln!(out, "no files to warm up").into_diagnostic()?;
        return Ok(());
    }
    for entry in &report.files {
        writeln!(
            out,
            "  {:<6} {}  {}",
            entry.mode.as_str(),
            describe(&entry.target),
            display_file(&entry.file, &report.root)
        )
        .into_diagnostic()?;
    }
    Ok(())
}

fn describe(target: &WarmupTarget) -> String {
    match target {
        WarmupTarget::Markup { url } => format!("html   {url}"),
        WarmupTarget::Module { url } => format!("module {url}"),
        WarmupTarget::Skipped => "skip   (html outside root)".to_string(),
    }
}

fn display_file(file: &Path, root: &Path) -> String {
    file.strip_prefix(root).unwrap_or(file).display().to_string()
}
