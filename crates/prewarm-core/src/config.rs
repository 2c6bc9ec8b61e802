//! Warm-up configuration.
//!
//! Options can be built in code or loaded from a `prewarm.json` file in the
//! project root:
//!
//! ```json
//! {
//!   "clientFiles": ["./src/main.ts", "./index.html"],
//!   "ssrFiles": ["./src/entry-server.ts"],
//!   "globOptions": { "ignore": ["**/*.test.ts"] }
//! }
//! ```

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file discovered in the project root.
pub const CONFIG_FILE: &str = "prewarm.json";

/// Which files to warm up, and how to expand their patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarmupOptions {
    /// Patterns for files warmed in client mode.
    pub client_files: Option<Vec<String>>,
    /// Patterns for files warmed in SSR mode.
    pub ssr_files: Option<Vec<String>>,
    /// Extra options for pattern expansion.
    pub glob_options: GlobOptions,
}

impl WarmupOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client file patterns.
    #[must_use]
    pub fn with_client_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client_files = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the SSR file patterns.
    #[must_use]
    pub fn with_ssr_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ssr_files = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the pattern expansion options.
    #[must_use]
    pub fn with_glob_options(mut self, glob_options: GlobOptions) -> Self {
        self.glob_options = glob_options;
        self
    }
}

/// Caller-supplied pattern expansion options.
///
/// Expansion always yields absolute paths and always matches dot-prefixed
/// entries; those two are not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobOptions {
    /// Directory relative patterns are anchored at. Defaults to the process
    /// working directory.
    pub cwd: Option<PathBuf>,
    /// Patterns whose matches are dropped from the result.
    pub ignore: Vec<String>,
    /// Match case-sensitively.
    pub case_sensitive: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            ignore: Vec::new(),
            case_sensitive: true,
        }
    }
}

impl GlobOptions {
    /// Anchor relative patterns at `cwd`.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add an ignore pattern.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }
}

/// Find the config file in the given root directory.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    let path = root.join(CONFIG_FILE);
    path.exists().then_some(path)
}

/// Load warm-up options from a config file.
///
/// If `config_path` is `Some`, that file must exist (relative paths are taken
/// from `root`). Otherwise `prewarm.json` is looked up in `root`, and
/// `Ok(None)` is returned when there is none.
pub fn load_options(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<(PathBuf, WarmupOptions)>, Error> {
    let path = match config_path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => match find_config_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let source = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let options = serde_json::from_str(&source).map_err(|source| Error::ConfigParse {
        path: path.clone(),
        source,
    })?;

    Ok(Some((path, options)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let source = r#"{
            "clientFiles": ["./src/main.ts", "./index.html"],
            "ssrFiles": ["./src/entry-server.ts"],
            "globOptions": { "ignore": ["**/*.test.ts"], "caseSensitive": false }
        }"#;

        let options: WarmupOptions = serde_json::from_str(source).unwrap();
        assert_eq!(
            options.client_files.as_deref(),
            Some(&["./src/main.ts".to_string(), "./index.html".to_string()][..])
        );
        assert_eq!(
            options.ssr_files.as_deref(),
            Some(&["./src/entry-server.ts".to_string()][..])
        );
        assert_eq!(options.glob_options.ignore, vec!["**/*.test.ts"]);
        assert!(!options.glob_options.case_sensitive);
        assert_eq!(options.glob_options.cwd, None);
    }

    #[test]
    fn test_parse_empty_config() {
        let options: WarmupOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, WarmupOptions::default());
        assert!(options.glob_options.case_sensitive);
    }

    #[test]
    fn test_builder() {
        let options = WarmupOptions::new()
            .with_client_files(["src/main.ts"])
            .with_glob_options(GlobOptions::default().with_cwd("/proj").ignore("**/dist/**"));

        assert_eq!(options.client_files, Some(vec!["src/main.ts".to_string()]));
        assert_eq!(options.ssr_files, None);
        assert_eq!(options.glob_options.cwd, Some(PathBuf::from("/proj")));
        assert_eq!(options.glob_options.ignore, vec!["**/dist/**"]);
    }

    #[test]
    fn test_load_options_discovered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "ssrFiles": ["src/entry.ts"] }"#,
        )
        .unwrap();

        let (path, options) = load_options(dir.path(), None).unwrap().unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE));
        assert_eq!(options.client_files, None);
        assert_eq!(options.ssr_files, Some(vec!["src/entry.ts".to_string()]));
    }

    #[test]
    fn test_load_options_none_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_options(dir.path(), None).unwrap().is_none());
    }

    #[test]
    fn test_load_options_explicit_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("warm.json"),
            r#"{ "clientFiles": ["a.ts"] }"#,
        )
        .unwrap();

        let (_, options) = load_options(dir.path(), Some(Path::new("warm.json")))
            .unwrap()
            .unwrap();
        assert_eq!(options.client_files, Some(vec!["a.ts".to_string()]));
    }

    #[test]
    fn test_load_options_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_options(dir.path(), Some(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(Error::ConfigRead { .. })));
    }

    #[test]
    fn test_load_options_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ clientFiles: ").unwrap();

        let result = load_options(dir.path(), None);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }
}
