//! Forward-slash path strings.
//!
//! URLs handed to a dev server always use `/`, whatever the host separator is.
//! [`SlashPath`] is the only place that knows about host separators; the rest
//! of the workspace works on its normalized output.

use std::fmt;
use std::path::{Component, Path, MAIN_SEPARATOR};

/// A path rendered with `/` separators.
///
/// Only the separator is rewritten: case, dots and special characters are
/// preserved exactly, and nothing is percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlashPath(String);

impl SlashPath {
    /// Normalize a host path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self::from_host_str(&path.to_string_lossy())
    }

    /// Normalize a string that uses the host separator.
    #[must_use]
    pub fn from_host_str(path: &str) -> Self {
        if MAIN_SEPARATOR == '/' {
            Self(path.to_owned())
        } else {
            Self(path.replace(MAIN_SEPARATOR, "/"))
        }
    }

    /// Lexical relative path from `base` to `target`.
    ///
    /// `.` segments are dropped and `..` segments are folded before comparing,
    /// so the result is the shortest relative walk (`../x`, `a/b`, or the empty
    /// string when both name the same directory). Returns `None` when the two
    /// paths are anchored differently, e.g. on different Windows volumes.
    #[must_use]
    pub fn relative(base: &Path, target: &Path) -> Option<Self> {
        let base = lexical_components(base);
        let target = lexical_components(target);

        if anchor(&base) != anchor(&target) {
            return None;
        }

        let common = base
            .iter()
            .zip(&target)
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<String> = Vec::with_capacity(base.len() + target.len());
        segments.extend(base[common..].iter().map(|_| "..".to_string()));
        segments.extend(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );

        Some(Self(segments.join("/")))
    }

    /// The remainder of this path below `root`, including its leading `/`.
    ///
    /// Matches on `root + "/"` so `/project-other` is not inside `/project`.
    /// Trailing separators on `root` are ignored.
    #[must_use]
    pub fn strip_root(&self, root: &SlashPath) -> Option<&str> {
        let root = root.0.trim_end_matches('/');
        let rest = self.0.strip_prefix(root)?;
        rest.starts_with('/').then_some(rest)
    }

    /// Whether the first segment climbs out of the base directory.
    ///
    /// Only a literal `..` segment counts: `..foo` and `.hidden` do not.
    #[must_use]
    pub fn escapes_base(&self) -> bool {
        self.0.split('/').next() == Some("..")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SlashPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlashPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Components with `.` removed and `..` folded into their parent.
fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Leading prefix/root components.
fn anchor<'a>(components: &'a [Component<'a>]) -> &'a [Component<'a>] {
    let len = components
        .iter()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .count();
    &components[..len]
}
