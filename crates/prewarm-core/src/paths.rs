use crate::config::CONFIG_FILE;
use crate::Error;
use std::path::{Path, PathBuf};

/// Files that mark a project root, checked in this order.
const ROOT_MARKERS: &[&str] = &[CONFIG_FILE, "package.json", ".git"];

/// Find the project root by walking up from `cwd` looking for a root marker.
///
/// Returns the first directory containing `prewarm.json`, `package.json` or
/// `.git`, or `None` if none is found.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Canonicalize `cwd` and resolve the project root from it.
///
/// Falls back to the canonical `cwd` when no marker is found.
/// Uses `dunce` so Windows roots stay in drive-letter form, which is what
/// the URL resolver expects.
///
/// # Errors
/// Returns an error if `cwd` cannot be canonicalized.
pub fn resolve_root(cwd: &Path) -> Result<PathBuf, Error> {
    let cwd = dunce::canonicalize(cwd)?;
    Ok(project_root(&cwd).unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_project_root_with_package_json() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let root = project_root(&nested);
        assert_eq!(root, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_project_root_prefers_nearest_marker() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("packages").join("app");
        fs::create_dir_all(app.join("src")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(app.join(CONFIG_FILE), "{}").unwrap();

        let root = project_root(&app.join("src"));
        assert_eq!(root, Some(app));
    }

    #[test]
    fn test_resolve_root_is_canonical() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let nested = dir.path().join("src");
        fs::create_dir(&nested).unwrap();

        let root = resolve_root(&nested.join(".")).unwrap();
        assert_eq!(root, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_resolve_root_missing_dir() {
        let dir = tempdir().unwrap();
        let result = resolve_root(&dir.path().join("does-not-exist"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
