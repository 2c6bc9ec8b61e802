//! File path → dev server URL.

use prewarm_util::SlashPath;
use std::path::Path;

/// URL namespace for files outside the project root.
pub const FS_PREFIX: &str = "/@fs/";

/// URL for an HTML file, or `None` if it lives outside `root`.
///
/// HTML pages are addressed by their path relative to the root, so a page
/// outside the root has no URL at all.
#[must_use]
pub fn markup_url(file: &Path, root: &Path) -> Option<String> {
    let relative = SlashPath::relative(root, file)?;
    if relative.escapes_base() {
        return None;
    }
    Some(format!("/{relative}"))
}

/// URL for a module file.
///
/// Files under `root` get a root-relative URL; anything else is addressed
/// through [`FS_PREFIX`] followed by its full normalized path.
#[must_use]
pub fn module_url(file: &Path, root: &Path) -> String {
    let file = SlashPath::new(file);
    let root = SlashPath::new(root);
    match file.strip_root(&root) {
        Some(rest) => rest.to_owned(),
        None => format!("{FS_PREFIX}{file}"),
    }
}
