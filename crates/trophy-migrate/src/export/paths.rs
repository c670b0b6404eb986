//! Legacy installation root detection.

use std::path::{Path, PathBuf};

/// File that identifies the root of a legacy installation.
pub const MARKER_FILE: &str = "lib/core.functions.php";

/// Subdirectory some setups install the framework into.
pub const NESTED_DIRECTORY: &str = "wcf";

/// Directory holding uploaded trophy images, relative to the root.
pub const TROPHY_IMAGE_DIRECTORY: &str = "images/trophies";

/// Return the effective installation root.
///
/// When the marker file is missing at `path` but present one level deeper in
/// [`NESTED_DIRECTORY`], the nested directory is the root.
pub fn resolve_install_root(path: &Path) -> PathBuf {
    let nested = path.join(NESTED_DIRECTORY);
    if !path.join(MARKER_FILE).exists() && nested.join(MARKER_FILE).exists() {
        nested
    } else {
        path.to_path_buf()
    }
}

/// Check whether `path` or its nested directory holds the marker file.
pub fn has_install_marker(path: &Path) -> bool {
    path.join(MARKER_FILE).exists() || path.join(NESTED_DIRECTORY).join(MARKER_FILE).exists()
}

/// Location of a trophy image below the installation root.
pub fn trophy_image_path(root: Option<&Path>, icon_file: &str) -> PathBuf {
    root.unwrap_or_else(|| Path::new(""))
        .join(TROPHY_IMAGE_DIRECTORY)
        .join(icon_file)
}
