//! Library subdirectory resolution.

use std::path::Path;

/// Primary name for the 64-bit library directory.
const PRIMARY: &str = "lib64";
/// Alternate name used by some installations.
const SECONDARY: &str = "lib";

/// Pick the subdirectory under `root` holding the 64-bit shared libraries.
///
/// Defaults to `lib64`. Some 64-bit installs keep their libraries in plain
/// `lib`, so the alternate is chosen when `lib64` is missing but `lib`
/// exists. When neither exists the default stands and the caller fails
/// later, when the path is actually used; this function never errors.
pub fn lib_dir(root: &Path) -> &'static str {
    if !root.join(PRIMARY).exists() && root.join(SECONDARY).exists() {
        SECONDARY
    } else {
        PRIMARY
    }
}
