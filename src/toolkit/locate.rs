//! Toolkit install-path discovery.
//!
//! Three strategies are tried in order, each only if the previous one
//! yielded nothing:
//! 1. The `CUDA_HOME` / `CUDA_PATH` environment variables
//! 2. Locating `nvcc` on PATH and taking the grandparent of its directory
//! 3. The conventional install location for the host platform
//!
//! Discovery is best-effort: every intermediate failure counts as "strategy
//! yielded nothing" and the next strategy runs. "Not found" is a valid
//! terminal outcome, never an error.

use std::path::{Path, PathBuf};

use crate::util::process::ProcessBuilder;

/// Environment variables naming the toolkit root, in priority order.
const ROOT_ENV_VARS: [&str; 2] = ["CUDA_HOME", "CUDA_PATH"];

/// Version-suffixed default install pattern on Windows.
#[cfg(target_os = "windows")]
const WINDOWS_INSTALL_GLOB: &str = "C:/Program Files/NVIDIA GPU Computing Toolkit/CUDA/v*.*";

/// Conventional install location on Unix-like systems.
#[cfg(not(target_os = "windows"))]
const UNIX_INSTALL_DIR: &str = "/usr/local/cuda";

/// Which strategy located the toolkit root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMethod {
    /// One of the `CUDA_HOME` / `CUDA_PATH` environment variables
    Environment,
    /// Grandparent of the `nvcc` binary found on PATH
    PathSearch,
    /// Platform-conventional install location
    DefaultLocation,
}

impl DiscoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMethod::Environment => "environment variable",
            DiscoveryMethod::PathSearch => "nvcc on PATH",
            DiscoveryMethod::DefaultLocation => "default install location",
        }
    }
}

/// A resolved toolkit installation.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Toolkit root directory
    pub root: PathBuf,
    /// Strategy that produced it
    pub method: DiscoveryMethod,
}

/// Find the CUDA install path.
///
/// Returns `None` when no strategy yields a usable root. Callers run this
/// once per build invocation and hold on to the result.
pub fn find_cuda_home() -> Option<PathBuf> {
    discover().map(|d| d.root)
}

/// Find the CUDA install path along with the strategy that located it.
pub fn discover() -> Option<Discovery> {
    let strategies: [(DiscoveryMethod, fn() -> Option<PathBuf>); 3] = [
        (DiscoveryMethod::Environment, from_env),
        (DiscoveryMethod::PathSearch, from_path_search),
        (DiscoveryMethod::DefaultLocation, from_default_location),
    ];

    for (method, strategy) in strategies {
        if let Some(root) = strategy() {
            tracing::debug!("found CUDA root {} via {}", root.display(), method.as_str());
            return Some(Discovery { root, method });
        }
    }

    tracing::debug!("no CUDA toolkit found");
    None
}

/// Strategy 1: environment variables. The first non-empty value wins,
/// regardless of whether the named directory exists.
fn from_env() -> Option<PathBuf> {
    ROOT_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Strategy 2: ask the host PATH-lookup utility for `nvcc`.
///
/// A spawn failure or non-zero exit means the strategy yielded nothing;
/// neither is surfaced as an error.
fn from_path_search() -> Option<PathBuf> {
    let lookup = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    let output = ProcessBuilder::new(lookup).arg("nvcc").exec().ok()?;
    if !output.status.success() {
        return None;
    }

    // `where` can report several matches, one per line; the first wins.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let nvcc = stdout.lines().next()?.trim_end_matches(['\r', '\n']);
    if nvcc.is_empty() {
        return None;
    }

    root_from_nvcc(Path::new(nvcc))
}

/// `<root>/bin/nvcc` -> `<root>`.
fn root_from_nvcc(nvcc: &Path) -> Option<PathBuf> {
    let root = nvcc.parent()?.parent()?;
    if root.as_os_str().is_empty() {
        return None;
    }
    Some(root.to_path_buf())
}

/// Strategy 3: the conventional install location. The candidate must exist
/// on disk; a fictitious default is a miss, not a result.
fn from_default_location() -> Option<PathBuf> {
    conventional_candidate().filter(|p| p.exists())
}

#[cfg(target_os = "windows")]
fn conventional_candidate() -> Option<PathBuf> {
    glob::glob(WINDOWS_INSTALL_GLOB)
        .ok()?
        .filter_map(Result::ok)
        .next()
}

#[cfg(not(target_os = "windows"))]
fn conventional_candidate() -> Option<PathBuf> {
    Some(PathBuf::from(UNIX_INSTALL_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_root_from_nvcc_grandparent() {
        assert_eq!(
            root_from_nvcc(Path::new("/usr/local/cuda-12.4/bin/nvcc")),
            Some(PathBuf::from("/usr/local/cuda-12.4"))
        );
    }

    #[test]
    fn test_root_from_nvcc_too_shallow() {
        assert_eq!(root_from_nvcc(Path::new("nvcc")), None);
        assert_eq!(root_from_nvcc(Path::new("bin/nvcc")), None);
    }

    // Both env-var cases live in one test so parallel test threads never
    // race on the same variables.
    #[test]
    fn test_env_strategy_precedence() {
        env::set_var("CUDA_HOME", "/test/cuda-home");
        env::set_var("CUDA_PATH", "/test/cuda-path");
        assert_eq!(from_env(), Some(PathBuf::from("/test/cuda-home")));

        env::remove_var("CUDA_HOME");
        assert_eq!(from_env(), Some(PathBuf::from("/test/cuda-path")));

        // An empty primary falls through to the secondary.
        env::set_var("CUDA_HOME", "");
        assert_eq!(from_env(), Some(PathBuf::from("/test/cuda-path")));

        env::remove_var("CUDA_HOME");
        env::remove_var("CUDA_PATH");
        assert_eq!(from_env(), None);
    }
}
