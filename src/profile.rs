//! Platform flag resolution.
//!
//! Turns the host operating-system family and the (possibly absent) toolkit
//! root into the complete compile/link configuration for one extension
//! build. Resolution is pure and total: it never touches the network or
//! spawns processes, and an absent root still produces a profile whose
//! toolkit-relative paths simply fail later at the toolchain level.

use std::path::{Path, PathBuf};

use crate::toolkit;

/// Host operating-system family.
///
/// The two branches are mutually exclusive and exhaustive, so a profile
/// never mixes flags valid for only the other family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Windows family (MSVC-style flags)
    Windows,
    /// Unix-like systems (GCC/Clang-style flags)
    Unix,
}

impl HostOs {
    /// The family of the current host.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Unix => "unix",
        }
    }
}

/// Resolved OS-specific build configuration for one extension build.
///
/// Built once per build invocation and read-only thereafter. Per-file
/// adjustments work on copies ([`crate::builder::CompileUnit`]'s effective
/// args), never on the profile itself.
#[derive(Debug, Clone, Default)]
pub struct PlatformProfile {
    /// Compiler arguments shared by every source file in the batch
    pub compile_args: Vec<String>,
    /// Linker arguments
    pub link_args: Vec<String>,
    /// Libraries to link, in link order
    pub libraries: Vec<String>,
    /// Library search paths
    pub library_paths: Vec<PathBuf>,
    /// Header search paths
    pub include_dirs: Vec<PathBuf>,
}

impl PlatformProfile {
    /// Resolve the profile for `os` and the discovered toolkit root.
    pub fn resolve(os: HostOs, cuda_home: Option<&Path>) -> PlatformProfile {
        let root = cuda_home.unwrap_or_else(|| Path::new(""));

        let mut profile = PlatformProfile {
            include_dirs: vec![PathBuf::from("include"), root.join("include")],
            ..PlatformProfile::default()
        };

        match os {
            HostOs::Windows => {
                profile.compile_args = to_args(["/DEBUG", "/Z7", "/std:c++17"]);
                profile.link_args = to_args(["/DEBUG"]);
                profile.libraries = to_args(["cuda", "Advapi32"]);
                profile.library_paths.push(root.join("lib").join("x64"));
            }
            HostOs::Unix => {
                // __FUNCTION__ is redefined to an empty string literal: the
                // toolkit headers expand it in contexts an ISO compiler
                // chokes on. -fno-crossjumping disables an optimization pass
                // that miscompiles the toolkit's generated code.
                profile.compile_args =
                    to_args(["-D__FUNCTION__=\"\"", "-std=c++17", "-fno-crossjumping"]);
                profile.libraries = to_args(["cuda"]);
                // libcuda is linked against its stub: the real driver
                // library is supplied at runtime by the host's driver
                // install, not by the build environment.
                let lib_dir = toolkit::lib_dir(root);
                profile.library_paths.push(root.join(lib_dir).join("stubs"));
            }
        }

        profile
    }
}

fn to_args<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
