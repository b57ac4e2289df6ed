//! Compile units and source-language inference.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::profile::PlatformProfile;

/// Substring identifying the C++ dialect flag in either flag syntax
/// (`-std=c++17` and `/std:c++17` both contain it).
pub const CXX_DIALECT_FRAGMENT: &str = "c++17";

/// Source language of a compile unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Infer the language from a source path's extension.
    ///
    /// `.c` is C; the other recognized native-source extensions are C++.
    pub fn from_source(path: &Path) -> Result<Language, UnrecognizedSource> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("c") => Ok(Language::C),
            Some("cpp") | Some("cc") | Some("cxx") => Ok(Language::Cxx),
            _ => Err(UnrecognizedSource(path.to_path_buf())),
        }
    }
}

/// A path whose extension is not a recognized C/C++ source.
#[derive(Debug, Error)]
#[error("not a recognized C/C++ source file: {}", .0.display())]
pub struct UnrecognizedSource(pub PathBuf);

/// One source file of the batch with its per-file compile arguments.
///
/// `effective_args` is a filtered copy derived from the shared profile; the
/// profile itself is never mutated.
#[derive(Debug, Clone)]
pub struct CompileUnit {
    pub source: PathBuf,
    pub lang: Language,
    pub effective_args: Vec<String>,
}

impl CompileUnit {
    pub fn new(
        source: PathBuf,
        profile: &PlatformProfile,
    ) -> Result<CompileUnit, UnrecognizedSource> {
        let lang = Language::from_source(&source)?;
        let effective_args = effective_args(lang, &profile.compile_args);
        Ok(CompileUnit {
            source,
            lang,
            effective_args,
        })
    }
}

/// Per-language view of the shared compile args.
///
/// The toolkit headers require the C++ dialect flag, which an ISO C
/// compiler rejects; C units get a copy with that flag removed instead of a
/// second flag set being maintained.
pub fn effective_args(lang: Language, base: &[String]) -> Vec<String> {
    match lang {
        Language::C => base
            .iter()
            .filter(|arg| !arg.contains(CXX_DIALECT_FRAGMENT))
            .cloned()
            .collect(),
        Language::Cxx => base.to_vec(),
    }
}
