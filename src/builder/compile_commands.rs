//! compile_commands.json emission.
//!
//! Emits the compile batch in the clang compilation-database format so
//! editors and tooling can see the exact per-file argument lists, including
//! the language-dependent ones.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::compile::CompileUnit;
use crate::util::fs::write_string;

/// One entry of the compilation database.
#[derive(Debug, Serialize)]
struct CompileCommand {
    directory: String,
    file: String,
    arguments: Vec<String>,
}

/// Write `compile_commands.json` for the batch into `out_dir`.
///
/// Each entry carries the unit's *effective* arguments, so a `.c` entry
/// shows the list without the C++ dialect flag.
pub fn write_compile_commands(
    project_dir: &Path,
    out_dir: &Path,
    compiler: &Path,
    units: &[CompileUnit],
    include_dirs: &[PathBuf],
) -> Result<PathBuf> {
    let directory = project_dir.to_string_lossy().into_owned();

    let commands: Vec<CompileCommand> = units
        .iter()
        .map(|unit| {
            let mut arguments = vec![compiler.to_string_lossy().into_owned(), "-c".to_string()];
            arguments.extend(unit.effective_args.iter().cloned());
            for dir in include_dirs {
                arguments.push(format!("-I{}", dir.display()));
            }
            arguments.push(unit.source.to_string_lossy().into_owned());

            CompileCommand {
                directory: directory.clone(),
                file: unit.source.to_string_lossy().into_owned(),
                arguments,
            }
        })
        .collect();

    let json =
        serde_json::to_string_pretty(&commands).context("failed to serialize compile commands")?;

    let path = out_dir.join("compile_commands.json");
    write_string(&path, &json)?;
    tracing::debug!("wrote {}", path.display());

    Ok(path)
}
