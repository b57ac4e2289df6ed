//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

use crate::profile::HostOs;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Execute the command, capturing stdout and stderr.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find the host C/C++ compiler driver for the given OS family.
///
/// One driver compiles both languages; the per-file argument list decides
/// how each source is treated.
pub fn find_host_compiler(os: HostOs) -> Result<PathBuf> {
    if os == HostOs::Windows {
        if let Some(cl) = find_executable("cl") {
            return Ok(cl);
        }
        bail!(
            "cl.exe not found\n\
             help: run from a Developer Command Prompt or install the MSVC build tools"
        );
    }

    // Check CC environment variable first
    if let Ok(cc) = std::env::var("CC") {
        if let Some(path) = find_executable(&cc) {
            return Ok(path);
        }
        let direct = PathBuf::from(&cc);
        if direct.exists() {
            return Ok(direct);
        }
    }

    for compiler in &["cc", "gcc", "clang"] {
        if let Some(path) = find_executable(compiler) {
            return Ok(path);
        }
    }

    bail!(
        "no C compiler found\n\
         help: set the CC environment variable or install gcc/clang"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_captures_stdout() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[test]
    fn test_exec_missing_program_is_an_error() {
        let result = ProcessBuilder::new("definitely-not-a-real-binary").exec();

        assert!(result.is_err());
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("gcc").args(["-c", "input.c", "-o", "input.o"]);

        assert_eq!(pb.display_command(), "gcc -c input.c -o input.o");
    }
}
