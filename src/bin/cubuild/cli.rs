//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cubuild::HostOs;

/// Cubuild - CUDA toolkit discovery and build configuration
#[derive(Parser)]
#[command(name = "cubuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report how (and whether) the CUDA toolkit was found
    Doctor,

    /// Show the resolved compile/link configuration
    Flags(FlagsArgs),

    /// Build the extension module in a project directory
    Build(BuildArgs),
}

/// Operating-system family to resolve flags for.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OsFamily {
    Windows,
    Unix,
}

impl From<OsFamily> for HostOs {
    fn from(value: OsFamily) -> Self {
        match value {
            OsFamily::Windows => HostOs::Windows,
            OsFamily::Unix => HostOs::Unix,
        }
    }
}

#[derive(Args)]
pub struct FlagsArgs {
    /// OS family to resolve for (defaults to the host)
    #[arg(long, value_enum)]
    pub os: Option<OsFamily>,

    /// Toolkit root to use instead of running discovery
    #[arg(long)]
    pub cuda_home: Option<PathBuf>,

    /// Show only compile flags
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show only link flags
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Project directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Extension module name (defaults to the project directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory (defaults to `<project>/target`)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Toolkit root to use instead of running discovery
    #[arg(long)]
    pub cuda_home: Option<PathBuf>,

    /// Emit compile_commands.json
    #[arg(long)]
    pub emit_compile_commands: bool,
}
