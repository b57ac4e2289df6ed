//! `cubuild build` command

use anyhow::{Context, Result};

use cubuild::{find_cuda_home, ExtensionBuilder, HostOs, PlatformProfile};

use crate::cli::BuildArgs;

pub fn execute(args: BuildArgs) -> Result<()> {
    let project_dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let name = match args.name {
        Some(name) => name,
        None => project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extension".to_string()),
    };

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| project_dir.join("target"));

    let os = HostOs::current();
    // Discovery runs once here; the profile and the whole batch share it.
    let cuda_home = args.cuda_home.or_else(find_cuda_home);
    match &cuda_home {
        Some(root) => tracing::info!("using CUDA toolkit at {}", root.display()),
        None => tracing::warn!("CUDA toolkit not found; toolkit paths will be invalid"),
    }

    let profile = PlatformProfile::resolve(os, cuda_home.as_deref());
    let builder = ExtensionBuilder::new(&name, &project_dir, &out_dir, os, profile);

    let artifact = builder.build(args.emit_compile_commands)?;
    println!("built {}", artifact.display());

    Ok(())
}
