//! `cubuild flags` command

use anyhow::Result;

use cubuild::{find_cuda_home, HostOs, PlatformProfile};

use crate::cli::FlagsArgs;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let os = args.os.map(HostOs::from).unwrap_or_else(HostOs::current);
    let cuda_home = args.cuda_home.or_else(find_cuda_home);

    let profile = PlatformProfile::resolve(os, cuda_home.as_deref());

    if !args.link {
        println!("# Compile flags ({}):", os.as_str());
        for dir in &profile.include_dirs {
            println!("  -I{}", dir.display());
        }
        for arg in &profile.compile_args {
            println!("  {}", arg);
        }
    }

    if !args.compile && !args.link {
        println!();
    }

    if !args.compile {
        println!("# Link flags ({}):", os.as_str());
        for arg in &profile.link_args {
            println!("  {}", arg);
        }
        for dir in &profile.library_paths {
            println!("  -L{}", dir.display());
        }
        for lib in &profile.libraries {
            println!("  -l{}", lib);
        }
    }

    Ok(())
}
