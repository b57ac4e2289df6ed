//! `cubuild doctor` command

use anyhow::Result;

use cubuild::toolkit;

pub fn execute() -> Result<()> {
    match toolkit::discover() {
        Some(found) => {
            println!(
                "CUDA toolkit: {} (via {})",
                found.root.display(),
                found.method.as_str()
            );
            println!("library dir:  {}", toolkit::lib_dir(&found.root));
        }
        None => {
            println!("CUDA toolkit: not found");
            println!("help: set CUDA_HOME, put nvcc on PATH, or install to the default location");
        }
    }

    Ok(())
}
