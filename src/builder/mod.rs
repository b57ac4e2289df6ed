//! Extension build driver.
//!
//! Drives the whole pipeline for one native extension module: collect the
//! C/C++ sources, compile each one through the intercepted compile hook,
//! and link the objects into a single shared module using the resolved
//! platform profile.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};

use crate::profile::{HostOs, PlatformProfile};
use crate::util::fs::ensure_dir;
use crate::util::process::{find_host_compiler, ProcessBuilder};

mod compile;
pub mod compile_commands;
mod intercept;

pub use compile::{effective_args, CompileUnit, Language, UnrecognizedSource, CXX_DIALECT_FRAGMENT};
pub use intercept::{language_filter, CompileFn, CompileHook, HookGuard};

/// Source patterns collected for the extension, relative to the project dir.
const SOURCE_PATTERNS: [&str; 2] = ["csrc/**/*.c", "csrc/**/*.cpp"];

/// Builds one native extension module from a project directory.
pub struct ExtensionBuilder {
    /// Module name; names the linked artifact
    name: String,
    /// Project root holding `csrc/` and `include/`
    project_dir: PathBuf,
    /// Output directory for objects and the linked module
    out_dir: PathBuf,
    os: HostOs,
    profile: PlatformProfile,
}

impl ExtensionBuilder {
    pub fn new(
        name: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        os: HostOs,
        profile: PlatformProfile,
    ) -> Self {
        ExtensionBuilder {
            name: name.into(),
            project_dir: project_dir.into(),
            out_dir: out_dir.into(),
            os,
            profile,
        }
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Collect the extension's sources: `csrc/**/*.c` plus `csrc/**/*.cpp`.
    pub fn collect_sources(&self) -> Result<Vec<PathBuf>> {
        let mut sources = Vec::new();

        for pattern in SOURCE_PATTERNS {
            let full = self.project_dir.join(pattern);
            let full = full.to_string_lossy().into_owned();
            let entries =
                glob::glob(&full).with_context(|| format!("bad source pattern `{}`", full))?;
            for entry in entries {
                sources.push(entry.context("failed to read source directory")?);
            }
        }

        if sources.is_empty() {
            bail!(
                "no C/C++ sources found under {}",
                self.project_dir.join("csrc").display()
            );
        }

        Ok(sources)
    }

    /// Compile every source and link the shared module.
    ///
    /// Returns the path of the linked artifact. When
    /// `emit_compile_commands` is set, `compile_commands.json` is written
    /// next to the objects before compilation starts.
    pub fn build(&self, emit_compile_commands: bool) -> Result<PathBuf> {
        let sources = self.collect_sources()?;
        let compiler = find_host_compiler(self.os)?;

        let units = sources
            .into_iter()
            .map(|source| CompileUnit::new(source, &self.profile))
            .collect::<Result<Vec<_>, _>>()?;

        let obj_dir = self.out_dir.join("obj");
        ensure_dir(&obj_dir)?;

        if emit_compile_commands {
            compile_commands::write_compile_commands(
                &self.project_dir,
                &self.out_dir,
                &compiler,
                &units,
                &self.profile.include_dirs,
            )?;
        }

        tracing::info!("compiling {} files", units.len());
        self.compile_batch(&compiler, &obj_dir, &units)?;

        let objects: Vec<PathBuf> = units
            .iter()
            .map(|u| self.object_path(&obj_dir, &u.source))
            .collect();
        self.link(&compiler, &objects)
    }

    /// Run the batch through the language-aware interceptor.
    ///
    /// Every file is handed the *shared* profile args; the interceptor
    /// subtracts the C++ dialect flag for C sources before the real compile
    /// runs. The guard restores the unpatched hook whether or not a file
    /// fails mid-batch.
    fn compile_batch(&self, compiler: &Path, obj_dir: &Path, units: &[CompileUnit]) -> Result<()> {
        let real = self.real_compile_hook(compiler, obj_dir);
        let hook = CompileHook::new(real);
        let _guard = hook.override_hook(language_filter);

        for unit in units {
            hook.compile(&unit.source, &self.profile.compile_args)?;
        }

        Ok(())
    }

    /// The unpatched compile operation: one compiler invocation per file.
    fn real_compile_hook(&self, compiler: &Path, obj_dir: &Path) -> CompileFn {
        let compiler = compiler.to_path_buf();
        let include_dirs = self.profile.include_dirs.clone();
        let obj_dir = obj_dir.to_path_buf();
        let os = self.os;
        let project_dir = self.project_dir.clone();

        Rc::new(move |source, args| {
            let output = object_path_for(os, &obj_dir, &project_dir, source);
            if let Some(parent) = output.parent() {
                ensure_dir(parent)?;
            }
            let mut cmd = ProcessBuilder::new(&compiler);

            match os {
                HostOs::Windows => {
                    cmd = cmd.arg("/nologo").arg("/c").args(args.iter());
                    for dir in &include_dirs {
                        cmd = cmd.arg(format!("/I{}", dir.display()));
                    }
                    cmd = cmd
                        .arg(source.display().to_string())
                        .arg(format!("/Fo{}", output.display()));
                }
                HostOs::Unix => {
                    // objects end up in a shared module
                    cmd = cmd.arg("-c").arg("-fPIC").args(args.iter());
                    for dir in &include_dirs {
                        cmd = cmd.arg(format!("-I{}", dir.display()));
                    }
                    cmd = cmd
                        .arg(source.display().to_string())
                        .arg("-o")
                        .arg(output.display().to_string());
                }
            }

            tracing::debug!("compiling {}", source.display());

            let out = cmd.cwd(&project_dir).exec()?;
            if !out.status.success() {
                let stderr = String::from_utf8_lossy(&out.stderr);
                bail!("compilation failed for {}\n{}", source.display(), stderr);
            }
            Ok(())
        })
    }

    /// Link the objects into the shared extension module.
    fn link(&self, compiler: &Path, objects: &[PathBuf]) -> Result<PathBuf> {
        let artifact = self.out_dir.join(self.artifact_name());
        let mut cmd = ProcessBuilder::new(compiler);

        match self.os {
            HostOs::Windows => {
                cmd = cmd.arg("/nologo").arg("/LD");
                cmd = cmd.args(objects.iter().map(|o| o.display().to_string()));
                cmd = cmd.arg(format!("/Fe{}", artifact.display()));
                cmd = cmd.arg("/link");
                cmd = cmd.args(self.profile.link_args.iter());
                for dir in &self.profile.library_paths {
                    cmd = cmd.arg(format!("/LIBPATH:{}", dir.display()));
                }
                cmd = cmd.args(self.profile.libraries.iter().map(|l| format!("{}.lib", l)));
            }
            HostOs::Unix => {
                cmd = cmd.arg("-shared");
                cmd = cmd.args(objects.iter().map(|o| o.display().to_string()));
                cmd = cmd.arg("-o").arg(artifact.display().to_string());
                cmd = cmd.args(self.profile.link_args.iter());
                for dir in &self.profile.library_paths {
                    cmd = cmd.arg(format!("-L{}", dir.display()));
                }
                cmd = cmd.args(self.profile.libraries.iter().map(|l| format!("-l{}", l)));
            }
        }

        tracing::debug!("linking {}", artifact.display());

        let out = cmd.exec()?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            bail!("linking failed for {}\n{}", artifact.display(), stderr);
        }

        Ok(artifact)
    }

    fn object_path(&self, obj_dir: &Path, source: &Path) -> PathBuf {
        object_path_for(self.os, obj_dir, &self.project_dir, source)
    }

    fn artifact_name(&self) -> String {
        match self.os {
            HostOs::Windows => format!("{}.dll", self.name),
            HostOs::Unix => format!("{}.so", self.name),
        }
    }
}

/// Object path for one source, mirroring the source tree under `obj_dir`.
///
/// The source extension stays in the object name, so `x.c` and `x.cpp` in
/// the same directory map to distinct objects.
fn object_path_for(os: HostOs, obj_dir: &Path, project_dir: &Path, source: &Path) -> PathBuf {
    let ext = match os {
        HostOs::Windows => "obj",
        HostOs::Unix => "o",
    };
    let rel = source.strip_prefix(project_dir).unwrap_or(source);
    obj_dir.join(format!("{}.{}", rel.display(), ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_sources(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("csrc/sub")).unwrap();
        for file in files {
            fs::write(dir.path().join(file), "// src\n").unwrap();
        }
        dir
    }

    fn builder_for(dir: &TempDir) -> ExtensionBuilder {
        let profile = PlatformProfile::resolve(HostOs::Unix, None);
        ExtensionBuilder::new(
            "ext",
            dir.path(),
            dir.path().join("target"),
            HostOs::Unix,
            profile,
        )
    }

    #[test]
    fn test_collect_sources_finds_c_and_cpp_recursively() {
        let dir = project_with_sources(&[
            "csrc/kernel.c",
            "csrc/wrapper.cpp",
            "csrc/sub/helper.c",
            "csrc/notes.txt",
        ]);

        let sources = builder_for(&dir).collect_sources().unwrap();

        assert_eq!(sources.len(), 3);
        assert!(sources.iter().all(|s| {
            let ext = s.extension().unwrap();
            ext == "c" || ext == "cpp"
        }));
    }

    #[test]
    fn test_collect_sources_fails_on_empty_project() {
        let dir = TempDir::new().unwrap();

        let err = builder_for(&dir).collect_sources().unwrap_err();

        assert!(err.to_string().contains("no C/C++ sources"));
    }

    #[test]
    fn test_object_paths_per_family() {
        let proj = Path::new("/proj");
        let obj = Path::new("/out/obj");
        assert_eq!(
            object_path_for(HostOs::Unix, obj, proj, Path::new("/proj/csrc/kernel.c")),
            PathBuf::from("/out/obj/csrc/kernel.c.o")
        );
        assert_eq!(
            object_path_for(HostOs::Windows, obj, proj, Path::new("/proj/csrc/kernel.c")),
            PathBuf::from("/out/obj/csrc/kernel.c.obj")
        );
    }

    #[test]
    fn test_object_paths_distinct_for_same_stem_sources() {
        let proj = Path::new("/proj");
        let obj = Path::new("/out/obj");
        let paths = [
            object_path_for(HostOs::Unix, obj, proj, Path::new("/proj/csrc/a/util.c")),
            object_path_for(HostOs::Unix, obj, proj, Path::new("/proj/csrc/b/util.c")),
            object_path_for(HostOs::Unix, obj, proj, Path::new("/proj/csrc/a/util.cpp")),
        ];

        assert_eq!(paths[0], PathBuf::from("/out/obj/csrc/a/util.c.o"));
        assert_eq!(paths[1], PathBuf::from("/out/obj/csrc/b/util.c.o"));
        assert_eq!(paths[2], PathBuf::from("/out/obj/csrc/a/util.cpp.o"));
    }

    // Requires a host C compiler; run with `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn test_build_compiles_and_links() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("csrc/a")).unwrap();
        fs::create_dir_all(dir.path().join("csrc/b")).unwrap();
        fs::create_dir_all(dir.path().join("include")).unwrap();
        fs::write(dir.path().join("csrc/a.c"), "int the_answer(void) { return 42; }\n").unwrap();
        // Same stem in two subdirectories; both must survive into the link.
        fs::write(dir.path().join("csrc/a/util.c"), "int util_a(void) { return 1; }\n").unwrap();
        fs::write(dir.path().join("csrc/b/util.c"), "int util_b(void) { return 2; }\n").unwrap();

        // A bare profile: no toolkit flags, so the build succeeds without
        // CUDA installed.
        let profile = PlatformProfile {
            include_dirs: vec![PathBuf::from("include")],
            ..PlatformProfile::default()
        };
        let builder = ExtensionBuilder::new(
            "ext",
            dir.path(),
            dir.path().join("target"),
            HostOs::current(),
            profile,
        );

        let artifact = builder.build(true).unwrap();

        assert!(artifact.exists());
        assert!(dir.path().join("target/compile_commands.json").exists());
    }
}
