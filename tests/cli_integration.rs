//! CLI integration tests for Cubuild.
//!
//! These tests avoid depending on a CUDA install: flag resolution takes an
//! explicit `--cuda-home` and OS family, and the build test only checks the
//! failure path that needs no toolchain.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the cubuild binary command.
fn cubuild() -> Command {
    Command::cargo_bin("cubuild").unwrap()
}

// ============================================================================
// cubuild flags
// ============================================================================

#[test]
fn test_flags_unix_profile() {
    cubuild()
        .args(["flags", "--os", "unix", "--cuda-home", "/opt/toolkit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-std=c++17"))
        .stdout(predicate::str::contains("-fno-crossjumping"))
        .stdout(predicate::str::contains("-lcuda"))
        .stdout(predicate::str::contains("stubs"))
        .stdout(predicate::str::contains("Advapi32").not());
}

#[test]
fn test_flags_windows_profile() {
    cubuild()
        .args(["flags", "--os", "windows", "--cuda-home", "C:/cuda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/std:c++17"))
        .stdout(predicate::str::contains("/Z7"))
        .stdout(predicate::str::contains("Advapi32"))
        .stdout(predicate::str::contains("x64"));
}

#[test]
fn test_flags_compile_only_hides_link_section() {
    cubuild()
        .args([
            "flags",
            "--os",
            "unix",
            "--cuda-home",
            "/opt/toolkit",
            "--compile",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile flags"))
        .stdout(predicate::str::contains("Link flags").not());
}

#[test]
fn test_flags_rejects_compile_and_link_together() {
    cubuild()
        .args(["flags", "--os", "unix", "--compile", "--link"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_flags_stub_path_follows_lib_fallback() {
    // A root with `lib` but no `lib64` resolves the stub path under `lib`.
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("lib")).unwrap();

    let expected = format!("-L{}", root.path().join("lib").join("stubs").display());

    cubuild()
        .args(["flags", "--os", "unix"])
        .args(["--cuda-home", root.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

// ============================================================================
// cubuild doctor
// ============================================================================

#[test]
fn test_doctor_reports_toolkit_state() {
    cubuild()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("CUDA toolkit:"));
}

#[test]
fn test_doctor_reports_not_found_when_discovery_misses() {
    // A real install at the conventional location satisfies the last
    // strategy no matter what the environment says; the Windows install
    // glob cannot be blanked out from here either.
    if cfg!(windows) || std::path::Path::new("/usr/local/cuda").exists() {
        return;
    }

    let empty = TempDir::new().unwrap();

    cubuild()
        .env_remove("CUDA_HOME")
        .env_remove("CUDA_PATH")
        .env("PATH", empty.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("CUDA toolkit: not found"));
}

// ============================================================================
// cubuild build
// ============================================================================

#[test]
fn test_build_fails_without_sources() {
    let project = TempDir::new().unwrap();

    cubuild()
        .arg("build")
        .arg(project.path())
        .args(["--cuda-home", "/opt/toolkit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no C/C++ sources"));
}
