//! Cubuild - CUDA toolkit discovery and build configuration
//!
//! This crate provides the build-time core for compiling a mixed C/C++
//! native extension module against the CUDA toolkit: locating the toolkit
//! installation, resolving the platform-specific compile/link configuration,
//! and adjusting per-file compiler arguments by source language.

pub mod builder;
pub mod profile;
pub mod toolkit;
pub mod util;

pub use builder::{CompileUnit, ExtensionBuilder, Language};
pub use profile::{HostOs, PlatformProfile};
pub use toolkit::{discover, find_cuda_home, Discovery};
