//! CUDA toolkit discovery.
//!
//! Locates the toolkit installation root on the host machine and resolves
//! the library subdirectory holding its 64-bit shared libraries. Discovery
//! runs once per build invocation; everything downstream consumes the same
//! resolved root (or its absence).

mod libdir;
mod locate;

pub use libdir::lib_dir;
pub use locate::{discover, find_cuda_home, Discovery, DiscoveryMethod};
