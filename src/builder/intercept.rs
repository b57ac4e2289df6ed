//! Scoped override of the per-file compile hook.
//!
//! The build driver funnels every file of a batch through one replaceable
//! compile hook. [`CompileHook::override_hook`] swaps in a wrapper built
//! from the original closure and returns a guard; dropping the guard
//! restores the original on every exit path, whether the batch completed,
//! a file failed to compile, or the driver unwound.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;

use super::compile::{effective_args, Language};

/// The per-file compile operation: source path plus its argument list.
pub type CompileFn = Rc<dyn Fn(&Path, &[String]) -> Result<()>>;

/// Holds the mutable compile hook for one build pass.
pub struct CompileHook {
    // RefCell, not a lock: the batch is single-threaded by contract.
    slot: RefCell<CompileFn>,
}

impl CompileHook {
    pub fn new(real: CompileFn) -> Self {
        CompileHook {
            slot: RefCell::new(real),
        }
    }

    /// Run the current hook for one source file.
    pub fn compile(&self, source: &Path, args: &[String]) -> Result<()> {
        let hook = self.slot.borrow().clone();
        hook(source, args)
    }

    /// Install a wrapper hook for the guard's lifetime.
    ///
    /// `wrap` receives the original hook so the replacement can delegate to
    /// it. The returned guard restores the original when dropped.
    pub fn override_hook<F>(&self, wrap: F) -> HookGuard<'_>
    where
        F: FnOnce(CompileFn) -> CompileFn,
    {
        let original = self.slot.borrow().clone();
        *self.slot.borrow_mut() = wrap(original.clone());
        HookGuard {
            hook: self,
            original,
        }
    }
}

/// Restores the original compile hook on drop.
#[must_use = "dropping the guard immediately restores the original hook"]
pub struct HookGuard<'a> {
    hook: &'a CompileHook,
    original: CompileFn,
}

impl Drop for HookGuard<'_> {
    fn drop(&mut self) {
        *self.hook.slot.borrow_mut() = self.original.clone();
    }
}

/// The language-aware interceptor: strips the C++ dialect flag from the
/// argument list of `.c` sources before delegating; every other source
/// passes through unchanged.
pub fn language_filter(original: CompileFn) -> CompileFn {
    Rc::new(move |source, args| match Language::from_source(source) {
        Ok(Language::C) => original(source, &effective_args(Language::C, args)),
        _ => original(source, args),
    })
}
