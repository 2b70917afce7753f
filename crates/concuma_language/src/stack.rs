//! Stack growth for the recursive decoder and interpreter.
//!
//! Statements, expressions and calls all recurse on the native stack, so a
//! script at the default call depth can exhaust a 2 MiB thread stack. Every
//! recursive entry point runs through [`ensure_sufficient_stack`], which
//! switches to a freshly allocated segment when the red zone is reached.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, growing the stack first if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
