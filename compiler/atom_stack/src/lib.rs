//! Stack growth for recursion driven by user programs.
//!
//! Both the parser (nested delimiters) and the evaluator (nested lists and
//! procedure calls) recurse as deep as the Atom program asks them to. Each
//! recursive step goes through [`ensure_sufficient_stack`], which moves onto a
//! freshly allocated segment when the current one runs low.
//!
//! On `wasm32` the call is a passthrough.

/// Grow when less than this much native stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// close to exhaustion.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
