//! Stack growth for deep, non-cyclic object graphs.
//!
//! The copy engine walks a value graph depth-first with plain recursion.
//! A long linked chain (a list of 100k nodes, each pointing at the next)
//! recurses once per node, which overflows a default 8MB thread stack.
//! Wrapping each recursive step in [`ensure_sufficient_stack`] moves the
//! walk onto freshly allocated stack segments whenever the current one runs
//! low.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: passthrough; the engine relies on its depth limit.

/// Remaining stack below which a new segment is allocated (128KB).
///
/// One traversal step (classification, factory call, slot snapshot) uses a
/// few KB at most, so this leaves ample room before the next check.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Run `f` with stack growth when `grow` is set, directly otherwise.
///
/// Lets callers keep stack growth behind a runtime switch without
/// duplicating the call site.
#[inline]
pub fn maybe_grow_stack<R>(grow: bool, f: impl FnOnce() -> R) -> R {
    if grow {
        ensure_sufficient_stack(f)
    } else {
        f()
    }
}
