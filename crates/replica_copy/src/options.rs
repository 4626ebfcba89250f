//! Per-call copy configuration.

/// Options for one [`DeepCopier`](crate::DeepCopier).
///
/// The defaults copy graphs of any depth: stack growth is on and there is
/// no depth limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CopyOptions {
    /// Move recursion onto fresh stack segments when the current one runs low.
    pub grow_stack: bool,
    /// Fail with `DepthExceeded` past this many nested objects.
    pub max_depth: Option<usize>,
}

impl CopyOptions {
    pub fn new() -> Self {
        CopyOptions {
            grow_stack: true,
            max_depth: None,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Recurse on the native stack only. Pair with a depth limit.
    #[must_use]
    pub fn without_stack_growth(mut self) -> Self {
        self.grow_stack = false;
        self
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::new()
    }
}
