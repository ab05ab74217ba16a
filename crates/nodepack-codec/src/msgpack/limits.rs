//! Resource caps applied while decoding untrusted MessagePack input.

use super::error::{DecodeError, LimitExceeded};

/// Upper bounds on what a single decode may materialize.
///
/// Both limits are checked before the corresponding memory is allocated, so a
/// rejected payload never produces a partial tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum container nesting; the top-level container is depth 1.
    pub max_depth: usize,
    /// Budget for string/binary payload bytes plus value slots of
    /// sequences and mappings.
    pub max_alloc_bytes: usize,
}

impl DecodeLimits {
    pub const DEFAULT_MAX_DEPTH: usize = 500;
    /// Deepest nesting any configuration may ask for. The JSON parser uses
    /// the same bound, so every tree it accepts also decodes.
    pub const MAX_DEPTH_CEILING: usize = Self::DEFAULT_MAX_DEPTH;
    pub const DEFAULT_MAX_ALLOC_BYTES: usize = 64 * 1024 * 1024;

    pub const fn new(max_depth: usize, max_alloc_bytes: usize) -> Self {
        Self {
            max_depth,
            max_alloc_bytes,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH, Self::DEFAULT_MAX_ALLOC_BYTES)
    }
}

/// Per-call accounting against a [`DecodeLimits`].
#[derive(Debug)]
pub(crate) struct Budget {
    limits: DecodeLimits,
    depth: usize,
    allocated: usize,
}

impl Budget {
    pub(crate) fn new(limits: DecodeLimits) -> Self {
        Self {
            limits,
            depth: 0,
            allocated: 0,
        }
    }

    pub(crate) fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::UntrustedDataRejected(LimitExceeded::Depth {
                limit: self.limits.max_depth,
            }));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn charge(&mut self, bytes: usize) -> Result<(), DecodeError> {
        let total = self.allocated.saturating_add(bytes);
        if total > self.limits.max_alloc_bytes {
            return Err(DecodeError::UntrustedDataRejected(
                LimitExceeded::Allocation {
                    limit: self.limits.max_alloc_bytes,
                },
            ));
        }
        self.allocated = total;
        Ok(())
    }

    pub(crate) fn allocated(&self) -> usize {
        self.allocated
    }
}
