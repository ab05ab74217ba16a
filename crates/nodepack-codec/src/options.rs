//! Immutable codec configuration shared across conversions.

use std::fmt;
use std::sync::Arc;

use crate::msgpack::{CompositeResolver, DecodeLimits, Resolver, StandardResolver};

/// Decode limits plus the extension resolver.
///
/// Built once and passed by reference; cloning shares the resolver.
#[derive(Clone)]
pub struct CodecOptions {
    pub limits: DecodeLimits,
    pub resolver: Arc<dyn Resolver>,
}

impl Default for CodecOptions {
    /// Default limits with GUID extensions enabled.
    fn default() -> Self {
        Self {
            limits: DecodeLimits::default(),
            resolver: Arc::new(CompositeResolver::guid()),
        }
    }
}

impl CodecOptions {
    /// Default limits, builtin primitives only.
    pub fn standard() -> Self {
        Self {
            limits: DecodeLimits::default(),
            resolver: Arc::new(StandardResolver),
        }
    }

    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }
}

impl fmt::Debug for CodecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecOptions")
            .field("limits", &self.limits)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}
