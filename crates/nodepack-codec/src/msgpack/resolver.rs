//! Resolver strategies for MessagePack extension types.
//!
//! The value model has no extension variant: a resolver turns an extension
//! payload into an ordinary [`Value`] on decode. Encoding never consults a
//! resolver, so every string goes out as plain `str`. Resolvers are stateless
//! and shared across threads behind an `Arc`.

use std::sync::Arc;

use uuid::Uuid;

use super::constants::GUID_EXT_TYPE;
use crate::Value;

pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes an extension payload, or `None` if this resolver does not
    /// handle `ext_type` / this payload shape.
    fn read_ext(&self, ext_type: i8, data: &[u8]) -> Option<Value>;
}

/// Builtin primitives only: no extension types are understood.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolver;

impl Resolver for StandardResolver {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn read_ext(&self, _ext_type: i8, _data: &[u8]) -> Option<Value> {
        None
    }
}

/// Maps extension type [`GUID_EXT_TYPE`] with a 16-byte payload to the
/// canonical lowercase hyphenated UUID string.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidResolver;

impl Resolver for GuidResolver {
    fn name(&self) -> &'static str {
        "guid"
    }

    fn read_ext(&self, ext_type: i8, data: &[u8]) -> Option<Value> {
        if ext_type != GUID_EXT_TYPE {
            return None;
        }
        let uuid = Uuid::from_slice(data).ok()?;
        Some(Value::String(uuid.hyphenated().to_string()))
    }
}

/// Tries each resolver in order; the first one to answer wins.
#[derive(Clone)]
pub struct CompositeResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl CompositeResolver {
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// GUID extension handling layered over the builtin primitives.
    pub fn guid() -> Self {
        Self::new(vec![Arc::new(GuidResolver), Arc::new(StandardResolver)])
    }

    /// Names of the member resolvers, in lookup order.
    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }
}

impl Resolver for CompositeResolver {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn read_ext(&self, ext_type: i8, data: &[u8]) -> Option<Value> {
        self.resolvers
            .iter()
            .find_map(|r| r.read_ext(ext_type, data))
    }
}
