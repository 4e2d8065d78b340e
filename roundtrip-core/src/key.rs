//! Cache slot selection.
//!
//! A [`KeyExtractor`] decides which cache slot a request reads from and writes
//! to. Two strategies are provided:
//!
//! - [`FixedKey`] - every request shares one slot. This is the default and
//!   keeps the historical behaviour of the pipeline: the first response that
//!   gets stored is replayed for *every* later request, whatever its URL.
//! - [`MethodUri`] - one slot per method and URI, which is what a general
//!   purpose response cache wants.

use std::sync::Arc;

use smol_str::{SmolStr, format_smolstr};

use crate::Request;

/// Slot name used by [`FixedKey::default`].
pub const DEFAULT_CACHE_KEY: &str = "resp";

/// Computes the cache key for a request.
pub trait KeyExtractor: Send + Sync {
    /// Returns the key of the slot `request` maps to.
    fn extract(&self, request: &Request) -> SmolStr;
}

impl<T> KeyExtractor for &T
where
    T: KeyExtractor + ?Sized,
{
    fn extract(&self, request: &Request) -> SmolStr {
        (**self).extract(request)
    }
}

impl<T> KeyExtractor for Box<T>
where
    T: KeyExtractor + ?Sized,
{
    fn extract(&self, request: &Request) -> SmolStr {
        (**self).extract(request)
    }
}

impl<T> KeyExtractor for Arc<T>
where
    T: KeyExtractor + ?Sized,
{
    fn extract(&self, request: &Request) -> SmolStr {
        (**self).extract(request)
    }
}

/// Maps every request to the same slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedKey(SmolStr);

impl FixedKey {
    /// Creates an extractor that always returns `key`.
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    /// Returns the fixed key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FixedKey {
    fn default() -> Self {
        Self(SmolStr::new_static(DEFAULT_CACHE_KEY))
    }
}

impl KeyExtractor for FixedKey {
    fn extract(&self, _request: &Request) -> SmolStr {
        self.0.clone()
    }
}

/// Maps each method and URI pair to its own slot, e.g. `GET http://host/path?q=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodUri;

impl KeyExtractor for MethodUri {
    fn extract(&self, request: &Request) -> SmolStr {
        format_smolstr!("{} {}", request.method(), request.uri())
    }
}
