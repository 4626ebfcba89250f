//! Source identity to copy, for one top-level call.

use replica_value::{ObjId, ObjRef};
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

/// Maps each source object already visited to its copy.
///
/// Keys are allocation identities, never value equality: two distinct but
/// equal-looking sources get two distinct copies. The registry also holds
/// the source handle, so no source address can be reused while the call
/// runs.
#[derive(Default)]
pub struct IdentityRegistry {
    copies: FxHashMap<ObjId, (ObjRef, ObjRef)>,
    hits: usize,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The copy already produced for `source`, if any.
    pub fn lookup(&mut self, source: &ObjRef) -> Option<ObjRef> {
        let copy = self.copies.get(&source.id()).map(|(_, copy)| copy.clone());
        if copy.is_some() {
            self.hits += 1;
        }
        copy
    }

    /// Record `copy` as the copy of `source`.
    ///
    /// A source is registered at most once per call. Registering it again
    /// is a logic error: debug builds panic, release builds keep the first
    /// copy.
    pub fn register(&mut self, source: &ObjRef, copy: ObjRef) {
        let entry = self.copies.entry(source.id());
        debug_assert!(
            matches!(entry, Entry::Vacant(_)),
            "identity {:?} registered twice",
            source.id()
        );
        entry.or_insert_with(|| (source.clone(), copy));
    }

    /// Number of distinct sources copied so far.
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Lookups answered from the registry.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
