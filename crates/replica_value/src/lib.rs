//! Runtime object model for the replica deep-copy engine.
//!
//! Rust has no runtime reflection, so values the engine can copy live in a
//! small dynamic object model that types opt into through a
//! [`TypeRegistry`]:
//!
//! - [`Value`] : null, inline scalars, immutable text, opaque resource
//!   handles, and heap objects.
//! - [`ObjRef`] : a shared handle to a heap object. Its allocation address
//!   is the object's identity ([`ObjId`]), distinct from value equality.
//! - [`ObjectData`] : the storage behind a handle: a record of slots, a
//!   fixed-length array, a list, an insertion-ordered set, or an
//!   insertion-ordered map.
//! - [`TypeRegistry`] : runtime types with single inheritance, declared
//!   slots and their visibility, shape capabilities, and constructor
//!   contracts.
//!
//! # Thread Safety
//!
//! Heap objects are `Arc<RwLock<_>>` internally, so a value graph is
//! `Send + Sync` and several threads may read the same graph at once.

mod types;
mod value;

pub use types::{
    Ancestry, Constructor, InitHook, ShapeFlags, SlotDecl, TypeDef, TypeDesc, TypeError, TypeId,
    TypeRegistry, Visibility,
};
pub use value::{
    structurally_equal, ObjId, ObjRef, ObjectData, OrderedMap, OrderedSet, ResourceHandle,
    SlotRead, StorageKind, Value, ValueKey,
};
