//! Copy category of a runtime value.
//!
//! Decided from the runtime type alone, with fixed precedence:
//! terminal, then array (`INDEXED`), associative (`KEYED`), sequence
//! (`SEQUENCE`), and finally composite.

use std::cell::RefCell;

use replica_value::{ShapeFlags, TypeId, TypeRegistry, Value};
use rustc_hash::FxHashMap;

/// How the engine copies a value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Category {
    /// Shared as-is: null, inline scalars, text, and resource handles.
    Terminal,
    /// Fixed length; copied index by index.
    Array,
    /// Copied by appending elements in iteration order.
    Sequence,
    /// Copied entry by entry in iteration order.
    Associative,
    /// A record; copied slot by slot across the inheritance chain.
    Composite,
}

impl Category {
    /// Category for an object type's effective shape.
    pub fn for_shape(shape: ShapeFlags) -> Self {
        if shape.contains(ShapeFlags::INDEXED) {
            Category::Array
        } else if shape.contains(ShapeFlags::KEYED) {
            Category::Associative
        } else if shape.contains(ShapeFlags::SEQUENCE) {
            Category::Sequence
        } else {
            Category::Composite
        }
    }
}

/// Classifier with per-type memoization.
///
/// Uses `RefCell` for the cache so classification takes `&self`.
pub struct Classifier<'r> {
    registry: &'r TypeRegistry,
    cache: RefCell<FxHashMap<TypeId, Category>>,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Classifier {
            registry,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn classify(&self, value: &Value) -> Category {
        match value {
            Value::Obj(obj) => self.classify_type(obj.type_id()),
            _ => Category::Terminal,
        }
    }

    /// Category of heap objects of type `ty`. Never `Terminal`.
    pub fn classify_type(&self, ty: TypeId) -> Category {
        if ty.is_builtin() {
            return Self::classify_builtin(ty);
        }

        if let Some(&cached) = self.cache.borrow().get(&ty) {
            return cached;
        }

        // An unknown type is left to the factory to reject.
        let category = self
            .registry
            .get(ty)
            .map_or(Category::Composite, |desc| Category::for_shape(desc.shape()));
        self.cache.borrow_mut().insert(ty, category);
        category
    }

    #[inline]
    fn classify_builtin(ty: TypeId) -> Category {
        match ty {
            TypeId::ARRAY => Category::Array,
            TypeId::LIST | TypeId::SET => Category::Sequence,
            TypeId::MAP => Category::Associative,
            _ => Category::Composite,
        }
    }

    /// Number of user types classified so far.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
