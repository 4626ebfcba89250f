//! The runtime type table.
//!
//! # Record Layout
//!
//! A record's storage holds the slots declared on its own type first, then
//! its parent's full layout, recursively up to `Object`:
//!
//! ```text
//! Manager extends Employee extends Person
//!   [ Manager slots.. | Employee slots.. | Person slots.. ]
//! ```
//!
//! A name declared on both a type and an ancestor yields two distinct
//! slots; lookup by name finds the most-derived one.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Constructor, ShapeFlags, TypeDef, TypeDesc, TypeError, TypeId};
use crate::value::{ObjRef, ObjectData, OrderedMap, OrderedSet, StorageKind, Value};

/// Registry of every runtime type a value graph may use.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDesc>,
    by_name: FxHashMap<String, TypeId>,
}

impl TypeRegistry {
    /// Create a registry holding the builtin types.
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: Vec::with_capacity(16),
            by_name: FxHashMap::default(),
        };
        registry.push_builtin(TypeId::OBJECT, "Object", None, ShapeFlags::empty());
        registry.push_builtin(
            TypeId::ARRAY,
            "Array",
            Some(TypeId::OBJECT),
            ShapeFlags::INDEXED,
        );
        registry.push_builtin(
            TypeId::LIST,
            "List",
            Some(TypeId::OBJECT),
            ShapeFlags::SEQUENCE,
        );
        registry.push_builtin(
            TypeId::SET,
            "Set",
            Some(TypeId::OBJECT),
            ShapeFlags::SEQUENCE | ShapeFlags::UNIQUE,
        );
        registry.push_builtin(TypeId::MAP, "Map", Some(TypeId::OBJECT), ShapeFlags::KEYED);
        registry
    }

    fn push_builtin(&mut self, id: TypeId, name: &str, parent: Option<TypeId>, shape: ShapeFlags) {
        debug_assert_eq!(id.index(), self.types.len(), "builtin {name} out of order");
        self.by_name.insert(name.to_string(), id);
        self.types.push(TypeDesc {
            name: name.to_string(),
            parent,
            declared_shape: shape,
            shape,
            slots: Vec::new(),
            layout_len: 0,
            constructor: Constructor::NoArg(None),
            raw_alloc: false,
        });
    }

    /// Register a new type.
    pub fn define(&mut self, def: TypeDef) -> Result<TypeId, TypeError> {
        let Some(parent) = self.get(def.parent) else {
            return Err(TypeError::UnknownParent {
                name: def.name,
                parent: def.parent,
            });
        };
        let shape = parent.shape | def.shape;
        let layout_len = parent.layout_len + def.slots.len();

        if self.by_name.contains_key(&def.name) {
            return Err(TypeError::DuplicateType(def.name));
        }

        let mut seen = FxHashSet::default();
        for slot in &def.slots {
            if !seen.insert(slot.name.as_str()) {
                return Err(TypeError::DuplicateSlot {
                    type_name: def.name.clone(),
                    slot: slot.name.clone(),
                });
            }
        }

        if shape.is_container() && layout_len > 0 {
            return Err(TypeError::SlotsOnContainer(def.name));
        }

        let raw = u32::try_from(self.types.len()).map_err(|_| TypeError::RegistryFull)?;
        let id = TypeId::from_raw(raw);
        self.by_name.insert(def.name.clone(), id);
        self.types.push(TypeDesc {
            name: def.name,
            parent: Some(def.parent),
            declared_shape: def.shape,
            shape,
            slots: def.slots,
            layout_len,
            constructor: def.constructor,
            raw_alloc: def.raw_alloc,
        });
        Ok(id)
    }

    pub fn get(&self, ty: TypeId) -> Option<&TypeDesc> {
        self.types.get(ty.index())
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn desc(&self, ty: TypeId) -> Result<&TypeDesc, TypeError> {
        self.get(ty).ok_or(TypeError::UnknownType(ty))
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Type name for messages; `<unknown>` for ids this registry never issued.
    pub fn name_of(&self, ty: TypeId) -> &str {
        self.get(ty).map_or("<unknown>", TypeDesc::name)
    }

    /// Number of registered types, builtins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`: the builtins are registered at construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Walk from `ty` up to `Object`, the type itself first.
    pub fn ancestry(&self, ty: TypeId) -> Ancestry<'_> {
        Ancestry {
            registry: self,
            next: Some(ty),
        }
    }

    /// Check if `ty` is `ancestor` or inherits from it.
    pub fn is_subtype(&self, ty: TypeId, ancestor: TypeId) -> bool {
        self.ancestry(ty).any(|(id, _)| id == ancestor)
    }

    /// Storage index of the most-derived slot called `name`.
    pub fn slot_index(&self, ty: TypeId, name: &str) -> Option<usize> {
        let mut offset = 0;
        for (_, desc) in self.ancestry(ty) {
            if let Some(pos) = desc.slots.iter().position(|slot| slot.name == name) {
                return Some(offset + pos);
            }
            offset += desc.slots.len();
        }
        None
    }

    /// Storage used by instances of `ty`.
    pub fn storage_kind(&self, ty: TypeId) -> Result<StorageKind, TypeError> {
        Ok(StorageKind::for_shape(self.desc(ty)?.shape))
    }

    /// Record slots as the zero-argument initializer leaves them.
    pub fn default_layout(&self, ty: TypeId) -> Result<Vec<Option<Value>>, TypeError> {
        let desc = self.desc(ty)?;
        let mut slots = Vec::with_capacity(desc.layout_len);
        for (_, desc) in self.ancestry(ty) {
            slots.extend(desc.slots.iter().map(|slot| Some(slot.default.clone())));
        }
        Ok(slots)
    }

    // Argument-taking constructors for building value graphs.

    /// Build a record, naming the slots to set. Unnamed slots keep their defaults.
    pub fn new_record<'a>(
        &self,
        ty: TypeId,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Value, TypeError> {
        self.expect_storage(ty, &[StorageKind::Record])?;
        let mut slots = self.default_layout(ty)?;
        for (name, value) in fields {
            let slot = self
                .slot_index(ty, name)
                .and_then(|index| slots.get_mut(index))
                .ok_or_else(|| TypeError::UnknownSlot {
                    type_name: self.name_of(ty).to_string(),
                    slot: name.to_string(),
                })?;
            *slot = Some(value);
        }
        Ok(Value::Obj(ObjRef::new(ty, ObjectData::Record(slots))))
    }

    /// Build an array of an array-shaped type.
    pub fn new_array_of(&self, ty: TypeId, items: Vec<Value>) -> Result<Value, TypeError> {
        self.expect_storage(ty, &[StorageKind::Array])?;
        Ok(Value::Obj(ObjRef::new(ty, ObjectData::Array(items))))
    }

    /// Build a list or set of a sequence-shaped type.
    pub fn new_sequence_of(
        &self,
        ty: TypeId,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<Value, TypeError> {
        let data = match self.expect_storage(ty, &[StorageKind::List, StorageKind::Set])? {
            StorageKind::Set => ObjectData::Set(items.into_iter().collect::<OrderedSet>()),
            _ => ObjectData::List(items.into_iter().collect()),
        };
        Ok(Value::Obj(ObjRef::new(ty, data)))
    }

    /// Build a map of a map-shaped type.
    pub fn new_map_of(
        &self,
        ty: TypeId,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Value, TypeError> {
        self.expect_storage(ty, &[StorageKind::Map])?;
        let map = entries.into_iter().collect::<OrderedMap>();
        Ok(Value::Obj(ObjRef::new(ty, ObjectData::Map(map))))
    }

    fn expect_storage(&self, ty: TypeId, allowed: &[StorageKind]) -> Result<StorageKind, TypeError> {
        let kind = self.storage_kind(ty)?;
        if allowed.contains(&kind) {
            return Ok(kind);
        }
        Err(TypeError::WrongShape {
            type_name: self.name_of(ty).to_string(),
            expected: allowed.first().copied().unwrap_or(kind),
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a type and its ancestors, most-derived first.
pub struct Ancestry<'r> {
    registry: &'r TypeRegistry,
    next: Option<TypeId>,
}

impl<'r> Iterator for Ancestry<'r> {
    type Item = (TypeId, &'r TypeDesc);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let desc = self.registry.get(id)?;
        self.next = desc.parent;
        Some((id, desc))
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
