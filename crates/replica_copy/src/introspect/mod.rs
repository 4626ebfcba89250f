//! Every storage slot of a record type, across its inheritance chain.
//!
//! Slots are listed in layout order: those declared on the type itself,
//! then each ancestor's, up to `Object`. The order is a function of the
//! type alone, so a source and its copy are walked identically.

use std::cell::RefCell;
use std::rc::Rc;

use replica_value::{ObjRef, SlotRead, TypeId, TypeRegistry, Value, Visibility};
use rustc_hash::FxHashMap;

use crate::errors::{AccessFailure, CopyError, CopyResult};

/// Forced getter and setter for one slot of one record type.
#[derive(Clone, Debug)]
pub struct SlotAccessor {
    name: Rc<str>,
    /// Type whose layout `index` refers to.
    owner: TypeId,
    owner_name: Rc<str>,
    declared_in: TypeId,
    visibility: Visibility,
    index: usize,
}

impl SlotAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type the slot is declared on; an ancestor for inherited slots.
    pub fn declared_in(&self) -> TypeId {
        self.declared_in
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Storage index within the owner's record layout.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read the slot, ignoring visibility unless it is sealed.
    pub fn get(&self, obj: &ObjRef) -> CopyResult<Value> {
        self.check(obj)?;
        let data = obj.try_read().ok_or_else(|| self.fail(AccessFailure::Locked))?;
        match data.slot(self.index) {
            SlotRead::Value(value) => Ok(value.clone()),
            SlotRead::Unset => Err(self.fail(AccessFailure::Unset)),
            SlotRead::Missing => Err(self.fail(AccessFailure::LayoutMismatch)),
        }
    }

    /// Write the slot, ignoring visibility unless it is sealed.
    pub fn set(&self, obj: &ObjRef, value: Value) -> CopyResult<()> {
        self.check(obj)?;
        let mut data = obj
            .try_write()
            .ok_or_else(|| self.fail(AccessFailure::Locked))?;
        if data.set_slot(self.index, value) {
            Ok(())
        } else {
            Err(self.fail(AccessFailure::LayoutMismatch))
        }
    }

    fn check(&self, obj: &ObjRef) -> CopyResult<()> {
        if !self.visibility.is_forcible() {
            return Err(self.fail(AccessFailure::Sealed));
        }
        if obj.type_id() != self.owner {
            return Err(self.fail(AccessFailure::LayoutMismatch));
        }
        Ok(())
    }

    fn fail(&self, reason: AccessFailure) -> CopyError {
        CopyError::access(&*self.owner_name, &*self.name, reason)
    }
}

/// Slot enumeration with a per-type layout cache.
pub struct FieldIntrospector<'r> {
    registry: &'r TypeRegistry,
    cache: RefCell<FxHashMap<TypeId, Rc<[SlotAccessor]>>>,
}

impl<'r> FieldIntrospector<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        FieldIntrospector {
            registry,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Accessors for every slot of `ty` in layout order.
    ///
    /// Empty for unknown types and for containers.
    pub fn slots_of(&self, ty: TypeId) -> Rc<[SlotAccessor]> {
        if let Some(slots) = self.cache.borrow().get(&ty) {
            return Rc::clone(slots);
        }
        let slots: Rc<[SlotAccessor]> = self.collect(ty).into();
        self.cache.borrow_mut().insert(ty, Rc::clone(&slots));
        slots
    }

    fn collect(&self, ty: TypeId) -> Vec<SlotAccessor> {
        let Some(desc) = self.registry.get(ty) else {
            return Vec::new();
        };
        let owner_name: Rc<str> = Rc::from(desc.name());
        let mut slots = Vec::with_capacity(desc.layout_len());
        for (declared_in, decl) in self.registry.ancestry(ty) {
            for slot in decl.declared_slots() {
                slots.push(SlotAccessor {
                    name: Rc::from(slot.name.as_str()),
                    owner: ty,
                    owner_name: Rc::clone(&owner_name),
                    declared_in,
                    visibility: slot.visibility,
                    index: slots.len(),
                });
            }
        }
        slots
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
