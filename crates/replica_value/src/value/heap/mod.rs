//! Shared, identity-bearing handles to heap objects.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ObjectData;
use crate::types::TypeId;

/// Identity of a heap object: its allocation address.
///
/// Only meaningful while some handle keeps the object alive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjId(usize);

impl ObjId {
    pub fn addr(self) -> usize {
        self.0
    }
}

struct HeapObject {
    /// Exact runtime type. Fixed for the object's lifetime, so it sits
    /// outside the lock.
    ty: TypeId,
    data: RwLock<ObjectData>,
}

/// Handle to a heap object. Cloning shares the object.
///
/// Handles are reference counted, so a cycle of objects is never freed
/// unless some link in it is overwritten first.
#[derive(Clone)]
pub struct ObjRef(Arc<HeapObject>);

impl ObjRef {
    pub fn new(ty: TypeId, data: ObjectData) -> Self {
        ObjRef(Arc::new(HeapObject {
            ty,
            data: RwLock::new(data),
        }))
    }

    #[inline]
    pub fn id(&self) -> ObjId {
        ObjId(Arc::as_ptr(&self.0) as usize)
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.0.ty
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Shared access to the storage, blocking while a writer holds it.
    pub fn read(&self) -> RwLockReadGuard<'_, ObjectData> {
        self.0.data.read()
    }

    /// Exclusive access to the storage, blocking while anyone holds it.
    pub fn write(&self) -> RwLockWriteGuard<'_, ObjectData> {
        self.0.data.write()
    }

    /// Shared access, or `None` if a writer currently holds the storage.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, ObjectData>> {
        self.0.data.try_read()
    }

    /// Exclusive access, or `None` if the storage is held.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, ObjectData>> {
        self.0.data.try_write()
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obj({:?} @{:#x})", self.0.ty, self.id().0)
    }
}
