//! Blank instances of arbitrary runtime types.
//!
//! # Policy
//!
//! 1. A zero-argument initializer: record slots take their declared
//!    defaults, containers start empty, arrays start as `extent` nulls.
//!    The initializer hook, if any, then runs on the fresh storage.
//! 2. No such initializer, but the type opted into raw allocation: the
//!    same storage with every record slot left unset. Nothing the type's
//!    constructors would establish holds until the slots are written.
//! 3. Otherwise the type cannot be instantiated.

use replica_value::{
    Constructor, ObjRef, ObjectData, OrderedMap, OrderedSet, StorageKind, TypeDesc, TypeId,
    TypeRegistry, Value,
};
use tracing::debug;

use crate::errors::{CopyError, CopyResult, InstantiationFailure};

/// Initial state of record slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SlotFill {
    Defaults,
    Unset,
}

pub struct InstanceFactory<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> InstanceFactory<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        InstanceFactory { registry }
    }

    /// Create a blank instance of exactly `ty`.
    ///
    /// `extent` is the length of a new array and a capacity hint for other
    /// containers. Records ignore it.
    pub fn create(&self, ty: TypeId, extent: usize) -> CopyResult<ObjRef> {
        let desc = self.registry.get(ty).ok_or_else(|| {
            CopyError::instantiation(format!("{ty:?}"), InstantiationFailure::UnknownType(ty))
        })?;

        match desc.constructor() {
            Constructor::NoArg(hook) => {
                let mut data = self.blank(ty, desc, extent, SlotFill::Defaults)?;
                if let Some(hook) = hook {
                    hook(&mut data).map_err(|message| {
                        CopyError::instantiation(
                            desc.name(),
                            InstantiationFailure::InitializerFailed(message),
                        )
                    })?;
                }
                Ok(ObjRef::new(ty, data))
            }
            Constructor::WithArgs if desc.allows_raw_alloc() => {
                debug!(
                    type_name = desc.name(),
                    "no zero-argument initializer; raw allocation with unset slots"
                );
                let data = self.blank(ty, desc, extent, SlotFill::Unset)?;
                Ok(ObjRef::new(ty, data))
            }
            Constructor::WithArgs => Err(CopyError::instantiation(
                desc.name(),
                InstantiationFailure::NoInitializer,
            )),
        }
    }

    fn blank(
        &self,
        ty: TypeId,
        desc: &TypeDesc,
        extent: usize,
        fill: SlotFill,
    ) -> CopyResult<ObjectData> {
        Ok(match StorageKind::for_shape(desc.shape()) {
            StorageKind::Record => match fill {
                SlotFill::Defaults => ObjectData::Record(
                    self.registry
                        .default_layout(ty)
                        .map_err(|_| {
                            CopyError::instantiation(
                                desc.name(),
                                InstantiationFailure::UnknownType(ty),
                            )
                        })?,
                ),
                SlotFill::Unset => ObjectData::Record(vec![None; desc.layout_len()]),
            },
            StorageKind::Array => ObjectData::Array(vec![Value::Null; extent]),
            StorageKind::List => ObjectData::List(Vec::with_capacity(extent)),
            StorageKind::Set => ObjectData::Set(OrderedSet::with_capacity(extent)),
            StorageKind::Map => ObjectData::Map(OrderedMap::with_capacity(extent)),
        })
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
