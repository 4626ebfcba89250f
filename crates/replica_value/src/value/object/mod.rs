//! Storage behind a heap object.

use std::fmt;

use super::{OrderedMap, OrderedSet, Value};
use crate::types::ShapeFlags;

/// Kind of storage a heap object uses.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StorageKind {
    Record,
    Array,
    List,
    Set,
    Map,
}

impl StorageKind {
    /// Storage for a type's effective shape.
    ///
    /// `INDEXED` wins over `KEYED`, which wins over `SEQUENCE`; a shape
    /// with none of them is a record.
    pub fn for_shape(shape: ShapeFlags) -> Self {
        if shape.contains(ShapeFlags::INDEXED) {
            StorageKind::Array
        } else if shape.contains(ShapeFlags::KEYED) {
            StorageKind::Map
        } else if shape.contains(ShapeFlags::SEQUENCE) {
            if shape.contains(ShapeFlags::UNIQUE) {
                StorageKind::Set
            } else {
                StorageKind::List
            }
        } else {
            StorageKind::Record
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::Record => "a record",
            StorageKind::Array => "an array",
            StorageKind::List => "a list",
            StorageKind::Set => "a set",
            StorageKind::Map => "a map",
        })
    }
}

/// Result of reading a record slot.
#[derive(Copy, Clone, Debug)]
pub enum SlotRead<'a> {
    /// The storage has no slot at this index, or is not a record.
    Missing,
    /// Allocated but never written.
    Unset,
    Value(&'a Value),
}

/// Heap object storage.
#[derive(Clone, Debug)]
pub enum ObjectData {
    /// Slots in layout order. `None` marks a slot that has not been written
    /// since raw allocation.
    Record(Vec<Option<Value>>),
    /// Fixed-length elements.
    Array(Vec<Value>),
    List(Vec<Value>),
    Set(OrderedSet),
    Map(OrderedMap),
}

impl ObjectData {
    pub fn kind(&self) -> StorageKind {
        match self {
            ObjectData::Record(_) => StorageKind::Record,
            ObjectData::Array(_) => StorageKind::Array,
            ObjectData::List(_) => StorageKind::List,
            ObjectData::Set(_) => StorageKind::Set,
            ObjectData::Map(_) => StorageKind::Map,
        }
    }

    /// Slot count, element count, or entry count.
    pub fn extent(&self) -> usize {
        match self {
            ObjectData::Record(slots) => slots.len(),
            ObjectData::Array(items) | ObjectData::List(items) => items.len(),
            ObjectData::Set(set) => set.len(),
            ObjectData::Map(map) => map.len(),
        }
    }

    // Records

    pub fn slot(&self, index: usize) -> SlotRead<'_> {
        match self {
            ObjectData::Record(slots) => match slots.get(index) {
                Some(Some(value)) => SlotRead::Value(value),
                Some(None) => SlotRead::Unset,
                None => SlotRead::Missing,
            },
            _ => SlotRead::Missing,
        }
    }

    /// Write a record slot. Returns `false` if there is no such slot.
    pub fn set_slot(&mut self, index: usize, value: Value) -> bool {
        match self {
            ObjectData::Record(slots) => match slots.get_mut(index) {
                Some(slot) => {
                    *slot = Some(value);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    // Arrays, lists, sets

    /// Elements of an array, list, or set in iteration order.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            ObjectData::Array(items) | ObjectData::List(items) => Some(items),
            ObjectData::Set(set) => Some(set.as_slice()),
            _ => None,
        }
    }

    /// Overwrite an array or list element. Returns `false` if out of range.
    pub fn set_element(&mut self, index: usize, value: Value) -> bool {
        match self {
            ObjectData::Array(items) | ObjectData::List(items) => match items.get_mut(index) {
                Some(item) => {
                    *item = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Append to a list or insert into a set. Returns `false` for any other
    /// storage, and for a set that already holds an equal key.
    pub fn push(&mut self, value: Value) -> bool {
        match self {
            ObjectData::List(items) => {
                items.push(value);
                true
            }
            ObjectData::Set(set) => set.insert(value),
            _ => false,
        }
    }

    // Maps

    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            ObjectData::Map(map) => Some(map.as_slice()),
            _ => None,
        }
    }

    /// Insert into a map. Returns `false` for any other storage.
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        match self {
            ObjectData::Map(map) => {
                map.insert(key, value);
                true
            }
            _ => false,
        }
    }
}
