//! Insertion-ordered set and map keyed by [`ValueKey`].
//!
//! Both containers iterate in first-insertion order, so rebuilding one by
//! re-inserting its elements in iteration order reproduces the same order.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{ObjId, Value};

/// Hashing and equality key for set elements and map keys.
///
/// Scalars compare by value (floats by bit pattern), text by content,
/// handles and heap objects by identity. Two distinct objects with equal
/// contents are two distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    Char(char),
    Str(Arc<str>),
    Handle(usize),
    Obj(ObjId),
}

impl ValueKey {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Byte(b) => ValueKey::Byte(*b),
            Value::Short(n) => ValueKey::Short(*n),
            Value::Int(n) => ValueKey::Int(*n),
            Value::Long(n) => ValueKey::Long(*n),
            Value::Float(n) => ValueKey::Float(n.to_bits()),
            Value::Double(n) => ValueKey::Double(n.to_bits()),
            Value::Char(c) => ValueKey::Char(*c),
            Value::Str(s) => ValueKey::Str(Arc::clone(s)),
            Value::Handle(h) => ValueKey::Handle(h.addr()),
            Value::Obj(obj) => ValueKey::Obj(obj.id()),
        }
    }
}

// OrderedSet

/// Set of values in first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct OrderedSet {
    items: Vec<Value>,
    index: FxHashMap<ValueKey, usize>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedSet {
            items: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert `value` unless an equal key is present. Returns whether it was added.
    pub fn insert(&mut self, value: Value) -> bool {
        let key = ValueKey::of(&value);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.index.contains_key(&ValueKey::of(value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl FromIterator<Value> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// OrderedMap

/// Map from values to values in first-insertion order of keys.
#[derive(Clone, Debug, Default)]
pub struct OrderedMap {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<ValueKey, usize>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert or replace. A replaced entry keeps its original position and
    /// key; the previous value is returned.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let hash_key = ValueKey::of(&key);
        if let Some(&pos) = self.index.get(&hash_key) {
            let slot = self.entries.get_mut(pos)?;
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.index.insert(hash_key, self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let pos = *self.index.get(&ValueKey::of(key))?;
        self.entries.get(pos).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(&ValueKey::of(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn as_slice(&self) -> &[(Value, Value)] {
        &self.entries
    }
}

impl FromIterator<(Value, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
