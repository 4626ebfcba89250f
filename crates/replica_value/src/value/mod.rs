//! Runtime values.
//!
//! # Identity
//!
//! Inline scalars and text carry no mutable storage; two equal scalars are
//! interchangeable. Heap objects are reached through [`ObjRef`] handles,
//! and the handle's allocation address is the object's identity: cloning a
//! `Value::Obj` clones the handle, never the object.
//!
//! ```text
//! let a = Value::list(vec![]);
//! let b = a.clone();          // same object, same identity
//! assert!(a.is_same(&b));
//! ```

mod collections;
mod equality;
mod heap;
mod object;

use std::fmt;
use std::sync::Arc;

use crate::types::{TypeId, TypeRegistry};

pub use collections::{OrderedMap, OrderedSet, ValueKey};
pub use equality::structurally_equal;
pub use heap::{ObjId, ObjRef};
pub use object::{ObjectData, SlotRead, StorageKind};

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// Absent value.
    Null,

    // Inline scalars
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),

    /// Immutable text. Clones share one allocation.
    Str(Arc<str>),
    /// Opaque external resource (file, socket, connection).
    Handle(ResourceHandle),
    /// Heap object with identity.
    Obj(ObjRef),
}

// Factory Methods

impl Value {
    /// Create a text value.
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Create a builtin `Array` with the given elements.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Obj(ObjRef::new(TypeId::ARRAY, ObjectData::Array(items)))
    }

    /// Create a builtin `List`.
    pub fn list(items: Vec<Value>) -> Self {
        Value::Obj(ObjRef::new(TypeId::LIST, ObjectData::List(items)))
    }

    /// Create a builtin `Set`; duplicates (by [`ValueKey`]) are dropped.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Obj(ObjRef::new(
            TypeId::SET,
            ObjectData::Set(items.into_iter().collect()),
        ))
    }

    /// Create a builtin `Map`; a repeated key keeps the last value.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Obj(ObjRef::new(
            TypeId::MAP,
            ObjectData::Map(entries.into_iter().collect()),
        ))
    }

    /// Create an opaque resource handle.
    pub fn handle(label: impl Into<String>, raw: u64) -> Self {
        Value::Handle(ResourceHandle::new(label, raw))
    }
}

// Value Methods

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_obj(&self) -> Option<&ObjRef> {
        match self {
            Value::Obj(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Widen any integer scalar to `i64`.
    pub fn as_long(&self) -> Option<i64> {
        match *self {
            Value::Byte(b) => Some(i64::from(b)),
            Value::Short(n) => Some(i64::from(n)),
            Value::Int(n) => Some(i64::from(n)),
            Value::Long(n) => Some(n),
            _ => None,
        }
    }

    /// Runtime type of a heap value.
    pub fn obj_type(&self) -> Option<TypeId> {
        self.as_obj().map(ObjRef::type_id)
    }

    /// Identity comparison.
    ///
    /// Heap objects, text, and handles compare by allocation; inline
    /// scalars, which have no allocation, compare by value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Obj(a), Value::Obj(b)) => a.ptr_eq(b),
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Handle(a), Value::Handle(b)) => a.ptr_eq(b),
            (Value::Obj(_) | Value::Str(_) | Value::Handle(_), _)
            | (_, Value::Obj(_) | Value::Str(_) | Value::Handle(_)) => false,
            _ => ValueKey::of(self) == ValueKey::of(other),
        }
    }

    /// Short name of the value's variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "str",
            Value::Handle(_) => "handle",
            Value::Obj(_) => "object",
        }
    }

    /// Runtime type name, resolving heap objects through the registry.
    pub fn type_name<'r>(&self, registry: &'r TypeRegistry) -> &'r str {
        match self {
            Value::Obj(obj) => registry.name_of(obj.type_id()),
            other => other.kind_name(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Obj(obj)
    }
}

// Trait Implementations

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Byte(b) => write!(f, "Byte({b})"),
            Value::Short(n) => write!(f, "Short({n})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Long(n) => write!(f, "Long({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Double(n) => write!(f, "Double({n})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Handle(h) => write!(f, "{h:?}"),
            // Shallow: object graphs may be cyclic.
            Value::Obj(obj) => write!(f, "{obj:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(b) => write!(f, "0x{b:02x}"),
            Value::Short(n) => write!(f, "{n}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}L"),
            Value::Float(n) => write!(f, "{n}f"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::Str(s) => write!(f, "\"{}\"", &**s),
            Value::Handle(h) => write!(f, "<handle {}>", h.label()),
            Value::Obj(obj) => write!(f, "<object {:?}>", obj.type_id()),
        }
    }
}

/// Opaque handle to an external resource.
///
/// The copy engine never looks inside a handle; copies share it.
#[derive(Clone)]
pub struct ResourceHandle(Arc<HandleInner>);

struct HandleInner {
    label: String,
    raw: u64,
}

impl ResourceHandle {
    pub fn new(label: impl Into<String>, raw: u64) -> Self {
        ResourceHandle(Arc::new(HandleInner {
            label: label.into(),
            raw,
        }))
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Platform value (descriptor, socket id) the handle wraps.
    pub fn raw(&self) -> u64 {
        self.0.raw
    }

    pub fn ptr_eq(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}#{})", self.0.label, self.0.raw)
    }
}
