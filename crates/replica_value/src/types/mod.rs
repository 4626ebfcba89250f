//! Runtime type declarations.
//!
//! A type is declared once through a [`TypeDef`] and stored in the
//! [`TypeRegistry`] as a [`TypeDesc`]. Heap objects carry the [`TypeId`] of
//! their exact runtime type; everything the copy engine needs to know about
//! an object's shape is derived from that id.

mod error;
mod registry;

use std::fmt;

use bitflags::bitflags;

use crate::value::{ObjectData, Value};

pub use error::TypeError;
pub use registry::{Ancestry, TypeRegistry};

/// A 32-bit index into the type registry.
///
/// Builtin types have fixed indices, so they can be named without a
/// registry in hand.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Builtin Types (indices 0-4) ===
    // Pre-registered by `TypeRegistry::new()`.

    /// Root of every inheritance chain. A record with no slots.
    pub const OBJECT: Self = Self(0);
    /// Fixed-length indexed array.
    pub const ARRAY: Self = Self(1);
    /// Ordered list allowing duplicates.
    pub const LIST: Self = Self(2);
    /// Insertion-ordered set.
    pub const SET: Self = Self(3);
    /// Insertion-ordered map.
    pub const MAP: Self = Self(4);

    /// Number of builtin types.
    pub const BUILTIN_COUNT: u32 = 5;

    /// First index handed out to user-defined types.
    pub const FIRST_USER: Self = Self(Self::BUILTIN_COUNT);

    /// Create an index from a raw `u32` value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is one of the builtin types.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OBJECT => write!(f, "TypeId(Object)"),
            Self::ARRAY => write!(f, "TypeId(Array)"),
            Self::LIST => write!(f, "TypeId(List)"),
            Self::SET => write!(f, "TypeId(Set)"),
            Self::MAP => write!(f, "TypeId(Map)"),
            Self(raw) => write!(f, "TypeId({raw})"),
        }
    }
}

bitflags! {
    /// Container capabilities a type declares.
    ///
    /// Flags are inherited: the effective shape of a type is the union of
    /// its own flags and those of every ancestor. A type may carry more than
    /// one capability; consumers resolve the overlap by precedence.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ShapeFlags: u8 {
        /// Fixed-length, index-addressed storage.
        const INDEXED = 1 << 0;
        /// Key to value associations.
        const KEYED = 1 << 1;
        /// Iterable collection of elements.
        const SEQUENCE = 1 << 2;
        /// Elements are deduplicated on insertion.
        const UNIQUE = 1 << 3;
    }
}

impl ShapeFlags {
    /// Any flag that makes storage a container rather than a record.
    pub const CONTAINER: Self = Self::INDEXED.union(Self::KEYED).union(Self::SEQUENCE);

    /// Check if values of this shape are stored as a container.
    #[inline]
    pub fn is_container(self) -> bool {
        self.intersects(Self::CONTAINER)
    }
}

/// Declared visibility of a slot.
///
/// The copy engine forces access to `Public`, `Protected` and `Private`
/// slots. `Sealed` slots refuse forced access.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Sealed,
}

impl Visibility {
    /// Whether a reader outside the declaring type may force access.
    #[inline]
    pub fn is_forcible(self) -> bool {
        !matches!(self, Visibility::Sealed)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Sealed => "sealed",
        })
    }
}

/// A storage slot declared on one type.
#[derive(Clone, Debug)]
pub struct SlotDecl {
    pub name: String,
    pub visibility: Visibility,
    /// Value written by the zero-argument initializer.
    pub default: Value,
}

/// Body of a zero-argument initializer.
///
/// Runs after every slot holds its declared default. An `Err` aborts
/// construction.
pub type InitHook = fn(&mut ObjectData) -> Result<(), String>;

/// How instances of a type come into existence.
#[derive(Copy, Clone, Debug)]
pub enum Constructor {
    /// A zero-argument initializer exists. Slots take their declared
    /// defaults, then the optional hook runs.
    NoArg(Option<InitHook>),
    /// Every constructor needs arguments the copy engine cannot supply.
    WithArgs,
}

/// Builder for a new runtime type.
///
/// # Example
///
/// ```text
/// let person = registry.define(
///     TypeDef::new("Person")
///         .slot("name", Visibility::Private)
///         .slot_with_default("age", Visibility::Private, Value::Int(0)),
/// )?;
/// ```
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub(crate) name: String,
    pub(crate) parent: TypeId,
    pub(crate) shape: ShapeFlags,
    pub(crate) slots: Vec<SlotDecl>,
    pub(crate) constructor: Constructor,
    pub(crate) raw_alloc: bool,
}

impl TypeDef {
    /// Start a record type extending `Object`, with a zero-argument initializer.
    pub fn new(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            parent: TypeId::OBJECT,
            shape: ShapeFlags::empty(),
            slots: Vec::new(),
            constructor: Constructor::NoArg(None),
            raw_alloc: false,
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: TypeId) -> Self {
        self.parent = parent;
        self
    }

    /// Add container capabilities on top of those inherited.
    #[must_use]
    pub fn shape(mut self, flags: ShapeFlags) -> Self {
        self.shape |= flags;
        self
    }

    /// Declare a slot whose default is `Null`.
    #[must_use]
    pub fn slot(self, name: impl Into<String>, visibility: Visibility) -> Self {
        self.slot_with_default(name, visibility, Value::Null)
    }

    #[must_use]
    pub fn slot_with_default(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        default: Value,
    ) -> Self {
        self.slots.push(SlotDecl {
            name: name.into(),
            visibility,
            default,
        });
        self
    }

    /// Give the zero-argument initializer a body.
    #[must_use]
    pub fn init_hook(mut self, hook: InitHook) -> Self {
        self.constructor = Constructor::NoArg(Some(hook));
        self
    }

    /// Declare that no zero-argument initializer exists.
    #[must_use]
    pub fn requires_args(mut self) -> Self {
        self.constructor = Constructor::WithArgs;
        self
    }

    /// Opt in to raw allocation when no zero-argument initializer exists.
    ///
    /// Raw-allocated records start with every slot unset, skipping whatever
    /// invariants the type's constructors would establish.
    #[must_use]
    pub fn allow_raw_alloc(mut self) -> Self {
        self.raw_alloc = true;
        self
    }
}

/// A registered runtime type.
#[derive(Clone, Debug)]
pub struct TypeDesc {
    name: String,
    parent: Option<TypeId>,
    /// Flags declared on this type alone.
    declared_shape: ShapeFlags,
    /// Union of declared flags along the whole ancestry.
    shape: ShapeFlags,
    slots: Vec<SlotDecl>,
    /// Slots in the full layout: own plus every ancestor's.
    layout_len: usize,
    constructor: Constructor,
    raw_alloc: bool,
}

impl TypeDesc {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent type; `None` only for `Object`.
    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    /// Effective shape including inherited flags.
    pub fn shape(&self) -> ShapeFlags {
        self.shape
    }

    pub fn declared_shape(&self) -> ShapeFlags {
        self.declared_shape
    }

    /// Slots declared on this type itself, in declaration order.
    pub fn declared_slots(&self) -> &[SlotDecl] {
        &self.slots
    }

    /// Number of slots in the full record layout.
    pub fn layout_len(&self) -> usize {
        self.layout_len
    }

    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    pub fn allows_raw_alloc(&self) -> bool {
        self.raw_alloc
    }
}
