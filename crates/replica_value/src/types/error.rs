use thiserror::Error;

use super::TypeId;
use crate::value::StorageKind;

/// Errors from declaring types or building objects against them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unknown type {0:?}")]
    UnknownType(TypeId),

    #[error("type `{name}` extends unknown parent {parent:?}")]
    UnknownParent { name: String, parent: TypeId },

    #[error("type `{0}` is already defined")]
    DuplicateType(String),

    #[error("slot `{slot}` is declared twice on `{type_name}`")]
    DuplicateSlot { type_name: String, slot: String },

    #[error("container type `{0}` cannot have record slots")]
    SlotsOnContainer(String),

    #[error("`{type_name}` has no slot named `{slot}`")]
    UnknownSlot { type_name: String, slot: String },

    #[error("type registry is full")]
    RegistryFull,

    #[error("`{type_name}` is not stored as {expected}")]
    WrongShape {
        type_name: String,
        expected: StorageKind,
    },
}
