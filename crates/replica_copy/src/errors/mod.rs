//! Errors raised by a copy operation.
//!
//! Every error is fatal for the call that raised it: the engine returns no
//! partial copy. Reasons are typed so callers can match on them instead of
//! parsing messages.

use replica_value::TypeId;
use thiserror::Error;

/// Result of a copy step.
pub type CopyResult<T> = Result<T, CopyError>;

/// Slot name reported when the contents of a container cannot be read.
pub const CONTENTS: &str = "<contents>";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CopyError {
    /// No blank instance of the type could be produced.
    #[error("cannot instantiate `{type_name}`: {reason}")]
    Instantiation {
        type_name: String,
        reason: InstantiationFailure,
    },

    /// A storage slot could not be read from the source or written to the copy.
    #[error("cannot access `{type_name}.{slot}`: {reason}")]
    Access {
        type_name: String,
        slot: String,
        reason: AccessFailure,
    },

    /// The graph nests deeper than the configured limit.
    #[error("copying `{type_name}` would exceed the depth limit of {limit}")]
    DepthExceeded { type_name: String, limit: usize },
}

impl CopyError {
    pub fn instantiation(type_name: impl Into<String>, reason: InstantiationFailure) -> Self {
        CopyError::Instantiation {
            type_name: type_name.into(),
            reason,
        }
    }

    pub fn access(
        type_name: impl Into<String>,
        slot: impl Into<String>,
        reason: AccessFailure,
    ) -> Self {
        CopyError::Access {
            type_name: type_name.into(),
            slot: slot.into(),
            reason,
        }
    }

    /// Name of the type the failing step was working on.
    pub fn type_name(&self) -> &str {
        match self {
            CopyError::Instantiation { type_name, .. }
            | CopyError::Access { type_name, .. }
            | CopyError::DepthExceeded { type_name, .. } => type_name,
        }
    }
}

/// Why the instance factory gave up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InstantiationFailure {
    #[error("type {0:?} is not registered")]
    UnknownType(TypeId),

    /// Only argument-taking constructors exist and raw allocation is not enabled.
    #[error("no zero-argument initializer, and raw allocation is not enabled")]
    NoInitializer,

    #[error("initializer failed: {0}")]
    InitializerFailed(String),
}

/// Why a slot could not be read or written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum AccessFailure {
    #[error("slot is sealed against forced access")]
    Sealed,

    /// Raw-allocated and never written.
    #[error("slot was never initialized")]
    Unset,

    #[error("object is locked by a writer")]
    Locked,

    #[error("storage does not match the type's layout")]
    LayoutMismatch,
}
