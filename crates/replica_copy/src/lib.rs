//! Identity-preserving deep copy of runtime object graphs.
//!
//! Given any [`Value`], [`deep_copy`] produces an independent copy: no
//! mutable storage is shared between source and copy, yet the copy keeps
//! the source's shape. Sub-objects reached twice are copied once, and
//! cycles close on the copy.
//!
//! # Components
//!
//! - [`IdentityRegistry`]: source identity to copy, for one call.
//! - [`InstanceFactory`]: blank instances of arbitrary runtime types.
//! - [`Classifier`]: the copy [`Category`] of a value.
//! - [`FieldIntrospector`]: forced access to every slot of a record type.
//! - [`DeepCopier`]: the traversal driving the others.
//!
//! # Example
//!
//! ```text
//! let mut registry = TypeRegistry::new();
//! let node = registry.define(TypeDef::new("Node").slot("next", Visibility::Private))?;
//! let a = registry.new_record(node, [])?;
//! let copy = deep_copy(&registry, &a)?;
//! ```
//!
//! # Debugging
//!
//! Set `RUST_LOG=replica_copy=trace` and call [`init_tracing`] to log each
//! object copied and each registry hit.

mod classify;
mod errors;
mod factory;
mod identity;
mod introspect;
mod options;
mod traverse;

use std::sync::Once;

use replica_value::{TypeRegistry, Value};

pub use classify::{Category, Classifier};
pub use errors::{AccessFailure, CopyError, CopyResult, InstantiationFailure, CONTENTS};
pub use factory::InstanceFactory;
pub use identity::IdentityRegistry;
pub use introspect::{FieldIntrospector, SlotAccessor};
pub use options::CopyOptions;
pub use traverse::{CopyReport, DeepCopier};

/// Deep-copy `value` with default options.
pub fn deep_copy(registry: &TypeRegistry, value: &Value) -> CopyResult<Value> {
    DeepCopier::new(registry).copy(value)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this once at startup. Set `RUST_LOG` to control output:
/// - `RUST_LOG=replica_copy=debug`: one line per top-level copy
/// - `RUST_LOG=replica_copy=trace`: every object and registry hit
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
