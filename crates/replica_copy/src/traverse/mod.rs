//! The recursive copy driver.
//!
//! # Algorithm
//!
//! For each value reached:
//!
//! 1. Terminals (null included) are returned as they are.
//! 2. An object already copied in this call returns its registered copy.
//! 3. Otherwise the factory creates a blank instance of the same runtime
//!    type, which is registered *before* it is populated. A cycle back to
//!    the object is then answered from the registry, so traversal
//!    terminates and the copy's cycle closes on the copy itself.
//! 4. The copy is populated by category: arrays index by index, sequences
//!    and associative containers in iteration order, records slot by slot.
//!
//! No lock is held across recursion. Each step snapshots the children it
//! needs under a short read lock, then releases it before descending.

use replica_stack::maybe_grow_stack;
use replica_value::{ObjRef, StorageKind, TypeRegistry, Value};
use tracing::{debug, trace};

use crate::classify::{Category, Classifier};
use crate::errors::{AccessFailure, CopyError, CopyResult, CONTENTS};
use crate::factory::InstanceFactory;
use crate::identity::IdentityRegistry;
use crate::introspect::FieldIntrospector;
use crate::options::CopyOptions;

/// Counters from one top-level copy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Distinct source objects copied.
    pub objects_created: usize,
    /// Encounters answered from the identity registry.
    pub registry_hits: usize,
    /// Deepest object nesting reached; the root object is level 1.
    pub deepest: usize,
}

/// Deep-copy entry point bound to a type registry.
///
/// ```text
/// let copier = DeepCopier::new(&registry);
/// let copy = copier.copy(&value)?;
/// ```
pub struct DeepCopier<'r> {
    registry: &'r TypeRegistry,
    options: CopyOptions,
}

impl<'r> DeepCopier<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_options(registry, CopyOptions::default())
    }

    pub fn with_options(registry: &'r TypeRegistry, options: CopyOptions) -> Self {
        DeepCopier { registry, options }
    }

    pub fn options(&self) -> CopyOptions {
        self.options
    }

    /// Copy `value`, sharing no mutable storage with it.
    pub fn copy(&self, value: &Value) -> CopyResult<Value> {
        self.copy_with_report(value).map(|(copy, _)| copy)
    }

    /// Like [`copy`](Self::copy), also returning what the call did.
    #[tracing::instrument(level = "debug", skip_all, fields(
        root = value.type_name(self.registry),
    ))]
    pub fn copy_with_report(&self, value: &Value) -> CopyResult<(Value, CopyReport)> {
        let mut ctx = CopyContext::new(self.registry, self.options);
        let copy = ctx.copy_value(value)?;
        let report = ctx.report();
        debug!(
            objects = report.objects_created,
            hits = report.registry_hits,
            deepest = report.deepest,
            "copy complete"
        );
        Ok((copy, report))
    }
}

/// State for one top-level call. Dropped when the call returns.
struct CopyContext<'r> {
    registry: &'r TypeRegistry,
    options: CopyOptions,
    identities: IdentityRegistry,
    classifier: Classifier<'r>,
    factory: InstanceFactory<'r>,
    fields: FieldIntrospector<'r>,
    depth: usize,
    deepest: usize,
}

impl<'r> CopyContext<'r> {
    fn new(registry: &'r TypeRegistry, options: CopyOptions) -> Self {
        CopyContext {
            registry,
            options,
            identities: IdentityRegistry::new(),
            classifier: Classifier::new(registry),
            factory: InstanceFactory::new(registry),
            fields: FieldIntrospector::new(registry),
            depth: 0,
            deepest: 0,
        }
    }

    fn report(&self) -> CopyReport {
        CopyReport {
            objects_created: self.identities.len(),
            registry_hits: self.identities.hits(),
            deepest: self.deepest,
        }
    }

    fn copy_value(&mut self, value: &Value) -> CopyResult<Value> {
        let category = self.classifier.classify(value);
        let source = match value {
            Value::Obj(obj) if category != Category::Terminal => obj,
            _ => return Ok(value.clone()),
        };

        if let Some(copy) = self.identities.lookup(source) {
            trace!(id = ?source.id(), "registry hit");
            return Ok(Value::Obj(copy));
        }

        if let Some(limit) = self.options.max_depth {
            if self.depth >= limit {
                return Err(CopyError::DepthExceeded {
                    type_name: self.type_name(source),
                    limit,
                });
            }
        }

        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        let grow = self.options.grow_stack;
        let result = maybe_grow_stack(grow, || self.copy_object(source, category));
        self.depth -= 1;
        result.map(Value::Obj)
    }

    fn copy_object(&mut self, source: &ObjRef, category: Category) -> CopyResult<ObjRef> {
        let ty = source.type_id();
        let extent = source
            .try_read()
            .map(|data| data.extent())
            .ok_or_else(|| self.contents_error(source, AccessFailure::Locked))?;

        let copy = self.factory.create(ty, extent)?;
        self.identities.register(source, copy.clone());
        trace!(
            type_name = self.registry.name_of(ty),
            ?category,
            extent,
            "copying object"
        );

        match category {
            Category::Array => self.populate_array(source, &copy)?,
            Category::Sequence => self.populate_sequence(source, &copy)?,
            Category::Associative => self.populate_associative(source, &copy)?,
            Category::Composite => self.populate_record(source, &copy)?,
            // `copy_value` returns terminals before any object is created.
            Category::Terminal => unreachable!("terminal value reached copy_object"),
        }
        Ok(copy)
    }

    fn populate_array(&mut self, source: &ObjRef, copy: &ObjRef) -> CopyResult<()> {
        let items = self.snapshot_elements(source)?;
        for (index, item) in items.iter().enumerate() {
            let item = self.copy_value(item)?;
            if !copy.write().set_element(index, item) {
                return Err(self.contents_error(copy, AccessFailure::LayoutMismatch));
            }
        }
        Ok(())
    }

    fn populate_sequence(&mut self, source: &ObjRef, copy: &ObjRef) -> CopyResult<()> {
        let items = self.snapshot_elements(source)?;
        for item in &items {
            let item = self.copy_value(item)?;
            let mut data = copy.write();
            // A set refuses an element it already holds; that is its own dedupe.
            if !data.push(item) && data.kind() != StorageKind::Set {
                return Err(self.contents_error(copy, AccessFailure::LayoutMismatch));
            }
        }
        Ok(())
    }

    fn populate_associative(&mut self, source: &ObjRef, copy: &ObjRef) -> CopyResult<()> {
        let entries = source
            .try_read()
            .ok_or_else(|| self.contents_error(source, AccessFailure::Locked))?
            .entries()
            .map(<[_]>::to_vec)
            .ok_or_else(|| self.contents_error(source, AccessFailure::LayoutMismatch))?;
        for (key, value) in &entries {
            let key = self.copy_value(key)?;
            let value = self.copy_value(value)?;
            if !copy.write().insert(key, value) {
                return Err(self.contents_error(copy, AccessFailure::LayoutMismatch));
            }
        }
        Ok(())
    }

    fn populate_record(&mut self, source: &ObjRef, copy: &ObjRef) -> CopyResult<()> {
        let slots = self.fields.slots_of(source.type_id());
        for slot in slots.iter() {
            let value = slot.get(source)?;
            let value = self.copy_value(&value)?;
            slot.set(copy, value)?;
        }
        Ok(())
    }

    fn snapshot_elements(&self, source: &ObjRef) -> CopyResult<Vec<Value>> {
        source
            .try_read()
            .ok_or_else(|| self.contents_error(source, AccessFailure::Locked))?
            .elements()
            .map(<[_]>::to_vec)
            .ok_or_else(|| self.contents_error(source, AccessFailure::LayoutMismatch))
    }

    fn contents_error(&self, obj: &ObjRef, reason: AccessFailure) -> CopyError {
        CopyError::access(self.type_name(obj), CONTENTS, reason)
    }

    fn type_name(&self, obj: &ObjRef) -> String {
        self.registry.name_of(obj.type_id()).to_string()
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
