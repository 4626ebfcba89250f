//! Shared fixtures for copy property tests.

use replica_value::{
    ObjId, ObjRef, ObjectData, SlotRead, TypeDef, TypeId, TypeRegistry, Value, Visibility,
};
use rustc_hash::FxHashSet;

/// A registry with the record types the property tests share.
pub struct World {
    pub registry: TypeRegistry,
    /// `label`, `next`.
    pub node: TypeId,
    /// `name`, `age`.
    pub person: TypeId,
    /// `Person` plus `employer`.
    pub employee: TypeId,
    /// `Employee` plus `reports`, and its own `name`.
    pub manager: TypeId,
    /// `name`, `tags`, `self`.
    pub doc: TypeId,
}

pub fn world() -> World {
    let mut registry = TypeRegistry::new();
    let node = registry
        .define(
            TypeDef::new("Node")
                .slot("label", Visibility::Public)
                .slot("next", Visibility::Private),
        )
        .unwrap();
    let person = registry
        .define(
            TypeDef::new("Person")
                .slot("name", Visibility::Private)
                .slot_with_default("age", Visibility::Protected, Value::Int(0)),
        )
        .unwrap();
    let employee = registry
        .define(
            TypeDef::new("Employee")
                .extends(person)
                .slot("employer", Visibility::Private),
        )
        .unwrap();
    let manager = registry
        .define(
            TypeDef::new("Manager")
                .extends(employee)
                .slot("name", Visibility::Private)
                .slot("reports", Visibility::Private),
        )
        .unwrap();
    let doc = registry
        .define(
            TypeDef::new("Doc")
                .slot("name", Visibility::Private)
                .slot("tags", Visibility::Private)
                .slot("self", Visibility::Private),
        )
        .unwrap();
    World {
        registry,
        node,
        person,
        employee,
        manager,
        doc,
    }
}

impl World {
    /// Read the most-derived slot called `name`.
    pub fn get(&self, value: &Value, name: &str) -> Value {
        let obj = obj(value);
        let index = self.registry.slot_index(obj.type_id(), name).unwrap();
        self.get_at(value, index)
    }

    /// Read a slot by layout index.
    pub fn get_at(&self, value: &Value, index: usize) -> Value {
        match obj(value).read().slot(index) {
            SlotRead::Value(v) => v.clone(),
            other => panic!("slot {index} is {other:?}"),
        }
    }

    pub fn set(&self, value: &Value, name: &str, to: Value) {
        let obj = obj(value);
        let index = self.registry.slot_index(obj.type_id(), name).unwrap();
        assert!(obj.write().set_slot(index, to));
    }

    pub fn node(&self, label: &str) -> Value {
        self.registry
            .new_record(self.node, [("label", Value::from(label))])
            .unwrap()
    }

    /// `len` nodes, each pointing at the next; the last points at null.
    pub fn chain(&self, len: usize) -> Value {
        let mut head = Value::Null;
        for i in (0..len).rev() {
            head = self
                .registry
                .new_record(
                    self.node,
                    [("label", Value::Long(i64::try_from(i).unwrap())), ("next", head)],
                )
                .unwrap();
        }
        head
    }
}

pub fn obj(value: &Value) -> &ObjRef {
    value.as_obj().expect("expected a heap object")
}

pub fn elements(value: &Value) -> Vec<Value> {
    obj(value).read().elements().unwrap().to_vec()
}

pub fn entries(value: &Value) -> Vec<(Value, Value)> {
    obj(value).read().entries().unwrap().to_vec()
}

/// Every object reachable from `root`, each once, without recursion.
pub fn reachable(root: &Value) -> Vec<ObjRef> {
    let mut seen = FxHashSet::default();
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(value) = stack.pop() {
        let Value::Obj(obj) = value else { continue };
        if !seen.insert(obj.id()) {
            continue;
        }
        {
            let data = obj.read();
            match &*data {
                ObjectData::Record(slots) => stack.extend(slots.iter().flatten().cloned()),
                ObjectData::Map(map) => {
                    for (key, value) in map.iter() {
                        stack.push(key.clone());
                        stack.push(value.clone());
                    }
                }
                other => stack.extend(other.elements().unwrap_or_default().iter().cloned()),
            }
        }
        found.push(obj);
    }
    found
}

pub fn identities(root: &Value) -> FxHashSet<ObjId> {
    reachable(root).iter().map(ObjRef::id).collect()
}

/// Check that no object reachable from `copy` is reachable from `source`.
pub fn assert_disjoint(source: &Value, copy: &Value) {
    let source_ids = identities(source);
    for obj in reachable(copy) {
        assert!(
            !source_ids.contains(&obj.id()),
            "copy shares object {obj:?} with source"
        );
    }
}
