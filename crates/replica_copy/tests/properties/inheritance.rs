//! Slots inherited across two ancestor levels.

use pretty_assertions::assert_eq;
use replica_copy::{deep_copy, FieldIntrospector};
use replica_value::{structurally_equal, Value};

use crate::common::{elements, world};

#[test]
fn every_level_of_the_chain_is_copied() {
    let w = world();
    let report = w.registry.new_record(w.employee, [("name", Value::from("Bo"))]).unwrap();
    let manager = w
        .registry
        .new_record(
            w.manager,
            [
                ("name", Value::from("Cy")),
                ("employer", Value::from("Acme")),
                ("age", Value::Int(51)),
                ("reports", Value::list(vec![report.clone()])),
            ],
        )
        .unwrap();

    let copy = deep_copy(&w.registry, &manager).unwrap();
    assert_eq!(copy.obj_type(), Some(w.manager));
    assert!(structurally_equal(&copy, &manager));

    assert_eq!(w.get(&copy, "employer").as_str(), Some("Acme"));
    assert_eq!(w.get(&copy, "age").as_long(), Some(51));
    let reports = elements(&w.get(&copy, "reports"));
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].is_same(&report));
    assert_eq!(w.get(&reports[0], "name").as_str(), Some("Bo"));
}

#[test]
fn shadowed_slots_are_both_copied() {
    let w = world();
    let manager = w
        .registry
        .new_record(w.manager, [("name", Value::from("derived"))])
        .unwrap();
    // The ancestor's `name` sits after the manager's and employee's own slots.
    let person_name = w.registry.slot_index(w.person, "name").unwrap()
        + w.registry.get(w.manager).unwrap().layout_len()
        - w.registry.get(w.person).unwrap().layout_len();
    assert!(obj_set(&manager, person_name, Value::from("ancestral")));

    let copy = deep_copy(&w.registry, &manager).unwrap();
    assert_eq!(w.get(&copy, "name").as_str(), Some("derived"));
    assert_eq!(w.get_at(&copy, person_name).as_str(), Some("ancestral"));
}

#[test]
fn introspector_walks_to_the_root() {
    let w = world();
    let fields = FieldIntrospector::new(&w.registry);
    let names: Vec<_> = fields
        .slots_of(w.manager)
        .iter()
        .map(|slot| (slot.name().to_string(), slot.declared_in()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("name".to_string(), w.manager),
            ("reports".to_string(), w.manager),
            ("employer".to_string(), w.employee),
            ("name".to_string(), w.person),
            ("age".to_string(), w.person),
        ]
    );
}

fn obj_set(value: &Value, index: usize, to: Value) -> bool {
    crate::common::obj(value).write().set_slot(index, to)
}
