//! Copies of one source taken from several threads at once.

use std::thread;

use replica_copy::{deep_copy, init_tracing};
use replica_value::{structurally_equal, Value};

use crate::common::{assert_disjoint, elements, world};

#[test]
fn threads_copy_one_source_independently() {
    init_tracing();
    let w = world();
    let shared = w.node("shared");
    w.set(&shared, "next", shared.clone());
    let source = Value::list(vec![shared.clone(), Value::map([(Value::Int(1), shared)])]);

    let copies: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| deep_copy(&w.registry, &source).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for copy in &copies {
        assert!(structurally_equal(copy, &source));
        assert_disjoint(&source, copy);
    }
    for (i, a) in copies.iter().enumerate() {
        for b in &copies[i + 1..] {
            assert_disjoint(a, b);
        }
    }
}

#[test]
fn copy_mutated_on_another_thread_leaves_source_alone() {
    let w = world();
    let source = Value::list(vec![Value::from("a")]);
    let copy = deep_copy(&w.registry, &source).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            crate::common::obj(&copy).write().push(Value::from("b"));
        });
    });

    assert_eq!(elements(&source).len(), 1);
    assert_eq!(elements(&copy).len(), 2);
}
