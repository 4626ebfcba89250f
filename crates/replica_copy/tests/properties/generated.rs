//! Property tests over random graphs.
//!
//! Each generated graph is a set of objects whose children point at any
//! object in the set, the root included, so graphs freely mix shared
//! substructure and cycles. For every graph:
//!
//! 1. The copy is structurally equal to the source.
//! 2. No object of the copy is an object of the source.
//! 3. The copy has exactly as many objects as the source, and the engine
//!    created one copy per reachable source object.

#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use replica_copy::DeepCopier;
use replica_value::{structurally_equal, TypeDef, TypeId, TypeRegistry, Value, Visibility};

use crate::common::{assert_disjoint, obj, reachable};

// -- Graph Generation Strategies --

#[derive(Clone, Copy, Debug)]
enum Shape {
    List,
    Set,
    Map,
    Pair,
}

#[derive(Clone, Debug)]
struct NodePlan {
    shape: Shape,
    /// Child positions, taken modulo the node count.
    children: Vec<usize>,
    leaf: i32,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::List),
        Just(Shape::Set),
        Just(Shape::Map),
        Just(Shape::Pair),
    ]
}

fn node_strategy() -> impl Strategy<Value = NodePlan> {
    (
        shape_strategy(),
        prop::collection::vec(any::<usize>(), 0..4),
        any::<i32>(),
    )
        .prop_map(|(shape, children, leaf)| NodePlan {
            shape,
            children,
            leaf,
        })
}

fn graph_strategy() -> impl Strategy<Value = Vec<NodePlan>> {
    prop::collection::vec(node_strategy(), 1..24)
}

/// Registry with a two-slot record type for `Shape::Pair`.
fn pair_registry() -> (TypeRegistry, TypeId) {
    let mut registry = TypeRegistry::new();
    let pair = registry
        .define(
            TypeDef::new("Pair")
                .slot("left", Visibility::Private)
                .slot("right", Visibility::Protected),
        )
        .unwrap();
    (registry, pair)
}

/// Build the graph and return its root, node 0.
fn build(registry: &TypeRegistry, pair: TypeId, plans: &[NodePlan]) -> Value {
    let nodes: Vec<Value> = plans
        .iter()
        .map(|plan| match plan.shape {
            Shape::List => Value::list(vec![]),
            Shape::Set => Value::set([]),
            Shape::Map => Value::map([]),
            Shape::Pair => registry.new_record(pair, []).unwrap(),
        })
        .collect();

    for (plan, node) in plans.iter().zip(&nodes) {
        let children: Vec<Value> = plan
            .children
            .iter()
            .map(|i| nodes[i % nodes.len()].clone())
            .collect();
        let mut data = obj(node).write();
        match plan.shape {
            Shape::List | Shape::Set => {
                data.push(Value::Int(plan.leaf));
                for child in children {
                    data.push(child);
                }
            }
            Shape::Map => {
                data.insert(Value::from("leaf"), Value::Int(plan.leaf));
                for (key, child) in children.into_iter().enumerate() {
                    data.insert(Value::Long(i64::try_from(key).unwrap()), child);
                }
            }
            Shape::Pair => {
                let mut children = children.into_iter();
                data.set_slot(0, children.next().unwrap_or(Value::Int(plan.leaf)));
                data.set_slot(1, children.next().unwrap_or(Value::Null));
            }
        }
    }

    nodes[0].clone()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_copy_is_structurally_equal(plans in graph_strategy()) {
        let (registry, pair) = pair_registry();
        let source = build(&registry, pair, &plans);

        let copy = DeepCopier::new(&registry).copy(&source).unwrap();
        prop_assert!(structurally_equal(&copy, &source));
    }

    #[test]
    fn prop_copy_shares_no_objects(plans in graph_strategy()) {
        let (registry, pair) = pair_registry();
        let source = build(&registry, pair, &plans);

        let copy = DeepCopier::new(&registry).copy(&source).unwrap();
        assert_disjoint(&source, &copy);
    }

    #[test]
    fn prop_one_copy_per_reachable_object(plans in graph_strategy()) {
        let (registry, pair) = pair_registry();
        let source = build(&registry, pair, &plans);

        let (copy, report) = DeepCopier::new(&registry).copy_with_report(&source).unwrap();
        let source_count = reachable(&source).len();
        prop_assert_eq!(report.objects_created, source_count);
        prop_assert_eq!(reachable(&copy).len(), source_count);
        prop_assert!(report.deepest <= source_count);
    }
}
