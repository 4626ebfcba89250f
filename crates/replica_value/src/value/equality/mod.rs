//! Structural equality over possibly cyclic value graphs.
//!
//! Two graphs are structurally equal when they have the same runtime types
//! and the same contents at every depth, ignoring identity. Comparison is
//! coinductive: a pair of objects already under comparison is assumed
//! equal, so cycles terminate and two cycles of the same shape compare
//! equal.

use rustc_hash::FxHashSet;

use super::{ObjId, ObjRef, ObjectData, Value, ValueKey};

/// Check deep equality of two values, ignoring object identity.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    Equivalence::default().values(a, b)
}

#[derive(Default)]
struct Equivalence {
    assumed: FxHashSet<(ObjId, ObjId)>,
}

impl Equivalence {
    fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Obj(x), Value::Obj(y)) => self.objects(x, y),
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Handle(x), Value::Handle(y)) => x.ptr_eq(y),
            _ => ValueKey::of(a) == ValueKey::of(b),
        }
    }

    fn objects(&mut self, x: &ObjRef, y: &ObjRef) -> bool {
        if x.type_id() != y.type_id() {
            return false;
        }
        if !self.assumed.insert((x.id(), y.id())) {
            return true;
        }

        // Snapshot so no lock is held while recursing.
        let left = x.read().clone();
        let right = y.read().clone();

        match (&left, &right) {
            (ObjectData::Record(l), ObjectData::Record(r)) => {
                l.len() == r.len()
                    && l.iter().zip(r).all(|pair| match pair {
                        (Some(lv), Some(rv)) => self.values(lv, rv),
                        (None, None) => true,
                        _ => false,
                    })
            }
            (ObjectData::Array(l), ObjectData::Array(r))
            | (ObjectData::List(l), ObjectData::List(r)) => self.sequences(l, r),
            (ObjectData::Set(l), ObjectData::Set(r)) => self.sequences(l.as_slice(), r.as_slice()),
            (ObjectData::Map(l), ObjectData::Map(r)) => {
                l.len() == r.len()
                    && l
                        .iter()
                        .zip(r.iter())
                        .all(|((lk, lv), (rk, rv))| self.values(lk, rk) && self.values(lv, rv))
            }
            _ => false,
        }
    }

    fn sequences(&mut self, l: &[Value], r: &[Value]) -> bool {
        l.len() == r.len() && l.iter().zip(r).all(|(a, b)| self.values(a, b))
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
