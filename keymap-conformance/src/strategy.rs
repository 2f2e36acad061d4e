//! proptest strategies over a small key space, so generated ops keep
//! running into each other: repeated adds, removals of present keys and
//! lookups of absent ones.
//!
//! Every strategy panics when generating values if `space` is zero.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

use crate::Op;

pub fn key(space: u8) -> impl Strategy<Value = String> {
    (0..space).prop_map(|n| format!("k{}", n))
}

pub fn op(space: u8) -> impl Strategy<Value = Op<String, u32>> {
    prop_oneof![
        4 => (key(space), any::<u32>()).prop_map(|(k, v)| Op::Add(k, v)),
        2 => key(space).prop_map(Op::Remove),
        2 => Just(Op::RemoveAny),
        1 => key(space).prop_map(Op::Value),
        1 => key(space).prop_map(Op::HasKey),
        1 => Just(Op::Size),
    ]
}

pub fn ops(space: u8, max_len: usize) -> impl Strategy<Value = Vec<Op<String, u32>>> {
    vec(op(space), 0..=max_len)
}

/// Entries with pairwise distinct keys, in ascending key order.
pub fn entries(space: u8, max_len: usize) -> impl Strategy<Value = Vec<(String, u32)>> {
    btree_map(key(space), any::<u32>(), 0..=max_len).prop_map(|m| m.into_iter().collect())
}
