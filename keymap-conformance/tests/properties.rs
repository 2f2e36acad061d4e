use keymap::{HashMap, Map, TreeMap};
use keymap_conformance::{strategy, Op, Reference, Session};

use proptest::prelude::*;
use proptest::sample::Index;

type Entries = Vec<(String, u32)>;

fn build<M: Map<String, u32>>(entries: &[(String, u32)]) -> M {
    let mut m = M::new();
    for (k, v) in entries {
        m.add(k.clone(), *v);
    }
    m
}

fn fresh_is_empty<M: Map<String, u32>>(key: &str) -> Result<(), TestCaseError> {
    let m = M::new();
    prop_assert_eq!(0, m.size());
    prop_assert!(!m.has_key(key));
    Ok(())
}

fn add_extends<M: Map<String, u32>>(entries: &Entries, value: u32) -> Result<(), TestCaseError> {
    let mut m: M = build(entries);
    let before = m.size();

    // Keys from the strategy all look like "k<n>".
    m.add("fresh".to_string(), value);

    prop_assert!(m.has_key("fresh"));
    prop_assert_eq!(&value, m.value("fresh"));
    prop_assert_eq!(before + 1, m.size());
    Ok(())
}

fn remove_returns_entry<M: Map<String, u32>>(
    entries: &Entries,
    index: Index,
) -> Result<(), TestCaseError> {
    let mut m: M = build(entries);
    let (key, value) = index.get(entries);

    let x = m.remove(key.as_str());

    prop_assert!(!m.has_key(key.as_str()));
    prop_assert_eq!(entries.len() - 1, m.size());
    prop_assert_eq!(key, x.key());
    prop_assert_eq!(value, x.value());
    Ok(())
}

fn remove_any_takes_member<M: Map<String, u32>>(entries: &Entries) -> Result<(), TestCaseError> {
    let mut m: M = build(entries);
    let x = m.remove_any();

    prop_assert!(entries
        .iter()
        .any(|(k, v)| k == x.key() && v == x.value()));
    prop_assert_eq!(entries.len() - 1, m.size());
    prop_assert!(!m.has_key(x.key()));
    Ok(())
}

fn size_counts_members<M: Map<String, u32>>(
    space: u8,
    ops: &[Op<String, u32>],
) -> Result<(), TestCaseError> {
    let mut m = M::new();
    for op in ops {
        // Refused ops are fine here; only the bookkeeping matters.
        let _ = match op {
            Op::Add(k, v) => m.try_add(k.clone(), *v),
            Op::Remove(k) => m.try_remove(k).map(|_| ()),
            Op::RemoveAny => m.try_remove_any().map(|_| ()),
            _ => Ok(()),
        };

        let present = (0..space)
            .filter(|n| m.has_key(format!("k{}", n).as_str()))
            .count();
        prop_assert_eq!(m.size(), present);
    }
    Ok(())
}

fn session_agrees<M: Map<String, u32>>(ops: &[Op<String, u32>]) -> Result<(), TestCaseError> {
    let mut session = Session::new(M::new(), Reference::new());
    for op in ops {
        if let Err(divergence) = session.apply(op) {
            return Err(TestCaseError::fail(divergence.to_string()));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn fresh_maps_are_empty(key in strategy::key(16)) {
        fresh_is_empty::<HashMap<String, u32>>(&key)?;
        fresh_is_empty::<TreeMap<String, u32>>(&key)?;
    }

    #[test]
    fn add_increases_size_and_membership(
        entries in strategy::entries(8, 8),
        value in any::<u32>(),
    ) {
        add_extends::<HashMap<String, u32>>(&entries, value)?;
        add_extends::<TreeMap<String, u32>>(&entries, value)?;
    }

    #[test]
    fn remove_returns_removed_pair(entries in strategy::entries(8, 8), index in any::<Index>()) {
        prop_assume!(!entries.is_empty());
        remove_returns_entry::<HashMap<String, u32>>(&entries, index.clone())?;
        remove_returns_entry::<TreeMap<String, u32>>(&entries, index)?;
    }

    #[test]
    fn remove_any_picks_existing_member(entries in strategy::entries(8, 8)) {
        prop_assume!(!entries.is_empty());
        remove_any_takes_member::<HashMap<String, u32>>(&entries)?;
        remove_any_takes_member::<TreeMap<String, u32>>(&entries)?;
    }

    #[test]
    fn size_matches_membership(ops in strategy::ops(6, 48)) {
        size_counts_members::<HashMap<String, u32>>(6, &ops)?;
        size_counts_members::<TreeMap<String, u32>>(6, &ops)?;
    }

    #[test]
    fn equality_ignores_insertion_order(entries in strategy::entries(8, 8)) {
        let reversed: Entries = entries.iter().rev().cloned().collect();

        let hash_forward: HashMap<String, u32> = build(&entries);
        let hash_reversed: HashMap<String, u32> = build(&reversed);
        let tree_reversed: TreeMap<String, u32> = build(&reversed);

        prop_assert!(hash_forward.equals(&hash_reversed));
        prop_assert!(hash_reversed.equals(&tree_reversed));
        prop_assert!(tree_reversed.equals(&hash_forward));
        prop_assert_eq!(hash_forward, hash_reversed);
    }

    #[test]
    fn sessions_never_diverge(ops in strategy::ops(8, 64)) {
        session_agrees::<HashMap<String, u32>>(&ops)?;
        session_agrees::<TreeMap<String, u32>>(&ops)?;
    }
}
