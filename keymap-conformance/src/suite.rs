//! The kernel fixture: every case builds the map under test and a
//! [`Reference`](crate::Reference) from the same arguments, calls the method
//! under test on the former only, and then compares the two.
//!
//! ```ignore
//! keymap_conformance::kernel_suite!(hash_map, keymap::HashMap<String, String>);
//! ```

use keymap::Map;

/// Builds a map from alternating keys and values.
///
/// # Panics
///
/// Panics if `args` has odd length or repeats a key.
#[track_caller]
pub fn from_args<M: Map<String, String>>(args: &[&str]) -> M {
    assert!(args.len() % 2 == 0, "from_args: args.len() must be even");

    let mut map = M::new();
    for pair in args.chunks(2) {
        assert!(!map.has_key(pair[0]), "from_args: keys in args must be unique");
        map.add(pair[0].to_string(), pair[1].to_string());
    }
    map
}

/// Asserts two maps hold the same entries, printing both when they don't.
#[macro_export]
macro_rules! assert_same {
    ($expected:expr, $actual:expr $(,)?) => {{
        let (expected, actual) = (&$expected, &$actual);
        if !$crate::keymap::Map::equals(actual, expected) {
            panic!(
                "maps differ\n  expected: {}\n    actual: {}",
                $crate::session::describe(expected),
                $crate::session::describe(actual),
            );
        }
    }};
}

/// Generates the kernel test cases for a `Map<String, String>` type.
#[macro_export]
macro_rules! kernel_suite {
    ($name:ident, $map:ty) => {
        mod $name {
            #[allow(unused_imports)]
            use super::*;

            use $crate::keymap::{Error, Map};
            use $crate::suite::from_args;

            type Test = $map;
            type Ref = $crate::Reference<String, String>;

            #[test]
            fn constructor_no_args() {
                let m: Test = from_args(&[]);
                let expected: Ref = from_args(&[]);

                $crate::assert_same!(expected, m);
                assert_eq!(0, m.size());
            }

            #[test]
            fn constructor() {
                let m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                $crate::assert_same!(expected, m);
            }

            #[test]
            fn add_empty() {
                let mut m: Test = from_args(&[]);
                let expected: Ref = from_args(&["blue", "three"]);

                m.add("blue".to_string(), "three".to_string());

                $crate::assert_same!(expected, m);
            }

            #[test]
            fn add() {
                let mut m: Test = from_args(&["red", "one", "green", "two"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                m.add("blue".to_string(), "three".to_string());

                $crate::assert_same!(expected, m);
                assert_eq!("three", m.value("blue"));
            }

            #[test]
            fn remove_leaving_empty() {
                let mut m: Test = from_args(&["blue", "three"]);
                let expected: Ref = from_args(&[]);

                let x = m.remove("blue");

                assert_eq!("blue", x.key());
                assert_eq!("three", x.value());
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn remove() {
                let mut m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "blue", "three"]);

                let x = m.remove("green");

                assert_eq!("green", x.key());
                assert_eq!("two", x.value());
                assert!(!m.has_key("green"));
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn remove_any_leaving_empty() {
                let mut m: Test = from_args(&["red", "one"]);
                let mut expected: Ref = from_args(&["red", "one"]);

                let x = m.remove_any();

                assert!(expected.has_key(x.key()));
                let y = expected.remove(x.key());
                assert_eq!(y, x);
                $crate::assert_same!(expected, m);
                assert_eq!(0, m.size());
            }

            #[test]
            fn remove_any() {
                let mut m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let mut expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                let x = m.remove_any();

                assert!(expected.has_key(x.key()));
                let y = expected.remove(x.key());
                assert_eq!(y, x);
                assert!(!m.has_key(x.key()));
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn value() {
                let m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                let x = m.value("green");

                assert_eq!("two", x);
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn has_key_true() {
                let m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                assert!(m.has_key("green"));
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn has_key_false() {
                let m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                assert!(!m.has_key("scarlet"));
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn has_key_empty() {
                let m: Test = from_args(&[]);
                let expected: Ref = from_args(&[]);

                assert!(!m.has_key("scarlet"));
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn size_empty() {
                let m: Test = from_args(&[]);
                let expected: Ref = from_args(&[]);

                assert_eq!(0, m.size());
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn size() {
                let m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let expected: Ref = from_args(&["red", "one", "green", "two", "blue", "three"]);

                assert_eq!(3, m.size());
                $crate::assert_same!(expected, m);
            }

            #[test]
            fn equality_ignores_insertion_order() {
                let forward: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                let backward: Test = from_args(&["blue", "three", "green", "two", "red", "one"]);

                assert!(forward.equals(&backward));
                assert!(backward.equals(&forward));
                assert!(forward.equals(&forward));

                let other: Test = from_args(&["red", "one", "green", "two", "blue", "four"]);
                assert!(!forward.equals(&other));
            }

            #[test]
            fn size_matches_membership() {
                let mut m: Test = from_args(&["red", "one", "green", "two", "blue", "three"]);
                m.remove("red");
                m.add("scarlet".to_string(), "four".to_string());

                let candidates = ["red", "green", "blue", "scarlet", "azure"];
                let present = candidates.iter().filter(|k| m.has_key(**k)).count();
                assert_eq!(m.size(), present);
            }

            #[test]
            fn violations_are_reported_and_leave_map_unchanged() {
                let mut m: Test = from_args(&["red", "one", "green", "two"]);
                let expected: Ref = from_args(&["red", "one", "green", "two"]);

                assert_eq!(
                    Err(Error::DuplicateKey),
                    m.try_add("red".to_string(), "uno".to_string())
                );
                assert_eq!(Err(Error::MissingKey), m.try_remove("blue").map(|_| ()));
                assert_eq!(Err(Error::MissingKey), m.try_value("blue").map(|_| ()));
                $crate::assert_same!(expected, m);

                let mut empty: Test = from_args(&[]);
                assert_eq!(Err(Error::Empty), empty.try_remove_any().map(|_| ()));
            }

            #[test]
            #[should_panic(expected = "duplicate key")]
            fn add_duplicate_panics() {
                let mut m: Test = from_args(&["red", "one"]);
                m.add("red".to_string(), "uno".to_string());
            }

            #[test]
            #[should_panic(expected = "missing key")]
            fn remove_missing_panics() {
                let mut m: Test = from_args(&["red", "one"]);
                m.remove("scarlet");
            }

            #[test]
            #[should_panic(expected = "missing key")]
            fn value_missing_panics() {
                let m: Test = from_args(&["red", "one"]);
                m.value("scarlet");
            }

            #[test]
            #[should_panic(expected = "empty map")]
            fn remove_any_empty_panics() {
                let mut m: Test = from_args(&[]);
                m.remove_any();
            }
        }
    };
}
