//! A map from unique keys to values, with two interchangeable backings.
//!
//! [`Map`] is the contract: `add`, `remove`, `remove_any`, `value`,
//! `has_key` and `size`, plus secondary operations derived from them.
//! [`HashMap`] backs it with a hash table, [`TreeMap`] with an AVL tree.
//! Maps compare equal when they hold the same entries, so the two backings
//! can be checked against each other.
//!
//! ```
//! use keymap::{HashMap, Map};
//!
//! let mut m: HashMap<String, String> = HashMap::new();
//! m.add("red".to_string(), "one".to_string());
//! m.add("green".to_string(), "two".to_string());
//!
//! let pair = m.remove("green");
//! assert_eq!("two", pair.value());
//! assert!(!m.has_key("green"));
//! assert_eq!(1, m.size());
//! ```

mod error;
pub mod hash;
mod kernel;
mod pair;
mod ser;
pub mod tree;

pub use error::Error;
pub use hash::{DefaultHashBuilder, HashMap};
pub use kernel::Map;
pub use pair::Pair;
pub use tree::TreeMap;
