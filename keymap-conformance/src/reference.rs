use std::borrow::Borrow;
use std::collections::btree_map::{self, BTreeMap, Entry};
use std::hash::Hash;

use keymap::{Error, Map, Pair};

/// The trusted oracle: a thin [`Map`] over the standard library's
/// `BTreeMap`. `remove_any` takes the smallest key.
#[derive(Clone, PartialEq, Eq)]
pub struct Reference<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K, V> Reference<K, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K, V> Default for Reference<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Reference<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.entries, f)
    }
}

impl<K: Ord, V> Map<K, V> for Reference<K, V> {
    type Iter<'a> = btree_map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn new() -> Self {
        Reference::new()
    }

    fn try_add(&mut self, key: K, value: V) -> Result<(), Error> {
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(Error::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        self.entries
            .remove_entry(key)
            .map(Pair::from)
            .ok_or(Error::MissingKey)
    }

    fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error> {
        self.entries.pop_first().map(Pair::from).ok_or(Error::Empty)
    }

    fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        self.entries.get(key).ok_or(Error::MissingKey)
    }

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        self.entries.contains_key(key)
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.entries.iter()
    }
}
