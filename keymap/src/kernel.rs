use std::borrow::Borrow;
use std::hash::Hash;

use crate::error::violation;
use crate::{Error, Pair};

/// A finite set of associations from unique keys to values.
///
/// Backings implement the `try_` kernel operations, which report a violated
/// precondition as an [`Error`] and leave the map untouched. The plain forms
/// (`add`, `remove`, `remove_any`, `value`) treat the violation as a bug at
/// the call site and panic with the error message.
///
/// Key lookups take any borrowed form of the key, so a `Map<String, _>` can
/// be queried with `&str`.
pub trait Map<K, V>: Sized {
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Creates an empty map.
    fn new() -> Self;

    /// Inserts `key` with `value`. Fails with [`Error::DuplicateKey`] if the
    /// key is already present.
    fn try_add(&mut self, key: K, value: V) -> Result<(), Error>;

    /// Removes the entry for `key` and hands it back.
    fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord;

    /// Removes some entry. Which one is left to the backing.
    fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error>;

    fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord;

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord;

    fn size(&self) -> usize;

    /// Iterates over the entries in an order chosen by the backing.
    fn iter(&self) -> Self::Iter<'_>;

    /// # Panics
    ///
    /// Panics if `key` is already present.
    #[track_caller]
    fn add(&mut self, key: K, value: V) {
        if let Err(e) = self.try_add(key, value) {
            violation(e)
        }
    }

    /// # Panics
    ///
    /// Panics if `key` is not present.
    #[track_caller]
    fn remove<Q>(&mut self, key: &Q) -> Pair<K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        match self.try_remove(key) {
            Ok(pair) => pair,
            Err(e) => violation(e),
        }
    }

    /// # Panics
    ///
    /// Panics if the map is empty.
    #[track_caller]
    fn remove_any(&mut self) -> Pair<K, V> {
        match self.try_remove_any() {
            Ok(pair) => pair,
            Err(e) => violation(e),
        }
    }

    /// # Panics
    ///
    /// Panics if `key` is not present.
    #[track_caller]
    fn value<Q>(&self, key: &Q) -> &V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        match self.try_value(key) {
            Ok(value) => value,
            Err(e) => violation(e),
        }
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Structural equality: both maps hold exactly the same entries,
    /// whatever their backings or internal layout.
    fn equals<M>(&self, other: &M) -> bool
    where
        M: Map<K, V>,
        K: Hash + Ord,
        V: PartialEq,
    {
        self.size() == other.size()
            && self
                .iter()
                .all(|(k, v)| other.try_value(k).map_or(false, |w| w == v))
    }

    /// Replaces the value for `key`, returning the old one.
    fn try_replace_value(&mut self, key: K, value: V) -> Result<V, Error>
    where
        K: Hash + Ord,
    {
        let (_, old) = self.try_remove(&key)?.into_parts();
        self.try_add(key, value)?;
        Ok(old)
    }

    /// # Panics
    ///
    /// Panics if `key` is not present.
    #[track_caller]
    fn replace_value(&mut self, key: K, value: V) -> V
    where
        K: Hash + Ord,
    {
        match self.try_replace_value(key, value) {
            Ok(old) => old,
            Err(e) => violation(e),
        }
    }

    /// Finds some key associated with `value`.
    fn try_key<'a>(&'a self, value: &V) -> Result<&'a K, Error>
    where
        K: 'a,
        V: PartialEq + 'a,
    {
        self.iter()
            .find(|(_, v)| *v == value)
            .map(|(k, _)| k)
            .ok_or(Error::MissingValue)
    }

    /// # Panics
    ///
    /// Panics if no entry has `value`.
    #[track_caller]
    fn key<'a>(&'a self, value: &V) -> &'a K
    where
        K: 'a,
        V: PartialEq + 'a,
    {
        match self.try_key(value) {
            Ok(key) => key,
            Err(e) => violation(e),
        }
    }

    fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    fn shares_key_with<M>(&self, other: &M) -> bool
    where
        M: Map<K, V>,
        K: Hash + Ord,
    {
        self.iter().any(|(k, _)| other.has_key(k))
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    /// Moves every entry of `source` into `self`, dropping whatever `self`
    /// held before. `source` is left empty.
    fn transfer_from(&mut self, source: &mut Self) {
        *self = std::mem::replace(source, Self::new());
    }
}
