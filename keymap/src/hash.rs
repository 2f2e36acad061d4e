use std::borrow::Borrow;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use twox_hash::XxHash64;

use crate::error::violation;
use crate::{Error, Map, Pair};

/// Deterministic default hasher, so two runs lay out the same table.
pub type DefaultHashBuilder = BuildHasherDefault<XxHash64>;

const MIN_SLOTS: usize = 8;

#[derive(Clone)]
struct Bucket<K, V> {
    hash: u64,
    key: K,
    value: V,
}

/// Hash table backed [`Map`].
///
/// Entries live densely in insertion order until something is removed.
/// Each slot lists the indices of the entries whose hash lands there, so
/// removal swaps the last entry into the hole and fixes up one index.
/// `remove_any` takes the last entry and never scans.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    entries: Vec<Bucket<K, V>>,
    // Empty until the first insert, otherwise a power of two long.
    slots: Vec<Vec<usize>>,
    hash_builder: S,
}

/// Smallest slot count that keeps `entries` at or under a 3/4 load.
fn slots_for(entries: usize) -> usize {
    let needed = entries.saturating_mul(4) / 3 + 1;
    needed.next_power_of_two().max(MIN_SLOTS)
}

impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
            hash_builder,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let slots = if capacity == 0 {
            Vec::new()
        } else {
            vec![Vec::new(); slots_for(capacity)]
        };

        Self {
            entries: Vec::with_capacity(capacity),
            slots,
            hash_builder,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Drops every entry. The hasher stays.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    #[inline(always)]
    fn slot(&self, hash: u64) -> usize {
        (hash as usize) & (self.slots.len() - 1)
    }

    fn unlink(&mut self, slot: usize, index: usize) {
        let chain = &mut self.slots[slot];
        if let Some(pos) = chain.iter().position(|&i| i == index) {
            chain.swap_remove(pos);
        }
    }

    // The slot reference to `index` must already be gone.
    fn take_entry(&mut self, index: usize) -> Pair<K, V> {
        let last = self.entries.len() - 1;
        let bucket = self.entries.swap_remove(index);

        if index != last {
            let slot = self.slot(self.entries[index].hash);
            if let Some(i) = self.slots[slot].iter_mut().find(|i| **i == last) {
                *i = index;
            }
        }

        Pair::new(bucket.key, bucket.value)
    }

    fn resize(&mut self, slot_count: usize) {
        tracing::trace!(
            from = self.slots.len(),
            to = slot_count,
            entries = self.entries.len(),
            "resizing hash table"
        );

        let mut slots = vec![Vec::new(); slot_count];
        let mask = slot_count - 1;
        for (i, bucket) in self.entries.iter().enumerate() {
            slots[(bucket.hash as usize) & mask].push(i);
        }
        self.slots = slots;
    }

    fn reserve_one(&mut self) {
        let wanted = self.entries.len() + 1;
        if self.slots.is_empty() || wanted * 4 > self.slots.len() * 3 {
            self.resize(slots_for(wanted));
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Locates `key` as (slot, position in the slot's chain).
    fn find<Q>(&self, hash: u64, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.slots.is_empty() {
            return None;
        }

        let slot = self.slot(hash);
        self.slots[slot]
            .iter()
            .position(|&i| {
                let bucket = &self.entries[i];
                bucket.hash == hash && bucket.key.borrow() == key
            })
            .map(|pos| (slot, pos))
    }

    pub fn try_add(&mut self, key: K, value: V) -> Result<(), Error> {
        let hash = self.hash(&key);
        if self.find(hash, &key).is_some() {
            return Err(Error::DuplicateKey);
        }

        self.reserve_one();

        let index = self.entries.len();
        let slot = self.slot(hash);
        self.slots[slot].push(index);
        self.entries.push(Bucket { hash, key, value });

        Ok(())
    }

    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash(key);
        let (slot, pos) = self.find(hash, key).ok_or(Error::MissingKey)?;
        let index = self.slots[slot].swap_remove(pos);

        Ok(self.take_entry(index))
    }

    pub fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error> {
        let index = self.entries.len().checked_sub(1).ok_or(Error::Empty)?;
        let slot = self.slot(self.entries[index].hash);
        self.unlink(slot, index);

        Ok(self.take_entry(index))
    }

    /// Moves every entry of `source` into `self`, dropping whatever `self`
    /// held before. Both maps keep their own hasher, so the moved keys are
    /// hashed again.
    pub fn transfer_from(&mut self, source: &mut Self) {
        self.clear();
        if !source.is_empty() {
            self.entries.reserve(source.len());
            self.resize(slots_for(source.len()));
        }

        for Bucket { key, value, .. } in source.entries.drain(..) {
            let hash = self.hash(&key);
            let index = self.entries.len();
            let slot = self.slot(hash);
            self.slots[slot].push(index);
            self.entries.push(Bucket { hash, key, value });
        }
        source.slots.clear();
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (slot, pos) = self.find(self.hash(key), key)?;
        Some(&self.entries[self.slots[slot][pos]].value)
    }

    pub fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(Error::MissingKey)
    }

    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(self.hash(key), key).is_some()
    }
}

impl<K, V, S> Map<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    type Iter<'a> = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn new() -> Self {
        Self::with_hasher(S::default())
    }

    fn try_add(&mut self, key: K, value: V) -> Result<(), Error> {
        HashMap::try_add(self, key, value)
    }

    fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        HashMap::try_remove(self, key)
    }

    fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error> {
        HashMap::try_remove_any(self)
    }

    fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        HashMap::try_value(self, key)
    }

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        HashMap::has_key(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Iter<'_, K, V> {
        HashMap::iter(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn transfer_from(&mut self, source: &mut Self) {
        HashMap::transfer_from(self, source)
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// # Panics
    ///
    /// Panics if a key repeats.
    #[track_caller]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        for (key, value) in iter {
            if let Err(e) = map.try_add(key, value) {
                violation(e)
            }
        }
        map
    }
}

pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, Bucket<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|b| (&b.key, &b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<Bucket<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|b| (b.key, b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
