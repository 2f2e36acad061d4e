use std::borrow::Borrow;
use std::cmp::Ordering;
use std::hash::Hash;

use crate::error::violation;
use crate::{Error, Map, Pair};

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    height: u8,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i16 {
        height(&self.left) as i16 - height(&self.right) as i16
    }
}

fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.update();
            pivot.right = Some(node);
            pivot.update();
            pivot
        }
        None => node,
    }
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.update();
            pivot.left = Some(node);
            pivot.update();
            pivot
        }
        None => node,
    }
}

/// Restores the AVL property at `link`, assuming both subtrees hold it.
fn rebalance<K, V>(link: &mut Link<K, V>) {
    let Some(mut node) = link.take() else {
        return;
    };

    node.update();
    let balance = node.balance();

    if balance > 1 {
        if node.left.as_ref().map_or(0, |l| l.balance()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        node = rotate_right(node);
    } else if balance < -1 {
        if node.right.as_ref().map_or(0, |r| r.balance()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        node = rotate_left(node);
    }

    *link = Some(node);
}

// `key` must not be present below `link`.
fn insert<K: Ord, V>(link: &mut Link<K, V>, key: K, value: V) {
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Box::new(Node::leaf(key, value)));
            return;
        }
    };

    if key < node.key {
        insert(&mut node.left, key, value);
    } else {
        insert(&mut node.right, key, value);
    }

    rebalance(link);
}

fn remove_min<K, V>(link: &mut Link<K, V>) -> Link<K, V> {
    let node = link.as_mut()?;

    if node.left.is_some() {
        let min = remove_min(&mut node.left);
        rebalance(link);
        min
    } else {
        let mut min = link.take()?;
        *link = min.right.take();
        Some(min)
    }
}

/// Detaches the node at `link`, splicing its in-order successor into place.
fn unlink<K, V>(link: &mut Link<K, V>) -> Option<(K, V)> {
    let mut node = link.take()?;

    *link = match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (left, None) => left,
        (None, right) => right,
        (left, right) => {
            let mut right = right;
            match remove_min(&mut right) {
                Some(mut successor) => {
                    successor.left = left;
                    successor.right = right;
                    Some(successor)
                }
                None => left,
            }
        }
    };
    rebalance(link);

    let Node { key, value, .. } = *node;
    Some((key, value))
}

fn remove<K, V, Q>(link: &mut Link<K, V>, key: &Q) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    let node = link.as_mut()?;

    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => remove(&mut node.left, key),
        Ordering::Greater => remove(&mut node.right, key),
        Ordering::Equal => return unlink(link),
    };

    if removed.is_some() {
        rebalance(link);
    }
    removed
}

/// AVL tree backed [`Map`], iterated in ascending key order.
///
/// `remove_any` detaches the root.
#[derive(Clone)]
pub struct TreeMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> TreeMap<K, V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.descend(self.root.as_deref());
        iter
    }

    pub fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error> {
        let (key, value) = unlink(&mut self.root).ok_or(Error::Empty)?;
        self.len -= 1;
        Ok(Pair::new(key, value))
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    pub fn try_add(&mut self, key: K, value: V) -> Result<(), Error> {
        if self.has_key(&key) {
            return Err(Error::DuplicateKey);
        }

        insert(&mut self.root, key, value);
        self.len += 1;
        Ok(())
    }

    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (key, value) = remove(&mut self.root, key).ok_or(Error::MissingKey)?;
        self.len -= 1;
        Ok(Pair::new(key, value))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    pub fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(Error::MissingKey)
    }

    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).is_some()
    }
}

impl<K: Ord, V> Map<K, V> for TreeMap<K, V> {
    type Iter<'a> = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn new() -> Self {
        TreeMap::new()
    }

    fn try_add(&mut self, key: K, value: V) -> Result<(), Error> {
        TreeMap::try_add(self, key, value)
    }

    fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        TreeMap::try_remove(self, key)
    }

    fn try_remove_any(&mut self) -> Result<Pair<K, V>, Error> {
        TreeMap::try_remove_any(self)
    }

    fn try_value<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        TreeMap::try_value(self, key)
    }

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        TreeMap::has_key(self, key)
    }

    fn size(&self) -> usize {
        self.len
    }

    fn iter(&self) -> Iter<'_, K, V> {
        TreeMap::iter(self)
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        // Same key set means same in-order sequence, whatever the shape.
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Ord, V: Eq> Eq for TreeMap<K, V> {}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    /// # Panics
    ///
    /// Panics if a key repeats.
    #[track_caller]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            if let Err(e) = map.try_add(key, value) {
                violation(e)
            }
        }
        map
    }
}

pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn descend(&mut self, mut cursor: Option<&'a Node<K, V>>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    fn descend(&mut self, mut cursor: Link<K, V>) {
        while let Some(mut node) = cursor {
            cursor = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.descend(node.right.take());
        self.remaining -= 1;
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut iter = IntoIter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.descend(self.root);
        iter
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
