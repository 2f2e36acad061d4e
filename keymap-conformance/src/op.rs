use keymap::{Error, Pair};

/// One kernel call, as replayed by a [`Session`](crate::Session).
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op<K, V> {
    Add(K, V),
    Remove(K),
    RemoveAny,
    Value(K),
    HasKey(K),
    Size,
}

/// What a map answered to an [`Op`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<K, V> {
    Added,
    Removed(Pair<K, V>),
    Value(V),
    HasKey(bool),
    Size(usize),
    /// The op broke a precondition and the map refused it.
    Violation(Error),
}

impl<K, V> Outcome<K, V> {
    pub(crate) fn settle(result: Result<Self, Error>) -> Self {
        result.unwrap_or_else(Outcome::Violation)
    }
}
