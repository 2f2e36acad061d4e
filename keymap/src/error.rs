/// A violated precondition of a [`Map`](crate::Map) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// `add` was called with a key that is already present.
    DuplicateKey,
    /// The key passed to `remove`, `value` or `replace_value` is absent.
    MissingKey,
    /// No entry holds the value passed to `key`.
    MissingValue,
    /// `remove_any` was called on an empty map.
    Empty,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey => f.write_str("duplicate key: key is already in the map"),
            Self::MissingKey => f.write_str("missing key: key is not in the map"),
            Self::MissingValue => f.write_str("missing value: no entry has the given value"),
            Self::Empty => f.write_str("empty map: operation requires at least one entry"),
        }
    }
}

impl std::error::Error for Error {}

#[cold]
#[track_caller]
pub(crate) fn violation(error: Error) -> ! {
    panic!("{}", error)
}
