use std::fmt::Debug;
use std::hash::Hash;

use keymap::{Error, Map};

use crate::{Op, Outcome};

/// Sorted `[(key, value), ..]` rendering of any map, for failure messages.
pub fn describe<K, V, M>(map: &M) -> String
where
    K: Ord + Debug,
    V: Debug,
    M: Map<K, V>,
{
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    format!("{:?}", entries)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivergenceKind {
    /// The two maps answered the op differently.
    Outcome { expected: String, actual: String },
    /// `remove_any` handed back a pair the reference never held.
    NotMember { removed: String },
    /// The answers agreed but the maps no longer hold the same entries.
    State { expected: String, actual: String },
}

/// The implementation under test disagreed with the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub step: usize,
    pub op: String,
    pub kind: DivergenceKind,
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({}): ", self.step, self.op)?;
        match &self.kind {
            DivergenceKind::Outcome { expected, actual } => {
                write!(f, "expected outcome {}, got {}", expected, actual)
            }
            DivergenceKind::NotMember { removed } => {
                write!(f, "remove_any returned {}, which was not in the map", removed)
            }
            DivergenceKind::State { expected, actual } => {
                write!(f, "expected entries {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for Divergence {}

/// Drives an implementation under test and a reference through the same
/// ops, checking after each one that they still agree.
///
/// An op that breaks a precondition must be refused by both maps with the
/// same [`Error`]. For `RemoveAny` the test map may pick any entry; the
/// session then removes that same key from the reference.
pub struct Session<T, R> {
    test: T,
    reference: R,
    step: usize,
}

impl<T, R> Session<T, R> {
    pub fn new(test: T, reference: R) -> Self {
        Self {
            test,
            reference,
            step: 0,
        }
    }

    pub fn test(&self) -> &T {
        &self.test
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }

    /// Number of ops applied so far.
    pub fn steps(&self) -> usize {
        self.step
    }

    pub fn into_parts(self) -> (T, R) {
        (self.test, self.reference)
    }

    fn diverged<K: Debug, V: Debug>(&self, op: &Op<K, V>, kind: DivergenceKind) -> Divergence {
        Divergence {
            step: self.step,
            op: format!("{:?}", op),
            kind,
        }
    }

    pub fn apply<K, V>(&mut self, op: &Op<K, V>) -> Result<Outcome<K, V>, Divergence>
    where
        T: Map<K, V>,
        R: Map<K, V>,
        K: Clone + Debug + Hash + Ord,
        V: Clone + Debug + PartialEq,
    {
        self.step += 1;
        tracing::trace!(step = self.step, ?op, "applying");

        let outcome = match op {
            Op::Add(k, v) => {
                let expected = Outcome::settle(
                    self.reference
                        .try_add(k.clone(), v.clone())
                        .map(|()| Outcome::Added),
                );
                let actual = Outcome::settle(
                    self.test
                        .try_add(k.clone(), v.clone())
                        .map(|()| Outcome::Added),
                );
                self.agree(op, expected, actual)?
            }
            Op::Remove(k) => {
                let expected =
                    Outcome::settle(self.reference.try_remove(k).map(Outcome::Removed));
                let actual = Outcome::settle(self.test.try_remove(k).map(Outcome::Removed));
                self.agree(op, expected, actual)?
            }
            Op::RemoveAny => self.remove_any(op)?,
            Op::Value(k) => {
                let expected = Outcome::settle(
                    self.reference
                        .try_value(k)
                        .map(|v| Outcome::Value(v.clone())),
                );
                let actual = Outcome::settle(
                    self.test
                        .try_value(k)
                        .map(|v| Outcome::Value(v.clone())),
                );
                self.agree(op, expected, actual)?
            }
            Op::HasKey(k) => {
                let expected = Outcome::HasKey(self.reference.has_key(k));
                let actual = Outcome::HasKey(self.test.has_key(k));
                self.agree(op, expected, actual)?
            }
            Op::Size => {
                let expected = Outcome::Size(self.reference.size());
                let actual = Outcome::Size(self.test.size());
                self.agree(op, expected, actual)?
            }
        };

        self.check_state(op)?;
        Ok(outcome)
    }

    fn agree<K, V>(
        &self,
        op: &Op<K, V>,
        expected: Outcome<K, V>,
        actual: Outcome<K, V>,
    ) -> Result<Outcome<K, V>, Divergence>
    where
        K: Debug + PartialEq,
        V: Debug + PartialEq,
    {
        if expected == actual {
            Ok(actual)
        } else {
            Err(self.diverged(
                op,
                DivergenceKind::Outcome {
                    expected: format!("{:?}", expected),
                    actual: format!("{:?}", actual),
                },
            ))
        }
    }

    fn remove_any<K, V>(&mut self, op: &Op<K, V>) -> Result<Outcome<K, V>, Divergence>
    where
        T: Map<K, V>,
        R: Map<K, V>,
        K: Debug + Hash + Ord,
        V: Debug + PartialEq,
    {
        let was_empty = self.reference.is_empty();

        let pair = match self.test.try_remove_any() {
            Ok(pair) if !was_empty => pair,
            Err(Error::Empty) if was_empty => return Ok(Outcome::Violation(Error::Empty)),
            other => {
                let expected = if was_empty {
                    format!("{:?}", Outcome::<K, V>::Violation(Error::Empty))
                } else {
                    "Removed(<any member>)".to_string()
                };
                return Err(self.diverged(
                    op,
                    DivergenceKind::Outcome {
                        expected,
                        actual: format!("{:?}", Outcome::settle(other.map(Outcome::Removed))),
                    },
                ));
            }
        };

        let held = self
            .reference
            .try_value(pair.key())
            .map_or(false, |v| v == pair.value());
        if !held {
            return Err(self.diverged(
                op,
                DivergenceKind::NotMember {
                    removed: format!("{:?}", pair),
                },
            ));
        }

        self.reference.try_remove(pair.key()).map_err(|_| {
            self.diverged(
                op,
                DivergenceKind::NotMember {
                    removed: format!("{:?}", pair),
                },
            )
        })?;

        Ok(Outcome::Removed(pair))
    }

    fn check_state<K, V>(&self, op: &Op<K, V>) -> Result<(), Divergence>
    where
        T: Map<K, V>,
        R: Map<K, V>,
        K: Debug + Hash + Ord,
        V: Debug + PartialEq,
    {
        if self.test.size() == self.reference.size() && self.test.equals(&self.reference) {
            return Ok(());
        }

        Err(self.diverged(
            op,
            DivergenceKind::State {
                expected: describe(&self.reference),
                actual: describe(&self.test),
            },
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::btree_map;

    use keymap::{HashMap, Pair, TreeMap};

    use crate::Reference;

    #[derive(Clone, Copy)]
    enum Fault {
        DropsEverySecondAdd,
        CorruptsRemoveAny,
    }

    /// A map with one planted bug.
    struct Faulty {
        inner: Reference<String, u32>,
        fault: Fault,
        adds: usize,
    }

    impl Map<String, u32> for Faulty {
        type Iter<'a> = btree_map::Iter<'a, String, u32>
        where
            Self: 'a;

        fn new() -> Self {
            Self {
                inner: Reference::new(),
                fault: Fault::DropsEverySecondAdd,
                adds: 0,
            }
        }

        fn try_add(&mut self, key: String, value: u32) -> Result<(), Error> {
            self.adds += 1;
            match self.fault {
                Fault::DropsEverySecondAdd if self.adds % 2 == 0 => Ok(()),
                _ => self.inner.try_add(key, value),
            }
        }

        fn try_remove<Q>(&mut self, key: &Q) -> Result<Pair<String, u32>, Error>
        where
            String: std::borrow::Borrow<Q>,
            Q: ?Sized + Hash + Ord,
        {
            self.inner.try_remove(key)
        }

        fn try_remove_any(&mut self) -> Result<Pair<String, u32>, Error> {
            let (key, value) = self.inner.try_remove_any()?.into_parts();
            match self.fault {
                Fault::CorruptsRemoveAny => Ok(Pair::new(key, value + 1)),
                _ => Ok(Pair::new(key, value)),
            }
        }

        fn try_value<Q>(&self, key: &Q) -> Result<&u32, Error>
        where
            String: std::borrow::Borrow<Q>,
            Q: ?Sized + Hash + Ord,
        {
            self.inner.try_value(key)
        }

        fn has_key<Q>(&self, key: &Q) -> bool
        where
            String: std::borrow::Borrow<Q>,
            Q: ?Sized + Hash + Ord,
        {
            self.inner.has_key(key)
        }

        fn size(&self) -> usize {
            self.inner.size()
        }

        fn iter(&self) -> Self::Iter<'_> {
            self.inner.iter()
        }
    }

    fn add(k: &str, v: u32) -> Op<String, u32> {
        Op::Add(k.to_string(), v)
    }

    #[test]
    fn agreeing_maps_pass_every_op() {
        let mut session = Session::new(HashMap::new(), Reference::new());
        let ops = vec![
            add("red", 1),
            add("green", 2),
            Op::Value("green".to_string()),
            Op::HasKey("blue".to_string()),
            Op::Remove("red".to_string()),
            Op::RemoveAny,
            Op::Size,
        ];

        for op in &ops {
            session.apply(op).unwrap();
        }

        assert_eq!(7, session.steps());
        assert!(session.test().is_empty());
        assert_eq!(
            Outcome::Size(0),
            session.apply(&Op::<String, u32>::Size).unwrap()
        );

        session.apply(&add("blue", 3)).unwrap();
        let (test, reference) = session.into_parts();
        assert!(test.equals(&reference));
        assert_eq!(Ok(&3), test.try_value("blue"));
        assert_eq!(1, reference.size());
    }

    #[test]
    fn precondition_violations_must_be_refused_alike() {
        let mut session = Session::new(TreeMap::new(), Reference::new());

        session.apply(&add("red", 1)).unwrap();
        assert_eq!(
            Outcome::Violation(Error::DuplicateKey),
            session.apply(&add("red", 2)).unwrap()
        );
        assert_eq!(
            Outcome::Violation(Error::MissingKey),
            session.apply(&Op::Value("blue".to_string())).unwrap()
        );
        assert_eq!(
            Outcome::Violation(Error::MissingKey),
            session.apply(&Op::Remove("blue".to_string())).unwrap()
        );

        session.apply(&Op::<String, u32>::RemoveAny).unwrap();
        assert_eq!(
            Outcome::Violation(Error::Empty),
            session.apply(&Op::<String, u32>::RemoveAny).unwrap()
        );
    }

    #[test]
    fn remove_any_outcome_is_a_prior_member() {
        let mut session = Session::new(HashMap::new(), Reference::new());
        session.apply(&add("red", 1)).unwrap();
        session.apply(&add("green", 2)).unwrap();

        match session.apply(&Op::<String, u32>::RemoveAny).unwrap() {
            Outcome::Removed(pair) => {
                assert!(pair.key() == "red" || pair.key() == "green");
                assert!(!session.reference().has_key(pair.key()));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(1, session.reference().size());
    }

    #[test]
    fn detects_lost_entries() {
        let mut session = Session::new(Faulty::new(), Reference::new());
        session.apply(&add("red", 1)).unwrap();

        let divergence = session.apply(&add("green", 2)).unwrap_err();
        assert_eq!(2, divergence.step);
        assert!(matches!(divergence.kind, DivergenceKind::State { .. }));
        assert!(divergence.to_string().contains("green"), "{}", divergence);
    }

    #[test]
    fn detects_fabricated_remove_any() {
        let mut faulty = Faulty::new();
        faulty.fault = Fault::CorruptsRemoveAny;

        let mut session = Session::new(faulty, Reference::new());
        session.apply(&add("red", 1)).unwrap();

        let divergence = session.apply(&Op::<String, u32>::RemoveAny).unwrap_err();
        assert_eq!(
            DivergenceKind::NotMember {
                removed: format!("{:?}", Pair::new("red".to_string(), 2_u32)),
            },
            divergence.kind
        );
    }

    #[test]
    fn describe_sorts_entries() {
        let map: HashMap<&str, u32> = vec![("red", 1), ("blue", 3)].into_iter().collect();
        assert_eq!(r#"[("blue", 3), ("red", 1)]"#, describe(&map));
    }
}
