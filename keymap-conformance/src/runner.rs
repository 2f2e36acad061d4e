use std::cell::Cell;

use keymap::{HashMap, Map, TreeMap};
use proptest::test_runner::{
    Config as ProptestConfig, RngAlgorithm, TestCaseError, TestError, TestRng, TestRunner,
};

use crate::{strategy, Backing, Config, Reference, Session};

/// How one backing fared across its sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub backing: Backing,
    pub cases: u32,
    /// Ops applied across passing sessions.
    pub ops: usize,
}

#[derive(Debug)]
pub enum Failure {
    /// A session diverged; `ops` is the shrunk op sequence that reproduces it.
    Diverged {
        backing: Backing,
        reason: String,
        ops: String,
    },
    Aborted {
        backing: Backing,
        reason: String,
    },
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diverged {
                backing,
                reason,
                ops,
            } => write!(f, "{:?} backing diverged: {}; minimal ops: {}", backing, reason, ops),
            Self::Aborted { backing, reason } => {
                write!(f, "{:?} backing run aborted: {}", backing, reason)
            }
        }
    }
}

impl std::error::Error for Failure {}

fn rng(seed: u64) -> TestRng {
    let mut bytes = [0_u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    TestRng::from_seed(RngAlgorithm::ChaCha, &bytes)
}

/// Runs `cfg.cases` random sessions against every configured backing,
/// stopping at the first backing that diverges.
pub fn run(cfg: &Config) -> Result<Vec<Summary>, Failure> {
    cfg.backings
        .iter()
        .map(|&backing| match backing {
            Backing::Hash => run_backing::<HashMap<String, u32>>(cfg, backing),
            Backing::Tree => run_backing::<TreeMap<String, u32>>(cfg, backing),
        })
        .collect()
}

pub fn run_backing<M: Map<String, u32>>(
    cfg: &Config,
    backing: Backing,
) -> Result<Summary, Failure> {
    tracing::info!(?backing, cases = cfg.cases, seed = cfg.seed, "running sessions");

    let mut runner = TestRunner::new_with_rng(
        ProptestConfig {
            cases: cfg.cases,
            failure_persistence: None,
            ..ProptestConfig::default()
        },
        rng(cfg.seed),
    );

    let applied = Cell::new(0_usize);
    let result = runner.run(&strategy::ops(cfg.key_space, cfg.max_ops), |ops| {
        let mut session = Session::new(M::new(), Reference::new());
        for op in &ops {
            session
                .apply(op)
                .map_err(|d| TestCaseError::fail(d.to_string()))?;
        }

        tracing::debug!(?backing, ops = ops.len(), "session agreed");
        applied.set(applied.get() + ops.len());
        Ok(())
    });

    match result {
        Ok(()) => Ok(Summary {
            backing,
            cases: cfg.cases,
            ops: applied.get(),
        }),
        Err(TestError::Fail(reason, ops)) => Err(Failure::Diverged {
            backing,
            reason: reason.to_string(),
            ops: format!("{:?}", ops),
        }),
        Err(TestError::Abort(reason)) => Err(Failure::Aborted {
            backing,
            reason: reason.to_string(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small() -> Config {
        Config {
            cases: 32,
            max_ops: 24,
            key_space: 4,
            ..Config::default()
        }
    }

    #[test]
    fn both_backings_conform() {
        let summaries = run(&small()).unwrap();

        assert_eq!(2, summaries.len());
        assert_eq!(Backing::Hash, summaries[0].backing);
        assert_eq!(Backing::Tree, summaries[1].backing);
        assert!(summaries.iter().all(|s| s.cases == 32));
    }

    #[test]
    fn equal_seeds_replay_equal_sessions() {
        let cfg = Config {
            backings: vec![Backing::Tree],
            seed: 99,
            ..small()
        };

        assert_eq!(run(&cfg).unwrap(), run(&cfg).unwrap());
    }

    #[test]
    fn reference_conforms_to_itself() {
        let summary = run_backing::<Reference<String, u32>>(&small(), Backing::Tree).unwrap();
        assert_eq!(32, summary.cases);
    }
}
