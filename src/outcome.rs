//! Randomized request outcomes.
//!
//! Each endpoint flips a coin per request. The coin is injected into the
//! dispatcher as an [`OutcomeSource`] so tests can pin the result.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of per-request outcomes.
///
/// `true` selects the success branch, `false` the failure branch.
pub trait OutcomeSource: Send + Sync {
    fn next_outcome(&self) -> bool;
}

/// Fair coin backed by the thread-local PRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOutcome;

impl RandomOutcome {
    pub fn new() -> Self {
        Self
    }
}

impl OutcomeSource for RandomOutcome {
    fn next_outcome(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Always returns the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub bool);

impl OutcomeSource for FixedOutcome {
    fn next_outcome(&self) -> bool {
        self.0
    }
}

/// Cycles through a fixed script of outcomes.
#[derive(Debug)]
pub struct ScriptedOutcome {
    script: Vec<bool>,
    cursor: AtomicUsize,
}

impl ScriptedOutcome {
    /// Panics if `script` is empty.
    pub fn new(script: Vec<bool>) -> Self {
        assert!(!script.is_empty(), "outcome script must not be empty");
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl OutcomeSource for ScriptedOutcome {
    fn next_outcome(&self) -> bool {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.script[index % self.script.len()]
    }
}
