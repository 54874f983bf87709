//! Element identifier sources
//!
//! Every rendered node gets an `id` used for HTML `id`/`for` linkage.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hands out a fresh identifier per schema node
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Which identifier source a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Random,
    Counter,
}

impl IdStrategy {
    pub fn build(&self, length: usize) -> Box<dyn IdSource> {
        match self {
            Self::Random => Box::new(RandomIds::new(length)),
            Self::Counter => Box::new(CounterIds::default()),
        }
    }
}

/// Random lowercase identifiers, e.g. `qhzmwa`
#[derive(Debug, Clone)]
pub struct RandomIds {
    rng: StdRng,
    length: usize,
}

impl RandomIds {
    pub fn new(length: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            length,
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(length: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            length,
        }
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        (0..self.length)
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}

/// Monotonic identifiers `f0001`, `f0002`, ...
#[derive(Debug, Clone, Default)]
pub struct CounterIds {
    next: usize,
}

impl IdSource for CounterIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("f{:04}", self.next)
    }
}
