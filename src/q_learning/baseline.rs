//! Uniform random baseline

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Result,
    ports::Learner,
    types::{Action, ActionValues, Position},
};

/// Random policy learner (baseline)
///
/// Ignores feedback and always explores. Useful as a reference curve and to
/// exercise the engine with a non-tabular learner.
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn choose_action(&mut self, _position: Position) -> Result<Action> {
        Ok(Action::ALL[self.rng.random_range(0..Action::COUNT)])
    }

    fn action_spread(&self, _position: Position) -> ActionValues {
        ActionValues::zeros()
    }

    fn epsilon(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
