use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentia_types::validate_vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AlignError;
use crate::verifier::{Policy, ValueAlignmentVerifier};

/// Default tolerance when comparing a policy's action to the optimal one.
pub const DEFAULT_ACTION_TOLERANCE: f64 = 1e-6;

/// Outcome of an adversarial robustness sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobustnessReport {
    /// Total perturbation trials run (states x examples per state).
    pub trials: usize,
    /// Trials on which the policy deviated from the optimal action.
    pub deviations: usize,
    /// Fraction of trials on which the policy stayed optimal.
    pub accuracy: f64,
}

/// Probes a policy for states where a small perturbation flips its
/// action away from the constrained optimum.
///
/// Perturbation sampling is driven by an explicit seed: the same seed
/// over the same states always visits the same perturbations, so sweeps
/// are reproducible in tests and across runs. No ambient process-global
/// randomness is consulted.
pub struct AdversarialValueTester {
    policy: Box<dyn Policy>,
    verifier: ValueAlignmentVerifier,
    action_tolerance: f64,
}

impl AdversarialValueTester {
    pub fn new(policy: impl Policy + 'static, verifier: ValueAlignmentVerifier) -> Self {
        Self {
            policy: Box::new(policy),
            verifier,
            action_tolerance: DEFAULT_ACTION_TOLERANCE,
        }
    }

    /// Override the tolerance used to decide whether two actions agree.
    pub fn with_action_tolerance(mut self, tolerance: f64) -> Self {
        self.action_tolerance = tolerance;
        self
    }

    pub fn verifier(&self) -> &ValueAlignmentVerifier {
        &self.verifier
    }

    /// Perturbed states on which the policy's action deviates from the
    /// optimum of the unperturbed state.
    ///
    /// For every input state and each of `num_examples` trials, a
    /// uniform per-dimension perturbation in `[-epsilon, epsilon]` is
    /// drawn; the perturbed state is kept iff the policy's action on it
    /// differs from `optimize_action` of the unperturbed state.
    ///
    /// `epsilon == 0` short-circuits to an empty result: with no
    /// perturbation there is nothing adversarial to find.
    pub fn generate_adversarial_examples(
        &self,
        states: &[Vec<f64>],
        epsilon: f64,
        num_examples: usize,
        seed: u64,
    ) -> Result<Vec<Vec<f64>>, AlignError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(AlignError::InvalidEpsilon { epsilon });
        }
        if epsilon == 0.0 {
            return Ok(Vec::new());
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut adversarial = Vec::new();

        for state in states {
            validate_vector("state", state)?;
            let optimal = self.verifier.optimize_action(state)?;

            for _ in 0..num_examples {
                let perturbed: Vec<f64> = state
                    .iter()
                    .map(|&x| x + rng.gen_range(-epsilon..=epsilon))
                    .collect();
                let action = self.policy.act(&perturbed);
                if self.deviates(&action, &optimal) {
                    adversarial.push(perturbed);
                }
            }
        }

        debug!(
            found = adversarial.len(),
            states = states.len(),
            epsilon,
            "adversarial sweep finished"
        );
        Ok(adversarial)
    }

    /// Full sweep summarized as a [`RobustnessReport`].
    pub fn run_adversarial_test(
        &self,
        states: &[Vec<f64>],
        epsilon: f64,
        num_examples: usize,
        seed: u64,
    ) -> Result<RobustnessReport, AlignError> {
        let adversarial = self.generate_adversarial_examples(states, epsilon, num_examples, seed)?;
        let trials = if epsilon == 0.0 {
            0
        } else {
            states.len() * num_examples
        };
        let deviations = adversarial.len();
        let accuracy = if trials == 0 {
            1.0
        } else {
            1.0 - deviations as f64 / trials as f64
        };
        Ok(RobustnessReport {
            trials,
            deviations,
            accuracy,
        })
    }

    fn deviates(&self, action: &[f64], optimal: &[f64]) -> bool {
        if action.len() != optimal.len() {
            return true;
        }
        action
            .iter()
            .zip(optimal)
            .any(|(a, o)| (a - o).abs() > self.action_tolerance)
    }
}
