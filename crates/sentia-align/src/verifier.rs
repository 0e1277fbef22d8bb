use std::fmt;

use sentia_types::{validate_vector, ConstraintSet, TypesError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AlignError;
use crate::simplex;

/// Scalar desirability of taking `action` in `state`.
///
/// Implemented for any matching closure, so callers can pass a plain
/// `|state, action| ...`.
pub trait ValueFunction: Send + Sync {
    fn value(&self, state: &[f64], action: &[f64]) -> f64;
}

impl<F> ValueFunction for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn value(&self, state: &[f64], action: &[f64]) -> f64 {
        self(state, action)
    }
}

/// Maps a state to the action a controller would take in it.
pub trait Policy: Send + Sync {
    fn act(&self, state: &[f64]) -> Vec<f64>;
}

impl<F> Policy for F
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn act(&self, state: &[f64]) -> Vec<f64> {
        self(state)
    }
}

/// Why an (state, action) pair was flagged as a counterexample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The value function scored the pair negative.
    NegativeValue,
    /// Constraint `index` in the set does not hold for the action.
    ConstraintViolated { index: usize },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::NegativeValue => write!(f, "value function violation"),
            ViolationKind::ConstraintViolated { index } => {
                write!(f, "constraint {} violation", index)
            }
        }
    }
}

/// Diagnostic record: a state/action pair together with what it violates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counterexample {
    pub state: Vec<f64>,
    pub action: Vec<f64>,
    /// Value-function score, carried only for value violations.
    pub value: Option<f64>,
    pub violation: ViolationKind,
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for action {:?}", self.violation, self.action)
    }
}

/// Formal verification of actions against a value function and a set of
/// linear constraints.
///
/// The value function and the constraint system are deliberately
/// independent concerns: `verify_action` passes or fails on feasibility
/// alone, and the value score is informational. The optimizer works on
/// an explicit linear objective, since an arbitrary value function
/// cannot be handed to a linear program.
///
/// The verifier never mutates its own constraint set;
/// [`refine_constraints`](Self::refine_constraints) returns a new set
/// which callers install explicitly via
/// [`with_constraints`](Self::with_constraints). Sharing a verifier
/// between threads therefore needs no locking.
pub struct ValueAlignmentVerifier {
    value_function: Box<dyn ValueFunction>,
    constraints: ConstraintSet,
    objective: Vec<f64>,
}

impl ValueAlignmentVerifier {
    /// Verifier with a pure-feasibility objective (all zeros): the
    /// optimizer returns an arbitrary feasible action.
    pub fn new(value_function: impl ValueFunction + 'static, constraints: ConstraintSet) -> Self {
        let objective = vec![0.0; constraints.action_dim()];
        Self {
            value_function: Box::new(value_function),
            constraints,
            objective,
        }
    }

    /// Replace the linear objective minimized by
    /// [`optimize_action`](Self::optimize_action).
    pub fn with_objective(mut self, objective: Vec<f64>) -> Result<Self, AlignError> {
        if objective.len() != self.constraints.action_dim() {
            return Err(AlignError::InvalidInput(TypesError::DimensionMismatch {
                expected: self.constraints.action_dim(),
                actual: objective.len(),
            }));
        }
        self.objective = objective;
        Ok(self)
    }

    /// Replace the constraint set (e.g. after a refinement round). The
    /// objective must fit the new action dimension.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Result<Self, AlignError> {
        if constraints.action_dim() != self.objective.len() {
            return Err(AlignError::InvalidInput(TypesError::DimensionMismatch {
                expected: self.objective.len(),
                actual: constraints.action_dim(),
            }));
        }
        self.constraints = constraints;
        Ok(self)
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Does `action` satisfy every declared constraint in `state`?
    ///
    /// The value function is evaluated and traced but does not affect
    /// the verdict: a feasible action with a negative value still
    /// verifies. Feasibility and desirability are separate questions.
    pub fn verify_action(&self, state: &[f64], action: &[f64]) -> Result<bool, AlignError> {
        validate_vector("state", state)?;
        validate_vector("action", action)?;

        let value = self.value_function.value(state, action);
        let feasible = self.constraints.satisfied_by(action)?;
        debug!(value, feasible, "action verified");
        Ok(feasible)
    }

    /// Action minimizing the linear objective subject to EVERY declared
    /// constraint.
    ///
    /// An empty feasible region is reported as
    /// [`AlignError::Infeasible`]; no default or garbage action is ever
    /// returned in its place.
    pub fn optimize_action(&self, state: &[f64]) -> Result<Vec<f64>, AlignError> {
        validate_vector("state", state)?;
        debug!(state_dim = state.len(), "optimizing action");
        simplex::minimize(&self.objective, &self.constraints)
    }

    /// Diagnostic records for everything `action` violates in `state`:
    /// one for a negative value score, one per violated constraint.
    ///
    /// Purely diagnostic; the stored constraints are untouched.
    pub fn generate_counterexamples(
        &self,
        state: &[f64],
        action: &[f64],
    ) -> Result<Vec<Counterexample>, AlignError> {
        validate_vector("state", state)?;
        validate_vector("action", action)?;

        let mut counterexamples = Vec::new();

        let value = self.value_function.value(state, action);
        if value < 0.0 {
            counterexamples.push(Counterexample {
                state: state.to_vec(),
                action: action.to_vec(),
                value: Some(value),
                violation: ViolationKind::NegativeValue,
            });
        }

        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.holds(action)? {
                counterexamples.push(Counterexample {
                    state: state.to_vec(),
                    action: action.to_vec(),
                    value: None,
                    violation: ViolationKind::ConstraintViolated { index },
                });
            }
        }

        Ok(counterexamples)
    }

    /// Constraint set tightened against every constraint-violation
    /// counterexample: for each, the referenced constraint's bounds
    /// shrink by `A * action`, excluding the violating action at the
    /// margin.
    ///
    /// Returns a NEW set; the verifier's own constraints are unchanged.
    pub fn refine_constraints(
        &self,
        counterexamples: &[Counterexample],
    ) -> Result<ConstraintSet, AlignError> {
        let mut refined = self.constraints.to_vec();
        for counterexample in counterexamples {
            let ViolationKind::ConstraintViolated { index } = &counterexample.violation else {
                continue;
            };
            let index = *index;
            let constraint = refined
                .get(index)
                .ok_or(AlignError::UnknownConstraint { index })?;
            let tightened = constraint.tightened(&counterexample.action)?;
            debug!(index, "constraint tightened against counterexample");
            refined[index] = tightened;
        }
        Ok(ConstraintSet::new(refined)?)
    }
}
