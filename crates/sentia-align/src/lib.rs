//! # sentia-align
//!
//! Constrained Action Optimizer — formal verification of actions against
//! a value function and linear constraints, linear-programming action
//! search, and adversarial robustness probing.
//!
//! ## Components
//!
//! - [`ValueAlignmentVerifier`] — feasibility verdicts, counterexample
//!   generation, and copy-on-write constraint refinement
//! - [`AdversarialValueTester`] — seeded perturbation sweeps that hunt
//!   for states where a policy deviates from the constrained optimum
//! - a dense two-phase simplex solver backing
//!   [`optimize_action`](ValueAlignmentVerifier::optimize_action),
//!   honoring every constraint in the set
//!
//! ## Separation of concerns
//!
//! The value function scores desirability; the constraint system decides
//! feasibility. `verify_action` never conflates the two: a feasible
//! action with a negative value still verifies, and the score is carried
//! only as diagnostics. Infeasible constraint systems are valid input —
//! the optimizer reports [`AlignError::Infeasible`] instead of
//! fabricating an action.

#![deny(unsafe_code)]

pub mod adversarial;
pub mod error;
mod simplex;
pub mod verifier;

pub use adversarial::{AdversarialValueTester, RobustnessReport, DEFAULT_ACTION_TOLERANCE};
pub use error::AlignError;
pub use verifier::{Counterexample, Policy, ValueAlignmentVerifier, ValueFunction, ViolationKind};
