use sentia_types::TypesError;
use thiserror::Error;

/// Errors from the Constrained Action Optimizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypesError),

    #[error("constraint set admits no action (feasible region is empty)")]
    Infeasible,

    #[error("objective is unbounded over the feasible region")]
    Unbounded,

    #[error("counterexample references unknown constraint {index}")]
    UnknownConstraint { index: usize },

    #[error("perturbation radius must be finite and non-negative, got {epsilon}")]
    InvalidEpsilon { epsilon: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasibility_is_named_plainly() {
        assert!(AlignError::Infeasible.to_string().contains("no action"));
    }

    #[test]
    fn wraps_types_errors() {
        let err: AlignError = TypesError::EmptyVector { name: "state" }.into();
        assert!(err.to_string().contains("state"));
    }
}
