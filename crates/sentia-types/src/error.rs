use thiserror::Error;

/// Errors from constructing or combining core data types.
///
/// Every variant represents invalid input reported at the construction
/// boundary. Nothing here is recoverable by retry; the caller must fix
/// the input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    #[error("matrix has no rows")]
    EmptyMatrix,

    #[error("matrix is not square: row {row} has {actual} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("negative entry {value} at ({row}, {col})")]
    NegativeEntry { row: usize, col: usize, value: f64 },

    #[error("non-finite entry at ({row}, {col})")]
    NonFiniteEntry { row: usize, col: usize },

    #[error("row {row} sums to zero and cannot be normalized")]
    ZeroSumRow { row: usize },

    #[error("subsystem mask selects no elements")]
    EmptyMask,

    #[error("empty vector: {name}")]
    EmptyVector { name: &'static str },

    #[error("non-finite value at index {index} of {name}")]
    NonFiniteVectorEntry { name: &'static str, index: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("constraint has no rows")]
    EmptyConstraint,

    #[error("ragged constraint matrix: row {row} has {actual} entries, expected {expected}")]
    RaggedConstraint {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("constraint has {rows} rows but {bounds} bounds")]
    BoundsMismatch { rows: usize, bounds: usize },

    #[error("constraint set is empty")]
    EmptyConstraintSet,

    #[error("constraints disagree on action dimension: expected {expected}, got {actual}")]
    MixedActionDimension { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_offending_row() {
        let err = TypesError::ZeroSumRow { row: 3 };
        assert!(err.to_string().contains("row 3"));

        let err = TypesError::NotSquare {
            row: 1,
            expected: 4,
            actual: 2,
        };
        assert!(err.to_string().contains("expected 4"));
    }
}
