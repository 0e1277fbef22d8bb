use sentia_types::TypesError;
use thiserror::Error;

/// Errors from the Partition-Information Engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhiError {
    #[error("invalid system matrix: {0}")]
    InvalidInput(#[from] TypesError),

    #[error("system has {elements} elements, exceeding the configured limit of {limit}")]
    SizeLimitExceeded { elements: usize, limit: usize },

    #[error("system has zero integrated information; the agent index is undefined")]
    DegenerateSystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_types_errors() {
        let err: PhiError = TypesError::ZeroSumRow { row: 2 }.into();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn size_limit_names_both_numbers() {
        let err = PhiError::SizeLimitExceeded {
            elements: 14,
            limit: 10,
        };
        let text = err.to_string();
        assert!(text.contains("14"));
        assert!(text.contains("10"));
    }
}
