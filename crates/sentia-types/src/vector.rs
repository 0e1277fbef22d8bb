//! Dimension-checked helpers for plain `f64` state and action vectors.

use crate::error::TypesError;

/// Validate a state or action vector: non-empty, all entries finite.
///
/// `name` identifies the vector in the error ("state", "action", ...).
pub fn validate_vector(name: &'static str, values: &[f64]) -> Result<(), TypesError> {
    if values.is_empty() {
        return Err(TypesError::EmptyVector { name });
    }
    for (index, value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(TypesError::NonFiniteVectorEntry { name, index });
        }
    }
    Ok(())
}

/// Inner product of two equal-length vectors.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, TypesError> {
    if a.len() != b.len() {
        return Err(TypesError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty() {
        assert_eq!(
            validate_vector("state", &[]).unwrap_err(),
            TypesError::EmptyVector { name: "state" }
        );
    }

    #[test]
    fn validate_rejects_nan() {
        let err = validate_vector("action", &[1.0, f64::NAN]).unwrap_err();
        assert_eq!(
            err,
            TypesError::NonFiniteVectorEntry {
                name: "action",
                index: 1
            }
        );
    }

    #[test]
    fn dot_checks_lengths() {
        assert!((dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap() - 11.0).abs() < 1e-12);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }
}
