use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// One linear inequality constraint `A * action <= b`.
///
/// `A` has one row per inequality and one column per action dimension;
/// `b` carries one bound per row. Feasibility of an action means every
/// row holds elementwise. Nothing guarantees the constraint admits any
/// action at all — infeasible systems are valid input and are reported
/// by the optimizer, never silently accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstraint", into = "RawConstraint")]
pub struct Constraint {
    rows: usize,
    action_dim: usize,
    /// Row-major, `rows * action_dim` entries.
    coefficients: Vec<f64>,
    bounds: Vec<f64>,
}

impl Constraint {
    /// Build a constraint from a coefficient matrix and bound vector.
    pub fn new(coefficients: Vec<Vec<f64>>, bounds: Vec<f64>) -> Result<Self, TypesError> {
        let rows = coefficients.len();
        if rows == 0 {
            return Err(TypesError::EmptyConstraint);
        }
        if bounds.len() != rows {
            return Err(TypesError::BoundsMismatch {
                rows,
                bounds: bounds.len(),
            });
        }

        let action_dim = coefficients[0].len();
        if action_dim == 0 {
            return Err(TypesError::EmptyConstraint);
        }

        let mut flat = Vec::with_capacity(rows * action_dim);
        for (i, row) in coefficients.iter().enumerate() {
            if row.len() != action_dim {
                return Err(TypesError::RaggedConstraint {
                    row: i,
                    expected: action_dim,
                    actual: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(TypesError::NonFiniteEntry { row: i, col: j });
                }
                flat.push(value);
            }
        }
        for (i, &bound) in bounds.iter().enumerate() {
            if !bound.is_finite() {
                return Err(TypesError::NonFiniteEntry {
                    row: i,
                    col: action_dim,
                });
            }
        }

        Ok(Self {
            rows,
            action_dim,
            coefficients: flat,
            bounds,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.coefficients[row * self.action_dim..(row + 1) * self.action_dim]
    }

    pub fn bound(&self, row: usize) -> f64 {
        self.bounds[row]
    }

    /// `A * action`, one value per row.
    pub fn apply(&self, action: &[f64]) -> Result<Vec<f64>, TypesError> {
        if action.len() != self.action_dim {
            return Err(TypesError::DimensionMismatch {
                expected: self.action_dim,
                actual: action.len(),
            });
        }
        Ok((0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .zip(action)
                    .map(|(a, x)| a * x)
                    .sum()
            })
            .collect())
    }

    /// Does `A * action <= b` hold for every row?
    pub fn holds(&self, action: &[f64]) -> Result<bool, TypesError> {
        let products = self.apply(action)?;
        Ok(products
            .iter()
            .zip(&self.bounds)
            .all(|(lhs, bound)| lhs <= bound))
    }

    /// Tightened copy excluding `action` at the margin: `b' = b - A * action`.
    pub fn tightened(&self, action: &[f64]) -> Result<Self, TypesError> {
        let products = self.apply(action)?;
        let bounds = self
            .bounds
            .iter()
            .zip(&products)
            .map(|(bound, lhs)| bound - lhs)
            .collect();
        Ok(Self {
            rows: self.rows,
            action_dim: self.action_dim,
            coefficients: self.coefficients.clone(),
            bounds,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct RawConstraint {
    coefficients: Vec<Vec<f64>>,
    bounds: Vec<f64>,
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = TypesError;

    fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
        Constraint::new(raw.coefficients, raw.bounds)
    }
}

impl From<Constraint> for RawConstraint {
    fn from(constraint: Constraint) -> Self {
        RawConstraint {
            coefficients: (0..constraint.rows)
                .map(|r| constraint.row(r).to_vec())
                .collect(),
            bounds: constraint.bounds,
        }
    }
}

/// Ordered, immutable sequence of constraints sharing one action dimension.
///
/// Refinement never mutates a set in place; it produces a new set
/// (copy-on-write), so concurrent readers of a shared set never observe a
/// partially-updated state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Constraint>", into = "Vec<Constraint>")]
pub struct ConstraintSet {
    action_dim: usize,
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<Constraint>) -> Result<Self, TypesError> {
        let first = constraints.first().ok_or(TypesError::EmptyConstraintSet)?;
        let action_dim = first.action_dim();
        for constraint in &constraints {
            if constraint.action_dim() != action_dim {
                return Err(TypesError::MixedActionDimension {
                    expected: action_dim,
                    actual: constraint.action_dim(),
                });
            }
        }
        Ok(Self {
            action_dim,
            constraints,
        })
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Total number of inequality rows across all constraints.
    pub fn total_rows(&self) -> usize {
        self.constraints.iter().map(Constraint::rows).sum()
    }

    /// Does every constraint in the set hold for `action`?
    pub fn satisfied_by(&self, action: &[f64]) -> Result<bool, TypesError> {
        for constraint in &self.constraints {
            if !constraint.holds(action)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Owned copy of the constraints, for building a refined set.
    pub fn to_vec(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }
}

impl TryFrom<Vec<Constraint>> for ConstraintSet {
    type Error = TypesError;

    fn try_from(constraints: Vec<Constraint>) -> Result<Self, Self::Error> {
        ConstraintSet::new(constraints)
    }
}

impl From<ConstraintSet> for Vec<Constraint> {
    fn from(set: ConstraintSet) -> Self {
        set.constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_constraint(limit: f64) -> Constraint {
        // -limit <= x_i <= limit in two dimensions.
        Constraint::new(
            vec![
                vec![1.0, 0.0],
                vec![-1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, -1.0],
            ],
            vec![limit, limit, limit, limit],
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_coefficients() {
        let err = Constraint::new(vec![vec![1.0, 0.0], vec![1.0]], vec![1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            TypesError::RaggedConstraint {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_bounds_mismatch() {
        let err = Constraint::new(vec![vec![1.0]], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, TypesError::BoundsMismatch { rows: 1, bounds: 2 });
    }

    #[test]
    fn holds_checks_every_row() {
        let constraint = box_constraint(1.0);
        assert!(constraint.holds(&[0.5, -0.5]).unwrap());
        assert!(!constraint.holds(&[1.5, 0.0]).unwrap());
        assert!(!constraint.holds(&[0.0, -1.5]).unwrap());
    }

    #[test]
    fn holds_rejects_wrong_dimension() {
        let constraint = box_constraint(1.0);
        let err = constraint.holds(&[0.5]).unwrap_err();
        assert_eq!(err, TypesError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn tightened_excludes_the_action_at_the_margin() {
        let constraint = Constraint::new(vec![vec![1.0, 1.0]], vec![2.0]).unwrap();
        let action = [1.5, 1.5]; // A*action = 3.0, violates b = 2.0

        let tightened = constraint.tightened(&action).unwrap();
        assert!((tightened.bound(0) - (2.0 - 3.0)).abs() < 1e-12);
        assert!(!tightened.holds(&action).unwrap());
    }

    #[test]
    fn set_requires_agreeing_dimensions() {
        let a = Constraint::new(vec![vec![1.0, 0.0]], vec![1.0]).unwrap();
        let b = Constraint::new(vec![vec![1.0]], vec![1.0]).unwrap();
        let err = ConstraintSet::new(vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            TypesError::MixedActionDimension {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            ConstraintSet::new(vec![]).unwrap_err(),
            TypesError::EmptyConstraintSet
        );
    }

    #[test]
    fn set_satisfaction_requires_all_members() {
        let tight = Constraint::new(vec![vec![1.0, 0.0]], vec![0.5]).unwrap();
        let loose = Constraint::new(vec![vec![0.0, 1.0]], vec![10.0]).unwrap();
        let set = ConstraintSet::new(vec![loose, tight]).unwrap();

        assert!(set.satisfied_by(&[0.4, 5.0]).unwrap());
        // Second constraint violated even though the first holds.
        assert!(!set.satisfied_by(&[0.9, 5.0]).unwrap());
    }

    #[test]
    fn serde_round_trip() {
        let set = ConstraintSet::new(vec![box_constraint(2.0)]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let restored: ConstraintSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
    }
}
