//! Dense two-phase simplex over free action variables.
//!
//! Solves `minimize c . x  subject to  A x <= b` where `x` is
//! unrestricted in sign. Free variables are split as `x = u - v` with
//! `u, v >= 0`, every inequality row gains a slack variable, and Phase I
//! drives a full set of artificial variables to zero before Phase II
//! minimizes the real objective. Bland's rule (smallest-index entering
//! column, smallest-basis-index tie-break on the ratio test) guarantees
//! termination.
//!
//! EVERY constraint in the set participates; the inequality rows of all
//! constraints are stacked into one system.

use sentia_types::{ConstraintSet, TypesError};
use tracing::{debug, warn};

use crate::error::AlignError;

const EPS: f64 = 1e-9;
const FEASIBILITY_TOLERANCE: f64 = 1e-7;

enum SolveOutcome {
    Optimal(f64),
    Unbounded,
}

struct Tableau {
    /// Constraint rows; each row has `columns + 1` entries, rhs last.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    columns: usize,
}

impl Tableau {
    fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.columns]
    }

    fn reduced_cost(&self, cost: &[f64], col: usize) -> f64 {
        let mut reduced = cost[col];
        for (i, row) in self.rows.iter().enumerate() {
            reduced -= cost[self.basis[i]] * row[col];
        }
        reduced
    }

    fn objective_value(&self, cost: &[f64]) -> f64 {
        self.basis
            .iter()
            .enumerate()
            .map(|(i, &b)| cost[b] * self.rhs(i))
            .sum()
    }

    fn pivot(&mut self, pivot_row: usize, pivot_col: usize) {
        let divisor = self.rows[pivot_row][pivot_col];
        for value in self.rows[pivot_row].iter_mut() {
            *value /= divisor;
        }
        for i in 0..self.rows.len() {
            if i == pivot_row {
                continue;
            }
            let factor = self.rows[i][pivot_col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..=self.columns {
                self.rows[i][j] -= factor * self.rows[pivot_row][j];
            }
        }
        self.basis[pivot_row] = pivot_col;
    }

    /// Run simplex iterations for `cost`, allowing only columns below
    /// `enterable` to enter the basis.
    fn solve(&mut self, cost: &[f64], enterable: usize) -> SolveOutcome {
        loop {
            // Bland: smallest-index improving column.
            let entering = (0..enterable).find(|&j| self.reduced_cost(cost, j) < -EPS);
            let Some(col) = entering else {
                return SolveOutcome::Optimal(self.objective_value(cost));
            };

            let mut leaving: Option<usize> = None;
            let mut best_ratio = f64::INFINITY;
            for i in 0..self.rows.len() {
                let coeff = self.rows[i][col];
                if coeff <= EPS {
                    continue;
                }
                let ratio = self.rhs(i) / coeff;
                let take = match leaving {
                    None => true,
                    Some(current) => {
                        ratio < best_ratio - EPS
                            || ((ratio - best_ratio).abs() <= EPS
                                && self.basis[i] < self.basis[current])
                    }
                };
                if take {
                    leaving = Some(i);
                    best_ratio = ratio;
                }
            }

            let Some(row) = leaving else {
                return SolveOutcome::Unbounded;
            };
            self.pivot(row, col);
        }
    }
}

/// Minimize `objective . action` subject to every constraint in the set.
pub(crate) fn minimize(
    objective: &[f64],
    constraints: &ConstraintSet,
) -> Result<Vec<f64>, AlignError> {
    let dim = constraints.action_dim();
    if objective.len() != dim {
        return Err(AlignError::InvalidInput(TypesError::DimensionMismatch {
            expected: dim,
            actual: objective.len(),
        }));
    }

    let row_count = constraints.total_rows();
    let split = 2 * dim;
    let structural = split + row_count;
    let columns = structural + row_count;

    // Stack every inequality row of every constraint, flipping rows with
    // negative bounds so all right-hand sides start non-negative.
    let mut rows = Vec::with_capacity(row_count);
    let mut basis = Vec::with_capacity(row_count);
    let mut index = 0;
    for constraint in constraints.iter() {
        for r in 0..constraint.rows() {
            let coefficients = constraint.row(r);
            let bound = constraint.bound(r);
            let sign = if bound < 0.0 { -1.0 } else { 1.0 };

            let mut row = vec![0.0; columns + 1];
            for j in 0..dim {
                row[j] = sign * coefficients[j];
                row[dim + j] = -sign * coefficients[j];
            }
            row[split + index] = sign;
            row[structural + index] = 1.0;
            row[columns] = sign * bound;
            rows.push(row);
            basis.push(structural + index);
            index += 1;
        }
    }

    let mut tableau = Tableau {
        rows,
        basis,
        columns,
    };

    // Phase I: minimize the artificial mass. Artificials start basic and
    // may only leave, so entering is restricted to structural columns.
    let mut phase_one = vec![0.0; columns];
    for j in structural..columns {
        phase_one[j] = 1.0;
    }
    match tableau.solve(&phase_one, structural) {
        SolveOutcome::Optimal(residual) if residual > FEASIBILITY_TOLERANCE => {
            warn!(residual, "constraint system is infeasible");
            return Err(AlignError::Infeasible);
        }
        SolveOutcome::Optimal(_) => {}
        SolveOutcome::Unbounded => {
            // Phase I is bounded below by zero; this cannot happen for a
            // well-formed tableau.
            warn!("phase-one search failed to converge");
            return Err(AlignError::Infeasible);
        }
    }

    // Phase II: minimize the real objective over the split variables;
    // artificial columns are barred from re-entering.
    let mut phase_two = vec![0.0; columns];
    for j in 0..dim {
        phase_two[j] = objective[j];
        phase_two[dim + j] = -objective[j];
    }
    let value = match tableau.solve(&phase_two, structural) {
        SolveOutcome::Optimal(value) => value,
        SolveOutcome::Unbounded => {
            warn!("objective is unbounded over the feasible region");
            return Err(AlignError::Unbounded);
        }
    };

    let mut halves = vec![0.0; split];
    for (i, &b) in tableau.basis.iter().enumerate() {
        if b < split {
            halves[b] = tableau.rhs(i);
        }
    }
    let action: Vec<f64> = (0..dim).map(|j| halves[j] - halves[dim + j]).collect();
    debug!(value, ?action, "linear program solved");
    Ok(action)
}
