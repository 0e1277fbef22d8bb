use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Square non-negative transition matrix over the elements of a dynamical
/// system.
///
/// Row `i` holds the outgoing transition weights of element `i`.
/// Construction validates the full input contract: square shape, finite
/// non-negative entries, and a positive sum in every row. A zero-sum row
/// cannot be normalized and is reported here as [`TypesError::ZeroSumRow`]
/// rather than surfacing as NaN deep inside an entropy computation.
///
/// The matrix is immutable after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct TransitionMatrix {
    order: usize,
    /// Row-major, `order * order` entries.
    data: Vec<f64>,
}

impl TransitionMatrix {
    /// Build a matrix from explicit rows, validating every invariant.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TypesError> {
        let order = rows.len();
        if order == 0 {
            return Err(TypesError::EmptyMatrix);
        }

        let mut data = Vec::with_capacity(order * order);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != order {
                return Err(TypesError::NotSquare {
                    row: i,
                    expected: order,
                    actual: row.len(),
                });
            }
            let mut sum = 0.0;
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(TypesError::NonFiniteEntry { row: i, col: j });
                }
                if value < 0.0 {
                    return Err(TypesError::NegativeEntry {
                        row: i,
                        col: j,
                        value,
                    });
                }
                sum += value;
                data.push(value);
            }
            if sum <= 0.0 {
                return Err(TypesError::ZeroSumRow { row: i });
            }
        }

        Ok(Self { order, data })
    }

    /// Number of system elements (the matrix is `order x order`).
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.order + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.order..(row + 1) * self.order]
    }

    /// Row-stochastic form: every row divided by its sum.
    pub fn normalized(&self) -> StochasticMatrix {
        self.masked(&vec![true; self.order])
    }

    /// Subsystem view selected by `mask` (bit `i` set keeps element `i`).
    ///
    /// Rows outside the mask are all-zero; rows inside are normalized.
    /// Excluded rows are NOT removed and the remaining rows are NOT
    /// renormalized against them: subsystem entropy computations operate
    /// on a full-size matrix whose excluded rows carry no mass.
    ///
    /// The 64-bit mask addresses the first 64 elements; subsystem
    /// selection on larger matrices is not supported.
    pub fn masked_normalized(&self, mask: u64) -> Result<StochasticMatrix, TypesError> {
        let keep: Vec<bool> = (0..self.order)
            .map(|i| i < 64 && mask & (1u64 << i) != 0)
            .collect();
        if !keep.iter().any(|&k| k) {
            return Err(TypesError::EmptyMask);
        }
        Ok(self.masked(&keep))
    }

    fn masked(&self, keep: &[bool]) -> StochasticMatrix {
        let order = self.order;
        let mut data = vec![0.0; order * order];
        for i in 0..order {
            if !keep[i] {
                continue;
            }
            let row = self.row(i);
            let sum: f64 = row.iter().sum();
            for (j, &value) in row.iter().enumerate() {
                data[i * order + j] = value / sum;
            }
        }
        StochasticMatrix {
            order,
            data,
            active: keep.to_vec(),
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for TransitionMatrix {
    type Error = TypesError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TransitionMatrix> for Vec<Vec<f64>> {
    fn from(matrix: TransitionMatrix) -> Self {
        (0..matrix.order)
            .map(|i| matrix.row(i).to_vec())
            .collect()
    }
}

/// Row-normalized view of a [`TransitionMatrix`], possibly restricted to a
/// subsystem.
///
/// Active rows sum to 1; excluded rows are all-zero. This is the only
/// matrix type in the crate allowed to carry zero rows.
#[derive(Clone, Debug, PartialEq)]
pub struct StochasticMatrix {
    order: usize,
    data: Vec<f64>,
    active: Vec<bool>,
}

impl StochasticMatrix {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.order + col]
    }

    /// All entries, row-major. Total mass equals the number of active rows.
    pub fn entries(&self) -> &[f64] {
        &self.data
    }

    /// Self-transition weight of element `i`.
    pub fn self_weight(&self, i: usize) -> f64 {
        self.data[i * self.order + i]
    }

    pub fn is_active(&self, row: usize) -> bool {
        self.active[row]
    }

    /// Number of rows carrying probability mass.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&active| active).count()
    }
}
