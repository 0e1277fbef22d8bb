use sentia_types::{StochasticMatrix, TransitionMatrix};
use tracing::{debug, warn};

use crate::entropy::shannon_entropy;
use crate::error::PhiError;
use crate::partitions::partitions_of;

/// Default ceiling on system size. Partition enumeration is Bell-number
/// combinatorial and the agent index multiplies it by 2^n subsystems;
/// beyond ten elements the search is no longer interactive.
pub const DEFAULT_MAX_ELEMENTS: usize = 10;

/// Hard ceiling regardless of configuration. Subsystem masks are 64-bit
/// and enumeration memory is hopeless long before this anyway.
const HARD_MAX_ELEMENTS: usize = 20;

/// Integrated information below this is treated as exactly zero when
/// deciding degeneracy.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Partition-Information Engine.
///
/// Computes the integrated information (phi) of a discrete
/// state-transition system by exhaustively searching set partitions of
/// its elements for the minimum information loss, and derives the
/// conscious-agent index by comparing the whole system against the
/// minimum-phi subsystem.
///
/// Both searches are combinatorial in the number of elements: phi visits
/// every set partition (Bell-number growth), and the agent index repeats
/// that for every non-empty subset of elements. The engine therefore
/// carries an explicit size guard — oversized systems are rejected with
/// [`PhiError::SizeLimitExceeded`], never silently truncated.
#[derive(Clone, Debug)]
pub struct PhiEngine {
    max_elements: usize,
}

impl PhiEngine {
    /// Engine with the default size limit of [`DEFAULT_MAX_ELEMENTS`].
    pub fn new() -> Self {
        Self {
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }

    /// Engine with an explicit size limit, capped at 20 elements.
    pub fn with_max_elements(max_elements: usize) -> Self {
        let capped = max_elements.min(HARD_MAX_ELEMENTS);
        if capped < max_elements {
            debug!(requested = max_elements, capped, "phi size limit capped");
        }
        Self {
            max_elements: capped,
        }
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    fn guard(&self, elements: usize) -> Result<(), PhiError> {
        if elements > self.max_elements {
            warn!(
                elements,
                limit = self.max_elements,
                "rejecting oversized system"
            );
            return Err(PhiError::SizeLimitExceeded {
                elements,
                limit: self.max_elements,
            });
        }
        Ok(())
    }

    /// Integrated information of the whole system.
    ///
    /// The system entropy is the Shannon entropy of the flattened
    /// row-normalized matrix. For every set partition of the elements,
    /// the partitioned entropy sums the entropy of each block's
    /// self-transition weights; phi is the minimum loss
    /// `H_sys - H_partition` across all partitions, clamped to zero.
    /// The partition that is easiest to tear along bounds how integrated
    /// the whole can be.
    ///
    /// A single-element system has no partition to tear against and is
    /// canonically 0.
    pub fn phi(&self, system: &TransitionMatrix) -> Result<f64, PhiError> {
        self.guard(system.order())?;
        Ok(self.phi_of(&system.normalized()))
    }

    /// Conscious-agent index: `(phi_sys - phi_min) / phi_sys`, where
    /// `phi_min` is the minimum phi over every non-empty subsystem.
    ///
    /// A subsystem is the original matrix with the rows of excluded
    /// elements zeroed — the remaining rows are NOT renormalized, so
    /// subsystem entropies are computed over a matrix whose excluded rows
    /// carry no mass. The full element set is itself a subsystem, so the
    /// index always lands in `[0, 1]`.
    ///
    /// A system with zero integrated information has no defined index;
    /// that degenerate case is reported as [`PhiError::DegenerateSystem`]
    /// rather than mapped to 0 or 1, either of which would misrepresent
    /// the system.
    pub fn conscious_agent_index(&self, system: &TransitionMatrix) -> Result<f64, PhiError> {
        let order = system.order();
        self.guard(order)?;

        let phi_sys = self.phi_of(&system.normalized());
        if phi_sys <= DEGENERACY_TOLERANCE {
            warn!(phi = phi_sys, "degenerate system: agent index undefined");
            return Err(PhiError::DegenerateSystem);
        }

        let mut phi_min = phi_sys;
        for mask in 1..(1u64 << order) {
            let subsystem = system.masked_normalized(mask)?;
            let phi_sub = self.phi_of(&subsystem);
            if phi_sub < phi_min {
                phi_min = phi_sub;
            }
        }

        let index = (phi_sys - phi_min) / phi_sys;
        debug!(phi_sys, phi_min, index, "agent index computed");
        Ok(index.clamp(0.0, 1.0))
    }

    /// Minimum information loss over all partitions of a normalized,
    /// possibly masked system.
    fn phi_of(&self, matrix: &StochasticMatrix) -> f64 {
        let order = matrix.order();
        if order == 1 {
            return 0.0;
        }

        let h_sys = shannon_entropy(matrix.entries());

        let mut min_loss = f64::INFINITY;
        let mut weights = Vec::with_capacity(order);
        for partition in partitions_of(order).iter() {
            let mut h_part = 0.0;
            for block in partition {
                weights.clear();
                weights.extend(block.iter().map(|&i| matrix.self_weight(i)));
                h_part += shannon_entropy(&weights);
            }
            let loss = h_sys - h_part;
            if loss < min_loss {
                min_loss = loss;
            }
        }

        if min_loss < 0.0 {
            // Floating-point entropy noise; integration is bounded below
            // by zero.
            debug!(loss = min_loss, "clamping negative partition loss");
            return 0.0;
        }
        min_loss
    }
}

impl Default for PhiEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    fn matrix(rows: Vec<Vec<f64>>) -> TransitionMatrix {
        TransitionMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn single_element_has_zero_phi() {
        let engine = PhiEngine::new();
        let phi = engine.phi(&matrix(vec![vec![1.0]])).unwrap();
        assert_eq!(phi, 0.0);
    }

    #[test]
    fn independent_system_has_zero_phi() {
        // Block-diagonal: each element only transitions to itself.
        let engine = PhiEngine::new();
        let phi = engine
            .phi(&matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]))
            .unwrap();
        assert!(phi.abs() < TOLERANCE);
    }

    #[test]
    fn weak_coupling_yields_smaller_phi_than_strong() {
        let engine = PhiEngine::new();
        let weak = engine
            .phi(&matrix(vec![vec![0.9, 0.1], vec![0.1, 0.9]]))
            .unwrap();
        let strong = engine
            .phi(&matrix(vec![vec![0.5, 0.5], vec![0.5, 0.5]]))
            .unwrap();

        assert!(weak > 0.0);
        assert!(strong > 0.0);
        assert!(weak < strong, "weak {} !< strong {}", weak, strong);
    }

    #[test]
    fn strong_coupling_phi_matches_closed_form() {
        // For the uniform 2x2 system the minimum loss is ln(4) - ln(2).
        let engine = PhiEngine::new();
        let phi = engine
            .phi(&matrix(vec![vec![0.5, 0.5], vec![0.5, 0.5]]))
            .unwrap();
        assert!((phi - 2.0f64.ln()).abs() < TOLERANCE);
    }

    #[test]
    fn size_guard_rejects_oversized_systems() {
        let engine = PhiEngine::with_max_elements(2);
        let big = matrix(vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ]);
        assert_eq!(
            engine.phi(&big).unwrap_err(),
            PhiError::SizeLimitExceeded {
                elements: 3,
                limit: 2
            }
        );
        assert_eq!(
            engine.conscious_agent_index(&big).unwrap_err(),
            PhiError::SizeLimitExceeded {
                elements: 3,
                limit: 2
            }
        );
    }

    #[test]
    fn agent_index_undefined_for_degenerate_system() {
        let engine = PhiEngine::new();
        let independent = matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(
            engine.conscious_agent_index(&independent).unwrap_err(),
            PhiError::DegenerateSystem
        );
    }

    #[test]
    fn agent_index_of_coupled_system_is_in_unit_interval() {
        let engine = PhiEngine::new();
        let coupled = matrix(vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        let index = engine.conscious_agent_index(&coupled).unwrap();
        assert!((0.0..=1.0).contains(&index), "index {}", index);
    }

    #[test]
    fn agent_index_in_unit_interval_for_three_elements() {
        let engine = PhiEngine::new();
        let system = matrix(vec![
            vec![0.6, 0.3, 0.1],
            vec![0.2, 0.5, 0.3],
            vec![0.1, 0.1, 0.8],
        ]);
        let index = engine.conscious_agent_index(&system).unwrap();
        assert!((0.0..=1.0).contains(&index), "index {}", index);
    }

    fn permuted(rows: &[Vec<f64>], perm: &[usize]) -> Vec<Vec<f64>> {
        let n = rows.len();
        let mut out = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                out[perm[i]][perm[j]] = rows[i][j];
            }
        }
        out
    }

    proptest! {
        /// phi is non-negative for every valid transition matrix.
        #[test]
        fn phi_is_non_negative(
            rows in prop::collection::vec(
                prop::collection::vec(0.05f64..1.0, 3),
                3,
            )
        ) {
            let engine = PhiEngine::new();
            let phi = engine.phi(&matrix(rows)).unwrap();
            prop_assert!(phi >= 0.0);
        }

        /// Relabeling the elements does not change integration.
        #[test]
        fn phi_is_permutation_invariant(
            rows in prop::collection::vec(
                prop::collection::vec(0.05f64..1.0, 3),
                3,
            ),
            perm_seed in 0usize..6,
        ) {
            const PERMS: [[usize; 3]; 6] = [
                [0, 1, 2], [0, 2, 1], [1, 0, 2],
                [1, 2, 0], [2, 0, 1], [2, 1, 0],
            ];
            let perm = PERMS[perm_seed];

            let engine = PhiEngine::new();
            let original = engine.phi(&matrix(rows.clone())).unwrap();
            let relabeled = engine.phi(&matrix(permuted(&rows, &perm))).unwrap();
            prop_assert!((original - relabeled).abs() < 1e-9);
        }
    }
}
