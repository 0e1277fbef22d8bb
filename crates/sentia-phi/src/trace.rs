//! Phi observation series and cross-series comparison.
//!
//! Simulation harnesses record one phi value per step and compare the
//! resulting series (e.g. a baseline system against a perturbed or
//! candidate one) by their first two moments.

use serde::{Deserialize, Serialize};

/// An ordered series of phi observations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhiTrace {
    values: Vec<f64>,
}

impl PhiTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn push(&mut self, phi: f64) {
        self.values.push(phi);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Arithmetic mean; 0.0 for an empty trace.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation; 0.0 for an empty trace.
    pub fn std(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }
}

/// Moment comparison between a baseline and a candidate phi trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceComparison {
    pub baseline_mean: f64,
    pub baseline_std: f64,
    pub candidate_mean: f64,
    pub candidate_std: f64,
    /// candidate mean - baseline mean
    pub mean_difference: f64,
    /// candidate std - baseline std
    pub std_difference: f64,
}

impl TraceComparison {
    pub fn between(baseline: &PhiTrace, candidate: &PhiTrace) -> Self {
        let baseline_mean = baseline.mean();
        let baseline_std = baseline.std();
        let candidate_mean = candidate.mean();
        let candidate_std = candidate.std();
        Self {
            baseline_mean,
            baseline_std,
            candidate_mean,
            candidate_std,
            mean_difference: candidate_mean - baseline_mean,
            std_difference: candidate_std - baseline_std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn empty_trace_has_zero_moments() {
        let trace = PhiTrace::new();
        assert!(trace.is_empty());
        assert_eq!(trace.mean(), 0.0);
        assert_eq!(trace.std(), 0.0);
    }

    #[test]
    fn mean_and_std_of_known_series() {
        let trace = PhiTrace::from_values(vec![1.0, 2.0, 3.0, 4.0]);
        assert!((trace.mean() - 2.5).abs() < TOLERANCE);
        // Population std of 1..4 is sqrt(1.25).
        assert!((trace.std() - 1.25f64.sqrt()).abs() < TOLERANCE);
    }

    #[test]
    fn constant_series_has_zero_std() {
        let trace = PhiTrace::from_values(vec![0.7; 10]);
        assert!(trace.std().abs() < TOLERANCE);
    }

    #[test]
    fn comparison_reports_signed_differences() {
        let baseline = PhiTrace::from_values(vec![1.0, 1.0, 1.0]);
        let candidate = PhiTrace::from_values(vec![2.0, 3.0, 4.0]);
        let report = TraceComparison::between(&baseline, &candidate);

        assert!((report.mean_difference - 2.0).abs() < TOLERANCE);
        assert!(report.std_difference > 0.0);
    }

    #[test]
    fn comparison_serializes() {
        let a = PhiTrace::from_values(vec![0.1, 0.2]);
        let b = PhiTrace::from_values(vec![0.3, 0.4]);
        let report = TraceComparison::between(&a, &b);
        let json = serde_json::to_string(&report).unwrap();
        let restored: TraceComparison = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, report);
    }
}
