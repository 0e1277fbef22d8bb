//! Exhaustive set-partition enumeration with a process-wide cache.
//!
//! The number of set partitions of `n` elements is the Bell number B(n),
//! which grows super-exponentially (B(10) = 115_975, B(12) = 4_213_597).
//! Enumeration is only tractable for small `n`; the engine's size guard
//! keeps callers honest. Because the agent index computes phi for every
//! one of the 2^n - 1 subsystems of a fixed-size system, the enumeration
//! for a given `n` is cached and shared rather than recomputed per call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A set partition: disjoint, non-empty blocks of element indices whose
/// union is `{0..n-1}`.
pub type Partition = Vec<Vec<usize>>;

static CACHE: OnceLock<Mutex<HashMap<usize, Arc<Vec<Partition>>>>> = OnceLock::new();

/// All set partitions of `{0..n-1}`, cached per `n`.
///
/// The first call for a given `n` enumerates and stores the partitions;
/// later calls (including phi calls on every subsystem of an n-element
/// system) share the same `Arc`.
pub fn partitions_of(n: usize) -> Arc<Vec<Partition>> {
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
    guard.entry(n).or_insert_with(|| Arc::new(enumerate(n))).clone()
}

/// Enumerate partitions bottom-up: each partition of the first `k`
/// elements extends to partitions of `k + 1` elements by appending the
/// new element as a singleton block, or by merging it into each existing
/// block.
fn enumerate(n: usize) -> Vec<Partition> {
    if n == 0 {
        return Vec::new();
    }

    let mut partitions: Vec<Partition> = vec![vec![vec![0]]];
    for element in 1..n {
        let mut next = Vec::with_capacity(partitions.len() * 2);
        for partition in &partitions {
            let mut appended = partition.clone();
            appended.push(vec![element]);
            next.push(appended);

            for i in 0..partition.len() {
                let mut merged = partition.clone();
                merged[i].push(element);
                next.push(merged);
            }
        }
        partitions = next;
    }
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bell numbers B(1)..B(6).
    const BELL: [usize; 6] = [1, 2, 5, 15, 52, 203];

    #[test]
    fn counts_match_bell_numbers() {
        for (i, &expected) in BELL.iter().enumerate() {
            assert_eq!(partitions_of(i + 1).len(), expected, "B({})", i + 1);
        }
    }

    #[test]
    fn zero_elements_has_no_partitions() {
        assert!(partitions_of(0).is_empty());
    }

    #[test]
    fn every_partition_covers_the_index_set() {
        for partition in partitions_of(4).iter() {
            let mut seen = vec![false; 4];
            for block in partition {
                assert!(!block.is_empty());
                for &index in block {
                    assert!(!seen[index], "index {} appears twice", index);
                    seen[index] = true;
                }
            }
            assert!(seen.iter().all(|&covered| covered));
        }
    }

    #[test]
    fn includes_the_trivial_and_singleton_partitions() {
        let partitions = partitions_of(3);
        assert!(partitions
            .iter()
            .any(|p| p.len() == 1 && p[0].len() == 3));
        assert!(partitions
            .iter()
            .any(|p| p.len() == 3 && p.iter().all(|block| block.len() == 1)));
    }

    #[test]
    fn repeated_calls_share_the_cached_enumeration() {
        let first = partitions_of(5);
        let second = partitions_of(5);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
