//! # sentia-phi
//!
//! Partition-Information Engine — integrated information (phi) for
//! discrete state-transition systems.
//!
//! Phi measures how much a system's behavior is irreducible to the
//! independent behavior of its parts: the minimum entropy loss across
//! every way of partitioning the system's elements. The conscious-agent
//! index then compares a whole system's phi against the minimum phi of
//! any of its subsystems.
//!
//! Both computations enumerate combinatorial spaces — Bell-number-many
//! partitions, and 2^n - 1 subsystems for the agent index — so the
//! engine enforces an explicit, configurable size limit instead of ever
//! truncating a search silently.
//!
//! ## Components
//!
//! - [`PhiEngine`] — phi and the conscious-agent index, with a size guard
//! - [`partitions`] — cached exhaustive set-partition enumeration
//! - [`entropy`] — normalized Shannon entropy over weight vectors
//! - [`trace`] — phi observation series and moment comparison

#![deny(unsafe_code)]

pub mod engine;
pub mod entropy;
pub mod error;
pub mod partitions;
pub mod trace;

pub use engine::{PhiEngine, DEFAULT_MAX_ELEMENTS};
pub use entropy::shannon_entropy;
pub use error::PhiError;
pub use partitions::{partitions_of, Partition};
pub use trace::{PhiTrace, TraceComparison};
