//! # sentia-types
//!
//! Core data model shared by the Sentia analysis engines: transition
//! matrices for discrete state-transition systems, linear inequality
//! constraint systems over action vectors, and dimension-checked vector
//! helpers.
//!
//! Every type validates its full input contract at construction and is
//! immutable afterwards. Invalid input (non-square matrices, negative
//! entries, zero-sum rows, ragged constraints, empty vectors) is reported
//! as a [`TypesError`] at the boundary — never coerced into NaN or a
//! placeholder value downstream.

#![deny(unsafe_code)]

pub mod constraint;
pub mod error;
pub mod matrix;
pub mod vector;

pub use constraint::{Constraint, ConstraintSet};
pub use error::TypesError;
pub use matrix::{StochasticMatrix, TransitionMatrix};
pub use vector::{dot, validate_vector};
