//! Symbolic manipulation of the rational power-law expressions used by relative permeability
//! models.
//!
//! The [`symbolic`] module holds the expression tree, its printer, the differentiator and the
//! simplifier. The [`numerical`] module evaluates an expression tree in `f64`, which is how the
//! symbolic results are checked against finite differences.

pub mod numerical;
pub mod primitive;
pub mod symbolic;
