//! The rewrite rules of the simplifier, grouped by the kind of node they rewrite.
//!
//! A rule looks at a single node and returns `Some(expr)` with the rewritten node, or `None` if it
//! does not apply. A rule that applies pushes exactly one [`Step`] to the step collector. Visiting
//! the nodes of the tree is the simplifier's job.

pub mod add;
pub mod distribute;
pub mod multiply;
pub mod power;

use crate::symbolic::step_collector::StepCollector;
use super::{step::Step, Rules, SymExpr};

/// Calls `f` with the terms of a sum. Any other node is left alone.
pub(crate) fn do_add(expr: &SymExpr, f: impl FnOnce(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    let SymExpr::Add(terms) = expr else {
        return None;
    };
    f(terms)
}

/// Calls `f` with the factors of a product. Any other node is left alone.
pub(crate) fn do_multiply(expr: &SymExpr, f: impl FnOnce(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = expr else {
        return None;
    };
    f(factors)
}

/// Calls `f` with the base and exponent of a power. Any other node is left alone.
pub(crate) fn do_power(expr: &SymExpr, f: impl FnOnce(&SymExpr, &SymExpr) -> Option<SymExpr>) -> Option<SymExpr> {
    let SymExpr::Exp(base, exp) = expr else {
        return None;
    };
    f(base, exp)
}

/// Tries each rule in order and returns the result of the first one that applies.
pub(crate) fn first_applicable(
    rules: &[Rules],
    expr: &SymExpr,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<SymExpr> {
    rules.iter().find_map(|rule| rule(expr, step_collector))
}

/// Applies the first rule of any group that applies.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    first_applicable(&[add::all, multiply::all, power::all, distribute::all], expr, step_collector)
}
