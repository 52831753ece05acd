//! Simplification rules for powers.
//!
//! Symbols stand for positive real quantities, so `0^x = 0` for a symbolic exponent `x`, and the
//! power of a power is only collapsed for integer outer exponents.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::{rules::{do_power, first_applicable}, step::Step},
    step_collector::StepCollector,
};
use rug::ops::Pow;
use std::cmp::Ordering;

/// Integer powers are only evaluated up to this exponent.
const MAX_EVALUATED_EXPONENT: u32 = 64;

/// `a^0 = 1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.is_zero() {
            Some(SymExpr::Primary(Primary::Integer(int(1))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `1^a = 1`
pub fn power_of_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, _| {
        if lhs.is_one() {
            Some(SymExpr::Primary(Primary::Integer(int(1))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOfOne);
    Some(opt)
}

/// `0^a = 0`, where `a` is a positive integer or a symbol
pub fn power_of_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let positive = rhs.as_symbol().is_some()
            || rhs.as_integer().is_some_and(|n| n.cmp0() == Ordering::Greater);
        if lhs.is_zero() && positive {
            Some(SymExpr::Primary(Primary::Integer(int(0))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOfZero);
    Some(opt)
}

/// Evaluates powers of integers.
///
/// `2^3 = 8`
/// `2^-3 = 8^-1`
pub fn evaluate_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let base = lhs.as_integer()?;
        let exp = rhs.as_integer()?;
        if *base == 0 || *base == 1 || *exp == 1 || *exp == -1 {
            // handled by other rules, or already in canonical form
            return None;
        }

        let magnitude = exp.clone().abs().to_u32().filter(|n| *n <= MAX_EVALUATED_EXPONENT)?;
        let value = SymExpr::Primary(Primary::Integer(base.clone().pow(magnitude)));
        if exp.cmp0() == Ordering::Less {
            Some(value.recip())
        } else {
            Some(value)
        }
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, where `c` is an integer
pub fn power_of_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if let SymExpr::Exp(base, inner) = lhs {
            if rhs.is_integer() {
                return Some(SymExpr::Exp(
                    base.clone(),
                    Box::new((**inner).clone() * rhs.clone()),
                ));
            }
        }

        None
    })?;

    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// Applies all power rules.
///
/// All power rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    first_applicable(&[
        power_zero,
        power_one,
        power_of_one,
        power_of_zero,
        evaluate_power,
        power_of_power,
    ], expr, step_collector)
}
