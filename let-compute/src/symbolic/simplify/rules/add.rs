//! Simplification rules for expressions involving addition, including combining like terms.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::{fraction::{extract_explicit_frac, extract_fractional, make_fraction}, rules::{do_add, first_applicable}, step::Step},
    step_collector::StepCollector,
};

/// Adds two rational coefficients into a single fraction.
///
/// Coefficients that are not rational are added symbolically.
fn add_coefficients(lhs: SymExpr, rhs: SymExpr) -> SymExpr {
    let (Some((num1, den1)), Some((num2, den2))) = (
        extract_explicit_frac(&mut lhs.clone()),
        extract_explicit_frac(&mut rhs.clone()),
    ) else {
        return lhs + rhs;
    };

    // (a / b) + (c / d) = (a*d + b*c) / (b*d)
    let numerator = SymExpr::Primary(Primary::Integer(num1 * &den2 + num2 * &den1));
    let denominator = den1 * den2;
    if denominator == 1 {
        numerator
    } else {
        make_fraction(numerator, SymExpr::Primary(Primary::Integer(denominator)))
    }
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::AddZero);
    Some(opt)
}

/// `a+(b+c) = a+b+c`
///
/// Also downgrades a sum with a single term to that term.
pub fn flatten_sum(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if terms.len() > 1 && !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        Some(terms.iter()
            .cloned()
            .fold(SymExpr::Add(Vec::new()), |sum, term| sum + term)
            .downgrade())
    })?;

    step_collector.push(Step::FlattenSum);
    Some(opt)
}

/// Splits a term into its rational coefficient and the product of its other factors.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `1/4*a*b` -> `(1/4, a*b)`
/// - `a` -> `(1, a)`
fn split_coefficient(term: &SymExpr) -> (SymExpr, SymExpr) {
    let one = || SymExpr::Primary(Primary::Integer(int(1)));
    match term {
        SymExpr::Primary(Primary::Integer(_)) => (term.clone(), one()),
        SymExpr::Exp(..) if term.is_integer_recip() => (term.clone(), one()),
        SymExpr::Mul(factors) => {
            let mut factors = factors.clone();
            let coefficient = extract_fractional(&mut factors).unwrap_or_else(one);
            (coefficient, SymExpr::Mul(factors).downgrade())
        },
        _ => (one(), term.clone()),
    }
}

/// Combines like terms, i.e. terms whose non-numeric factors are strictly equal.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `1/2*a+1/3*a = 5/6*a`
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        // (factors, summed coefficient), in order of first appearance
        let mut groups: Vec<(SymExpr, SymExpr)> = Vec::with_capacity(terms.len());
        for term in terms {
            let (coefficient, factors) = split_coefficient(term);
            match groups.iter_mut().find(|(group_factors, _)| *group_factors == factors) {
                Some((_, sum)) => {
                    let previous = std::mem::replace(sum, SymExpr::Add(Vec::new()));
                    *sum = add_coefficients(previous, coefficient);
                },
                None => groups.push((factors, coefficient)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let new_terms = groups.into_iter()
            .map(|(factors, coefficient)| {
                if coefficient.is_one() {
                    factors
                } else {
                    coefficient * factors
                }
            })
            .collect();
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    first_applicable(&[
        add_zero,
        flatten_sum,
        combine_like_terms,
    ], expr, step_collector)
}
