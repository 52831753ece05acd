//! Strategies for rational expressions: combining a sum of fractions over a common denominator,
//! expanding the numerator, and pulling out the factors common to every term.
//!
//! These rewrites can temporarily make an expression larger, so they are not rules. The
//! simplifier tries them once after normalization and keeps the result only if it is smaller.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::{normalize_with, rules::distribute::distributive_property, step::Step, Rules},
    step_collector::StepCollector,
};
use rug::Integer;
use std::cmp::Ordering;

/// Number of times a numerator is combined over a common denominator and expanded again.
const MAX_ROUNDS: usize = 4;

/// A factor split into its base and exponent.
type Power = (SymExpr, SymExpr);

/// Returns the terms of a sum, or the expression itself as a single term.
fn terms_of(expr: &SymExpr) -> &[SymExpr] {
    match expr {
        SymExpr::Add(terms) => terms,
        other => std::slice::from_ref(other),
    }
}

/// Returns the factors of a product, or the expression itself as a single factor.
fn factors_of(expr: &SymExpr) -> &[SymExpr] {
    match expr {
        SymExpr::Mul(factors) => factors,
        other => std::slice::from_ref(other),
    }
}

/// `base^exp`, or just `base` if `exp` is 1.
fn power(base: SymExpr, exp: SymExpr) -> SymExpr {
    if exp.is_one() {
        base
    } else {
        base.pow(exp)
    }
}

/// Adds a power to the list, summing the exponents if its base is already present.
fn merge_power(powers: &mut Vec<Power>, (base, exp): Power) {
    match powers.iter_mut().find(|(other, _)| *other == base) {
        Some((_, total)) => {
            let previous = std::mem::replace(total, SymExpr::Add(Vec::new()));
            *total = previous + exp;
        },
        None => powers.push((base, exp)),
    }
}

/// Returns `lhs - rhs` if it simplifies to an integer.
pub(crate) fn exponent_difference(lhs: &SymExpr, rhs: &SymExpr, rules: Rules) -> Option<Integer> {
    if lhs == rhs {
        return Some(int(0));
    }

    if let (Some(lhs), Some(rhs)) = (lhs.as_integer(), rhs.as_integer()) {
        return Some(int(lhs - rhs));
    }

    let difference = expand(&(lhs.clone() - rhs.clone()), &[], &mut ());
    normalize_with(&difference, rules, &mut ()).into_integer()
}

/// Returns true if the factors contain `factor` raised to a negative power.
fn has_reciprocal(factors: &[SymExpr], factor: &SymExpr) -> bool {
    factors.iter().any(|other| match other {
        SymExpr::Exp(base, exp) => **base == *factor && exp.negated().is_some(),
        _ => false,
    })
}

/// Distributes products over sums, recursively through sums and products (but not into powers
/// or function arguments).
///
/// Sums listed in `deferred` are distributed only after every other sum, and a sum is never
/// distributed when the same product also divides by it, so that it can cancel instead.
pub(crate) fn expand(
    expr: &SymExpr,
    deferred: &[SymExpr],
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    match expr {
        SymExpr::Add(terms) => terms.iter()
            .map(|term| expand(term, deferred, step_collector))
            .fold(SymExpr::Add(Vec::new()), |sum, term| sum + term)
            .downgrade(),
        SymExpr::Mul(factors) => {
            let product = factors.iter()
                .map(|factor| expand(factor, deferred, step_collector))
                .fold(SymExpr::Mul(Vec::new()), |product, factor| product * factor)
                .downgrade();
            let SymExpr::Mul(factors) = &product else {
                return product;
            };

            let distributable = |factor: &SymExpr| {
                matches!(factor, SymExpr::Add(_)) && !has_reciprocal(factors, factor)
            };
            let idx = factors.iter()
                .position(|factor| distributable(factor) && !deferred.contains(factor))
                .or_else(|| factors.iter().position(distributable));
            let Some(idx) = idx else {
                return product;
            };

            // `distributive_property` distributes over the first sum it finds
            let mut reordered = factors.clone();
            let sum = reordered.remove(idx);
            reordered.insert(0, sum);
            match distributive_property(&SymExpr::Mul(reordered), step_collector) {
                Some(distributed) => expand(&distributed, deferred, step_collector),
                None => product,
            }
        },
        _ => expr.clone(),
    }
}

/// Splits a term into the factors of its numerator and the bases and (positive) exponents of its
/// denominator.
fn split_term(term: &SymExpr) -> (Vec<SymExpr>, Vec<Power>) {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors_of(term) {
        match factor {
            SymExpr::Exp(base, exp) => match exp.negated() {
                Some(exp) => merge_power(&mut denominator, ((**base).clone(), exp)),
                None => numerator.push(factor.clone()),
            },
            _ => numerator.push(factor.clone()),
        }
    }
    (numerator, denominator)
}

/// Rewrites the terms of a sum over their least common denominator.
///
/// Returns the new numerator and the denominator as a list of bases and positive exponents. The
/// denominator is empty if no term is a fraction. Returns [`None`] if two exponents of the same
/// base cannot be compared.
fn together(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<(SymExpr, Vec<Power>)> {
    let split = terms_of(expr).iter().map(split_term).collect::<Vec<_>>();

    let mut common: Vec<Power> = Vec::new();
    for (_, denominator) in &split {
        for (base, exp) in denominator {
            match common.iter_mut().find(|(common_base, _)| common_base == base) {
                Some((_, common_exp)) => {
                    if exponent_difference(exp, common_exp, rules)?.cmp0() == Ordering::Greater {
                        *common_exp = exp.clone();
                    }
                },
                None => common.push((base.clone(), exp.clone())),
            }
        }
    }

    if common.is_empty() {
        return Some((expr.clone(), common));
    }

    let mut numerator = SymExpr::Add(Vec::new());
    for (factors, denominator) in split {
        let mut term = SymExpr::Mul(factors);
        for (base, exp) in &common {
            let missing = match denominator.iter().find(|(own_base, _)| own_base == base) {
                Some((_, own_exp)) => SymExpr::integer(exponent_difference(exp, own_exp, rules)?),
                None => exp.clone(),
            };
            if !missing.is_zero() {
                term *= power(base.clone(), missing);
            }
        }
        numerator += term.downgrade();
    }

    step_collector.push(Step::CombineFractions);
    Some((numerator.downgrade(), common))
}

/// Pulls the factors shared by every term of a sum out of the sum.
///
/// `6*a*x^n + 4*a*x^(n+1) = 2*a*x^n*(3 + 2*x)`
///
/// A base is shared if every term has a power of it, and the exponents differ by integers; the
/// smallest exponent is pulled out. If every coefficient is negative, `-1` is pulled out as well.
fn factor_terms(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<SymExpr> {
    let SymExpr::Add(terms) = expr else {
        return None;
    };

    let split = terms.iter()
        .map(|term| {
            let mut coefficient = int(1);
            let mut powers: Vec<Power> = Vec::new();
            for factor in factors_of(term) {
                match factor {
                    SymExpr::Primary(Primary::Integer(n)) => coefficient *= n,
                    SymExpr::Exp(base, exp) => merge_power(&mut powers, ((**base).clone(), (**exp).clone())),
                    other => merge_power(&mut powers, (other.clone(), SymExpr::integer(1))),
                }
            }
            (coefficient, powers)
        })
        .collect::<Vec<_>>();

    let (first, rest) = split.split_first()?;
    let mut common: Vec<Power> = Vec::new();
    'candidates: for (base, exp) in &first.1 {
        if common.iter().any(|(common_base, _)| common_base == base) {
            continue;
        }

        let mut min = exp.clone();
        for (_, powers) in rest {
            let Some((_, other)) = powers.iter().find(|(other_base, _)| other_base == base) else {
                continue 'candidates;
            };
            let Some(difference) = exponent_difference(other, &min, rules) else {
                continue 'candidates;
            };
            if difference.cmp0() == Ordering::Less {
                min = other.clone();
            }
        }
        common.push((base.clone(), min));
    }

    let mut gcd = split.iter().fold(int(0), |gcd, (coefficient, _)| gcd.gcd(coefficient));
    if gcd == 0 || (common.is_empty() && gcd == 1) {
        return None;
    }
    if split.iter().all(|(coefficient, _)| coefficient.cmp0() == Ordering::Less) {
        gcd = -gcd;
    }

    let mut remainder = SymExpr::Add(Vec::new());
    for (coefficient, powers) in &split {
        let mut term = SymExpr::Mul(vec![SymExpr::integer(Integer::from(coefficient / &gcd))]);
        for (base, exp) in powers {
            match common.iter().find(|(common_base, _)| common_base == base) {
                Some((_, min)) => {
                    let difference = exponent_difference(exp, min, rules)?;
                    if difference != 0 {
                        term *= power(base.clone(), SymExpr::integer(difference));
                    }
                },
                None => term *= power(base.clone(), exp.clone()),
            }
        }
        remainder += term.downgrade();
    }

    let mut factored = SymExpr::Mul(vec![SymExpr::integer(gcd)]);
    for (base, min) in common {
        factored *= power(base, min);
    }
    factored *= remainder.downgrade();

    step_collector.push(Step::FactorCommonTerms);
    Some(factored)
}

/// Rewrites the expression as a single fraction with an expanded, then factored, numerator.
pub(crate) fn rational_form(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<SymExpr> {
    let mut numerator = expr.clone();
    let mut denominator: Vec<Power> = Vec::new();
    for _ in 0..MAX_ROUNDS {
        let (combined, common) = together(&numerator, rules, step_collector)?;
        let done = common.is_empty();
        let deferred = common.iter().map(|(base, _)| base.clone()).collect::<Vec<_>>();
        denominator.extend(common);

        let expanded = expand(&combined, &deferred, step_collector);
        numerator = normalize_with(&expanded, rules, step_collector);
        if done {
            break;
        }
    }

    let numerator = factor_terms(&numerator, rules, step_collector).unwrap_or(numerator);
    let fraction = denominator.into_iter()
        .fold(numerator, |fraction, (base, exp)| fraction * base.pow(-exp));
    Some(normalize_with(&fraction, rules, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::simplify::rules;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    #[test]
    fn symbolic_exponent_difference() {
        let lw = sym("Lw");
        let lw_minus_one = lw.clone() - SymExpr::integer(1);
        assert_eq!(exponent_difference(&lw, &lw_minus_one, rules::all), Some(int(1)));
        assert_eq!(exponent_difference(&lw_minus_one, &lw, rules::all), Some(int(-1)));
        assert_eq!(exponent_difference(&lw, &sym("Tw"), rules::all), None);
    }

    #[test]
    fn expand_defers_cancelling_sums() {
        // (a + b) * (c + d)^-1 * (c + d) keeps `c + d` so it can cancel
        let cd = sym("c") + sym("d");
        let expr = (sym("a") + sym("b")) * cd.clone().recip() * cd.clone();
        let expanded = expand(&expr, &[], &mut ());
        assert_eq!(expanded, SymExpr::Add(vec![
            SymExpr::Mul(vec![cd.clone().recip(), cd.clone(), sym("a")]),
            SymExpr::Mul(vec![cd.clone().recip(), cd, sym("b")]),
        ]));
    }

    #[test]
    fn together_uses_largest_exponent() {
        // x/q + y/q^2 = (x*q + y) / q^2
        let q = sym("q");
        let expr = sym("x") / q.clone() + sym("y") * q.clone().pow(SymExpr::integer(-2));
        let mut steps: Vec<Step> = Vec::new();
        let (numerator, denominator) = together(&expr, rules::all, &mut steps).unwrap();
        assert_eq!(numerator, sym("x") * q.clone() + sym("y"));
        assert_eq!(denominator, vec![(q, SymExpr::integer(2))]);
        assert_eq!(steps, vec![Step::CombineFractions]);
    }

    #[test]
    fn factors_coefficients_and_powers() {
        // -6*a*x^n - 4*a*x^(n+1) = -2*a*x^n*(3 + 2*x)
        let n = sym("n");
        let expr = SymExpr::integer(-6) * sym("a") * sym("x").pow(n.clone())
            + SymExpr::integer(-4) * sym("a") * sym("x").pow(n.clone() + SymExpr::integer(1));
        let factored = factor_terms(&expr, rules::all, &mut ()).unwrap();
        assert_eq!(
            normalize_with(&factored, rules::all, &mut ()),
            SymExpr::Mul(vec![
                SymExpr::integer(-2),
                sym("a"),
                sym("x").pow(n),
                SymExpr::integer(3) + SymExpr::integer(2) * sym("x"),
            ]),
        );
    }

    #[test]
    fn repeated_bases_are_merged() {
        // a*a*b + a*b*b = a*b*(a + b), even before like factors are combined
        let (a, b) = (sym("a"), sym("b"));
        let expr = a.clone() * a.clone() * b.clone() + a.clone() * b.clone() * b.clone();
        let factored = factor_terms(&expr, rules::all, &mut ()).unwrap();
        assert_eq!(
            normalize_with(&factored, rules::all, &mut ()),
            SymExpr::Mul(vec![a.clone(), b.clone(), a + b]),
        );

        // x^-1 * x^-1 contributes x^2 to the common denominator
        let x = sym("x");
        let expr = x.clone().recip() * x.clone().recip() + sym("y") * x.clone().recip();
        let (numerator, denominator) = together(&expr, rules::all, &mut ()).unwrap();
        assert_eq!(denominator, vec![(x.clone(), SymExpr::integer(2))]);
        assert_eq!(
            normalize_with(&numerator, rules::all, &mut ()),
            SymExpr::integer(1) + sym("y") * x,
        );
    }

    #[test]
    fn nothing_to_factor() {
        let expr = sym("a") + sym("b");
        assert_eq!(factor_terms(&expr, rules::all, &mut ()), None);
    }
}
