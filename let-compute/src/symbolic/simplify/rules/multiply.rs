//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::{fraction::{extract_integer_fraction, make_fraction}, rules::{do_multiply, first_applicable}, step::Step},
    step_collector::StepCollector,
};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(SymExpr::is_zero) {
            Some(SymExpr::Primary(Primary::Integer(int(0))))
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// `a*(b*c) = a*b*c`
///
/// Also downgrades a product with a single factor to that factor.
pub fn flatten_product(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.len() > 1 && !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        Some(factors.iter()
            .cloned()
            .fold(SymExpr::Mul(Vec::new()), |product, factor| product * factor)
            .downgrade())
    })?;

    step_collector.push(Step::FlattenProduct);
    Some(opt)
}

/// Simplifies numerical fractions.
///
/// `3/12 = 1/4`
/// `12/3 = 4`
pub fn reduce_numerical_fraction(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();

        // extract a fraction, an Integer and an Integer^-1
        let (numerator, denominator) = extract_integer_fraction(&mut new_factors, false, false)?;

        // reduce the fraction
        let gcd = numerator.clone().gcd(&denominator);
        if gcd == 1 {
            return None;
        }

        // insert the reduced fraction back into the factors
        Some(SymExpr::Mul(new_factors) * make_fraction(
            SymExpr::Primary(Primary::Integer(numerator / &gcd)),
            SymExpr::Primary(Primary::Integer(denominator / &gcd)),
        ))
    })?;

    step_collector.push(Step::ReduceFraction);
    Some(opt)
}

/// Splits a factor into its base and exponent. A factor that is not a power has exponent 1.
fn split_power(factor: &SymExpr) -> (SymExpr, SymExpr) {
    match factor {
        SymExpr::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
        other => (other.clone(), SymExpr::Primary(Primary::Integer(int(1)))),
    }
}

/// Returns true if two integer bases raised to the same exponent can be multiplied together.
fn same_degree_integers(lhs: &(SymExpr, SymExpr), rhs: &(SymExpr, SymExpr)) -> bool {
    lhs.1 == rhs.1 && lhs.0.is_integer() && rhs.0.is_integer()
}

/// Combines like factors.
///
/// `a^b*a^c = a^(b+c)`
/// `2^c*3^c = 6^c`
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        // (base, summed exponent), in order of first appearance
        let mut groups: Vec<(SymExpr, SymExpr)> = Vec::with_capacity(factors.len());
        for factor in factors {
            let power = split_power(factor);
            let idx = groups.iter()
                .position(|group| same_degree_integers(group, &power) || group.0 == power.0);
            let Some(idx) = idx else {
                groups.push(power);
                continue;
            };

            let merge_bases = same_degree_integers(&groups[idx], &power);
            let (base, exp) = power;
            if merge_bases {
                groups[idx].0 *= base;
            } else {
                groups[idx].1 += exp;
            }
        }

        if groups.len() == factors.len() {
            return None;
        }

        let new_factors = groups.into_iter()
            .map(|(base, exp)| if exp.is_one() { base } else { base.pow(exp) })
            .collect();
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    first_applicable(&[
        multiply_zero,
        multiply_one,
        flatten_product,
        reduce_numerical_fraction,
        combine_like_factors,
    ], expr, step_collector)
}
