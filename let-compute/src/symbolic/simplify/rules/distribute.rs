//! Simplification rules related to the distributive property.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::{do_multiply, do_power}, step::Step},
    step_collector::StepCollector,
};

/// `a*(b+c) = a*b + a*c`
///
/// This rule is not part of [`all`]; expansion is only applied on request by the rational
/// strategies, since it usually increases the size of the expression.
pub fn distributive_property(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        // find the first `SymExpr::Add`, and distribute every other factor over it
        let idx = factors.iter().position(|factor| matches!(factor, SymExpr::Add(_)))?;
        let mut factors_to_distribute = factors.to_vec();
        let SymExpr::Add(add_factor_terms) = factors_to_distribute.remove(idx) else {
            return None;
        };

        let new_terms = add_factor_terms.into_iter()
            .map(|term| SymExpr::Mul(factors_to_distribute.clone()) * term)
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms))
    })?;

    step_collector.push(Step::DistributiveProperty);
    Some(opt)
}

/// `(a*b)^c = a^c * b^c`, where `c` is an integer
pub fn distribute_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if let SymExpr::Mul(factors) = lhs {
            if !rhs.is_integer() {
                return None;
            }

            let new_factors = factors.iter()
                .map(|factor| factor.clone().pow(rhs.clone()))
                .collect::<Vec<_>>();

            return Some(SymExpr::Mul(new_factors));
        }

        None
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// Applies the distribution rules that are safe to apply repeatedly.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    distribute_power(expr, step_collector)
}
