//! Simplification of algebraic expressions.
//!
//! Simplification happens in two phases:
//!
//! 1. **Normalization.** The [`rules`] are applied to every node of the tree, children before
//!    parents, and the whole pass is repeated until no rule applies anymore. Every rule reduces
//!    the complexity of the node it rewrites, so this reaches a fixed point.
//! 2. **Rational strategies.** Sums of fractions are put over a common denominator, the numerator
//!    is expanded and normalized again (which is where cancellations happen), and the factors
//!    shared by all terms of the numerator are pulled out. The result is only kept if it is
//!    smaller than the normalized expression.
//!
//! The final expression has its terms and factors sorted, so printing it is deterministic.
//!
//! All rewrites assume that symbols stand for positive real quantities. This is what makes rules
//! like `x^a * x^b = x^(a+b)` valid for any exponents.

pub(crate) mod fraction;
mod rational;
pub mod rules;
pub mod step;

use super::{
    expr::{Primary, SymExpr},
    step_collector::{Counting, StepCollector},
};
use step::Step;
use tracing::{debug, warn};

/// A set of simplification rules, applied to one node at a time. See [`rules::all`].
pub type Rules = fn(&SymExpr, &mut dyn StepCollector<Step>) -> Option<SymExpr>;

/// Maximum number of bottom-up passes over the tree.
const MAX_PASSES: usize = 64;

/// Maximum number of rewrites applied to a single node in one pass.
const MAX_REWRITES_PER_NODE: usize = 32;

/// Simplifies the children of the expression, then applies the rules to the expression itself
/// until none applies.
fn simplify_node(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    let mut expr = match expr {
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::call(
            name.clone(),
            args.iter()
                .map(|arg| simplify_node(arg, rules, step_collector))
                .collect(),
        ),
        SymExpr::Primary(_) => expr.clone(),
        SymExpr::Add(terms) => SymExpr::Add(
            terms.iter()
                .map(|term| simplify_node(term, rules, step_collector))
                .collect(),
        ),
        SymExpr::Mul(factors) => SymExpr::Mul(
            factors.iter()
                .map(|factor| simplify_node(factor, rules, step_collector))
                .collect(),
        ),
        SymExpr::Exp(base, exp) => SymExpr::Exp(
            Box::new(simplify_node(base, rules, step_collector)),
            Box::new(simplify_node(exp, rules, step_collector)),
        ),
    };

    for _ in 0..MAX_REWRITES_PER_NODE {
        match rules(&expr, step_collector) {
            Some(next) => expr = next,
            None => break,
        }
    }

    expr
}

/// Applies the rules bottom-up until a fixed point is reached.
pub(crate) fn normalize_with(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    let mut expr = expr.clone();
    for pass in 0..MAX_PASSES {
        let mut counting = Counting::new(&mut *step_collector);
        expr = simplify_node(&expr, rules, &mut counting);
        if counting.count() == 0 {
            return expr;
        }
        debug!(pass, rewrites = counting.count(), "simplification pass");
    }

    warn!(passes = MAX_PASSES, "simplification stopped before reaching a fixed point");
    expr
}

fn simplify_inner(
    expr: &SymExpr,
    rules: Rules,
    step_collector: &mut dyn StepCollector<Step>,
) -> SymExpr {
    let normalized = normalize_with(expr, rules, step_collector);

    let mut rational_steps = Vec::new();
    let simplified = match rational::rational_form(&normalized, rules, &mut rational_steps) {
        Some(rational) if rational.complexity() < normalized.complexity() => {
            debug!(
                before = normalized.complexity(),
                after = rational.complexity(),
                "using rational form",
            );
            for step in rational_steps {
                step_collector.push(step);
            }
            rational
        },
        _ => normalized,
    };

    simplified.sorted()
}

/// Applies the normalization rules to the expression until none applies, without the rational
/// strategies.
pub fn normalize(expr: &SymExpr) -> SymExpr {
    normalize_with(expr, rules::all, &mut ())
}

/// Simplifies the given expression.
///
/// The result is semantically equal to the input for positive values of every symbol. If nothing
/// can be simplified, the result is strictly equal to the input.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    simplify_inner(expr, rules::all, &mut ())
}

/// Simplifies the given expression using the given set of rules.
pub fn simplify_with(expr: &SymExpr, rules: Rules) -> SymExpr {
    simplify_inner(expr, rules, &mut ())
}

/// Simplifies the given expression, returning the simplified expression and the steps taken.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_inner(expr, rules::all, &mut steps);
    (simplified, steps)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use crate::numerical::{eval, Bindings};
    use crate::symbolic::derivative::derivative;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use super::*;

    fn only_add(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
        rules::add::all(expr, step_collector)
    }

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn int(n: i32) -> SymExpr {
        SymExpr::integer(n)
    }

    #[test]
    fn like_terms() {
        let x = sym("x");
        assert_eq!(simplify(&(x.clone() + x.clone() + x.clone())), int(3) * x);
    }

    #[test]
    fn like_factors() {
        let x = sym("x");
        assert_eq!(simplify(&(x.clone() * x.clone())), x.clone().pow(int(2)));
        assert_eq!(simplify(&(x.clone().pow(int(2)) / x.clone())), x);
    }

    #[test]
    fn nested_zero_and_one() {
        // (x + 0) * 1 + 0 * y
        let expr = (sym("x") + int(0)) * int(1) + int(0) * sym("y");
        assert_eq!(simplify(&expr), sym("x"));
    }

    #[test]
    fn numeric_folding() {
        // 2^3 * 4^-1 = 2
        let expr = int(2).pow(int(3)) * int(4).recip();
        assert_eq!(simplify(&expr), int(2));
    }

    #[test]
    fn normalized_range_endpoints() {
        let d = sym("Sw_max") - sym("Sw_min");
        let swe = (sym("Sw") - sym("Sw_min")) / d;
        assert_eq!(simplify(&swe.substitute("Sw", &sym("Sw_min"))), int(0));
        assert_eq!(simplify(&swe.substitute("Sw", &sym("Sw_max"))), int(1));
    }

    #[test]
    fn fractions_over_common_denominator() {
        // x/(x+1) + 1/(x+1) = 1
        let x = sym("x");
        let expr = x.clone() / (x.clone() + int(1)) + int(1) / (x + int(1));
        assert_eq!(simplify(&expr), int(1));
    }

    #[test]
    fn common_factor() {
        // a*b + a*c = a*(b + c)
        let expr = sym("a") * sym("b") + sym("a") * sym("c");
        assert_eq!(simplify(&expr), sym("a") * (sym("b") + sym("c")));
    }

    #[test]
    fn common_factor_with_symbolic_exponents() {
        // x^n + x^(n+1) = x^n * (1 + x)
        let n = sym("n");
        let expr = sym("x").pow(n.clone()) + sym("x").pow(n.clone() + int(1));
        assert_eq!(simplify(&expr), sym("x").pow(n) * (int(1) + sym("x")));
    }

    #[test]
    fn irreducible_is_unchanged() {
        let expr = sym("Kw") * sym("Sw").pow(sym("Lw"));
        assert_eq!(simplify(&expr), expr);
    }

    #[test]
    fn steps_are_recorded() {
        let (simplified, steps) = simplify_with_steps(&(sym("x") + int(0)));
        assert_eq!(simplified, sym("x"));
        assert_eq!(steps, vec![Step::AddZero]);
    }

    #[test]
    fn custom_rules() {
        // the multiplication rules are not part of the set, so `1*x` stays
        let expr = int(1) * sym("x") + int(0);
        assert_eq!(simplify_with(&expr, only_add), int(1) * sym("x"));
    }

    #[test]
    fn deterministic_output() {
        let expr = sym("z") * sym("b") + sym("a") + int(2) * sym("y");
        let first = simplify(&expr).to_string();
        let second = simplify(&expr).to_string();
        assert_eq!(first, second);
        assert_eq!(first, "a + 2 * y + b * z");
    }

    #[test]
    fn custom_rules_keep_repeated_factors_apart() {
        // without the multiplication rules, `a*a*b` and `a*b*b` are not like terms
        let (a, b) = (sym("a"), sym("b"));
        let expr = a.clone() * a.clone() * b.clone() + a * b.clone() * b;
        let simplified = simplify_with(&expr, only_add);

        let mut bindings = Bindings::new();
        bindings.add_var("a", 2.0);
        bindings.add_var("b", 3.0);
        assert_relative_eq!(eval(&simplified, &bindings).unwrap(), 30.0);
        assert_relative_eq!(eval(&simplify(&expr), &bindings).unwrap(), 30.0);
    }

    #[test]
    fn simplification_preserves_value() {
        let (x, y, a, n) = (sym("x"), sym("y"), sym("a"), sym("n"));
        let let_shaped = a.clone() * x.clone().pow(int(2))
            / (x.clone().pow(int(2)) + (int(1) - x.clone()).pow(int(2)));
        let exprs = [
            x.clone() + x.clone() + y.clone() * x.clone() - x.clone() * y.clone() * int(2),
            x.clone() / (x.clone() + int(1)) + y.clone() / (x.clone() + int(1)),
            x.clone().pow(n.clone()) + int(3) * x.clone().pow(n.clone() + int(1)),
            (x.clone() * y.clone()).pow(int(-2)) * x.clone().pow(int(3)) + a.clone() / y.clone(),
            x.clone() * x.clone() * y.clone() - x.clone() * y.clone() * y.clone(),
            (a.clone() - x.clone()) / (a.clone() + y.clone()).pow(n.clone()) * (a + y).pow(int(2)),
            derivative(&let_shaped, "x").unwrap(),
        ];

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for expr in &exprs {
            let simplified = simplify(expr);
            for _ in 0..16 {
                let mut bindings = Bindings::new();
                for name in ["x", "y", "a", "n"] {
                    bindings.add_var(name, rng.gen_range(0.1..3.0));
                }

                let expected = eval(expr, &bindings).unwrap();
                let actual = eval(&simplified, &bindings).unwrap();
                assert_relative_eq!(actual, expected, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }
}
