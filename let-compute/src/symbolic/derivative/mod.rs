//! Symbolic differentiation.
//!
//! [`derivative`] applies the sum, product, power and chain rules recursively. The result is
//! exact but not simplified, apart from dropping terms that are trivially zero and factors that
//! are trivially one; pass it to [`simplify`](crate::symbolic::simplify()) for a compact form.

mod function;

use crate::primitive::int;
use super::expr::{Primary, SymExpr};
use thiserror::Error;

/// Returns `true` if the given [`SymExpr`] is "clearly" zero. This is intended to clean up trees
/// and is not mathematically rigorous.
fn is_trivially_zero(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Integer(i)) => *i == 0,
        SymExpr::Add(sum) => sum.iter().all(is_trivially_zero),
        SymExpr::Mul(mul) => mul.iter().any(is_trivially_zero),
        SymExpr::Exp(base, exponent) => is_trivially_zero(base) && is_trivially_positive(exponent),
        _ => false,
    }
}

/// Returns `true` if the given [`SymExpr`] is a positive integer or a symbol.
fn is_trivially_positive(e: &SymExpr) -> bool {
    e.as_symbol().is_some() || e.as_integer().is_some_and(|n| n.cmp0() == std::cmp::Ordering::Greater)
}

/// Returns `true` if the given [`SymExpr`] is "clearly" one. This is intended to clean up trees
/// and is not mathematically rigorous.
fn is_trivially_unity(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Integer(i)) => *i == 1,
        SymExpr::Mul(factors) => factors.iter().all(is_trivially_unity),
        SymExpr::Exp(base, exponent) => exponent.is_zero() || is_trivially_unity(base),
        SymExpr::Add(terms) => terms.len() == 1 && is_trivially_unity(&terms[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero. Nested products are
/// flattened.
#[derive(Default)]
struct MultBuilder(Vec<SymExpr>);

impl From<MultBuilder> for SymExpr {
    fn from(value: MultBuilder) -> Self {
        SymExpr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: SymExpr) {
        if self.0.first().is_some_and(is_trivially_zero) {
            return;
        }

        if is_trivially_zero(&e) {
            self.0 = vec![SymExpr::Primary(Primary::Integer(int(0)))];
            return;
        }

        match e {
            SymExpr::Mul(factors) => factors.into_iter().for_each(|factor| self.mult(factor)),
            e if !is_trivially_unity(&e) => self.0.push(e),
            _ => {},
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum. Nested sums are flattened.
#[derive(Default)]
struct SumBuilder(Vec<SymExpr>);

impl From<SumBuilder> for SymExpr {
    fn from(value: SumBuilder) -> Self {
        SymExpr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: SymExpr) {
        match e {
            SymExpr::Add(terms) => terms.into_iter().for_each(|term| self.add(term)),
            e if !is_trivially_zero(&e) => self.0.push(e),
            _ => {},
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, with)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        let differentiated = derivative(&product[derivative_index], with)?;
        if is_trivially_zero(&differentiated) {
            continue;
        }

        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(differentiated.clone());
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// Differentiates `base^exp`.
///
/// - `(f^c)' = f' * c * f^(c-1)` when `c` does not depend on the variable
/// - `(a^g)' = g' * ln(a) * a^g` when `a` does not depend on the variable
/// - `(f^g)' = f^g * (g' * ln(f) + g * f' * f^-1)` otherwise
fn power_rule(base: &SymExpr, exp: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let base_varies = base.contains_symbol(with);
    let exp_varies = exp.contains_symbol(with);

    let mut mult_group = MultBuilder::default();
    match (base_varies, exp_varies) {
        (false, false) => return Ok(SymExpr::Primary(Primary::Integer(int(0)))),
        (true, false) => {
            let decremented = match exp.as_integer() {
                Some(n) => SymExpr::Primary(Primary::Integer(int(n - 1))),
                None => exp.clone() + SymExpr::Primary(Primary::Integer(int(-1))),
            };

            mult_group.mult(derivative(base, with)?);
            mult_group.mult(exp.clone());
            if decremented.is_one() {
                mult_group.mult(base.clone());
            } else {
                mult_group.mult(base.clone().pow(decremented));
            }
        },
        (false, true) => {
            mult_group.mult(derivative(exp, with)?);
            mult_group.mult(base.clone().ln());
            mult_group.mult(base.clone().pow(exp.clone()));
        },
        (true, true) => {
            let mut sum = SumBuilder::default();

            let mut log_term = MultBuilder::default();
            log_term.mult(derivative(exp, with)?);
            log_term.mult(base.clone().ln());
            sum.add(log_term.into());

            let mut base_term = MultBuilder::default();
            base_term.mult(exp.clone());
            base_term.mult(derivative(base, with)?);
            base_term.mult(base.clone().recip());
            sum.add(base_term.into());

            mult_group.mult(base.clone().pow(exp.clone()));
            mult_group.mult(sum.into());
        },
    }

    Ok(mult_group.into())
}

/// Errors that can occur while computing a derivative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolicDerivativeError {
    /// The function may be differentiable, but there is no rule to compute its derivative
    /// symbolically.
    #[error("cannot differentiate the function `{0}`")]
    Unsupported(String),
}

/// Computes the derivative of the given expression with respect to the symbol `with`. Returns
/// [`Err`] if the derivative could not be symbolically computed.
///
/// Every other symbol is treated as a constant.
pub fn derivative(f: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    if is_trivially_zero(f) || !f.contains_symbol(with) {
        return Ok(SymExpr::Primary(Primary::Integer(int(0))));
    }

    let expr = match f {
        SymExpr::Primary(Primary::Integer(_)) => SymExpr::Primary(Primary::Integer(int(0))),
        SymExpr::Primary(Primary::Symbol(sym)) => {
            if sym == with {
                SymExpr::Primary(Primary::Integer(int(1)))
            } else {
                SymExpr::Primary(Primary::Integer(int(0)))
            }
        },
        SymExpr::Primary(Primary::Call(func, args)) => function::function_derivative(func, args, with)?,
        SymExpr::Add(terms) => sum_rule(terms, with)?,
        SymExpr::Mul(factors) => product_rule(factors, with)?,
        SymExpr::Exp(base, exp) => power_rule(base, exp, with)?,
    };

    if is_trivially_zero(&expr) {
        Ok(SymExpr::Primary(Primary::Integer(int(0))))
    } else {
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use crate::numerical::{eval, Bindings};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn int(n: i32) -> SymExpr {
        SymExpr::integer(n)
    }

    /// Evaluates the expression with `x` (and optionally `a`) bound.
    fn eval_x(e: &SymExpr, x: f64) -> f64 {
        let mut bindings = Bindings::new();
        bindings.add_var("x", x);
        bindings.add_var("a", 1.7);
        eval(e, &bindings).unwrap()
    }

    /// Central finite difference approximation of the derivative.
    fn finite_difference(e: &SymExpr, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(e, x + DX) - eval_x(e, x - DX)) / (2.0 * DX)
    }

    fn test_for_function(function: &SymExpr, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 1e-4;

        let symbolic = derivative(function, "x").unwrap();
        for point in points {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = finite_difference(function, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For \"{function}\" at x={point}, symbolically computed derivative was {symbolically_computed} but numerically computed derivative was {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    #[test]
    fn constant() {
        assert_eq!(derivative(&sym("Kw"), "x"), Ok(int(0)));
        assert_eq!(derivative(&(sym("a") * sym("b").pow(sym("c"))), "x"), Ok(int(0)));
    }

    #[test]
    fn identity() {
        assert_eq!(derivative(&sym("x"), "x"), Ok(int(1)));
    }

    #[test]
    fn power_rule_integer() {
        // x^2 + x + 1
        let f = sym("x").pow(int(2)) + sym("x") + int(1);
        assert_eq!(derivative(&f, "x"), Ok(SymExpr::Add(vec![
            SymExpr::Mul(vec![int(2), sym("x")]),
            int(1),
        ])));
        test_for_function(&f, [0.0, 1.0, 2.0, 5.0, 8.0]);
    }

    #[test]
    fn power_rule_symbolic_exponent() {
        // d/dx x^a = a * x^(a - 1)
        let f = sym("x").pow(sym("a"));
        assert_eq!(derivative(&f, "x"), Ok(SymExpr::Mul(vec![
            sym("a"),
            sym("x").pow(sym("a") + int(-1)),
        ])));
        test_for_function(&f, [0.5, 1.0, 2.5]);
    }

    #[test]
    fn quotient() {
        // x / (x^2 + a)
        let f = sym("x") / (sym("x").pow(int(2)) + sym("a"));
        test_for_function(&f, [-2.0, 0.0, 0.3, 4.0]);
    }

    #[test]
    fn exponential() {
        // a^x
        let f = sym("a").pow(sym("x"));
        test_for_function(&f, [-1.0, 0.0, 2.0]);

        // x^x
        let f = sym("x").pow(sym("x"));
        test_for_function(&f, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn chain_rule_through_ln() {
        // ln(x^2 + 1) * a
        let f = (sym("x").pow(int(2)) + int(1)).ln() * sym("a");
        test_for_function(&f, [-1.0, 0.5, 3.0]);
    }

    #[test]
    fn let_shaped_rational() {
        // a * x^2 / (x^2 + (1 - x)^2)
        let own = sym("x").pow(int(2));
        let opposing = (int(1) - sym("x")).pow(int(2));
        let f = sym("a") * own.clone() / (own + opposing);
        test_for_function(&f, [0.1, 0.5, 0.9]);
    }

    #[test]
    fn unsupported_function() {
        let f = SymExpr::call("sin", vec![sym("x")]);
        assert_eq!(
            derivative(&f, "x"),
            Err(SymbolicDerivativeError::Unsupported("sin".to_string())),
        );
    }
}
