//! Symbolic derivatives of the functions that can appear in a [`SymExpr`].

use crate::primitive::int;
use crate::symbolic::expr::{Primary, SymExpr};
use crate::symbolic::simplify::fraction::make_fraction;

use super::MultBuilder;
use super::derivative;
use super::SymbolicDerivativeError;

/// Computes the derivative of a supported function and performs the chain rule.
pub(super) fn function_derivative(func: &str, args: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();

    match (func, args) {
        ("sqrt", [arg]) => {
            let half = make_fraction(
                SymExpr::Primary(Primary::Integer(int(1))),
                SymExpr::Primary(Primary::Integer(int(2))),
            );
            return derivative(&arg.clone().pow(half), with);
        },
        ("ln", [arg]) => {
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(arg.clone().recip());
        },
        _ => {
            return Err(SymbolicDerivativeError::Unsupported(func.to_string()));
        },
    };

    Ok(mult_group.into())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn ln_chain_rule() {
        // d/dx ln(3x) = 3 * (3x)^-1
        let arg = SymExpr::integer(3) * SymExpr::symbol("x");
        let derived = function_derivative("ln", std::slice::from_ref(&arg), "x").unwrap();
        assert_eq!(derived, SymExpr::Mul(vec![SymExpr::integer(3), arg.recip()]));
    }

    #[test]
    fn sqrt_as_power() {
        // d/dx sqrt(x) = 2^-1 * x^(1/2 - 1)
        let x = SymExpr::symbol("x");
        let derived = function_derivative("sqrt", std::slice::from_ref(&x), "x").unwrap();
        let half = SymExpr::integer(1) * SymExpr::integer(2).recip();
        assert_eq!(derived, SymExpr::Mul(vec![
            SymExpr::integer(2).recip(),
            x.pow(half + SymExpr::integer(-1)),
        ]));
    }

    #[test]
    fn wrong_arity_is_unsupported() {
        let args = [SymExpr::symbol("x"), SymExpr::symbol("y")];
        assert_eq!(
            function_derivative("ln", &args, "x"),
            Err(SymbolicDerivativeError::Unsupported("ln".to_string())),
        );
    }
}
