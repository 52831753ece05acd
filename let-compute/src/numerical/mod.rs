//! Numerical evaluation of symbolic expressions.
//!
//! This is a small `f64` evaluator used to check symbolic results, such as comparing a derivative
//! against a finite difference, or confirming that simplification preserved the value of an
//! expression.

use crate::symbolic::expr::{Primary, SymExpr};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A symbol in the expression has no value.
    #[error("no value bound to the symbol `{0}`")]
    UnboundSymbol(String),

    /// The expression calls a function the evaluator does not know.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// The expression evaluated to infinity or NaN.
    #[error("`{0}` does not evaluate to a finite number")]
    NonFinite(String),
}

/// Values bound to the symbols of an expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    vars: HashMap<String, f64>,
}

impl Bindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value to a symbol, replacing any previous value.
    pub fn add_var(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    /// Returns the value bound to the symbol, if any.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }
}

fn eval_call(name: &str, args: &[SymExpr], bindings: &Bindings) -> Result<f64, EvalError> {
    match (name, args) {
        ("ln", [arg]) => Ok(eval_inner(arg, bindings)?.ln()),
        ("sqrt", [arg]) => Ok(eval_inner(arg, bindings)?.sqrt()),
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

fn eval_inner(expr: &SymExpr, bindings: &Bindings) -> Result<f64, EvalError> {
    match expr {
        SymExpr::Primary(Primary::Integer(n)) => Ok(n.to_f64()),
        SymExpr::Primary(Primary::Symbol(name)) => bindings.get_var(name)
            .ok_or_else(|| EvalError::UnboundSymbol(name.clone())),
        SymExpr::Primary(Primary::Call(name, args)) => eval_call(name, args, bindings),
        SymExpr::Add(terms) => terms.iter()
            .try_fold(0.0, |acc, term| Ok(acc + eval_inner(term, bindings)?)),
        SymExpr::Mul(factors) => factors.iter()
            .try_fold(1.0, |acc, factor| Ok(acc * eval_inner(factor, bindings)?)),
        SymExpr::Exp(base, exp) => {
            let base = eval_inner(base, bindings)?;
            match exp.as_integer().and_then(|n| n.to_i32()) {
                Some(n) => Ok(base.powi(n)),
                None => Ok(base.powf(eval_inner(exp, bindings)?)),
            }
        },
    }
}

/// Evaluates the expression with the given symbol values.
///
/// Intermediate results may be infinite; only the final value must be finite.
pub fn eval(expr: &SymExpr, bindings: &Bindings) -> Result<f64, EvalError> {
    let value = eval_inner(expr, bindings)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite(expr.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    fn int(n: i32) -> SymExpr {
        SymExpr::integer(n)
    }

    #[test]
    fn arithmetic() {
        let mut bindings = Bindings::new();
        bindings.add_var("x", 3.0);
        bindings.add_var("y", 0.5);

        // (x - 1) / y + x^2
        let expr = (sym("x") - int(1)) / sym("y") + sym("x").pow(int(2));
        assert_relative_eq!(eval(&expr, &bindings).unwrap(), 13.0);
    }

    #[test]
    fn symbolic_exponent_and_ln() {
        let mut bindings = Bindings::new();
        bindings.add_var("S", 0.25);
        bindings.add_var("L", 1.5);

        let expr = sym("S").pow(sym("L")) * sym("S").ln();
        assert_relative_eq!(
            eval(&expr, &bindings).unwrap(),
            0.25f64.powf(1.5) * 0.25f64.ln(),
            epsilon = 1e-12,
        );
    }

    #[test]
    fn rebinding_replaces_value() {
        let mut bindings = Bindings::new();
        bindings.add_var("x", 1.0);
        bindings.add_var("x", 2.0);
        assert_eq!(bindings.get_var("x"), Some(2.0));
        assert_eq!(bindings.get_var("y"), None);
    }

    #[test]
    fn unbound_symbol() {
        let bindings = Bindings::new();
        assert_eq!(
            eval(&(sym("Kw") + int(1)), &bindings),
            Err(EvalError::UnboundSymbol("Kw".to_string())),
        );
    }

    #[test]
    fn unknown_function() {
        let bindings = Bindings::new();
        assert_eq!(
            eval(&SymExpr::call("sin", vec![int(0)]), &bindings),
            Err(EvalError::UnknownFunction("sin".to_string())),
        );
    }

    #[test]
    fn division_by_zero_is_not_finite() {
        let bindings = Bindings::new();
        let expr = int(1) / int(0);
        assert!(matches!(eval(&expr, &bindings), Err(EvalError::NonFinite(_))));
    }
}
