//! Infix printing of [`SymExpr`].
//!
//! Terms carrying a negative sign are printed with `-`, and factors raised to a negative power
//! are collected into a denominator, so `a + (-1)*b*c^-1` prints as `a - b / c`. Parentheses are
//! inserted from [`Precedence`].

use super::{Precedence, Primary, SymExpr};
use std::fmt::{self, Display, Formatter};

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

impl Display for SymExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => fmt_sum(terms, f),
            Self::Mul(factors) => fmt_product(factors, f),
            Self::Exp(..) if self.precedence() == Precedence::Factor => {
                fmt_product(std::slice::from_ref(self), f)
            },
            Self::Exp(base, exp) => fmt_power(base, exp, f),
        }
    }
}

/// Writes `expr`, wrapped in parentheses if it binds looser than `min`.
fn fmt_operand(expr: &SymExpr, min: Precedence, f: &mut Formatter<'_>) -> fmt::Result {
    if expr.precedence() < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn fmt_sum(terms: &[SymExpr], f: &mut Formatter<'_>) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }

    for (idx, term) in terms.iter().enumerate() {
        match term.negated() {
            Some(abs) => {
                write!(f, "{}", if idx == 0 { "-" } else { " - " })?;
                fmt_operand(&abs, Precedence::Factor, f)?;
            },
            None if idx == 0 => write!(f, "{}", term)?,
            None => write!(f, " + {}", term)?,
        }
    }

    Ok(())
}

fn fmt_product(factors: &[SymExpr], f: &mut Formatter<'_>) -> fmt::Result {
    let mut negative = false;
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for factor in factors {
        match factor {
            SymExpr::Primary(Primary::Integer(_)) => match factor.negated() {
                Some(abs) => {
                    negative = !negative;
                    if !abs.is_one() {
                        numerator.push(abs);
                    }
                },
                None => numerator.push(factor.clone()),
            },
            SymExpr::Exp(base, exp) => match exp.negated() {
                Some(exp) if exp.is_one() => denominator.push((**base).clone()),
                Some(exp) => denominator.push(SymExpr::Exp(base.clone(), Box::new(exp))),
                None => numerator.push(factor.clone()),
            },
            _ => numerator.push(factor.clone()),
        }
    }

    // numeric coefficients lead
    numerator.sort_by_key(|factor| !factor.is_integer());

    if negative {
        write!(f, "-")?;
    }

    if numerator.is_empty() {
        write!(f, "1")?;
    }
    for (idx, factor) in numerator.iter().enumerate() {
        if idx > 0 {
            write!(f, " * ")?;
        }
        fmt_operand(factor, Precedence::Exp, f)?;
    }

    match denominator.as_slice() {
        [] => Ok(()),
        [single] => {
            write!(f, " / ")?;
            fmt_operand(single, Precedence::Exp, f)
        },
        many => {
            write!(f, " / (")?;
            for (idx, factor) in many.iter().enumerate() {
                if idx > 0 {
                    write!(f, " * ")?;
                }
                fmt_operand(factor, Precedence::Exp, f)?;
            }
            write!(f, ")")
        },
    }
}

fn fmt_power(base: &SymExpr, exp: &SymExpr, f: &mut Formatter<'_>) -> fmt::Result {
    // `a^b^c` would be ambiguous, and negative bases need their sign kept inside
    if base.precedence() <= Precedence::Exp || base.negated().is_some() {
        write!(f, "({})", base)?;
    } else {
        write!(f, "{}", base)?;
    }

    write!(f, "^")?;
    if exp.precedence() < Precedence::Primary || exp.negated().is_some() {
        write!(f, "({})", exp)
    } else {
        write!(f, "{}", exp)
    }
}
