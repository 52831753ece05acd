//! A representation of mathematical expressions that is easy to manipulate algebraically.
//!
//! [`SymExpr`] stores the terms and factors that make up an expression. Sums and products are
//! recursively flattened into a list of terms or factors, so that every submodule dealing with
//! symbolic manipulation can look at all the operands of an operation at once.
//!
//! # Strict equality
//!
//! A common problem that arises in symbolic computation is determining if two expressions are
//! semantically / mathematically equal, in order to determine if terms / factors are similar
//! enough to be combined, for example. However, this is extremely difficult to do, because there
//! are an infinite number of ways to represent the same expression.
//!
//! Consider the pair `x^2 + 2x + 1` and `(x + 1)^2`. Both are semantically equal, but this is not
//! immediately obvious without first applying expansion or factoring. To simplify, we need to
//! check semantic equality, but to check semantic equality, we need to simplify!
//!
//! To break the cycle, we define a subset of semantic equality for expressions, called **strict
//! equality**. Two expressions are strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//! terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives: if two expressions are strictly equal,
//! they are semantically equal. It is cheap to compute and does not depend on simplification, so
//! it can be used **in conjunction** with simplification to decide which terms to combine.
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`SymExpr`] implement **strict equality**.

mod fmt;
mod iter;

use crate::primitive::int;
use rug::Integer;
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub},
};
use super::simplify::fraction::make_fraction;

pub use iter::ExprIter;

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A variable, such as `Sw` or `Lw`.
    Symbol(String),

    /// A function call, such as `ln(x)`.
    Call(String, Vec<SymExpr>),
}

/// Adds two [`Primary`]s together. If both are integers, the numbers are added together.
/// Otherwise, the two [`Primary`]s are wrapped in a [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are integers, the numbers are multiplied
/// together. Otherwise, the two [`Primary`]s are wrapped in a [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs * rhs))
            },
            (lhs, rhs) => SymExpr::Mul(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Operator precedence of a node when it is printed, from loosest to tightest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Sums.
    Term,

    /// Products and quotients.
    Factor,

    /// Powers.
    Exp,

    /// Numbers, symbols and calls.
    Primary,
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates an integer constant.
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates a call to the function with the given name.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Returns the natural logarithm of this expression. No simplification is done.
    pub fn ln(self) -> Self {
        Self::call("ln", vec![self])
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exponent: SymExpr) -> Self {
        Self::Exp(Box::new(self), Box::new(exponent))
    }

    /// Returns `1 / self`. No simplification is done.
    pub fn recip(self) -> Self {
        self.pow(Self::integer(-1))
    }

    /// Returns the precedence of the expression.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Primary(_) => Precedence::Primary,
            Self::Add(_) => Precedence::Term,
            Self::Mul(_) => Precedence::Factor,
            // printed as a quotient
            Self::Exp(_, exp) if exp.negated().is_some() => Precedence::Factor,
            Self::Exp(..) => Precedence::Exp,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns the contained integer.
    pub fn into_integer(self) -> Option<Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is the integer 0.
    pub fn is_zero(&self) -> bool {
        self.as_integer().is_some_and(|n| *n == 0)
    }

    /// Returns true if the expression is the integer 1.
    pub fn is_one(&self) -> bool {
        self.as_integer().is_some_and(|n| *n == 1)
    }

    /// Returns true if the expression is a [`Primary::Integer`] raised to the power of -1.
    pub fn is_integer_recip(&self) -> bool {
        self.as_integer_recip().is_some()
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns a reference to
    /// the contained integer (the denominator of the fraction).
    pub fn as_integer_recip(&self) -> Option<&Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer().is_some_and(|exp| *exp == -1) {
                return base.as_integer();
            }
        }

        None
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns the contained
    /// integer (the denominator of the fraction).
    pub fn into_integer_recip(self) -> Option<Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer().is_some_and(|exp| *exp == -1) {
                return base.into_integer();
            }
        }

        None
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression carries a negative numeric sign, returns the expression with that sign
    /// flipped.
    ///
    /// - `-3` -> `3`
    /// - `-1*x*y` -> `x*y`
    /// - `-2*x` -> `2*x`
    ///
    /// Anything else returns [`None`].
    pub fn negated(&self) -> Option<Self> {
        match self {
            Self::Primary(Primary::Integer(n)) if n.cmp0() == Ordering::Less => {
                Some(Self::Primary(Primary::Integer(-n.clone())))
            },
            Self::Mul(factors) => {
                let idx = factors.iter()
                    .position(|factor| factor.as_integer().is_some_and(|n| n.cmp0() == Ordering::Less))?;
                let mut factors = factors.clone();
                let coefficient = -factors.remove(idx).into_integer()?;
                if coefficient != 1 {
                    factors.insert(idx, Self::Primary(Primary::Integer(coefficient)));
                }
                Some(Self::Mul(factors).downgrade())
            },
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in a [`SymExpr::Add`] with zero / one term, or a
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or a [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::Primary(Primary::Integer(int(0)))
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::Primary(Primary::Integer(int(1)))
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }

    /// Returns the number of nodes in the expression tree.
    pub fn complexity(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns true if the symbol with the given name appears anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Returns the names of all symbols appearing in the expression, in sorted order.
    pub fn symbols(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(SymExpr::as_symbol)
            .collect()
    }

    /// Returns a new expression with every occurrence of the symbol `name` replaced by `value`.
    ///
    /// Sums and products are rebuilt with the flattening operators, so substituting a sum into a
    /// sum does not nest. No other simplification is done.
    pub fn substitute(&self, name: &str, value: &SymExpr) -> Self {
        match self {
            Self::Primary(Primary::Symbol(sym)) if sym == name => value.clone(),
            Self::Primary(Primary::Call(func, args)) => Self::Primary(Primary::Call(
                func.clone(),
                args.iter().map(|arg| arg.substitute(name, value)).collect(),
            )),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => terms.iter()
                .map(|term| term.substitute(name, value))
                .fold(Self::Add(Vec::new()), |sum, term| sum + term)
                .downgrade(),
            Self::Mul(factors) => factors.iter()
                .map(|factor| factor.substitute(name, value))
                .fold(Self::Mul(Vec::new()), |product, factor| product * factor)
                .downgrade(),
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.substitute(name, value)),
                Box::new(exp.substitute(name, value)),
            ),
        }
    }

    /// Rank used by [`SymExpr::canonical_cmp`]; numbers sort first, sums last.
    fn rank(&self) -> u8 {
        match self {
            Self::Primary(Primary::Integer(_)) => 0,
            Self::Primary(Primary::Symbol(_)) => 1,
            Self::Primary(Primary::Call(..)) => 2,
            Self::Exp(..) => 3,
            Self::Mul(_) => 4,
            Self::Add(_) => 5,
        }
    }

    /// Total order used to lay out terms and factors deterministically when printing.
    ///
    /// Numbers come before symbols, symbols before powers, powers before products, and products
    /// before sums. Ties are broken by the printed form.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => lhs.cmp(rhs),
            (Self::Primary(Primary::Symbol(lhs)), Self::Primary(Primary::Symbol(rhs))) => lhs.cmp(rhs),
            (lhs, rhs) => lhs.to_string().cmp(&rhs.to_string()),
        })
    }

    /// Returns a copy of the expression with all terms and factors sorted by
    /// [`SymExpr::canonical_cmp`]. The result is strictly equal to `self`.
    pub fn sorted(&self) -> Self {
        match self {
            Self::Primary(Primary::Call(func, args)) => Self::Primary(Primary::Call(
                func.clone(),
                args.iter().map(SymExpr::sorted).collect(),
            )),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => {
                let mut terms = terms.iter().map(SymExpr::sorted).collect::<Vec<_>>();
                terms.sort_by(SymExpr::canonical_cmp);
                Self::Add(terms)
            },
            Self::Mul(factors) => {
                let mut factors = factors.iter().map(SymExpr::sorted).collect::<Vec<_>>();
                factors.sort_by(SymExpr::canonical_cmp);
                Self::Mul(factors)
            },
            Self::Exp(base, exp) => Self::Exp(Box::new(base.sorted()), Box::new(exp.sorted())),
        }
    }
}

/// Returns true if both lists hold strictly equal elements with the same multiplicities, in any
/// order.
fn same_multiset(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    // each element of `rhs` can be matched at most once
    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|lhs| {
        let matched = rhs.iter()
            .enumerate()
            .position(|(idx, rhs)| !used[idx] && lhs == rhs);
        match matched {
            Some(idx) => {
                used[idx] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_multiset(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined in
/// one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) | (other, Self::Add(mut terms)) => {
                terms.push(other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`SymExpr`]s together. The behavior is the same as [`Add`], except we can reuse the
/// allocated memory of `self` if possible.
impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs += rhs;
            },
            (Self::Add(terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
            },
            (Self::Add(terms), other) => {
                terms.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Add(Vec::new()));
                *lhs = owned + rhs;
            },
        }
    }
}

/// Subtracts `rhs` from `self`, stored as `self + (-1)*rhs`.
impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg()
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are combined in
/// one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) | (other, Self::Mul(mut factors)) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        match (self, rhs) {
            (Self::Primary(Primary::Integer(lhs)), Self::Primary(Primary::Integer(rhs))) => {
                *lhs *= rhs;
            },
            (Self::Mul(factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
            },
            (Self::Mul(factors), other) => {
                factors.push(other);
            },
            (lhs, rhs) => {
                let owned = std::mem::replace(lhs, Self::Mul(Vec::new()));
                *lhs = owned * rhs;
            },
        }
    }
}

/// Divides `self` by `rhs`, stored as `self * rhs^-1`.
impl Div for SymExpr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        make_fraction(self, rhs)
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is an integer, in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            expr => Self::Primary(Primary::Integer(int(-1))) * expr,
        }
    }
}

/// NOTE: Strict equality allows different orderings of terms and factors, but
/// `pretty_assertions` doesn't care about that. If a test fails and the expected terms are in a
/// different order than the generated ones, the diff will be a mess. Just a forewarning!
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    #[test]
    fn strict_equality() {
        let a = SymExpr::integer(2) * (sym("x") + (sym("y") - SymExpr::integer(5)));
        let b = (sym("y") - SymExpr::integer(5) + sym("x")) * SymExpr::integer(2);
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_2() {
        // semantically equal, but `b` is the expanded form of `a`
        let a = SymExpr::integer(2) * (sym("x") + sym("y"));
        let b = SymExpr::integer(2) * sym("x") + SymExpr::integer(2) * sym("y");
        assert_ne!(a, b);
    }

    #[test]
    fn strict_equality_counts_multiplicity() {
        let a = SymExpr::Add(vec![sym("a"), sym("a"), sym("b")]);
        let b = SymExpr::Add(vec![sym("a"), sym("b"), sym("b")]);
        // same length, and every element of one appears in the other
        assert_ne!(a, b);
        assert_ne!(a, SymExpr::Add(vec![sym("a"), sym("b")]));
        assert_eq!(a, SymExpr::Add(vec![sym("b"), sym("a"), sym("a")]));

        let a = SymExpr::Mul(vec![sym("a"), sym("a"), sym("b")]);
        let b = SymExpr::Mul(vec![sym("a"), sym("b"), sym("b")]);
        assert_ne!(a, b);
        assert_eq!(a, SymExpr::Mul(vec![sym("a"), sym("b"), sym("a")]));
    }

    #[test]
    fn flattening() {
        let expr = sym("x") + (sym("y") + sym("z")) + sym("w");
        assert_eq!(expr, SymExpr::Add(vec![sym("x"), sym("y"), sym("z"), sym("w")]));

        let expr = sym("a") * (sym("b") * sym("c"));
        assert_eq!(expr, SymExpr::Mul(vec![sym("a"), sym("b"), sym("c")]));
    }

    #[test]
    fn subtraction_and_division() {
        let expr = (sym("Sw") - sym("Sw_min")) / (sym("Sw_max") - sym("Sw_min"));
        assert_eq!(expr, SymExpr::Mul(vec![
            SymExpr::Add(vec![
                sym("Sw"),
                SymExpr::Mul(vec![SymExpr::integer(-1), sym("Sw_min")]),
            ]),
            SymExpr::Exp(
                Box::new(SymExpr::Add(vec![
                    sym("Sw_max"),
                    SymExpr::Mul(vec![SymExpr::integer(-1), sym("Sw_min")]),
                ])),
                Box::new(SymExpr::integer(-1)),
            ),
        ]));
    }

    #[test]
    fn integer_folding() {
        assert_eq!(SymExpr::integer(2) + SymExpr::integer(3), SymExpr::integer(5));
        assert_eq!(SymExpr::integer(2) * SymExpr::integer(-3), SymExpr::integer(-6));
        assert_eq!(-SymExpr::integer(4), SymExpr::integer(-4));

        let mut acc = SymExpr::integer(1);
        acc += sym("x");
        acc *= sym("y");
        assert_eq!(acc, SymExpr::Mul(vec![
            SymExpr::Add(vec![SymExpr::integer(1), sym("x")]),
            sym("y"),
        ]));
    }

    #[test]
    fn negated() {
        assert_eq!(SymExpr::integer(-3).negated(), Some(SymExpr::integer(3)));
        assert_eq!((-sym("x")).negated(), Some(sym("x")));
        assert_eq!(
            (SymExpr::integer(-2) * sym("x") * sym("y")).negated(),
            Some(SymExpr::Mul(vec![SymExpr::integer(2), sym("x"), sym("y")])),
        );
        assert_eq!(sym("x").negated(), None);
        assert_eq!((sym("x") - sym("y")).negated(), None);
    }

    #[test]
    fn substitute_rebuilds() {
        let expr = (sym("Sw") - sym("Sw_min")).pow(sym("Lw"));
        let substituted = expr.substitute("Sw", &sym("Sw_max"));
        assert_eq!(substituted, (sym("Sw_max") - sym("Sw_min")).pow(sym("Lw")));

        // the input is untouched
        assert!(expr.contains_symbol("Sw"));
        assert!(!substituted.contains_symbol("Sw"));
    }

    #[test]
    fn substitute_flattens_sums() {
        let expr = sym("x") + sym("y");
        let substituted = expr.substitute("x", &(sym("a") + sym("b")));
        assert_eq!(substituted, SymExpr::Add(vec![sym("a"), sym("b"), sym("y")]));
    }

    #[test]
    fn symbols_and_complexity() {
        let expr = sym("Kw") * sym("Sw").pow(sym("Lw")) + sym("x").ln();
        assert_eq!(
            expr.symbols().into_iter().collect::<Vec<_>>(),
            vec!["Kw", "Lw", "Sw", "x"],
        );
        // Add, Mul, Kw, Exp, Sw, Lw, ln(..), x
        assert_eq!(expr.complexity(), 8);
    }

    #[test]
    fn sorted_is_strictly_equal() {
        let expr = sym("z") * SymExpr::integer(3) + sym("a").pow(SymExpr::integer(2)) + SymExpr::integer(1);
        let sorted = expr.sorted();
        assert_eq!(sorted, expr);
        assert_eq!(sorted.to_string(), "1 + a^2 + 3 * z");
    }
}
