//! Tools to help manipulate fractions.

use crate::primitive::int;
use crate::symbolic::expr::{Primary, SymExpr};
use rug::Integer;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] containing two factors. The first factor is the
/// numerator, and the second factor is the denominator raised to the power of -1.
pub(crate) fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    numerator *
        SymExpr::Exp(
            Box::new(denominator),
            Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
        )
}

/// Extracts a numerical fraction from the factors of a [`SymExpr::Mul`].
///
/// Numerical fractions are represented as a [`Primary::Integer`] numerator next to a
/// [`SymExpr::Exp`] whose base is a [`Primary::Integer`] and whose exponent is `-1`.
///
/// This function finds the first factor of each kind, removes them, and returns the numerator and
/// denominator. If `numerator_optional` is `true`, a missing numerator is reported as an implied
/// 1; `denominator_optional` does the same for the denominator. Otherwise a missing part makes the
/// function return [`None`], and the factors are left untouched.
pub(crate) fn extract_integer_fraction(
    factors: &mut Vec<SymExpr>,
    numerator_optional: bool,
    denominator_optional: bool,
) -> Option<(Integer, Integer)> {
    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);

    match (numerator_idx, denominator_idx) {
        (Some(_), Some(_)) => {},
        (Some(_), None) if denominator_optional => {},
        (None, Some(_)) if numerator_optional => {},
        (None, None) if numerator_optional && denominator_optional => {},
        _ => return None,
    }

    // remove the larger index first, so that the smaller index is still valid
    let (numerator, denominator) = match (numerator_idx, denominator_idx) {
        (Some(num), Some(den)) if num > den => {
            let numerator = factors.remove(num).into_integer();
            (numerator, factors.remove(den).into_integer_recip())
        },
        (Some(num), Some(den)) => {
            let denominator = factors.remove(den).into_integer_recip();
            (factors.remove(num).into_integer(), denominator)
        },
        (Some(num), None) => (factors.remove(num).into_integer(), None),
        (None, Some(den)) => (None, factors.remove(den).into_integer_recip()),
        (None, None) => (None, None),
    };

    Some((numerator.unwrap_or_else(|| int(1)), denominator.unwrap_or_else(|| int(1))))
}

/// Extracts an expression from the factors of a [`SymExpr::Mul`] that represents a numerical
/// fraction. This is like [`extract_integer_fraction`], but the result of the function is a
/// [`SymExpr`], and not the extracted numerator and denominator.
///
/// - `[3, x]` -> `3`, leaving `[x]`
/// - `[x, 4^-1, 3]` -> `3 * 4^-1`, leaving `[x]`
pub(crate) fn extract_fractional(factors: &mut Vec<SymExpr>) -> Option<SymExpr> {
    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);

    match (numerator_idx, denominator_idx) {
        (Some(numerator_idx), Some(denominator_idx)) => {
            // remove larger index first, so that the smaller index is still valid
            if numerator_idx > denominator_idx {
                let numerator = factors.remove(numerator_idx);
                Some(numerator * factors.remove(denominator_idx))
            } else {
                let denominator = factors.remove(denominator_idx);
                Some(factors.remove(numerator_idx) * denominator)
            }
        },
        (Some(numerator_idx), None) => Some(factors.remove(numerator_idx)),
        (None, Some(denominator_idx)) => Some(factors.remove(denominator_idx)),
        (None, None) => None,
    }
}

/// Extracts a numerical fraction from a coefficient-like expression, replacing the extracted part
/// with the integer 1.
///
/// - [`Primary::Integer`] `n` -> `n / 1`
/// - [`SymExpr::Mul`] -> the first integer over the first integer reciprocal (or 1)
/// - [`SymExpr::Exp`] `n^-1` -> `1 / n`
pub(crate) fn extract_explicit_frac(expr: &mut SymExpr) -> Option<(Integer, Integer)> {
    match expr {
        SymExpr::Primary(Primary::Integer(num)) => {
            Some((std::mem::replace(num, int(1)), int(1)))
        },
        SymExpr::Mul(factors) => extract_integer_fraction(factors, false, true),
        SymExpr::Exp(..) if expr.is_integer_recip() => {
            std::mem::replace(expr, SymExpr::Primary(Primary::Integer(int(1))))
                .into_integer_recip()
                .map(|denominator| (int(1), denominator))
        },
        _ => None,
    }
}
