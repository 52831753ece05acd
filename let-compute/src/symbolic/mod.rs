//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. Sums and
//! products are **flattened**: the expression `x + (y + z)` is a single [`SymExpr::Add`] node
//! with _three_ children, `x`, `y`, and `z`. Subtraction and division do not get their own nodes;
//! `a - b` is stored as `a + (-1)*b` and `a / b` as `a * b^-1`.
//!
//! This is done to make it easier to perform algebraic manipulations on the expression. A common
//! step in simplifying an expression is to combine "like terms", that is, to combine terms that
//! share the same factors (e.g. `x + x = 2x`). This is much easier to do when the terms in
//! question are all at the same level in the tree.
//!
//! Expressions are built with the usual arithmetic operators:
//!
//! ```
//! use let_compute::symbolic::SymExpr;
//!
//! let x = SymExpr::symbol("x");
//! let y = SymExpr::symbol("y");
//! let z = SymExpr::symbol("z");
//!
//! let expr = x.clone() + (y.clone() + z.clone());
//! assert_eq!(expr, SymExpr::Add(vec![x, y, z]));
//! ```
//!
//! # Simplification
//!
//! A primary use case for algebraic manipulation is to reduce expressions to some canonical form.
//! This is done with the [`simplify()`] function, which accepts an expression and returns a
//! "simplified" version of it.
//!
//! We define an expression to be simplified if it has the lowest _complexity_ among the
//! semantically equivalent forms the simplifier can reach, where complexity is the number of
//! nodes in the expression tree. For example, `x + x` is not simplified, because it can be reduced
//! to one term `2x`, which has lower complexity.
//!
//! ```
//! use let_compute::symbolic::{simplify, SymExpr};
//!
//! let x = SymExpr::symbol("x");
//! let simplified = simplify(&(x.clone() + x.clone() + x.clone()));
//!
//! // `x + x + x = 3x`
//! assert_eq!(simplified, SymExpr::Mul(vec![SymExpr::integer(3), x]));
//! ```
//!
//! For more information, see the [`mod@simplify`] module.

pub mod derivative;
pub mod expr;
pub mod simplify;
pub mod step_collector;

pub use derivative::derivative;
pub use expr::SymExpr;
pub use simplify::{normalize, simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;
