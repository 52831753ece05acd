use super::{Primary, SymExpr};

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first). The arguments of a function call are visited before the call itself.
///
/// This iterator is created by [`SymExpr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a SymExpr>,
    last_visited: Option<&'a SymExpr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a SymExpr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a SymExpr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a SymExpr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }

    /// Visits the node on top of the stack if all of its children were visited, otherwise pushes
    /// the children.
    fn descend(&mut self, children: &'a [SymExpr]) -> Option<Option<&'a SymExpr>> {
        match children.last() {
            None => Some(self.visit()),
            Some(last) if self.is_last_visited(last) => Some(self.visit()),
            Some(_) => {
                for child in children.iter().rev() {
                    self.stack.push(child);
                }
                None
            },
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a SymExpr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let visited = match expr {
                SymExpr::Primary(Primary::Call(_, args)) => self.descend(args),
                SymExpr::Primary(_) => Some(self.visit()),
                SymExpr::Add(terms) => self.descend(terms),
                SymExpr::Mul(factors) => self.descend(factors),
                SymExpr::Exp(lhs, rhs) => {
                    if self.is_last_visited(rhs) {
                        Some(self.visit())
                    } else {
                        self.stack.push(rhs);
                        self.stack.push(lhs);
                        None
                    }
                },
            };

            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_order() {
        let expr = SymExpr::symbol("a") * SymExpr::symbol("b").pow(SymExpr::integer(2))
            + SymExpr::symbol("c").ln();
        let visited = expr.post_order_iter()
            .map(|expr| expr.to_string())
            .collect::<Vec<_>>();
        assert_eq!(visited, vec![
            "a", "b", "2", "b^2", "a * b^2", "c", "ln(c)", "a * b^2 + ln(c)",
        ]);
    }
}
