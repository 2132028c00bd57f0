use super::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: Option<&'a Expr>) -> bool {
        match (self.last_visited, expr) {
            (Some(last_visited), Some(expr)) => std::ptr::eq(last_visited, expr),
            _ => false,
        }
    }

    /// Either visits the node on top of the stack, if its children have all been visited, or
    /// pushes its children so that they are visited first.
    fn descend(&mut self, children: &'a [Expr]) -> Option<Option<&'a Expr>> {
        if children.is_empty() || self.is_last_visited(children.last()) {
            return Some(self.visit());
        }
        self.stack.extend(children.iter().rev());
        None
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            match expr {
                Expr::Number(_) | Expr::Symbol(_) => return self.visit(),
                Expr::Sum(children) | Expr::Product(children) | Expr::Call(_, children) => {
                    if let Some(visited) = self.descend(children) {
                        return visited;
                    }
                },
                Expr::Power(base, exp) => {
                    if self.is_last_visited(Some(exp)) {
                        return self.visit();
                    }
                    self.stack.push(exp);
                    self.stack.push(base);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::super::super::parse;

    #[test]
    fn post_order() {
        let expr = parse("sin(x)^2 + y").unwrap();
        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["x", "sin(x)", "2", "sin(x)^2", "y", "sin(x)^2 + y"]);
    }
}
