//! The table of elementary derivatives, used to apply the chain rule to known functions.

use deriv_parser::Function;
use crate::symbolic::{expr::make_fraction, Expr};

/// Returns the derivative of `function` with respect to its argument, evaluated at `u`.
///
/// This is the "outer" derivative of the chain rule: `d/dx f(u) = f'(u) * u'`.
pub fn outer_derivative(function: Function, u: &Expr) -> Expr {
    let call = |function| Expr::call(function, u.clone());
    let square = |expr| Expr::power(expr, Expr::int(2));
    let u_squared = || square(u.clone());

    match function {
        Function::Sin => call(Function::Cos),
        Function::Cos => -call(Function::Sin),
        Function::Tan => square(call(Function::Sec)),
        Function::Cot => -square(call(Function::Csc)),
        Function::Sec => call(Function::Sec) * call(Function::Tan),
        Function::Csc => -(call(Function::Csc) * call(Function::Cot)),
        Function::Exp => call(Function::Exp),
        Function::Log | Function::Ln => u.clone().recip(),
        Function::Asin => (Expr::one() - u_squared()).sqrt().recip(),
        Function::Acos => -(Expr::one() - u_squared()).sqrt().recip(),
        Function::Atan => (Expr::one() + u_squared()).recip(),
        Function::Acot => -(Expr::one() + u_squared()).recip(),
        Function::Sinh => call(Function::Cosh),
        Function::Cosh => call(Function::Sinh),
        Function::Tanh => Expr::one() - square(call(Function::Tanh)),
        Function::Coth => Expr::one() - square(call(Function::Coth)),
        Function::Sqrt => make_fraction(Expr::one(), Expr::int(2) * call(Function::Sqrt)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::{parse, simplify};

    fn outer(function: Function) -> String {
        simplify(&outer_derivative(function, &Expr::symbol("x"))).to_string()
    }

    #[test]
    fn trigonometric() {
        assert_eq!(outer(Function::Sin), "cos(x)");
        assert_eq!(outer(Function::Cos), "-sin(x)");
        assert_eq!(outer(Function::Tan), "sec(x)^2");
        assert_eq!(outer(Function::Csc), "-cot(x)*csc(x)");
    }

    #[test]
    fn logarithm_and_root() {
        assert_eq!(outer(Function::Ln), "1/x");
        assert_eq!(outer(Function::Log), "1/x");
        assert_eq!(outer(Function::Sqrt), "1/(2*sqrt(x))");
    }

    #[test]
    fn inverse_trigonometric() {
        let expected = simplify(&parse("1/(1 + x^2)").unwrap());
        assert_eq!(simplify(&outer_derivative(Function::Atan, &Expr::symbol("x"))), expected);
    }
}
