//! Numeric evaluation of expressions.

use deriv_parser::Function;
use std::collections::HashMap;
use super::expr::{Callee, Expr};

/// Evaluates a known function at a point.
fn eval_function(function: Function, u: f64) -> f64 {
    match function {
        Function::Sin => u.sin(),
        Function::Cos => u.cos(),
        Function::Tan => u.tan(),
        Function::Cot => u.tan().recip(),
        Function::Sec => u.cos().recip(),
        Function::Csc => u.sin().recip(),
        Function::Exp => u.exp(),
        Function::Log | Function::Ln => u.ln(),
        Function::Asin => u.asin(),
        Function::Acos => u.acos(),
        Function::Atan => u.atan(),
        Function::Acot => std::f64::consts::FRAC_PI_2 - u.atan(),
        Function::Sinh => u.sinh(),
        Function::Cosh => u.cosh(),
        Function::Tanh => u.tanh(),
        Function::Coth => u.tanh().recip(),
        Function::Sqrt => u.sqrt(),
    }
}

impl Expr {
    /// Evaluates the expression as a 64-bit float, looking up the value of each symbol in
    /// `values`.
    ///
    /// Returns [`None`] if a symbol has no value, if the expression calls an unknown function, or
    /// if the result is not a finite number (for example, `ln(0)`).
    pub fn eval_f64(&self, values: &HashMap<&str, f64>) -> Option<f64> {
        let value = match self {
            Self::Number(num) => num.to_f64(),
            Self::Symbol(name) => *values.get(name.as_str())?,
            Self::Sum(terms) => terms.iter()
                .map(|term| term.eval_f64(values))
                .sum::<Option<f64>>()?,
            Self::Product(factors) => factors.iter()
                .map(|factor| factor.eval_f64(values))
                .product::<Option<f64>>()?,
            Self::Power(base, exp) => base.eval_f64(values)?.powf(exp.eval_f64(values)?),
            Self::Call(Callee::Known(function), args) => match args.as_slice() {
                [arg] => eval_function(*function, arg.eval_f64(values)?),
                _ => return None,
            },
            Self::Call(Callee::Unknown(_), _) => return None,
        };
        value.is_finite().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use super::*;
    use super::super::parse;

    fn eval(input: &str, x: f64) -> Option<f64> {
        parse(input).unwrap().eval_f64(&HashMap::from([("x", x)]))
    }

    #[test]
    fn polynomial() {
        assert_float_relative_eq!(eval("x^2 + 3*x - 1", 2.0).unwrap(), 9.0);
    }

    #[test]
    fn functions() {
        assert_float_relative_eq!(eval("sin(x)^2 + cos(x)^2", 0.7).unwrap(), 1.0);
        assert_float_relative_eq!(eval("acot(x)", 1.0).unwrap(), std::f64::consts::FRAC_PI_4);
        assert_float_relative_eq!(eval("sqrt(x)/2", 16.0).unwrap(), 2.0);
    }

    #[test]
    fn undefined() {
        assert_eq!(eval("ln(x)", 0.0), None);
        assert_eq!(eval("x + y", 1.0), None);
        assert_eq!(eval("f(x)", 1.0), None);
    }
}
