use deriv_compute::symbolic::{
    fmt::Latex,
    parse,
    simplify::Step,
    simplify_with,
    Differentiator,
    Expr,
};
use log::debug;
use crate::{
    config::{Config, OutputFormat},
    export::ExportDocument,
    input::check_variable,
    session::{Computation, History, Session},
    Error,
};

/// The variable [`Calculator::derivative_of`] differentiates with respect to.
pub const DEFAULT_VARIABLE: &str = "x";

/// The entry point of the derivative calculator.
///
/// A calculator parses expressions, differentiates and simplifies them, renders the results, and
/// records every successful derivative to its [`Session`]. Failed computations are returned as
/// errors and leave the session untouched.
///
/// ```
/// use deriv_calc::Calculator;
///
/// let calc = Calculator::default();
/// assert_eq!(calc.compute_derivative("x^3 + 3*x", "x", 2).unwrap(), "6*x");
/// assert_eq!(calc.compute_partial_derivative("x^2*y^3", &["x", "y"], &[1, 1]).unwrap(), "6*x*y^2");
///
/// let history = calc.history(10);
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[0].expression_text(), "x^3 + 3*x");
/// ```
#[derive(Debug, Default)]
pub struct Calculator {
    config: Config,
    differentiator: Differentiator,
    session: Session,
}

impl Calculator {
    /// Creates a calculator with the given configuration and an empty session.
    pub fn new(config: Config) -> Self {
        let differentiator = config.differentiator();
        Self { config, differentiator, session: Session::new() }
    }

    /// Returns the configuration of the calculator.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the log of successful computations.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Renders an expression in the configured output format.
    pub fn render(&self, expr: &Expr) -> String {
        match self.config.output {
            OutputFormat::Text => expr.to_string(),
            OutputFormat::Latex => expr.as_latex().to_string(),
        }
    }

    /// Takes the `order`th derivative of the expression with respect to `variable`, simplifies
    /// it, and records it to the session.
    ///
    /// Returns [`Error::InvalidVariable`] if `variable` is not a plain symbol name, such as `x+y`
    /// or `sin`.
    pub fn compute_derivative(&self, text: &str, variable: &str, order: i64) -> Result<String, Error> {
        check_variable(variable)?;
        let expr = parse(text)?;
        let result = self.differentiator.differentiate(&expr, variable, order)?;
        let rendered = self.render(&result);

        let computation = Computation::Derivative { variable: variable.to_string(), order };
        self.session.record(text, computation, rendered.as_str());
        Ok(rendered)
    }

    /// Takes the first derivative of the expression with respect to [`DEFAULT_VARIABLE`].
    pub fn derivative_of(&self, text: &str) -> Result<String, Error> {
        self.compute_derivative(text, DEFAULT_VARIABLE, 1)
    }

    /// Takes the mixed partial derivative of the expression, differentiating with respect to
    /// each variable in turn by the matching order, simplifies it, and records it to the
    /// session.
    pub fn compute_partial_derivative<S: AsRef<str>>(
        &self,
        text: &str,
        variables: &[S],
        orders: &[i64],
    ) -> Result<String, Error> {
        for variable in variables {
            check_variable(variable.as_ref())?;
        }
        let expr = parse(text)?;
        let result = self.differentiator.differentiate_partial(&expr, variables, orders)?;
        let rendered = self.render(&result);

        let computation = Computation::Partial {
            variables: variables.iter().map(|var| var.as_ref().to_string()).collect(),
            orders: orders.to_vec(),
        };
        self.session.record(text, computation, rendered.as_str());
        Ok(rendered)
    }

    /// Simplifies the expression. The result is not recorded to the session.
    pub fn simplify_text(&self, text: &str) -> Result<String, Error> {
        let expr = parse(text)?;
        let result = simplify_with(&expr, &self.config.simplify, &mut ());
        Ok(self.render(&result))
    }

    /// Simplifies the expression, returning what each pass of the simplifier did. The result is
    /// not recorded to the session.
    pub fn simplify_steps(&self, text: &str) -> Result<Vec<Step>, Error> {
        let expr = parse(text)?;
        let mut steps = Vec::new();
        let result = simplify_with(&expr, &self.config.simplify, &mut steps);
        debug!("simplified {} to {} in {} steps", expr, result, steps.len());
        Ok(steps)
    }

    /// Returns up to `limit` of the most recent computations, oldest first.
    pub fn history(&self, limit: usize) -> History {
        self.session.history(limit)
    }

    /// Prepares a document with the given title and body, and the most recent computations.
    pub fn export(&self, title: &str, body: &str) -> ExportDocument {
        let history = self.session.history(self.config.export_history_limit);
        ExportDocument::new(title, body, history.iter())
    }
}

#[cfg(test)]
mod tests {
    use deriv_compute::symbolic::{simplify::Pass, DiffError};
    use deriv_parser::parser::error::kind::UnclosedParenthesis;
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::session::HistoryEntry;

    #[test]
    fn derivatives() {
        let calc = Calculator::default();
        assert_eq!(calc.compute_derivative("x^3", "x", 1).unwrap(), "3*x^2");
        assert_eq!(calc.compute_derivative("x^3 + 3*x", "x", 2).unwrap(), "6*x");
        assert_eq!(calc.derivative_of("sin(x)*exp(x)").unwrap(), "exp(x)*(cos(x) + sin(x))");
        assert_eq!(calc.compute_derivative("x*y^2", "y", 1).unwrap(), "2*x*y");
    }

    #[test]
    fn partial_derivatives() {
        let calc = Calculator::default();
        let result = calc.compute_partial_derivative("x^2*y^3", &["x", "y"], &[1, 1]).unwrap();
        assert_eq!(result, "6*x*y^2");

        let entry = &calc.history(1)[0];
        assert_eq!(entry.variable_spec(), "x, y");
        assert_eq!(entry.order_spec(), "1, 1");
        assert_eq!(entry.result_text(), "6*x*y^2");
    }

    #[test]
    fn simplification() {
        let calc = Calculator::default();
        assert_eq!(calc.simplify_text("sin(x)^2 + cos(x)^2").unwrap(), "1");
        assert_eq!(calc.simplify_text("x^2 + 3*x + 2").unwrap(), "(x + 1)*(x + 2)");
        assert!(calc.session().is_empty());

        let steps = calc.simplify_steps("x + x").unwrap();
        assert_eq!(steps.iter().map(Step::pass).collect::<Vec<_>>(), Pass::ALL.to_vec());
    }

    #[test]
    fn latex_output() {
        let config = Config::default().into_builder().output(OutputFormat::Latex).build();
        let calc = Calculator::new(config);
        assert_eq!(calc.compute_derivative("ln(x)", "x", 1).unwrap(), "\\frac{1}{x}");
        assert_eq!(calc.history(1)[0].result, "\\frac{1}{x}");
    }

    #[test]
    fn parse_errors() {
        let calc = Calculator::default();
        let err = calc.derivative_of("sin(x").unwrap_err();
        let parse_err = err.as_parse_error().unwrap();
        assert!(parse_err.kind_as::<UnclosedParenthesis>().is_some());
        assert_eq!(parse_err.position(), 3);
        assert!(calc.session().is_empty());
    }

    #[test]
    fn diff_errors() {
        let calc = Calculator::default();
        let err = calc.compute_derivative("x", "x", 0).unwrap_err();
        assert_eq!(err.as_diff_error(), Some(&DiffError::invalid_order(0)));

        let err = calc.derivative_of("son(x)").unwrap_err();
        assert_eq!(err.as_diff_error(), Some(&DiffError::UnknownFunction("son".to_string())));

        let err = calc.compute_partial_derivative("x*y", &["x", "y"], &[1]).unwrap_err();
        assert_eq!(
            err.as_diff_error(),
            Some(&DiffError::ArityMismatch { variables: 2, orders: 1 }),
        );
        assert!(calc.session().is_empty());
    }

    #[test]
    fn invalid_variables() {
        let calc = Calculator::default();
        for variable in ["x+y", "2", "", "sin", "x y"] {
            let err = calc.compute_derivative("x^2", variable, 1).unwrap_err();
            assert!(matches!(&err, Error::InvalidVariable(name) if name == variable), "{}", variable);
        }

        let err = calc.compute_partial_derivative("x^2*y", &["x", "cos"], &[1, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidVariable(name) if name == "cos"));
        assert!(calc.session().is_empty());
    }

    #[test]
    fn session_scenario() {
        let calc = Calculator::default();
        let inputs = ["x^2", "sin(x)", "exp(2*x)", "x*y", "ln(x)"];
        for input in inputs {
            calc.derivative_of(input).unwrap();
        }
        calc.derivative_of("f(x)").unwrap_err();

        let history = calc.history(inputs.len());
        let recorded = history.iter().map(HistoryEntry::expression_text).collect::<Vec<_>>();
        assert_eq!(recorded, inputs);
        assert_eq!(history[0].result_text(), "2*x");
        assert_eq!(history[4].result_text(), "1/x");
    }

    #[test]
    fn export() {
        let config = Config::default().into_builder().export_history_limit(2).build();
        let calc = Calculator::new(config);
        calc.derivative_of("x^2").unwrap();
        calc.derivative_of("x^3").unwrap();
        calc.derivative_of("x^4").unwrap();

        let doc = calc.export("Derivatives", "4*x^3");
        assert_eq!(doc.history, ["1. x^3 -> 3*x^2", "2. x^4 -> 4*x^3"]);
        assert_eq!(
            doc.to_string(),
            "Derivatives\n===========\n\n4*x^3\n\nHistory\n-------\n1. x^3 -> 3*x^2\n2. x^4 -> 4*x^3\n",
        );
    }
}
