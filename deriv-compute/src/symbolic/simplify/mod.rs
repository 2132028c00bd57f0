//! Simplification of expressions.
//!
//! The simplifier is a fixed pipeline of five passes, each consuming the output of the previous
//! one:
//!
//! 1. [`normalize`]: fold numeric sub-expressions, flatten nested sums and products, drop
//!    identities (`x + 0`, `x*1`, `x^1`, ...), combine like terms (`2*x + 3*x = 5*x`) and like
//!    factors (`x*x^2 = x^3`), and sort everything into canonical order.
//! 2. [`trigonometry`]: rewrite a fixed table of identities, such as `sin(x)^2 + cos(x)^2 = 1`
//!    and `tan(x)*cos(x) = sin(x)`, in a single bottom-up sweep that rewrites each sum and
//!    product at most once.
//! 3. [`expand`]: distribute products over sums and expand integer powers of sums, then apply
//!    the trigonometric identities to the result until none of them match.
//! 4. [`factor`]: pull common numeric and symbolic factors out of sums, and split polynomials
//!    of low degree in the primary variable into linear factors.
//! 5. [`collect`]: group the terms of sums by powers of the primary variable, highest power
//!    first.
//!
//! Each pass runs exactly once; the pipeline is not iterated to a fixed point. It is, however,
//! built so that simplifying an already simplified expression gives the same expression back:
//! the output of [`expand`] has no identity left to apply, and [`factor`] and [`collect`] never
//! regroup terms in a way that would give an identity something new to match.
//!
//! Simplification never fails. A rule that does not apply to a subtree leaves it alone, and a
//! pass over an expression larger than [`SimplifyOptions::max_nodes`] is skipped, so the result
//! is always a valid, if possibly less simplified, expression.

pub mod collect;
pub mod expand;
pub mod factor;
pub mod normalize;
mod options;
mod step;
pub mod trigonometry;

pub use options::{SimplifyOptions, SimplifyOptionsBuilder};
pub use step::{Pass, Step};

use log::{debug, warn};
use super::{step_collector::StepCollector, Expr};

impl Pass {
    /// Runs the pass over the given expression.
    pub fn apply(self, expr: &Expr, options: &SimplifyOptions) -> Expr {
        match self {
            Pass::Normalize => normalize::normalize(expr),
            Pass::Trigonometry => trigonometry::reduce(expr),
            Pass::Expand => expand::expand(expr, options),
            Pass::Factor => factor::factor(expr, options),
            Pass::Collect => collect::collect(expr, &options.primary_variable),
        }
    }
}

/// Simplifies the given expression with the default options.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_with(expr, &SimplifyOptions::default(), &mut ())
}

/// Simplifies the given expression, reporting what each pass did to the given
/// [`StepCollector`].
pub fn simplify_with(
    expr: &Expr,
    options: &SimplifyOptions,
    steps: &mut dyn StepCollector<Step>,
) -> Expr {
    let mut current = expr.clone();
    for pass in Pass::ALL {
        let nodes = current.node_count();
        if nodes > options.max_nodes {
            warn!("skipping {} pass: {} nodes is over the limit of {}", pass, nodes, options.max_nodes);
            steps.push(Step::Skipped { pass, nodes });
            continue;
        }

        let next = pass.apply(&current, options);
        if next == current && next.to_string() == current.to_string() {
            debug!("{} pass: no change", pass);
            steps.push(Step::Unchanged(pass));
        } else {
            debug!("{} pass: {}", pass, next);
            steps.push(Step::Changed { pass, result: next.clone() });
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::parse;

    fn simplified(input: &str) -> String {
        simplify(&parse(input).unwrap()).to_string()
    }

    #[test]
    fn identities() {
        assert_eq!(simplified("x + 0"), "x");
        assert_eq!(simplified("x*1"), "x");
        assert_eq!(simplified("x*0 + y"), "y");
        assert_eq!(simplified("x^1"), "x");
        assert_eq!(simplified("x^0 + 1"), "2");
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("2*x*y - 3*y*x"), "-x*y");
    }

    #[test]
    fn pythagorean_identity() {
        assert_eq!(simplified("sin(x)^2 + cos(x)^2"), "1");
    }

    #[test]
    fn expand_then_factor() {
        assert_eq!(simplified("x^2 + 3*x + 2"), "(x + 1)*(x + 2)");
        assert_eq!(simplified("(x + 1)*(x + 2)"), "(x + 1)*(x + 2)");
        assert_eq!(simplified("2*x + 2"), "2*(x + 1)");
    }

    #[test]
    fn collect_by_primary_variable() {
        assert_eq!(simplified("a*x + b*x + y^3"), "x*(a + b) + y^3");
    }

    #[test]
    fn identities_after_expansion() {
        assert_eq!(simplified("(1 - sin(x))*(1 + sin(x))"), "cos(x)^2");
        assert_eq!(simplified("sin(x)*cos(x)*(2*y + 2)"), simplified("sin(2*x)*(y + 1)"));
        assert_eq!(simplified("(sin(x) + cos(x))^2"), simplified("sin(2*x) + 1"));
        assert_eq!(simplified("(sin(x) + cos(x))*(sin(x) - cos(x))"), simplified("-cos(2*x)"));
        assert_eq!(simplified("(cos(x) - sin(x))*(cos(x) + sin(x))"), simplified("cos(2*x)"));
    }

    /// Asserts that simplifying the simplified form of `input` changes nothing.
    fn assert_idempotent(input: &str) {
        let once = simplify(&parse(input).unwrap());
        let twice = simplify(&once);
        assert_eq!(twice, once, "simplifying `{}` twice", input);
        assert_eq!(twice.to_string(), once.to_string(), "simplifying `{}` twice", input);
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "x^2 + 3*x + 2",
            "sin(x)*exp(x) + cos(x)*exp(x)",
            "(x + y)^3",
            "x/(x + 1) - 1/(x + 1)",
            "2*sin(x)*cos(x)",
            "1 - sin(x)^2",
            "a*x^2 + b*x^2 + c",
            "sqrt(x)^2 + sqrt(x)^3",
            "ln(1) + exp(0)*x",
            "(2*x + 4)/(x + 2)",
            "x^n*x^2",
            "1.5*x + 0.5*x",
            "(1 - sin(x))*(1 + sin(x))",
            "sin(x)*cos(x)*(2*y + 2)",
            "(sin(x) + cos(x))^2",
            "(sin(x) + cos(x))*(sin(x) - cos(x))",
            "(cos(x) + 1)*(cos(x) - 1)",
            "(sin(x) + y)*(sin(x) - y) + cos(x)^2",
            "(tan(x) + 1)*cos(x)",
            "sin(x)^2*cos(x) + cos(x)^3",
            "x*sin(y)^2 + x*cos(y)^2 + x^2",
            "(cosh(x) - sinh(x))*(cosh(x) + sinh(x))",
        ];
        for input in inputs {
            assert_idempotent(input);
        }
    }

    #[test]
    fn idempotent_over_generated_expressions() {
        let atoms = ["sin(x)", "cos(x)", "x", "y", "1", "2"];
        let ops = ["+", "-", "*"];

        let mut pairs = Vec::new();
        for a in atoms {
            for b in atoms {
                for op in ops {
                    pairs.push(format!("({}) {} ({})", a, op, b));
                }
            }
        }

        for pair in &pairs {
            assert_idempotent(pair);
            for atom in atoms {
                for op in ops {
                    assert_idempotent(&format!("({}) {} ({})", pair, op, atom));
                    assert_idempotent(&format!("({}) {} ({})", atom, op, pair));
                }
            }
        }
    }

    #[test]
    fn steps_are_reported() {
        let mut steps = Vec::new();
        let expr = parse("x + x").unwrap();
        let result = simplify_with(&expr, &SimplifyOptions::default(), &mut steps);
        assert_eq!(result.to_string(), "2*x");
        assert_eq!(steps.iter().map(Step::pass).collect::<Vec<_>>(), Pass::ALL.to_vec());
        assert_eq!(steps[0], Step::Changed { pass: Pass::Normalize, result: result.clone() });
    }

    #[test]
    fn oversized_expression_skips_passes() {
        let options = SimplifyOptions::default().into_builder().max_nodes(2).build();
        let expr = parse("x + x").unwrap();
        let mut steps = Vec::new();
        let result = simplify_with(&expr, &options, &mut steps);
        assert_eq!(result, expr);
        assert!(steps.iter().all(|step| matches!(step, Step::Skipped { nodes: 3, .. })));
    }
}
