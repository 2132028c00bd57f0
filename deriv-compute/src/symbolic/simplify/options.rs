#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control the simplifier.
///
/// The limits bound the work each pass can do on adversarial input. When a limit is hit, the
/// affected pass (or the affected subtree) is left as it is instead of failing, so the result of
/// [`simplify_with`](super::simplify_with) is always a valid, if less simplified, expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimplifyOptions {
    /// The variable whose powers the collect pass groups terms by.
    ///
    /// This is `x` by default, independent of the variable a derivative was taken with respect
    /// to.
    pub primary_variable: String,

    /// The largest expression, in nodes, that a pass will run on. Larger expressions skip the
    /// pass entirely.
    pub max_nodes: usize,

    /// The largest exponent a power of a sum is expanded for, as in `(x + 1)^32`.
    pub max_expansion_exponent: u32,

    /// The largest number of terms a single expansion may produce.
    pub max_expansion_terms: usize,

    /// The largest degree of polynomial the factor pass tries to split into linear factors.
    pub max_factor_degree: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            primary_variable: String::from("x"),
            max_nodes: 10_000,
            max_expansion_exponent: 32,
            max_expansion_terms: 1024,
            max_factor_degree: 3,
        }
    }
}

impl SimplifyOptions {
    /// Wraps the given [`SimplifyOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SimplifyOptionsBuilder {
        SimplifyOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SimplifyOptions`] struct.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimplifyOptionsBuilder(SimplifyOptions);

impl SimplifyOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the variable the collect pass groups terms by.
    pub fn primary_variable(mut self, name: impl Into<String>) -> Self {
        self.0.primary_variable = name.into();
        self
    }

    /// Sets the largest expression, in nodes, that a pass will run on.
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.0.max_nodes = max_nodes;
        self
    }

    /// Sets the largest exponent a power of a sum is expanded for.
    pub fn max_expansion_exponent(mut self, exponent: u32) -> Self {
        self.0.max_expansion_exponent = exponent;
        self
    }

    /// Sets the largest number of terms a single expansion may produce.
    pub fn max_expansion_terms(mut self, terms: usize) -> Self {
        self.0.max_expansion_terms = terms;
        self
    }

    /// Sets the largest polynomial degree the factor pass tries.
    pub fn max_factor_degree(mut self, degree: usize) -> Self {
        self.0.max_factor_degree = degree;
        self
    }

    /// Builds the [`SimplifyOptions`] struct.
    pub fn build(self) -> SimplifyOptions {
        self.0
    }
}
