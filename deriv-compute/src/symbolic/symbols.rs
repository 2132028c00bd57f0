//! Classification of symbols into differentiable variables and opaque constants.

use super::Expr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a symbol behaves under differentiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolClass {
    /// A symbol that can be differentiated with respect to, such as `x`.
    Variable,

    /// An opaque parameter, such as `a`. Its derivative is zero with respect to every other
    /// symbol.
    Constant,
}

/// The classification of symbols used when differentiating.
///
/// Both classes behave identically under the differentiation rules: a symbol's derivative is `1`
/// with respect to itself and `0` with respect to anything else. The table exists to catch
/// mistakes such as differentiating with respect to a constant, and to list the variables of an
/// expression. Symbols that are not listed are treated as variables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolTable {
    /// Symbols declared as variables.
    variables: Vec<String>,

    /// Symbols declared as constants.
    constants: Vec<String>,
}

impl Default for SymbolTable {
    /// The conventional classification: `x`, `y`, `z` and `t` are variables; `a`, `b`, `c`, `n`
    /// and `m` are constants.
    fn default() -> Self {
        Self {
            variables: ["x", "y", "z", "t"].map(String::from).to_vec(),
            constants: ["a", "b", "c", "n", "m"].map(String::from).to_vec(),
        }
    }
}

impl SymbolTable {
    /// Creates a table with no declared symbols, in which every symbol is a variable.
    pub fn empty() -> Self {
        Self { variables: Vec::new(), constants: Vec::new() }
    }

    /// Declares a symbol as a variable, removing any previous declaration.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.constants.retain(|constant| *constant != name);
        if !self.variables.contains(&name) {
            self.variables.push(name);
        }
        self
    }

    /// Declares a symbol as a constant, removing any previous declaration.
    pub fn with_constant(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.variables.retain(|variable| *variable != name);
        if !self.constants.contains(&name) {
            self.constants.push(name);
        }
        self
    }

    /// Returns the class of the given symbol.
    pub fn classify(&self, name: &str) -> SymbolClass {
        if self.constants.iter().any(|constant| constant == name) {
            SymbolClass::Constant
        } else {
            SymbolClass::Variable
        }
    }

    /// Returns true if the given symbol is a constant.
    pub fn is_constant(&self, name: &str) -> bool {
        self.classify(name) == SymbolClass::Constant
    }

    /// Returns the variables that appear in the expression, in order of first appearance.
    pub fn variables_in<'a>(&self, expr: &'a Expr) -> Vec<&'a str> {
        expr.symbols()
            .into_iter()
            .filter(|name| !self.is_constant(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use super::super::parse;

    #[test]
    fn default_classes() {
        let table = SymbolTable::default();
        assert_eq!(table.classify("x"), SymbolClass::Variable);
        assert_eq!(table.classify("n"), SymbolClass::Constant);
        assert_eq!(table.classify("w"), SymbolClass::Variable);
    }

    #[test]
    fn redeclare() {
        let table = SymbolTable::default().with_variable("a").with_constant("t");
        assert_eq!(table.classify("a"), SymbolClass::Variable);
        assert_eq!(table.classify("t"), SymbolClass::Constant);
    }

    #[test]
    fn variables_of_expression() {
        let expr = parse("a*x^n + b*y").unwrap();
        assert_eq!(SymbolTable::default().variables_in(&expr), vec!["x", "y"]);
    }
}
