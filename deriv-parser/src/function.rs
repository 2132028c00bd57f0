//! The fixed vocabulary of elementary functions that the calculator knows how to differentiate.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generates the [`Function`] enum along with the lookup tables between variants and the names
/// they are written as.
macro_rules! functions {
    ($($(#[$meta:meta])* $variant:ident => $name:literal),* $(,)?) => {
        /// An elementary function with a built-in differentiation rule.
        ///
        /// Every function in this vocabulary takes exactly one argument.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum Function {
            $($(#[$meta])* $variant,)*
        }

        impl Function {
            /// Every known function, in the order they are listed in the reference table.
            pub const ALL: &'static [Function] = &[$(Function::$variant),*];

            /// Returns the name the function is written as.
            pub fn name(self) -> &'static str {
                match self {
                    $(Function::$variant => $name,)*
                }
            }

            /// Returns the function with the given name, if there is one.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Function::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

functions! {
    Sin => "sin",
    Cos => "cos",
    Tan => "tan",
    Cot => "cot",
    Sec => "sec",
    Csc => "csc",
    /// The natural exponential function, `e^x`.
    Exp => "exp",
    /// The natural logarithm. `log` and `ln` are interchangeable.
    Log => "log",
    Ln => "ln",
    Asin => "asin",
    Acos => "acos",
    Atan => "atan",
    Acot => "acot",
    Sinh => "sinh",
    Cosh => "cosh",
    Tanh => "tanh",
    Coth => "coth",
    Sqrt => "sqrt",
}

impl Function {
    /// The number of arguments every known function takes.
    pub const ARITY: usize = 1;

    /// Returns true if the function is one of the six circular trigonometric functions.
    pub fn is_trigonometric(self) -> bool {
        matches!(self, Function::Sin | Function::Cos | Function::Tan | Function::Cot | Function::Sec | Function::Csc)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn names_round_trip() {
        for &func in Function::ALL {
            assert_eq!(Function::from_name(func.name()), Some(func));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(Function::from_name("sine"), None);
        assert_eq!(Function::from_name("Sin"), None);
    }

    #[test]
    fn vocabulary_size() {
        assert_eq!(Function::ALL.len(), 18);
        assert!(Function::Sec.is_trigonometric());
        assert!(!Function::Sinh.is_trigonometric());
    }
}
