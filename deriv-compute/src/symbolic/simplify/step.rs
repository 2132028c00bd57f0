use crate::symbolic::Expr;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the passes of the simplifier, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pass {
    /// Constant folding, flattening, identities and combining like terms.
    Normalize,

    /// Trigonometric and hyperbolic identities.
    Trigonometry,

    /// Distribution of products over sums and expansion of integer powers of sums.
    Expand,

    /// Extraction of common factors, and splitting low-degree polynomials into linear factors.
    Factor,

    /// Grouping of terms by powers of the primary variable.
    Collect,
}

impl Pass {
    /// Every pass, in the order they run.
    pub const ALL: [Pass; 5] = [
        Pass::Normalize,
        Pass::Trigonometry,
        Pass::Expand,
        Pass::Factor,
        Pass::Collect,
    ];

    /// Returns the name of the pass.
    pub fn name(self) -> &'static str {
        match self {
            Pass::Normalize => "normalize",
            Pass::Trigonometry => "trigonometry",
            Pass::Expand => "expand",
            Pass::Factor => "factor",
            Pass::Collect => "collect",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened during one pass of the simplifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// The pass rewrote the expression.
    Changed {
        /// The pass that ran.
        pass: Pass,

        /// The expression after the pass.
        result: Expr,
    },

    /// The pass ran, but left the expression as it was.
    Unchanged(Pass),

    /// The pass was skipped because the expression was larger than
    /// [`SimplifyOptions::max_nodes`](super::SimplifyOptions::max_nodes).
    Skipped {
        /// The pass that was skipped.
        pass: Pass,

        /// The size of the expression, in nodes.
        nodes: usize,
    },
}

impl Step {
    /// Returns the pass this step belongs to.
    pub fn pass(&self) -> Pass {
        match self {
            Step::Changed { pass, .. } | Step::Skipped { pass, .. } => *pass,
            Step::Unchanged(pass) => *pass,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Changed { pass, result } => write!(f, "{}: {}", pass, result),
            Step::Unchanged(pass) => write!(f, "{}: no change", pass),
            Step::Skipped { pass, nodes } => {
                write!(f, "{}: skipped ({} nodes is over the limit)", pass, nodes)
            },
        }
    }
}
