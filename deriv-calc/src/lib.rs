//! The derivative calculator: differentiate and simplify expressions written as text, and keep a
//! log of what was computed.
//!
//! [`Calculator`] is the entry point. It parses the input with [`deriv_parser`], differentiates
//! and simplifies it with [`deriv_compute`], renders the result as text or LaTeX, and records it
//! to an append-only [`Session`].
//!
//! ```
//! use deriv_calc::{parse_order_list, parse_variable_list, Calculator};
//!
//! let calc = Calculator::default();
//! assert_eq!(calc.derivative_of("sin(x^2)").unwrap(), "2*x*cos(x^2)");
//!
//! let variables = parse_variable_list("x, y").unwrap();
//! let orders = parse_order_list("1, 1").unwrap();
//! assert_eq!(calc.compute_partial_derivative("x^2*y^3", &variables, &orders).unwrap(), "6*x*y^2");
//!
//! assert_eq!(calc.simplify_text("sin(x)^2 + cos(x)^2").unwrap(), "1");
//! assert_eq!(calc.history(10).len(), 2);
//! ```

mod calculator;
pub mod config;
mod error;
pub mod export;
mod input;
pub mod session;
mod table;

pub use calculator::{Calculator, DEFAULT_VARIABLE};
pub use config::{Config, ConfigBuilder, OutputFormat};
pub use error::{Error, ParseError};
pub use export::ExportDocument;
pub use input::{parse_order_list, parse_variable_list};
pub use session::{Computation, History, HistoryEntry, Session};
pub use table::{reference_table, ReferenceRow};
