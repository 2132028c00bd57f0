use std::fmt;

/// A line of input to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `diff <expr> [; <variable> [; <order>]]`
    Derivative {
        expr: &'a str,
        variable: Option<&'a str>,
        order: Option<&'a str>,
    },

    /// `partial <expr>; <variables>; <orders>`
    Partial {
        expr: &'a str,
        variables: &'a str,
        orders: &'a str,
    },

    /// `simplify <expr>`, or an expression on its own.
    Simplify(&'a str),

    /// `steps <expr>`
    Steps(&'a str),

    /// `history [count]`
    History(Option<usize>),

    /// `table`
    Table,

    /// `export <file> [title]`
    Export {
        path: &'a str,
        title: Option<&'a str>,
    },

    /// `help`
    Help,
}

/// A command that was recognized, but given the wrong arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    /// How the command should be used.
    pub usage: &'static str,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usage: {}", self.usage)
    }
}

const DIFF_USAGE: &str = "diff <expr> [; <variable> [; <order>]]";
const PARTIAL_USAGE: &str = "partial <expr>; <variables>; <orders>";
const SIMPLIFY_USAGE: &str = "simplify <expr>";
const STEPS_USAGE: &str = "steps <expr>";
const HISTORY_USAGE: &str = "history [count]";
const EXPORT_USAGE: &str = "export <file> [title]";

pub const HELP: &str = "\
commands:
  diff <expr> [; <variable> [; <order>]]   differentiate, by `x` once unless told otherwise
  partial <expr>; <variables>; <orders>    mixed partial derivative, e.g. `partial x^2*y; x, y; 1, 1`
  simplify <expr>                          simplify an expression
  steps <expr>                             show what each simplifier pass did
  history [count]                          list the most recent derivatives
  table                                    list the derivatives of the known functions
  export <file> [title]                    write the last result and recent history to a file
  help                                     show this message
anything else is simplified as an expression";

/// Returns the text after `keyword` if the line starts with it as a whole word.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Returns the argument, or a usage error if it is empty.
fn required<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, UsageError> {
    if arg.is_empty() {
        Err(UsageError { usage })
    } else {
        Ok(arg)
    }
}

/// Splits the arguments of a command on `;`, trimming each one.
fn split_args(args: &str) -> Vec<&str> {
    args.split(';').map(str::trim).collect()
}

impl<'a> Command<'a> {
    /// Parses a line of input. The line must not be empty.
    pub fn parse(line: &'a str) -> Result<Self, UsageError> {
        let line = line.trim();

        if let Some(args) = strip_keyword(line, "diff") {
            let args = split_args(required(args, DIFF_USAGE)?);
            let non_empty = |arg: Option<&&'a str>| arg.copied().filter(|arg| !arg.is_empty());
            return match args.len() {
                1..=3 => Ok(Command::Derivative {
                    expr: required(args[0], DIFF_USAGE)?,
                    variable: non_empty(args.get(1)),
                    order: non_empty(args.get(2)),
                }),
                _ => Err(UsageError { usage: DIFF_USAGE }),
            };
        }

        if let Some(args) = strip_keyword(line, "partial") {
            return match *split_args(args).as_slice() {
                [expr, variables, orders] => Ok(Command::Partial {
                    expr: required(expr, PARTIAL_USAGE)?,
                    variables,
                    orders,
                }),
                _ => Err(UsageError { usage: PARTIAL_USAGE }),
            };
        }

        if let Some(args) = strip_keyword(line, "simplify") {
            return Ok(Command::Simplify(required(args, SIMPLIFY_USAGE)?));
        }

        if let Some(args) = strip_keyword(line, "steps") {
            return Ok(Command::Steps(required(args, STEPS_USAGE)?));
        }

        if let Some(args) = strip_keyword(line, "history") {
            if args.is_empty() {
                return Ok(Command::History(None));
            }
            return args.parse()
                .map(|count| Command::History(Some(count)))
                .map_err(|_| UsageError { usage: HISTORY_USAGE });
        }

        if let Some(args) = strip_keyword(line, "export") {
            let args = required(args, EXPORT_USAGE)?;
            return Ok(match args.split_once(char::is_whitespace) {
                Some((path, title)) => Command::Export { path, title: Some(title.trim()) },
                None => Command::Export { path: args, title: None },
            });
        }

        match line {
            "table" => Ok(Command::Table),
            "help" => Ok(Command::Help),
            _ => Ok(Command::Simplify(line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn derivative() {
        assert_eq!(Command::parse("diff sin(x)"), Ok(Command::Derivative {
            expr: "sin(x)",
            variable: None,
            order: None,
        }));
        assert_eq!(Command::parse("diff x^3*t ; t ; 2"), Ok(Command::Derivative {
            expr: "x^3*t",
            variable: Some("t"),
            order: Some("2"),
        }));
        assert_eq!(Command::parse("diff x^3; ; 2"), Ok(Command::Derivative {
            expr: "x^3",
            variable: None,
            order: Some("2"),
        }));
    }

    #[test]
    fn partial() {
        assert_eq!(Command::parse("partial x^2*y^3; x, y; 1, 1"), Ok(Command::Partial {
            expr: "x^2*y^3",
            variables: "x, y",
            orders: "1, 1",
        }));
        assert_eq!(
            Command::parse("partial x^2*y^3; x, y"),
            Err(UsageError { usage: PARTIAL_USAGE }),
        );
    }

    #[test]
    fn other_commands() {
        assert_eq!(Command::parse("simplify x + x"), Ok(Command::Simplify("x + x")));
        assert_eq!(Command::parse("steps (x + 1)^2"), Ok(Command::Steps("(x + 1)^2")));
        assert_eq!(Command::parse("history"), Ok(Command::History(None)));
        assert_eq!(Command::parse("history 3"), Ok(Command::History(Some(3))));
        assert_eq!(Command::parse("table"), Ok(Command::Table));
        assert_eq!(Command::parse("  help "), Ok(Command::Help));
        assert_eq!(Command::parse("export notes.txt My notes"), Ok(Command::Export {
            path: "notes.txt",
            title: Some("My notes"),
        }));
    }

    #[test]
    fn bare_expression() {
        assert_eq!(Command::parse("sin(x)^2 + cos(x)^2"), Ok(Command::Simplify("sin(x)^2 + cos(x)^2")));

        // a symbol that merely starts with a command name is still an expression
        assert_eq!(Command::parse("differ + 1"), Ok(Command::Simplify("differ + 1")));
        assert_eq!(Command::parse("tables"), Ok(Command::Simplify("tables")));
    }

    #[test]
    fn usage_errors() {
        assert_eq!(Command::parse("diff"), Err(UsageError { usage: DIFF_USAGE }));
        assert_eq!(Command::parse("diff ; x"), Err(UsageError { usage: DIFF_USAGE }));
        assert_eq!(Command::parse("steps"), Err(UsageError { usage: STEPS_USAGE }));
        assert_eq!(Command::parse("history all"), Err(UsageError { usage: HISTORY_USAGE }));
        assert_eq!(Command::parse("export"), Err(UsageError { usage: EXPORT_USAGE }));
        assert_eq!(
            Command::parse("simplify").unwrap_err().to_string(),
            "usage: simplify <expr>",
        );
    }
}
