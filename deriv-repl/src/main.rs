mod command;
mod error;
mod logger;

use command::{Command, HELP};
use deriv_calc::{
    parse_order_list,
    parse_variable_list,
    reference_table,
    Calculator,
    Config,
    Error as CalcError,
    OutputFormat,
};
use deriv_compute::symbolic::{DiffError, SymbolTable};
use error::Error;
use log::debug;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}};

/// The number of entries `history` lists when no count is given.
const DEFAULT_HISTORY: usize = 10;

/// The title of an exported document when none is given.
const DEFAULT_TITLE: &str = "Derivatives";

/// Parses the order of a derivative given to `diff`.
fn parse_order(text: &str) -> Result<i64, Error> {
    text.parse()
        .map_err(|_| Error::from(CalcError::from(DiffError::InvalidOrder(text.to_string()))))
}

/// Parses the single variable given to `diff`.
fn parse_variable(text: &str) -> Result<String, Error> {
    match parse_variable_list(text)?.as_slice() {
        [variable] => Ok(variable.clone()),
        _ => Err(CalcError::InvalidVariable(text.to_string()).into()),
    }
}

/// Runs a command, printing its output to stdout.
fn run(command: &Command, calc: &Calculator) -> Result<(), Error> {
    match *command {
        Command::Derivative { expr, variable, order } => {
            let variable = variable.map(parse_variable).transpose()?;
            let order = order.map(parse_order).transpose()?.unwrap_or(1);
            let variable = variable.as_deref().unwrap_or(deriv_calc::DEFAULT_VARIABLE);
            println!("{}", calc.compute_derivative(expr, variable, order)?);
        },
        Command::Partial { expr, variables, orders } => {
            let variables = parse_variable_list(variables)?;
            let orders = parse_order_list(orders)?;
            println!("{}", calc.compute_partial_derivative(expr, &variables, &orders)?);
        },
        Command::Simplify(expr) => println!("{}", calc.simplify_text(expr)?),
        Command::Steps(expr) => {
            for (i, step) in calc.simplify_steps(expr)?.iter().enumerate() {
                println!("{}. {}", i + 1, step);
            }
        },
        Command::History(count) => {
            let history = calc.history(count.unwrap_or(DEFAULT_HISTORY));
            if history.is_empty() {
                println!("no derivatives computed yet");
            }
            for entry in history.iter() {
                println!("{}. {}", entry.index + 1, entry);
            }
        },
        Command::Table => {
            let width = reference_table().iter()
                .map(|row| row.function.len())
                .max()
                .unwrap_or(0);
            for row in reference_table() {
                println!("{:<width$}  ->  {}", row.function, row.derivative, width = width);
            }
        },
        Command::Export { path, title } => {
            let body = calc.history(1)
                .last()
                .map(|entry| entry.result.clone())
                .unwrap_or_default();
            let document = calc.export(title.unwrap_or(DEFAULT_TITLE), &body);
            match fs::write(path, document.to_string()) {
                Ok(()) => println!("wrote {}", path),
                Err(err) => eprintln!("could not write {}: {}", path, err),
            }
        },
        Command::Help => println!("{}", HELP),
    }
    Ok(())
}

/// Parses and runs a line of input, reporting any error to stderr.
fn read_eval(line: &str, calc: &Calculator) {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(err) => return Error::from(err).report_to_stderr(line),
    };
    debug!("running {:?}", command);

    if let Err(err) = run(&command, calc) {
        let source = match command {
            Command::Derivative { expr, .. }
            | Command::Partial { expr, .. }
            | Command::Simplify(expr)
            | Command::Steps(expr) => expr,
            _ => line,
        };
        err.report_to_stderr(source);
    }
}

/// Runs every non-empty line of the input.
fn execute(input: &str, calc: &Calculator) {
    input.lines()
        .filter(|line| !line.trim().is_empty())
        .for_each(|line| read_eval(line, calc));
}

/// Builds the calculator configuration from the command line flags, returning the remaining
/// arguments.
///
/// `--latex` renders results in LaTeX, and `--const <name>` treats `name` as a constant.
fn configure(args: impl Iterator<Item = String>) -> (Config, Vec<String>) {
    let mut args = args.peekable();
    let mut symbols = SymbolTable::default();
    let mut output = OutputFormat::Text;
    let mut rest = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--latex" => output = OutputFormat::Latex,
            "--const" => match args.next() {
                Some(name) => symbols = symbols.with_constant(name),
                None => eprintln!("--const needs a name"),
            },
            _ => rest.push(arg),
        }
    }

    let config = Config::default()
        .into_builder()
        .symbols(symbols)
        .output(output)
        .build();
    (config, rest)
}

fn main() {
    logger::init();

    let (config, rest) = configure(std::env::args().skip(1));
    let calc = Calculator::new(config);

    if let Some(filename) = rest.first() {
        // run every line of a file
        match fs::read_to_string(filename) {
            Ok(input) => execute(&input, &calc),
            Err(err) => eprintln!("could not read {}: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read lines from stdin
        let mut input = String::new();
        match io::stdin().read_to_string(&mut input) {
            Ok(_) => execute(&input, &calc),
            Err(err) => eprintln!("could not read stdin: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor, calc: &Calculator) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            read_eval(&input, calc);
            Ok(())
        }

        println!("type `help` for a list of commands");
        loop {
            if let Err(err) = process_line(&mut rl, &calc) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn args(args: &[&str]) -> impl Iterator<Item = String> + '_ {
        args.iter().map(|arg| arg.to_string())
    }

    #[test]
    fn flags() {
        let (config, rest) = configure(args(&["--latex", "--const", "k", "input.txt"]));
        assert_eq!(config.output, OutputFormat::Latex);
        assert!(config.symbols.is_constant("k"));
        assert_eq!(rest, vec!["input.txt".to_string()]);

        let (config, rest) = configure(args(&[]));
        assert_eq!(config, Config::default());
        assert!(rest.is_empty());
    }

    #[test]
    fn commands_record_derivatives() {
        let calc = Calculator::default();
        for line in ["diff x^2", "diff x^3*t; t; 1", "partial x^2*y; x, y; 1, 1", "simplify x + x"] {
            assert!(run(&Command::parse(line).unwrap(), &calc).is_ok(), "{}", line);
        }

        let history = calc.history(DEFAULT_HISTORY);
        let results = history.iter().map(|entry| entry.result.as_str()).collect::<Vec<_>>();
        assert_eq!(results, vec!["2*x", "x^3", "2*x"]);
    }

    #[test]
    fn bad_arguments() {
        let calc = Calculator::default();
        for line in ["diff x^2; x; two", "diff x^2; x, y", "diff x^2; 2x", "partial x*y; x; 1, 1"] {
            assert!(run(&Command::parse(line).unwrap(), &calc).is_err(), "{}", line);
        }
        assert!(calc.history(DEFAULT_HISTORY).is_empty());
    }
}
