use ariadne::{Label, Report, ReportKind, Source};
use deriv_calc::Error as CalcError;
use deriv_compute::symbolic::DiffError;
use std::ops::Range;
use crate::command::UsageError;

/// Utility enum to package errors that can occur while running a command.
pub enum Error {
    /// The command was given the wrong arguments.
    Usage(UsageError),

    /// The calculator rejected the input.
    Calc(CalcError),
}

/// Finds the first place `name` appears in the input as a whole word.
fn find_name(input: &str, name: &str) -> Option<Range<usize>> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    input.match_indices(name)
        .map(|(start, _)| start..start + name.len())
        .find(|span| {
            !input[..span.start].ends_with(is_word) && !input[span.end..].starts_with(is_word)
        })
}

/// Builds the report for a differentiation error, pointing at the offending function if it can
/// be found in the input.
fn diff_report<'a>(err: &DiffError, src_id: &'a str, input: &str) -> Report<(&'a str, Range<usize>)> {
    let span = match err {
        DiffError::UnknownFunction(name) | DiffError::ArgumentCount { function: name, .. } => {
            find_name(input, name)
        },
        _ => None,
    };

    let mut builder = Report::build(ReportKind::Error, src_id, span.as_ref().map_or(0, |s| s.start))
        .with_message(err);
    if let Some(span) = span {
        builder.add_label(Label::new((src_id, span)).with_color(deriv_error::EXPR));
    }
    if let Some(name) = err.suggestion() {
        builder.set_help(format!("did you mean `{}`?", name));
    }
    builder.finish()
}

impl Error {
    /// Report this [`Error`] to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, input: &str) {
        let report = match self {
            Self::Usage(err) => {
                eprintln!("{}", err);
                return;
            },
            Self::Calc(CalcError::Parse(err)) => err.build_report("input"),
            Self::Calc(CalcError::Diff(err)) => diff_report(err, "input", input),
            Self::Calc(err @ CalcError::InvalidVariable(_)) => {
                eprintln!("error: {}", err);
                return;
            },
        };

        if let Err(err) = report.eprint(("input", Source::from(input))) {
            eprintln!("could not print error report: {}", err);
        }
    }
}

impl From<UsageError> for Error {
    fn from(err: UsageError) -> Self {
        Self::Usage(err)
    }
}

impl From<CalcError> for Error {
    fn from(err: CalcError) -> Self {
        Self::Calc(err)
    }
}
