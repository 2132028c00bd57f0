//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that associates a kind with regions of the input text.

#[cfg(test)]
extern crate self as deriv_error;

use ariadne::{Color, Report};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while reading an expression.
///
/// This trait is usually derived with `deriv_attrs::ErrorKind`.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error as a [`std::any::Any`], so that callers can downcast it to the concrete
    /// error kind.
    fn as_any(&self) -> &dyn Any;

    /// The one-line, human-readable description of the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error should stop any backtracking parser from trying alternatives.
    pub fatal: bool,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// The human-readable reason for the error.
    pub fn reason(&self) -> String {
        self.kind.message()
    }

    /// The byte offset in the input where the error starts.
    pub fn position(&self) -> usize {
        self.spans.first().map(|span| span.start).unwrap_or(0)
    }

    /// Returns the kind of this error if it is of type `K`.
    pub fn kind_as<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at position {})", self.reason(), self.position())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne::Source;
    use deriv_attrs::ErrorKind;
    use pretty_assertions::assert_eq;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("unknown name `{}`", name),
        labels = ["this name"],
        help = "check the spelling",
    )]
    struct UnknownName {
        name: String,
    }

    #[derive(Debug, ErrorKind)]
    #[error(message = "nothing to read")]
    struct Nothing;

    #[test]
    fn reason_and_position() {
        let err = Error::new(vec![4..7], UnknownName { name: "foo".to_string() });
        assert_eq!(err.reason(), "unknown name `foo`");
        assert_eq!(err.position(), 4);
        assert_eq!(err.to_string(), "unknown name `foo` (at position 4)");
        assert!(!err.fatal);
    }

    #[test]
    fn downcast_kind() {
        let err = Error::new_fatal(vec![0..0], Nothing);
        assert!(err.fatal);
        assert!(err.kind_as::<Nothing>().is_some());
        assert!(err.kind_as::<UnknownName>().is_none());
    }

    #[test]
    fn report_contains_message_and_label() {
        let src = "1 + foo";
        let err = Error::new(vec![4..7], UnknownName { name: "foo".to_string() });
        let mut buf = Vec::new();
        err.build_report("input")
            .write(("input", Source::from(src)), &mut buf)
            .unwrap();
        let text = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(text.contains("unknown name `foo`"));
        assert!(text.contains("this name"));
        assert!(text.contains("check the spelling"));
    }
}
