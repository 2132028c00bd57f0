//! The text payload handed to document exporters.

use std::fmt;
use crate::session::HistoryEntry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A document to export: a title, a body, and the most recent computations.
///
/// The calculator only prepares the text; turning it into a file format is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportDocument {
    /// The title of the document.
    pub title: String,

    /// The body of the document, usually the last result.
    pub body: String,

    /// The most recent computations, oldest first, each formatted as
    /// `{number}. {expression} -> {result}`.
    pub history: Vec<String>,
}

impl ExportDocument {
    /// Creates a document from the given history entries.
    pub fn new<'a>(
        title: impl Into<String>,
        body: impl Into<String>,
        entries: impl IntoIterator<Item = &'a HistoryEntry>,
    ) -> Self {
        let history = entries.into_iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {} -> {}", i + 1, entry.input, entry.result))
            .collect();
        Self { title: title.into(), body: body.into(), history }
    }
}

/// Renders the document as plain text.
impl fmt::Display for ExportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f)?;
        writeln!(f, "{}", self.body)?;

        if !self.history.is_empty() {
            writeln!(f)?;
            writeln!(f, "History")?;
            writeln!(f, "-------")?;
            for line in &self.history {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}
