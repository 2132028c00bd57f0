//! The append-only log of computations.

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::RwLock;
use std::{fmt, ops::Deref, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What was computed for a [`HistoryEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Computation {
    /// A derivative with respect to a single variable.
    Derivative {
        /// The variable.
        variable: String,

        /// The order of the derivative.
        order: i64,
    },

    /// A mixed partial derivative, taken with respect to each variable in turn.
    Partial {
        /// The variables, in the order they were differentiated with respect to.
        variables: Vec<String>,

        /// The order for each variable.
        orders: Vec<i64>,
    },
}

impl Computation {
    /// The variable or variables, as text: `x` or `x, y`.
    pub fn variable_spec(&self) -> String {
        match self {
            Self::Derivative { variable, .. } => variable.clone(),
            Self::Partial { variables, .. } => variables.join(", "),
        }
    }

    /// The order or orders, as text: `2` or `1, 1`.
    pub fn order_spec(&self) -> String {
        match self {
            Self::Derivative { order, .. } => order.to_string(),
            Self::Partial { orders, .. } => {
                orders.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
            },
        }
    }
}

/// A single successful computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// The position of the entry in the log, starting at zero.
    pub index: usize,

    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,

    /// The expression, as it was written.
    pub input: String,

    /// What was computed.
    pub computation: Computation,

    /// The rendered result.
    pub result: String,
}

impl HistoryEntry {
    /// The expression, as it was written.
    pub fn expression_text(&self) -> &str {
        &self.input
    }

    /// The variable or variables, as text.
    pub fn variable_spec(&self) -> String {
        self.computation.variable_spec()
    }

    /// The order or orders, as text.
    pub fn order_spec(&self) -> String {
        self.computation.order_spec()
    }

    /// The rendered result.
    pub fn result_text(&self) -> &str {
        &self.result
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d/d[{}] order [{}] of {} = {}",
            self.variable_spec(),
            self.order_spec(),
            self.input,
            self.result,
        )
    }
}

/// An immutable snapshot of the most recent entries of a [`Session`], oldest first.
///
/// Taking a snapshot does not block appends, and appends made after it was taken are not visible
/// through it.
#[derive(Debug, Clone)]
pub struct History {
    entries: Arc<Vec<HistoryEntry>>,
    start: usize,
}

impl Deref for History {
    type Target = [HistoryEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries[self.start..]
    }
}

/// The log of every successful computation made by a [`Calculator`](crate::Calculator).
///
/// Entries can only be appended. Appends are serialized under a lock and replace the shared
/// sequence, so readers holding a [`History`] snapshot are never affected by later appends.
#[derive(Debug, Default)]
pub struct Session {
    entries: RwLock<Arc<Vec<HistoryEntry>>>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the log, returning its index.
    pub fn record(
        &self,
        input: impl Into<String>,
        computation: Computation,
        result: impl Into<String>,
    ) -> usize {
        let mut entries = self.entries.write();
        let entry = HistoryEntry {
            index: entries.len(),
            timestamp: Utc::now(),
            input: input.into(),
            computation,
            result: result.into(),
        };
        info!("recorded history entry {}: {}", entry.index, entry);

        let index = entry.index;
        Arc::make_mut(&mut entries).push(entry);
        index
    }

    /// Returns up to `limit` of the most recent entries, oldest first.
    pub fn history(&self, limit: usize) -> History {
        let entries = Arc::clone(&self.entries.read());
        let start = entries.len().saturating_sub(limit);
        History { entries, start }
    }

    /// Returns every entry, oldest first.
    pub fn all(&self) -> History {
        self.history(usize::MAX)
    }

    /// Returns the number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::thread;
    use super::*;

    fn derivative(variable: &str, order: i64) -> Computation {
        Computation::Derivative { variable: variable.to_string(), order }
    }

    #[test]
    fn specs() {
        assert_eq!(derivative("x", 2).variable_spec(), "x");
        assert_eq!(derivative("x", 2).order_spec(), "2");

        let partial = Computation::Partial {
            variables: vec!["x".to_string(), "y".to_string()],
            orders: vec![1, 2],
        };
        assert_eq!(partial.variable_spec(), "x, y");
        assert_eq!(partial.order_spec(), "1, 2");
    }

    #[test]
    fn history_is_oldest_first() {
        let session = Session::new();
        for i in 0..5 {
            assert_eq!(session.record(format!("x^{}", i), derivative("x", 1), "0"), i);
        }

        let history = session.history(3);
        let inputs = history.iter().map(HistoryEntry::expression_text).collect::<Vec<_>>();
        assert_eq!(inputs, ["x^2", "x^3", "x^4"]);
        assert_eq!(history[0].index, 2);

        assert_eq!(session.history(10).len(), 5);
        assert_eq!(session.history(0).len(), 0);
    }

    #[test]
    fn snapshots_are_unaffected_by_appends() {
        let session = Session::new();
        session.record("x", derivative("x", 1), "1");
        let snapshot = session.all();
        session.record("x^2", derivative("x", 1), "2*x");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let session = Session::new();
        thread::scope(|scope| {
            for t in 0..4 {
                let session = &session;
                scope.spawn(move || {
                    for i in 0..25 {
                        session.record(format!("{}*x", t * 25 + i), derivative("x", 1), "1");
                    }
                });
            }
        });

        let history = session.all();
        assert_eq!(history.len(), 100);
        assert!(history.iter().enumerate().all(|(i, entry)| entry.index == i));
    }
}
