use model::query::filter::{ComparisonOp, FilterClause};
use std::fmt;

/// Severity level for clause issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClauseIssueKind {
    MissingField,
    NoComparison,
    MultipleComparisons { operators: Vec<ComparisonOp> },
}

impl ClauseIssueKind {
    /// Why `clause` cannot be compiled, if it cannot.
    pub fn detect(clause: &FilterClause) -> Option<Self> {
        if clause.field.as_ref().is_none_or(|f| f.is_empty()) {
            return Some(ClauseIssueKind::MissingField);
        }
        match (clause.comparison, clause.conflicting.as_slice()) {
            (Some(_), _) => None,
            (None, []) => Some(ClauseIssueKind::NoComparison),
            (None, operators) => Some(ClauseIssueKind::MultipleComparisons {
                operators: operators.to_vec(),
            }),
        }
    }
}

impl fmt::Display for ClauseIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseIssueKind::MissingField => write!(f, "clause has no field"),
            ClauseIssueKind::NoComparison => write!(f, "clause sets no comparison"),
            ClauseIssueKind::MultipleComparisons { operators } => {
                let names = operators
                    .iter()
                    .map(|op| op.wire_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "clause sets more than one comparison ({names})")
            }
        }
    }
}

/// A problem with one clause of a filter list. Warnings drop the clause,
/// errors fail the whole filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseIssue {
    pub index: usize,
    pub severity: Severity,
    pub kind: ClauseIssueKind,
    pub message: String,
}

impl ClauseIssue {
    pub fn warning(index: usize, kind: ClauseIssueKind) -> Self {
        let message = kind.to_string();
        Self {
            index,
            severity: Severity::Warning,
            kind,
            message,
        }
    }

    pub fn error(index: usize, kind: ClauseIssueKind) -> Self {
        let message = kind.to_string();
        Self {
            index,
            severity: Severity::Error,
            kind,
            message,
        }
    }

    /// Reports why `clause` cannot be compiled, at `severity`, if it cannot.
    pub fn inspect(index: usize, clause: &FilterClause, severity: Severity) -> Option<Self> {
        ClauseIssueKind::detect(clause).map(|kind| match severity {
            Severity::Warning => Self::warning(index, kind),
            Severity::Error => Self::error(index, kind),
        })
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ClauseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in clause {}: {}", self.severity, self.index, self.message)
    }
}
