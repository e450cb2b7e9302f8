//! Compile errors.
//!
//! Compilation never stops at the first problem: every fault found while
//! walking the filter and order expressions is collected, and the caller
//! gets all of them in one [`AgqlError`].

use std::fmt;

use super::Root;
use crate::ql::Span;

// ============================================================================
// Faults
// ============================================================================

/// Which expression a fault was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Filter,
    Order,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Filter => write!(f, "filter"),
            Clause::Order => write!(f, "order"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultKind {
    #[error("Invalid layer: {operand}")]
    UnknownLayer { operand: String, layer_id: String },

    #[error("{operand}: not supported for {category} layer '{layer_id}' on {root} queries")]
    UnsupportedFunction {
        operand: String,
        layer_id: String,
        category: &'static str,
        root: Root,
    },

    #[error("{operand}: layer '{layer_id}' has no storage mapping")]
    UnmappedLayer { operand: String, layer_id: String },

    #[error("{operand}: not supported on {root} queries")]
    UnsupportedOperand { operand: String, root: Root },

    #[error("{operand}: expected {expected}")]
    Misplaced {
        operand: String,
        expected: &'static str,
    },

    #[error("{message}")]
    Syntax { message: String },
}

/// One problem found in an AGQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub clause: Clause,
    /// Byte range within the clause's source text.
    pub span: Span,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {} at {:?})", self.kind, self.clause, self.span)
    }
}

// ============================================================================
// AgqlError
// ============================================================================

/// All faults found while compiling one query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.faults))]
pub struct AgqlError {
    /// The filter expression as given.
    pub expression: String,
    /// The order expression as given.
    pub order: Option<String>,
    pub faults: Vec<Fault>,
}

fn summarize(faults: &[Fault]) -> String {
    let messages: Vec<String> = faults.iter().map(|f| f.kind.to_string()).collect();
    match faults.len() {
        1 => messages.join(""),
        n => format!("{} errors: {}", n, messages.join("; ")),
    }
}

impl AgqlError {
    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// The source text a fault's span refers to.
    pub fn source_of(&self, clause: Clause) -> &str {
        match clause {
            Clause::Filter => &self.expression,
            Clause::Order => self.order.as_deref().unwrap_or(""),
        }
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Accumulates faults, tagging each with the clause being compiled.
#[derive(Debug)]
pub(crate) struct FaultSink {
    clause: Clause,
    faults: Vec<Fault>,
}

impl FaultSink {
    pub(crate) fn new() -> Self {
        Self {
            clause: Clause::Filter,
            faults: Vec::new(),
        }
    }

    pub(crate) fn enter(&mut self, clause: Clause) {
        self.clause = clause;
    }

    pub(crate) fn push(&mut self, kind: FaultKind, span: Span) {
        log::trace!("{} fault at {:?}: {}", self.clause, span, kind);
        self.faults.push(Fault {
            kind,
            clause: self.clause,
            span,
        });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    pub(crate) fn into_faults(self) -> Vec<Fault> {
        self.faults
    }
}
