//! AGQL expression tree.
//!
//! Every node that can be the subject of a diagnostic carries its span so
//! faults can be reported against the original expression text.

use std::fmt;

use super::escape::quote;
use super::span::Spanned;

// ============================================================================
// Boolean expressions
// ============================================================================

/// A filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    And(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Or(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Not(Box<Spanned<Expr>>),
    /// An explicitly parenthesized sub-expression.
    Group(Box<Spanned<Expr>>),
    Compare {
        lhs: Spanned<Operand>,
        op: Spanned<CompareOp>,
        rhs: Spanned<Operand>,
    },
    /// An operand used as a condition on its own.
    Operand(Spanned<Operand>),
    /// Input that failed to parse; its syntax error is reported separately.
    Error,
}

impl Expr {
    pub fn is_or(&self) -> bool {
        matches!(self, Expr::Or(..))
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Matches,
    NotMatches,
    In,
    NotIn,
}

impl CompareOp {
    /// Whether the right-hand side must be a set (list or layer set).
    pub fn takes_set(self) -> bool {
        matches!(self, CompareOp::In | CompareOp::NotIn)
    }

    /// The SQL spelling of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Matches => "REGEXP",
            CompareOp::NotMatches => "NOT REGEXP",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Matches => "MATCHES",
            CompareOp::NotMatches => "NOT MATCHES",
            other => other.sql(),
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Operands
// ============================================================================

/// What a layer function asks of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFunction {
    /// `my('L').label` or `L.label`
    Label,
    /// `my('L').id` or `L.id`
    Id,
    /// `list('L').length` or `labels('L').length`
    Count,
    /// `labels('L')`
    Labels,
    /// `annotators('L')`
    Annotators,
}

impl LayerFunction {
    /// Whether the function yields a set rather than a scalar.
    pub fn is_set(self) -> bool {
        matches!(self, LayerFunction::Labels | LayerFunction::Annotators)
    }

    pub fn name(self) -> &'static str {
        match self {
            LayerFunction::Label => "label",
            LayerFunction::Id => "id",
            LayerFunction::Count => "length",
            LayerFunction::Labels => "labels",
            LayerFunction::Annotators => "annotators",
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A string with surrounding quotes removed. Backslash escapes are kept,
    /// except that `\"` from a double-quoted string is already unescaped.
    String(String),
    /// A number, verbatim.
    Number(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{}", quote(s)),
            Literal::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A value-producing term.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bare `id`.
    Id,
    /// Bare `label`.
    Label,
    /// Bare `ordinal`.
    Ordinal,
    /// A function applied to a layer.
    Layer {
        function: LayerFunction,
        layer_id: Spanned<String>,
    },
    Literal(Literal),
    /// A parenthesized literal list, e.g. `('a', 'b')`.
    List(Vec<Spanned<Operand>>),
    /// Any other bare identifier.
    Identifier(String),
    /// `object.member` where member is neither `label` nor `id`.
    Member {
        object: Spanned<String>,
        member: Spanned<String>,
    },
}

impl Operand {
    pub fn is_set(&self) -> bool {
        match self {
            Operand::List(_) => true,
            Operand::Layer { function, .. } => function.is_set(),
            _ => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Id => write!(f, "id"),
            Operand::Label => write!(f, "label"),
            Operand::Ordinal => write!(f, "ordinal"),
            Operand::Layer { function, layer_id } => {
                let layer = quote(layer_id);
                match function {
                    LayerFunction::Label => write!(f, "my({}).label", layer),
                    LayerFunction::Id => write!(f, "my({}).id", layer),
                    LayerFunction::Count => write!(f, "list({}).length", layer),
                    LayerFunction::Labels => write!(f, "labels({})", layer),
                    LayerFunction::Annotators => write!(f, "annotators({})", layer),
                }
            }
            Operand::Literal(lit) => write!(f, "{}", lit),
            Operand::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                write!(f, ")")
            }
            Operand::Identifier(name) => write!(f, "{}", name),
            Operand::Member { object, member } => write!(f, "{}.{}", object.value, member.value),
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// One term of an order expression.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    pub operand: Spanned<Operand>,
    pub descending: bool,
}
