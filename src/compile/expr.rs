//! Translation of AGQL expression trees to SQL fragments.
//!
//! The compiler renders every node it can and records a fault for every
//! node it can't, substituting a `NULL` placeholder so that the walk
//! continues and all faults in the expression are reported together.

use super::error::{Clause, FaultKind, FaultSink};
use super::Root;
use crate::ql::{Expr, LayerFunction, Operand, OrderTerm, Span, Spanned};
use crate::schema::Schema;
use crate::storage::LayerSql;

const SCALAR_PLACEHOLDER: &str = "NULL";
const SET_PLACEHOLDER: &str = "(SELECT NULL)";

/// Compiles filter and order expressions against one schema and root.
pub(crate) struct ExprCompiler<'a> {
    schema: &'a Schema,
    root: Root,
    sink: FaultSink,
}

impl<'a> ExprCompiler<'a> {
    pub(crate) fn new(schema: &'a Schema, root: Root) -> Self {
        Self {
            schema,
            root,
            sink: FaultSink::new(),
        }
    }

    pub(crate) fn sink(&mut self) -> &mut FaultSink {
        &mut self.sink
    }

    pub(crate) fn into_sink(self) -> FaultSink {
        self.sink
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    pub(crate) fn condition(&mut self, expr: &Spanned<Expr>) -> String {
        match &expr.value {
            Expr::And(lhs, rhs) => {
                let lhs = self.condition(lhs);
                let rhs = self.condition(rhs);
                format!("{} AND {}", lhs, rhs)
            }
            Expr::Or(lhs, rhs) => {
                let lhs = self.condition(lhs);
                let rhs = self.condition(rhs);
                format!("{} OR {}", lhs, rhs)
            }
            Expr::Group(inner) => format!("({})", self.condition(inner)),
            Expr::Not(inner) => match inner.value {
                Expr::Group(_) => format!("NOT {}", self.condition(inner)),
                _ => format!("NOT ({})", self.condition(inner)),
            },
            Expr::Compare { lhs, op, rhs } => {
                let lhs = self.scalar(lhs);
                let rhs = if op.value.takes_set() {
                    self.set(rhs)
                } else {
                    self.scalar(rhs)
                };
                format!("{} {} {}", lhs, op.value.sql(), rhs)
            }
            Expr::Operand(operand) => self.scalar(operand),
            Expr::Error => SCALAR_PLACEHOLDER.to_string(),
        }
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    pub(crate) fn order(&mut self, terms: &[OrderTerm]) -> Vec<String> {
        self.sink.enter(Clause::Order);
        terms
            .iter()
            .map(|term| {
                let sql = self.scalar(&term.operand);
                if term.descending {
                    format!("{} DESC", sql)
                } else {
                    sql
                }
            })
            .collect()
    }

    // ========================================================================
    // Operands
    // ========================================================================

    /// Render an operand that must yield one value per root row.
    fn scalar(&mut self, operand: &Spanned<Operand>) -> String {
        match &operand.value {
            Operand::Id | Operand::Label => self.root.id_column().to_string(),
            Operand::Ordinal => match self.root.ordinal_column() {
                Some(column) => column.to_string(),
                None => self.unsupported(operand),
            },
            Operand::Literal(literal) => literal.to_string(),
            Operand::Layer { function, layer_id } if !function.is_set() => self
                .layer(*function, layer_id, operand)
                .unwrap_or_else(|| SCALAR_PLACEHOLDER.to_string()),
            Operand::Layer { .. } | Operand::List(_) => {
                self.misplaced(operand, "a single value", SCALAR_PLACEHOLDER)
            }
            Operand::Identifier(_) | Operand::Member { .. } => self.unsupported(operand),
        }
    }

    /// Render the right-hand side of `IN`/`NOT IN`.
    fn set(&mut self, operand: &Spanned<Operand>) -> String {
        match &operand.value {
            Operand::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| match &item.value {
                        Operand::Literal(literal) => format!(" {}", literal),
                        _ => format!(" {}", self.unsupported(item)),
                    })
                    .collect();
                format!("({})", items.join(","))
            }
            Operand::Layer { function, layer_id } if function.is_set() => self
                .layer(*function, layer_id, operand)
                .unwrap_or_else(|| SET_PLACEHOLDER.to_string()),
            _ => self.misplaced(operand, "a list or a set of labels", SET_PLACEHOLDER),
        }
    }

    /// Resolve a layer function against the schema.
    fn layer(
        &mut self,
        function: LayerFunction,
        layer_id: &Spanned<String>,
        operand: &Spanned<Operand>,
    ) -> Option<String> {
        let schema = self.schema;
        let Some(layer) = schema.layer(&layer_id.value) else {
            self.fault(
                FaultKind::UnknownLayer {
                    operand: operand.value.to_string(),
                    layer_id: layer_id.value.clone(),
                },
                operand.span.clone(),
            );
            return None;
        };

        let Some(category) = schema.category(&layer.id) else {
            self.fault(
                FaultKind::UnmappedLayer {
                    operand: operand.value.to_string(),
                    layer_id: layer_id.value.clone(),
                },
                operand.span.clone(),
            );
            return None;
        };

        let sql = match function {
            LayerFunction::Label => category.label(self.root),
            LayerFunction::Id => category.id(self.root),
            LayerFunction::Count => category.count(self.root),
            LayerFunction::Labels => category.labels(self.root),
            LayerFunction::Annotators => category.annotators(self.root),
        };

        if sql.is_none() {
            self.fault(
                FaultKind::UnsupportedFunction {
                    operand: operand.value.to_string(),
                    layer_id: layer_id.value.clone(),
                    category: category.name(),
                    root: self.root,
                },
                operand.span.clone(),
            );
        }
        sql
    }

    fn unsupported(&mut self, operand: &Spanned<Operand>) -> String {
        self.fault(
            FaultKind::UnsupportedOperand {
                operand: operand.value.to_string(),
                root: self.root,
            },
            operand.span.clone(),
        );
        SCALAR_PLACEHOLDER.to_string()
    }

    fn misplaced(
        &mut self,
        operand: &Spanned<Operand>,
        expected: &'static str,
        placeholder: &str,
    ) -> String {
        self.fault(
            FaultKind::Misplaced {
                operand: operand.value.to_string(),
                expected,
            },
            operand.span.clone(),
        );
        placeholder.to_string()
    }

    fn fault(&mut self, kind: FaultKind, span: Span) {
        self.sink.push(kind, span);
    }
}
