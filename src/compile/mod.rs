//! End-to-end compilation from AGQL to MySQL.
//!
//! ```text
//! AGQL filter ─┐                                     ┌─ select, extra WHERE, limit (raw SQL)
//!              ├─▶ parse ─▶ ExprCompiler ─▶ fragments ─▶ QueryBuilder ─▶ Query
//! AGQL order ──┘              │                                         or AgqlError
//!                             └─ Schema ─▶ LayerCategory ─▶ LayerSql
//! ```
//!
//! Two front-ends share the pipeline and differ only in their [`Root`]:
//! [`GraphAgqlToSql`] selects transcripts, [`ParticipantAgqlToSql`]
//! selects participants.
//!
//! # Example
//!
//! ```
//! use agql::prelude::*;
//!
//! let schema = Schema::builder()
//!     .layer(Layer::new("corpus", "Corpus").with_layer_id(-100))
//!     .corpus_layer("corpus")
//!     .build()
//!     .unwrap();
//!
//! let query = GraphAgqlToSql::new(&schema)
//!     .sql_for("my('corpus').label = 'CC'", "transcript.transcript_id", None, None, None)
//!     .unwrap();
//! assert_eq!(
//!     query.sql,
//!     "SELECT transcript.transcript_id FROM transcript \
//!      WHERE transcript.corpus_name = 'CC' ORDER BY transcript.transcript_id"
//! );
//! ```

mod error;
mod expr;
mod graph;
mod participant;
mod root;

pub use error::{AgqlError, Clause, Fault, FaultKind};
pub use graph::GraphAgqlToSql;
pub use participant::ParticipantAgqlToSql;
pub use root::Root;

use expr::ExprCompiler;

use crate::ql;
use crate::schema::Schema;
use crate::sql::{Condition, Query, QueryBuilder};

/// A compiler from AGQL to SQL for one root entity.
pub trait AgqlToSql {
    /// The entity each result row represents.
    fn root(&self) -> Root;

    fn schema(&self) -> &Schema;

    /// Compile a filter expression and an optional order expression into
    /// one executable statement.
    ///
    /// `select`, `extra_where` and `limit` are raw SQL and are passed
    /// through untouched. A missing or blank `order` sorts by the root's
    /// identifier. Every fault in `expression` and `order` is reported in
    /// the returned [`AgqlError`].
    fn sql_for(
        &self,
        expression: &str,
        select: &str,
        extra_where: Option<&str>,
        order: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Query, AgqlError> {
        sql_for(
            self.schema(),
            self.root(),
            expression,
            select,
            extra_where,
            order,
            limit,
        )
    }
}

fn sql_for(
    schema: &Schema,
    root: Root,
    expression: &str,
    select: &str,
    extra_where: Option<&str>,
    order: Option<&str>,
    limit: Option<&str>,
) -> Result<Query, AgqlError> {
    let mut compiler = ExprCompiler::new(schema, root);

    // Filter
    let parsed = ql::parse_filter(expression);
    for diagnostic in &parsed.diagnostics {
        compiler.sink().push(
            FaultKind::Syntax {
                message: diagnostic.message.clone(),
            },
            diagnostic.span.clone(),
        );
    }
    let filter = match parsed.output.flatten() {
        Some(expr) if expr.value.is_or() => Condition::disjunction(compiler.condition(&expr)),
        Some(expr) => Condition::new(compiler.condition(&expr)),
        None => Condition::new(""),
    };

    // Order
    compiler.sink().enter(Clause::Order);
    let order_by = match order.filter(|o| !o.trim().is_empty()) {
        None => vec![root.id_column().to_string()],
        Some(source) => {
            let parsed = ql::parse_order(source);
            for diagnostic in &parsed.diagnostics {
                compiler.sink().push(
                    FaultKind::Syntax {
                        message: diagnostic.message.clone(),
                    },
                    diagnostic.span.clone(),
                );
            }
            match parsed.output {
                Some(terms) => compiler.order(&terms),
                None => Vec::new(),
            }
        }
    };

    let sink = compiler.into_sink();
    if !sink.is_empty() {
        let error = AgqlError {
            expression: expression.to_string(),
            order: order.map(String::from),
            faults: sink.into_faults(),
        };
        log::debug!("{} query rejected: {}", root, error);
        return Err(error);
    }

    let query = QueryBuilder::new(select, root.table())
        .filter(filter)
        .extra_where(extra_where)
        .order_by_all(order_by)
        .limit(limit)
        .build();
    log::debug!("{} query: {}", root, query.sql);
    Ok(query)
}
