//! # agql
//!
//! Compiles Annotation Graph Query Language (AGQL) expressions into MySQL
//! for searching transcripts and participants in an annotation store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        AGQL text (filter + optional order)               │
//! │  my('corpus').label = 'CC' AND 'bell' IN labels('noise') │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [ql: lexer + parser]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Spanned expression tree                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile: ExprCompiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SQL fragments, one per layer function, chosen by the   │
//! │   layer's storage category (schema + storage)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql: QueryBuilder]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Query { sql, parameters }  or  AgqlError          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use agql::prelude::*;
//!
//! let schema = Schema::builder()
//!     .layer(Layer::new("who", "Participants").with_layer_id(-2))
//!     .participant_layer("who")
//!     .build()
//!     .unwrap();
//!
//! let query = ParticipantAgqlToSql::new(&schema)
//!     .sql_for("label MATCHES 'Ada.+'", "speaker_number, name", None, None, None)
//!     .unwrap();
//! assert_eq!(
//!     query.sql,
//!     "SELECT speaker_number, name FROM speaker \
//!      WHERE speaker.name REGEXP 'Ada.+' ORDER BY speaker.name"
//! );
//! ```

pub mod compile;
pub mod config;
pub mod ql;
pub mod schema;
pub mod sql;
pub mod storage;

pub use compile::{AgqlError, AgqlToSql, GraphAgqlToSql, ParticipantAgqlToSql};
pub use sql::Query;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{
        AgqlError, AgqlToSql, Clause, Fault, FaultKind, GraphAgqlToSql, ParticipantAgqlToSql,
        Root,
    };
    pub use crate::ql::{esc, quote};
    pub use crate::schema::{Alignment, Layer, Schema, SchemaError};
    pub use crate::sql::{Parameter, Query};
    pub use crate::storage::{LayerCategory, LayerSql};
}
