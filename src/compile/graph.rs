//! Transcript queries.

use super::{AgqlToSql, Root};
use crate::schema::Schema;

/// Compiles AGQL into queries over transcripts (annotation graphs).
///
/// ```
/// use agql::prelude::*;
///
/// let schema = Schema::builder().build().unwrap();
/// let query = GraphAgqlToSql::new(&schema)
///     .sql_for("id NOT MATCHES 'Ada.+'", "transcript.transcript_id", None, None, Some("LIMIT 1,1"))
///     .unwrap();
/// assert_eq!(
///     query.sql,
///     "SELECT transcript.transcript_id FROM transcript \
///      WHERE transcript.transcript_id NOT REGEXP 'Ada.+' \
///      ORDER BY transcript.transcript_id LIMIT 1,1"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphAgqlToSql<'a> {
    schema: &'a Schema,
}

impl<'a> GraphAgqlToSql<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }
}

impl AgqlToSql for GraphAgqlToSql<'_> {
    fn root(&self) -> Root {
        Root::Transcript
    }

    fn schema(&self) -> &Schema {
        self.schema
    }
}
