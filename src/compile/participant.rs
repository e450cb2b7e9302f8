//! Participant queries.

use super::{AgqlToSql, Root};
use crate::schema::Schema;

/// Compiles AGQL into queries over participants (speakers).
///
/// Only categories reachable from a participant compile: the participant
/// itself, its attributes, the attributes of transcripts it appears in,
/// and its corpora. Anything else is reported as unsupported.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantAgqlToSql<'a> {
    schema: &'a Schema,
}

impl<'a> ParticipantAgqlToSql<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }
}

impl AgqlToSql for ParticipantAgqlToSql<'_> {
    fn root(&self) -> Root {
        Root::Participant
    }

    fn schema(&self) -> &Schema {
        self.schema
    }
}
