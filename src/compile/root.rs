//! The entity a query selects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The root entity of a query: one row per transcript or per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Root {
    /// Annotation graphs, from the `transcript` table.
    Transcript,
    /// Participants, from the `speaker` table.
    Participant,
}

impl Root {
    /// The table the query selects from.
    pub fn table(self) -> &'static str {
        match self {
            Root::Transcript => "transcript",
            Root::Participant => "speaker",
        }
    }

    /// The column holding the entity's identifier; also the default sort key.
    pub fn id_column(self) -> &'static str {
        match self {
            Root::Transcript => "transcript.transcript_id",
            Root::Participant => "speaker.name",
        }
    }

    /// The structural sequence column, if the entity has one.
    pub fn ordinal_column(self) -> Option<&'static str> {
        match self {
            Root::Transcript => Some("transcript.family_sequence"),
            Root::Participant => None,
        }
    }

    pub fn is_transcript(self) -> bool {
        self == Root::Transcript
    }

    pub fn name(self) -> &'static str {
        match self {
            Root::Transcript => "transcript",
            Root::Participant => "participant",
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
