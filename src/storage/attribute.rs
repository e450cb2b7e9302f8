//! Attribute layers.
//!
//! Attributes are free-form key/value annotations stored in two shared
//! tables, `annotation_transcript` and `annotation_participant`, keyed by
//! the attribute name in the `layer` column.

use super::LayerSql;
use crate::compile::Root;
use crate::ql::quote;

/// A transcript attribute, stored in `annotation_transcript`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptAttribute {
    pub attribute: String,
}

impl TranscriptAttribute {
    pub fn new(attribute: String) -> Self {
        Self { attribute }
    }

    /// Rows of this attribute for the current transcript.
    ///
    /// The aggregate forms correlate through `transcript_speaker.ag_id`,
    /// which existing deployments depend on; `my()` correlates directly.
    fn from_transcript(&self, correlation: &str) -> String {
        format!(
            "FROM annotation_transcript USE INDEX(IDX_AG_ID_NAME) \
             WHERE annotation_transcript.layer = {} \
             AND {}.ag_id = transcript.ag_id",
            quote(&self.attribute),
            correlation
        )
    }

    /// Rows of this attribute for every transcript the current participant
    /// appears in.
    fn from_participant(&self) -> String {
        format!(
            "FROM annotation_transcript \
             INNER JOIN transcript_speaker \
             ON annotation_transcript.ag_id = transcript_speaker.ag_id \
             WHERE annotation_transcript.layer = {} \
             AND transcript_speaker.speaker_number = speaker.speaker_number",
            quote(&self.attribute)
        )
    }
}

impl LayerSql for TranscriptAttribute {
    fn label(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => Some(format!(
                "(SELECT label {} ORDER BY annotation_id LIMIT 1)",
                self.from_transcript("annotation_transcript")
            )),
            Root::Participant => None,
        }
    }

    fn count(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!(
                "(SELECT COUNT(*) {})",
                self.from_transcript("transcript_speaker")
            ),
            Root::Participant => format!("(SELECT COUNT(*) {})", self.from_participant()),
        })
    }

    fn labels(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!(
                "(SELECT DISTINCT label {})",
                self.from_transcript("transcript_speaker")
            ),
            Root::Participant => format!("(SELECT DISTINCT label {})", self.from_participant()),
        })
    }

    fn annotators(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!(
                "(SELECT DISTINCT annotated_by {})",
                self.from_transcript("transcript_speaker")
            ),
            Root::Participant => format!("(SELECT annotated_by {})", self.from_participant()),
        })
    }
}

/// A participant attribute, stored in `annotation_participant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantAttribute {
    pub attribute: String,
}

impl ParticipantAttribute {
    pub fn new(attribute: String) -> Self {
        Self { attribute }
    }

    /// Rows of this attribute for every participant in the current
    /// transcript.
    fn from_transcript(&self) -> String {
        format!(
            "FROM annotation_participant \
             INNER JOIN transcript_speaker \
             ON annotation_participant.speaker_number = transcript_speaker.speaker_number \
             AND annotation_participant.layer = {} \
             WHERE transcript_speaker.ag_id = transcript.ag_id",
            quote(&self.attribute)
        )
    }

    fn from_participant(&self) -> String {
        format!(
            "FROM annotation_participant \
             WHERE annotation_participant.layer = {} \
             AND annotation_participant.speaker_number = speaker.speaker_number",
            quote(&self.attribute)
        )
    }

    fn from(&self, root: Root) -> String {
        match root {
            Root::Transcript => self.from_transcript(),
            Root::Participant => self.from_participant(),
        }
    }
}

impl LayerSql for ParticipantAttribute {
    fn label(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!(
                "(SELECT label {} ORDER BY annotation_id LIMIT 1)",
                self.from_transcript()
            ),
            Root::Participant => format!("(SELECT label {} LIMIT 1)", self.from_participant()),
        })
    }

    fn count(&self, root: Root) -> Option<String> {
        Some(format!("(SELECT COUNT(*) {})", self.from(root)))
    }

    fn labels(&self, root: Root) -> Option<String> {
        Some(format!("(SELECT DISTINCT label {})", self.from(root)))
    }

    fn annotators(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => {
                format!("(SELECT DISTINCT annotated_by {})", self.from_transcript())
            }
            Root::Participant => format!("(SELECT annotated_by {})", self.from_participant()),
        })
    }
}
