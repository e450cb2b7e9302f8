//! Layers backed by entity tables rather than annotation tables.

use super::LayerSql;
use crate::compile::Root;

/// The root layer: the annotation graph (transcript) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootId;

impl LayerSql for RootId {
    fn label(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => Some(root.id_column().to_string()),
            Root::Participant => None,
        }
    }

    fn id(&self, root: Root) -> Option<String> {
        self.label(root)
    }

    fn count(&self, _root: Root) -> Option<String> {
        None
    }

    fn labels(&self, root: Root) -> Option<String> {
        self.label(root).map(|column| format!("(SELECT {})", column))
    }

    fn annotators(&self, _root: Root) -> Option<String> {
        None
    }
}

/// The corpus layer (`layer_id` -100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corpus;

const SPEAKER_CORPUS: &str = "FROM speaker_corpus \
     INNER JOIN corpus ON speaker_corpus.corpus_id = corpus.corpus_id \
     WHERE speaker_corpus.speaker_number = speaker.speaker_number";

impl LayerSql for Corpus {
    fn label(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => "transcript.corpus_name".to_string(),
            Root::Participant => format!("(SELECT corpus.corpus_name {} LIMIT 1)", SPEAKER_CORPUS),
        })
    }

    fn count(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => "(SELECT COUNT(transcript.corpus_name))".to_string(),
            Root::Participant => format!("(SELECT COUNT(*) {})", SPEAKER_CORPUS),
        })
    }

    fn labels(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => "(SELECT transcript.corpus_name)".to_string(),
            Root::Participant => format!("(SELECT corpus.corpus_name {})", SPEAKER_CORPUS),
        })
    }

    fn annotators(&self, _root: Root) -> Option<String> {
        None
    }
}

/// The episode layer (`layer_id` -50), joined directly to
/// `transcript_family`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Episode;

const TRANSCRIPT_FAMILY: &str =
    "FROM transcript_family WHERE transcript_family.family_id = transcript.family_id";

impl LayerSql for Episode {
    fn label(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => Some(format!("(SELECT name {})", TRANSCRIPT_FAMILY)),
            Root::Participant => None,
        }
    }

    fn count(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => Some(format!("(SELECT COUNT(*) {})", TRANSCRIPT_FAMILY)),
            Root::Participant => None,
        }
    }

    fn labels(&self, root: Root) -> Option<String> {
        self.label(root)
    }

    fn annotators(&self, _root: Root) -> Option<String> {
        None
    }
}

/// The participant layer (`layer_id` -2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantEntity;

const TRANSCRIPT_SPEAKERS: &str = "FROM transcript_speaker \
     INNER JOIN speaker ON transcript_speaker.speaker_number = speaker.speaker_number \
     WHERE transcript_speaker.ag_id = transcript.ag_id";

impl LayerSql for ParticipantEntity {
    fn label(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!(
                "(SELECT speaker.name {} ORDER BY speaker.name LIMIT 1)",
                TRANSCRIPT_SPEAKERS
            ),
            Root::Participant => root.id_column().to_string(),
        })
    }

    fn id(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => None,
            Root::Participant => Some(root.id_column().to_string()),
        }
    }

    fn count(&self, root: Root) -> Option<String> {
        match root {
            Root::Transcript => Some(format!("(SELECT COUNT(*) {})", TRANSCRIPT_SPEAKERS)),
            Root::Participant => None,
        }
    }

    fn labels(&self, root: Root) -> Option<String> {
        Some(match root {
            Root::Transcript => format!("(SELECT speaker.name {})", TRANSCRIPT_SPEAKERS),
            Root::Participant => format!("(SELECT {})", root.id_column()),
        })
    }

    fn annotators(&self, _root: Root) -> Option<String> {
        None
    }
}
