//! Layers with their own `annotation_layer_<id>` table.

use super::LayerSql;
use crate::compile::Root;
use crate::sql::LayerTable;

/// A layer annotating episodes (`layer_id` below -50), keyed on
/// `family_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLayer {
    pub table: LayerTable,
}

impl EpisodeLayer {
    pub fn new(layer_id: i64) -> Self {
        Self {
            table: LayerTable::new(layer_id),
        }
    }

    fn from(&self) -> String {
        format!(
            "FROM {} annotation WHERE annotation.family_id = transcript.family_id",
            self.table
        )
    }
}

impl LayerSql for EpisodeLayer {
    fn label(&self, root: Root) -> Option<String> {
        root.is_transcript().then(|| {
            format!(
                "(SELECT label {} ORDER BY annotation.ordinal LIMIT 1)",
                self.from()
            )
        })
    }

    fn count(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT COUNT(*) {})", self.from()))
    }

    fn labels(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT label {})", self.from()))
    }

    fn annotators(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT DISTINCT annotated_by {})", self.from()))
    }
}

/// An ordinary annotation layer, keyed on `ag_id`.
///
/// Temporal layers rank their first annotation by anchor offset; tag layers
/// by annotation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLayer {
    pub table: LayerTable,
    pub temporal: bool,
}

impl AnnotationLayer {
    pub fn new(layer_id: i64, temporal: bool) -> Self {
        Self {
            table: LayerTable::new(layer_id),
            temporal,
        }
    }

    fn from(&self) -> String {
        format!(
            "FROM {} annotation WHERE annotation.ag_id = transcript.ag_id",
            self.table
        )
    }
}

impl LayerSql for AnnotationLayer {
    fn label(&self, root: Root) -> Option<String> {
        if !root.is_transcript() {
            return None;
        }
        Some(if self.temporal {
            format!(
                "(SELECT label FROM {} annotation \
                 INNER JOIN anchor ON annotation.start_anchor_id = anchor.anchor_id \
                 WHERE annotation.ag_id = transcript.ag_id \
                 ORDER BY anchor.offset, annotation.annotation_id LIMIT 1)",
                self.table
            )
        } else {
            format!(
                "(SELECT label {} ORDER BY annotation.annotation_id LIMIT 1)",
                self.from()
            )
        })
    }

    fn count(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT COUNT(*) {})", self.from()))
    }

    fn labels(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT label {})", self.from()))
    }

    fn annotators(&self, root: Root) -> Option<String> {
        root.is_transcript()
            .then(|| format!("(SELECT DISTINCT annotated_by {})", self.from()))
    }
}
