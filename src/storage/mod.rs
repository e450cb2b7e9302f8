//! Physical storage of layers.
//!
//! Every layer lives in one of a fixed set of storage shapes. The shape is a
//! pure function of the layer's metadata, decided once by [`classify`] when
//! the schema is built, and each shape knows how to render the four SQL
//! fragments a query can ask of it through [`LayerSql`].
//!
//! ```text
//!   Layer metadata ──▶ classify ──▶ LayerCategory ──▶ LayerSql::{label, id, count, labels, annotators}
//!                                                        │
//!                                                        └─ per Root (transcript | participant)
//! ```
//!
//! A fragment method returns `None` when the function has no meaning for
//! that shape and root, e.g. `annotators()` on the corpus, which has no
//! `annotated_by` column.

mod attribute;
mod entity;
mod layer;

pub use attribute::{ParticipantAttribute, TranscriptAttribute};
pub use entity::{Corpus, Episode, ParticipantEntity, RootId};
pub use layer::{AnnotationLayer, EpisodeLayer};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::compile::Root;
use crate::schema::{Layer, SchemaRoles};

/// Storage id of the corpus layer.
pub const CORPUS_LAYER_ID: i64 = -100;
/// Storage id of the episode layer.
pub const EPISODE_LAYER_ID: i64 = -50;
/// Storage id of the participant layer.
pub const PARTICIPANT_LAYER_ID: i64 = -2;

/// Attribute class of transcript attributes.
pub const TRANSCRIPT_CLASS: &str = "transcript";
/// Attribute class of participant attributes.
pub const PARTICIPANT_CLASS: &str = "speaker";

static ATTRIBUTE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(participant|transcript)_").expect("valid regex"));

// ============================================================================
// SQL fragments
// ============================================================================

/// SQL fragments a layer can contribute to a query.
///
/// Scalar fragments (`label`, `id`, `count`) yield one value per root row;
/// set fragments (`labels`, `annotators`) are subqueries for use after `IN`.
pub trait LayerSql {
    /// `my('L').label`: the first label on the layer.
    fn label(&self, root: Root) -> Option<String>;

    /// `my('L').id`: the identifier of the layer's entity.
    fn id(&self, _root: Root) -> Option<String> {
        None
    }

    /// `list('L').length`: the number of annotations.
    fn count(&self, root: Root) -> Option<String>;

    /// `labels('L')`: all labels.
    fn labels(&self, root: Root) -> Option<String>;

    /// `annotators('L')`: everyone who annotated the layer.
    fn annotators(&self, root: Root) -> Option<String>;
}

// ============================================================================
// Categories
// ============================================================================

/// The storage shape of a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerCategory {
    /// The schema's root layer: the graph itself.
    RootId(RootId),
    /// A free attribute of the transcript.
    TranscriptAttribute(TranscriptAttribute),
    /// A free attribute of a participant.
    ParticipantAttribute(ParticipantAttribute),
    /// The corpus a transcript belongs to.
    Corpus(Corpus),
    /// The episode (transcript family).
    Episode(Episode),
    /// A layer annotating episodes.
    EpisodeLayer(EpisodeLayer),
    /// The participants themselves.
    ParticipantEntity(ParticipantEntity),
    /// An ordinary annotation layer.
    AnnotationLayer(AnnotationLayer),
}

impl LayerCategory {
    /// Human-readable category name.
    pub fn name(&self) -> &'static str {
        match self {
            LayerCategory::RootId(_) => "graph root",
            LayerCategory::TranscriptAttribute(_) => "transcript attribute",
            LayerCategory::ParticipantAttribute(_) => "participant attribute",
            LayerCategory::Corpus(_) => "corpus",
            LayerCategory::Episode(_) => "episode",
            LayerCategory::EpisodeLayer(_) => "episode layer",
            LayerCategory::ParticipantEntity(_) => "participant",
            LayerCategory::AnnotationLayer(_) => "annotation layer",
        }
    }

    /// The attribute name, for layers stored in the attribute tables.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            LayerCategory::TranscriptAttribute(c) => Some(&c.attribute),
            LayerCategory::ParticipantAttribute(c) => Some(&c.attribute),
            _ => None,
        }
    }

    fn sql(&self) -> &dyn LayerSql {
        match self {
            LayerCategory::RootId(c) => c,
            LayerCategory::TranscriptAttribute(c) => c,
            LayerCategory::ParticipantAttribute(c) => c,
            LayerCategory::Corpus(c) => c,
            LayerCategory::Episode(c) => c,
            LayerCategory::EpisodeLayer(c) => c,
            LayerCategory::ParticipantEntity(c) => c,
            LayerCategory::AnnotationLayer(c) => c,
        }
    }
}

impl LayerSql for LayerCategory {
    fn label(&self, root: Root) -> Option<String> {
        self.sql().label(root)
    }

    fn id(&self, root: Root) -> Option<String> {
        self.sql().id(root)
    }

    fn count(&self, root: Root) -> Option<String> {
        self.sql().count(root)
    }

    fn labels(&self, root: Root) -> Option<String> {
        self.sql().labels(root)
    }

    fn annotators(&self, root: Root) -> Option<String> {
        self.sql().annotators(root)
    }
}

impl std::fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decide how a layer is stored.
///
/// Rules are tried in order: root layer, attribute class, then the numeric
/// storage id. Returns `None` for layers with no storage mapping, such as
/// system layers with an id between -50 and 0 other than -2.
pub fn classify(layer: &Layer, roles: &SchemaRoles) -> Option<LayerCategory> {
    if layer.id == roles.root {
        return Some(LayerCategory::RootId(RootId));
    }

    match layer.class_id.as_deref() {
        Some(TRANSCRIPT_CLASS) => {
            return Some(LayerCategory::TranscriptAttribute(TranscriptAttribute::new(
                attribute_name(layer),
            )));
        }
        Some(PARTICIPANT_CLASS) => {
            return Some(LayerCategory::ParticipantAttribute(
                ParticipantAttribute::new(attribute_name(layer)),
            ));
        }
        _ => {}
    }

    let layer_id = layer.layer_id?;
    match layer_id {
        CORPUS_LAYER_ID => Some(LayerCategory::Corpus(Corpus)),
        EPISODE_LAYER_ID => Some(LayerCategory::Episode(Episode)),
        PARTICIPANT_LAYER_ID => Some(LayerCategory::ParticipantEntity(ParticipantEntity)),
        id if id < EPISODE_LAYER_ID => Some(LayerCategory::EpisodeLayer(EpisodeLayer::new(id))),
        id if id >= 0 => Some(LayerCategory::AnnotationLayer(AnnotationLayer::new(
            id,
            layer.alignment.is_temporal(),
        ))),
        _ => None,
    }
}

/// The attribute name of an attribute layer: its `attribute` metadata, or
/// its id without a `participant_`/`transcript_` prefix.
pub fn attribute_name(layer: &Layer) -> String {
    match &layer.attribute {
        Some(attribute) => attribute.clone(),
        None => ATTRIBUTE_PREFIX.replace(&layer.id, "").into_owned(),
    }
}
