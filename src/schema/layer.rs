//! Layer definitions.

use serde::{Deserialize, Serialize};

/// How annotations on a layer are anchored in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Tags with no independent timing.
    #[default]
    None,
    /// Single points in time.
    Instant,
    /// Start and end times.
    Interval,
}

impl Alignment {
    /// Whether annotations carry their own anchors.
    pub fn is_temporal(self) -> bool {
        self != Alignment::None
    }
}

/// A named annotation layer plus the metadata that maps it to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Layer {
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub alignment: Alignment,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Whether a parent may have more than one annotation on this layer.
    #[serde(default)]
    pub peers: bool,

    /// Numeric storage id; negative ids denote system layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<i64>,

    /// Attribute class: `transcript` or `speaker`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,

    /// Attribute name within the class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Layer {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            alignment: Alignment::None,
            parent_id: None,
            peers: false,
            layer_id: None,
            class_id: None,
            attribute: None,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_peers(mut self, peers: bool) -> Self {
        self.peers = peers;
        self
    }

    pub fn with_layer_id(mut self, layer_id: i64) -> Self {
        self.layer_id = Some(layer_id);
        self
    }

    pub fn with_class_id(mut self, class_id: &str) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}
